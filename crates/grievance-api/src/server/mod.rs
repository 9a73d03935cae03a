//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::sync::Arc;

use axum::Router;
use grievance_common::{AppConfig, AppError, JwtService};
use grievance_core::{GrievanceRepository, LifecyclePolicy, SnowflakeGenerator, WardRepository};
use grievance_db::{
    create_pool, run_migrations, InMemoryGrievanceRepository, InMemoryWardRepository,
    PgGrievanceRepository, PgWardRepository, PoolSettings,
};
use grievance_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

type Repositories = (Arc<dyn GrievanceRepository>, Arc<dyn WardRepository>);

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns `AppError::Config` when the rate limit settings are unusable
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let router = apply_rate_limit(create_router(), &config.rate_limit)?.merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    Ok(router.with_state(state))
}

/// Initialize storage and services and create the `AppState`
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let (grievance_repo, ward_repo) = if config.database.is_memory() {
        memory_repositories(&config)?
    } else {
        postgres_repositories(&config).await?
    };

    let jwt_service = Arc::new(JwtService::new(&config.idp));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let lifecycle = LifecyclePolicy::new(
        config.lifecycle.transitions.clone(),
        config.lifecycle.same_status,
    );

    let service_context = ServiceContextBuilder::new()
        .grievance_repo(grievance_repo)
        .ward_repo(ward_repo)
        .lifecycle(lifecycle)
        .page_limits(config.paging.limits())
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

fn memory_repositories(config: &AppConfig) -> Result<Repositories, AppError> {
    let wards = match &config.database.wards_file {
        Some(path) => InMemoryWardRepository::from_json_file(path)
            .map_err(|e| AppError::Config(e.to_string()))?,
        None => {
            warn!("WARDS_FILE not set; the in-memory ward directory is empty");
            InMemoryWardRepository::default()
        }
    };
    info!(wards = wards.len(), "Using in-memory storage");

    let grievance_repo: Arc<dyn GrievanceRepository> = Arc::new(InMemoryGrievanceRepository::new());
    let ward_repo: Arc<dyn WardRepository> = Arc::new(wards);
    Ok((grievance_repo, ward_repo))
}

async fn postgres_repositories(config: &AppConfig) -> Result<Repositories, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolSettings::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let grievance_repo: Arc<dyn GrievanceRepository> =
        Arc::new(PgGrievanceRepository::new(pool.clone()));
    let ward_repo: Arc<dyn WardRepository> = Arc::new(PgWardRepository::new(pool));
    Ok((grievance_repo, ward_repo))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Bind `addr` and run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, &addr).await
}
