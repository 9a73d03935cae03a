//! Grievance API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p grievance-api
//! ```
//!
//! Configuration is loaded from environment variables and `.env`.

use grievance_common::{try_init_tracing, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    let env = config
        .as_ref()
        .map_or_else(|_| Environment::default(), |c| c.app.env);
    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        storage = if config.database.is_memory() { "memory" } else { "postgres" },
        "Starting Grievance API Server"
    );

    if let Err(e) = grievance_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
