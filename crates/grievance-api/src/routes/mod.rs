//! Route definitions
//!
//! API routes are mounted under /api/v1; health routes stay outside so they
//! can skip rate limiting.

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::{grievances, health, wards};
use crate::state::AppState;

/// API router (health routes excluded)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(grievance_routes())
        .merge(ward_routes())
}

fn grievance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/grievances",
            get(grievances::list_grievances).post(grievances::create_grievance),
        )
        .route("/grievances/stats", get(grievances::grievance_stats))
        .route("/grievances/:grievance_id", get(grievances::get_grievance))
        .route(
            "/grievances/:grievance_id/history",
            get(grievances::get_history),
        )
        .route(
            "/grievances/:grievance_id/status",
            put(grievances::update_status),
        )
        .route(
            "/grievances/:grievance_id/priority",
            put(grievances::set_priority),
        )
}

fn ward_routes() -> Router<AppState> {
    Router::new()
        .route("/wards", get(wards::list_wards))
        .route("/wards/:ward_id", get(wards::get_ward))
}
