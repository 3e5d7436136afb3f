use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers, metrics_handler, openapi,
    state::AppState,
    validation::requests::{CREATE_REPORT, CREATE_USER, GET_ITEMS, SEARCH_ITEMS, VALIDATE_USERNAME},
};

pub const METRICS_PATH: &str = "/metrics";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/openapi.json";

/// Fixed paths served next to the echo routes
pub const SERVICE_PATHS: [&str; 3] = [METRICS_PATH, HEALTH_PATH, OPENAPI_PATH];

pub fn observability_routes() -> Router<AppState> {
    Router::new().route(METRICS_PATH, get(metrics_handler::metrics_endpoint))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(handlers::health_check))
}

pub fn docs_routes() -> Router<AppState> {
    Router::new().route(OPENAPI_PATH, get(openapi::openapi_document))
}

/// Echo routes, registered at the paths their schemas declare
pub fn echo_routes() -> Router<AppState> {
    Router::new()
        .route(&GET_ITEMS.router_path(), get(handlers::get_items))
        .route(&SEARCH_ITEMS.router_path(), get(handlers::search_items))
        .route(&CREATE_USER.router_path(), post(handlers::create_user))
        .route(&VALIDATE_USERNAME.router_path(), get(handlers::validate_username))
        .route(&CREATE_REPORT.router_path(), post(handlers::create_report))
}
