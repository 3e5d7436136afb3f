pub mod config;
pub mod error;
pub mod handlers;
pub mod logging_middleware;
pub mod metrics;
pub mod metrics_handler;
pub mod observability;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router with middleware and state applied
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::echo_routes())
        .merge(routes::health_routes())
        .merge(routes::docs_routes())
        .merge(routes::observability_routes())
        .fallback(handlers::route_not_found)
        .layer(middleware::from_fn(logging_middleware::request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
