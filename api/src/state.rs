use prometheus::Registry;
use std::time::Instant;

/// Application state shared across handlers
///
/// Read-only after startup; echo handlers never touch it.
#[derive(Clone)]
pub struct AppState {
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            started_at: Instant::now(),
            registry,
        }
    }
}
