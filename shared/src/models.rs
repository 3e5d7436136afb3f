use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// BODY MODELS
// ═══════════════════════════════════════════════════════════════════════════

/// Postal address, embedded by value in a [`User`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: String,
}

/// User submitted to `POST /users/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: Address,
}

/// Report body submitted to `POST /reports/{report_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub content: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUTE INPUTS
//
// Each route's validated input mirrors its echoed response, so these types are
// both deserialized from the validated request and serialized back out.
// ═══════════════════════════════════════════════════════════════════════════

/// Query parameters for `GET /items/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub name: String,
    pub category: String,
    pub price: f64,
}

/// Query parameters for `GET /search/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub page: i64,
    pub size: i64,
}

/// Body of `POST /users/`, wrapped so it can be addressed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user: User,
}

/// Query parameters for `GET /validate/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// Combined path, query and body input of `POST /reports/{report_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub report_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub report: Report,
}

// ═══════════════════════════════════════════════════════════════════════════
// RESPONSES
// ═══════════════════════════════════════════════════════════════════════════

/// Marker value returned by `GET /validate/` once every constraint holds
pub const VALIDATION_PASSED: &str = "passed";

/// Response of `GET /validate/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernameValidation {
    pub username: String,
    pub validation: String,
}

impl UsernameValidation {
    pub fn passed(username: String) -> Self {
        Self {
            username,
            validation: VALIDATION_PASSED.to_string(),
        }
    }
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_secs: u64,
}
