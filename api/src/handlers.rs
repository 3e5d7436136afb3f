use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use echo_shared::{
    CreateReportRequest, CreateUserRequest, HealthStatus, ItemQuery, SearchQuery, User,
    UsernameQuery, UsernameValidation,
};

use crate::{
    error::ApiError,
    routes::SERVICE_PATHS,
    state::AppState,
    validation::{Validated, ROUTES},
};

/// GET /items/
pub async fn get_items(Validated(item): Validated<ItemQuery>) -> Json<ItemQuery> {
    Json(item)
}

/// GET /search/
pub async fn search_items(Validated(search): Validated<SearchQuery>) -> Json<SearchQuery> {
    tracing::debug!(query = %search.query, page = search.page, size = search.size, "search echoed");
    Json(search)
}

/// POST /users/
pub async fn create_user(Validated(req): Validated<CreateUserRequest>) -> Json<User> {
    Json(req.user)
}

/// GET /validate/
pub async fn validate_username(
    Validated(query): Validated<UsernameQuery>,
) -> Json<UsernameValidation> {
    Json(UsernameValidation::passed(query.username))
}

/// POST /reports/{report_id}
pub async fn create_report(
    Validated(req): Validated<CreateReportRequest>,
) -> Json<CreateReportRequest> {
    tracing::debug!(report_id = req.report_id, "report echoed");
    Json(req)
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let uptime = state.started_at.elapsed().as_secs();

    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: uptime,
    })
}

/// Fallback: redirect when only the trailing slash differs, otherwise 404
pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    match slash_redirect_target(&uri) {
        Some(target) => {
            tracing::debug!(from = uri.path(), to = %target, "redirecting to declared path");
            Redirect::temporary(&target).into_response()
        }
        None => ApiError::route_not_found(method, uri.path()).into_response(),
    }
}

/// Request path with its trailing slash toggled, if that form is served
fn slash_redirect_target(uri: &Uri) -> Option<String> {
    let path = uri.path();
    if path == "/" {
        return None;
    }

    let alternate = match path.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => format!("{}/", path),
    };

    let served = ROUTES.iter().any(|route| route.matches_path(&alternate))
        || SERVICE_PATHS.contains(&alternate.as_str());
    if !served {
        return None;
    }

    Some(match uri.query() {
        Some(query) => format!("{}?{}", alternate, query),
        None => alternate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(uri: &str) -> Option<String> {
        slash_redirect_target(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn test_slash_redirect_target() {
        assert_eq!(target("/items"), Some("/items/".to_string()));
        assert_eq!(
            target("/search?query=rust&page=2"),
            Some("/search/?query=rust&page=2".to_string())
        );
        assert_eq!(target("/reports/5/"), Some("/reports/5".to_string()));
        assert_eq!(target("/health/"), Some("/health".to_string()));
        assert_eq!(target("/nope"), None);
        assert_eq!(target("/"), None);
    }
}
