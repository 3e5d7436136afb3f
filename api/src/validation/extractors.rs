//! Custom Axum extractor for validated route input
//!
//! This module provides `Validated<T>` - an extractor that gathers the raw
//! path parameters, query string and body of a request, checks them against
//! the route's declared schema and only then builds the typed input `T`.

use std::fmt;

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        rejection::RawPathParamsRejection, FromRequest, FromRequestParts, Query, RawPathParams,
        Request,
    },
    http::{header, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::schema::{RawRequest, RouteSchema};
use crate::metrics;

/// The constraint a field violated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    Missing,
    WrongType { expected: &'static str },
    MinLength { limit: usize },
    MaxLength { limit: usize },
    Pattern { pattern: String },
    GreaterThan { limit: i64 },
    Email,
    InvalidJson { detail: String },
}

impl Constraint {
    /// Stable label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Missing => "missing",
            Constraint::WrongType { .. } => "wrong_type",
            Constraint::MinLength { .. } => "min_length",
            Constraint::MaxLength { .. } => "max_length",
            Constraint::Pattern { .. } => "pattern",
            Constraint::GreaterThan { .. } => "greater_than",
            Constraint::Email => "email",
            Constraint::InvalidJson { .. } => "invalid_json",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Missing => write!(f, "field required"),
            Constraint::WrongType { expected } => write!(f, "must be a valid {}", expected),
            Constraint::MinLength { limit } => write!(f, "must be at least {} characters", limit),
            Constraint::MaxLength { limit } => write!(f, "must be at most {} characters", limit),
            Constraint::Pattern { pattern } => write!(f, "must match pattern '{}'", pattern),
            Constraint::GreaterThan { limit } => write!(f, "must be greater than {}", limit),
            Constraint::Email => write!(f, "must be a valid email address"),
            Constraint::InvalidJson { detail } => write!(f, "invalid JSON body: {}", detail),
        }
    }
}

/// A field-level validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub constraint: Constraint,
}

impl FieldError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            message: constraint.to_string(),
            constraint,
        }
    }
}

/// Validation error response body
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub code: u16,
    pub timestamp: String,
    pub correlation_id: String,
}

impl ValidationErrorResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        let error_summary = match errors.as_slice() {
            [only] => format!("Validation failed for field '{}'", only.field),
            _ => format!("Validation failed for {} fields", errors.len()),
        };

        Self {
            error: "ValidationError".to_string(),
            message: error_summary,
            errors,
            code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Validation error that converts to a 422 response
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            errors: vec![FieldError::new(field, constraint)],
        }
    }
}

impl axum::response::IntoResponse for ValidationError {
    fn into_response(self) -> axum::response::Response {
        let response = ValidationErrorResponse::new(self.errors);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
    }
}

/// Typed input of a route, built only after its schema accepted the request
///
/// The schema is the single source of truth for which fields exist, where
/// they come from and which constraints they carry. `Deserialize` only maps
/// the already-checked JSON object onto the struct.
pub trait RouteInput: DeserializeOwned {
    fn schema() -> &'static RouteSchema;
}

/// Extractor that validates path, query and body in one pass
///
/// Unlike stacking `Path`, `Query` and `Json`, every violated field across all
/// three locations is reported in a single 422 response.
///
/// # Example
///
/// ```ignore
/// pub async fn create_report(
///     Validated(req): Validated<CreateReportRequest>,
/// ) -> Json<CreateReportRequest> {
///     Json(req)
/// }
/// ```
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    T: RouteInput + Send,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let schema = T::schema();
        let (mut parts, body) = req.into_parts();

        let path: Vec<(String, String)> = match RawPathParams::from_request_parts(&mut parts, state).await {
            Ok(params) => params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Err(RawPathParamsRejection::MissingPathParams(_)) => Vec::new(),
            Err(err) => {
                tracing::debug!(route = schema.name, error = %err, "path parameters rejected");
                return Err(ValidationError::single(
                    "path",
                    Constraint::WrongType { expected: "utf-8 path segment" },
                ));
            }
        };

        // Undecodable query strings are treated as absent parameters so each
        // required field is still reported individually.
        let query = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap_or_default().to_string());

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|_| {
                ValidationError::single(
                    "body",
                    Constraint::InvalidJson {
                        detail: "failed to read request body".to_string(),
                    },
                )
            })?;

        let raw = RawRequest {
            path: &path,
            query: &query,
            body: &bytes,
            content_type: content_type.as_deref(),
        };

        let value = schema.validate(&raw).map_err(|errors| reject(schema, errors))?;

        // The schema already produced exactly the declared fields with the
        // declared JSON types, so a failure here means schema and struct
        // disagree.
        let input = serde_json::from_value::<T>(value).map_err(|err| {
            tracing::error!(route = schema.name, error = %err, "validated input does not match route type");
            ValidationError::single(
                "body",
                Constraint::WrongType { expected: "route input" },
            )
        })?;

        Ok(Validated(input))
    }
}

fn reject(schema: &RouteSchema, errors: Vec<FieldError>) -> ValidationError {
    tracing::debug!(
        route = schema.name,
        error_count = errors.len(),
        "request rejected by validation"
    );
    metrics::observe_validation_failure(schema.name, &errors);
    ValidationError::new(errors)
}

/// Builder for accumulating validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Add an error directly
    pub fn add_error(&mut self, field: impl Into<String>, constraint: Constraint) -> &mut Self {
        self.errors.push(FieldError::new(field, constraint));
        self
    }

    /// Finish building and return Result
    pub fn build(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Get current error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_field_error_message_follows_constraint() {
        let error = FieldError::new("query.username", Constraint::MinLength { limit: 3 });
        assert_eq!(error.field, "query.username");
        assert_eq!(error.message, "must be at least 3 characters");
    }

    #[test]
    fn test_constraint_serializes_tagged() {
        let value = serde_json::to_value(Constraint::GreaterThan { limit: 0 }).unwrap();
        assert_eq!(value, serde_json::json!({"type": "greater_than", "limit": 0}));

        let value = serde_json::to_value(Constraint::Missing).unwrap();
        assert_eq!(value, serde_json::json!({"type": "missing"}));
    }

    #[test]
    fn test_validation_builder() {
        let mut builder = ValidationBuilder::new();

        assert_eq!(builder.error_count(), 0);

        builder
            .add_error("body.title", Constraint::MinLength { limit: 3 })
            .add_error("path.report_id", Constraint::GreaterThan { limit: 0 });

        assert_eq!(builder.error_count(), 2);

        let errors = builder.build().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "body.title");
        assert_eq!(errors[1].field, "path.report_id");
    }

    #[test]
    fn test_empty_builder_is_ok() {
        assert!(ValidationBuilder::new().build().is_ok());
    }

    #[test]
    fn test_validation_error_response() {
        let errors = vec![
            FieldError::new("body.title", Constraint::MinLength { limit: 3 }),
            FieldError::new("body.content", Constraint::MinLength { limit: 10 }),
        ];

        let response = ValidationErrorResponse::new(errors);

        assert_eq!(response.error, "ValidationError");
        assert_eq!(response.code, 422);
        assert_eq!(response.errors.len(), 2);
        assert!(response.message.contains("2 fields"));
    }

    #[test]
    fn test_single_error_response() {
        let errors = vec![FieldError::new("query.name", Constraint::Missing)];
        let response = ValidationErrorResponse::new(errors);

        assert!(response.message.contains("field 'query.name'"));
    }

    #[test]
    fn test_validation_error_status() {
        let resp = ValidationError::single("body", Constraint::Missing).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
