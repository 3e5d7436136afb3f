//! Input Validation Module
//!
//! Every echo route declares its accepted input as a static schema, and the
//! `Validated<T>` extractor enforces it before the handler runs.
//!
//! # Overview
//!
//! The validation system consists of four parts:
//!
//! 1. **Schema** - `RouteSchema` / `FieldSchema` declarations and the engine
//!    that checks a raw request against them
//! 2. **Requests** - the concrete schema of each route, bound to its input type
//! 3. **Extractors** - the `Validated<T>` extractor and the 422 error response
//! 4. **Validators** - reusable checks (length, pattern, email, bounds)
//!
//! # Usage
//!
//! ```ignore
//! use crate::validation::Validated;
//!
//! pub async fn validate_username(
//!     Validated(query): Validated<UsernameQuery>,
//! ) -> Json<UsernameValidation> {
//!     // query.username already satisfies length and pattern constraints
//!     Json(UsernameValidation::passed(query.username))
//! }
//! ```
//!
//! ## Validation Error Response
//!
//! When validation fails, a 422 Unprocessable Entity is returned listing
//! every violated field:
//!
//! ```json
//! {
//!   "error": "ValidationError",
//!   "message": "Validation failed for 2 fields",
//!   "errors": [
//!     {"field": "body.title", "message": "must be at least 3 characters",
//!      "constraint": {"type": "min_length", "limit": 3}},
//!     {"field": "body.content", "message": "must be at least 10 characters",
//!      "constraint": {"type": "min_length", "limit": 10}}
//!   ],
//!   "code": 422,
//!   "timestamp": "2026-02-20T10:30:00Z",
//!   "correlation_id": "uuid-here"
//! }
//! ```

pub mod extractors;
pub mod requests;
pub mod schema;
pub mod validators;

// Re-export commonly used items
pub use extractors::{
    Constraint, FieldError, RouteInput, Validated, ValidationBuilder, ValidationError,
};
pub use requests::ROUTES;
pub use schema::{FieldKind, FieldSchema, Location, Presence, RawRequest, RouteSchema, Rule, Scalar};
pub use validators::{
    validate_email, validate_greater_than, validate_max_length, validate_min_length,
    validate_pattern,
};
