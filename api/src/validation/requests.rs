//! Route schemas for the echo endpoints
//!
//! Each route's fields and constraints are declared here as static values and
//! bound to the route's input type through `RouteInput`.

use echo_shared::models::{
    CreateReportRequest, CreateUserRequest, ItemQuery, SearchQuery, UsernameQuery,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::extractors::RouteInput;
use super::schema::{FieldKind, FieldSchema, Location, Presence, RouteSchema, Rule, Scalar};

// ─────────────────────────────────────────────────────────────────────────────
// Constants for validation rules
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum length for a username
const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum length for a username
const MAX_USERNAME_LENGTH: usize = 50;
/// Minimum length for a report title
const MIN_TITLE_LENGTH: usize = 3;
/// Minimum length for report content
const MIN_CONTENT_LENGTH: usize = 10;
/// Default page for search
const DEFAULT_PAGE: i64 = 1;
/// Default page size for search
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Letters, digits and underscore only
static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

// ─────────────────────────────────────────────────────────────────────────────
// GET /items/
// ─────────────────────────────────────────────────────────────────────────────

pub static GET_ITEMS: RouteSchema = RouteSchema {
    name: "get_items",
    method: "GET",
    path: "/items/",
    summary: "Echo an item described by query parameters",
    fields: &[
        FieldSchema::required("name", Location::Query, FieldKind::Text),
        FieldSchema::required("category", Location::Query, FieldKind::Text),
        FieldSchema::required("price", Location::Query, FieldKind::Decimal),
    ],
};

impl RouteInput for ItemQuery {
    fn schema() -> &'static RouteSchema {
        &GET_ITEMS
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /search/
// ─────────────────────────────────────────────────────────────────────────────

pub static SEARCH_ITEMS: RouteSchema = RouteSchema {
    name: "search_items",
    method: "GET",
    path: "/search/",
    summary: "Echo a search query with paging defaults",
    fields: &[
        FieldSchema::required("query", Location::Query, FieldKind::Text),
        FieldSchema::with_default(
            "page",
            Location::Query,
            FieldKind::Integer,
            Scalar::Integer(DEFAULT_PAGE),
        ),
        FieldSchema::with_default(
            "size",
            Location::Query,
            FieldKind::Integer,
            Scalar::Integer(DEFAULT_PAGE_SIZE),
        ),
    ],
};

impl RouteInput for SearchQuery {
    fn schema() -> &'static RouteSchema {
        &SEARCH_ITEMS
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// POST /users/
// ─────────────────────────────────────────────────────────────────────────────

static ADDRESS_FIELDS: [FieldSchema; 3] = [
    FieldSchema::required("street", Location::Body, FieldKind::Text),
    FieldSchema::required("city", Location::Body, FieldKind::Text),
    FieldSchema::required("zip", Location::Body, FieldKind::Text),
];

static USER_FIELDS: [FieldSchema; 3] = [
    FieldSchema::required("name", Location::Body, FieldKind::Text),
    FieldSchema {
        name: "email",
        location: Location::Body,
        kind: FieldKind::Text,
        presence: Presence::Required,
        rules: &[Rule::Email],
    },
    FieldSchema::required("address", Location::Body, FieldKind::Object(&ADDRESS_FIELDS)),
];

pub static CREATE_USER: RouteSchema = RouteSchema {
    name: "create_user",
    method: "POST",
    path: "/users/",
    summary: "Echo a user with a nested address",
    fields: &[FieldSchema::required("user", Location::Body, FieldKind::Object(&USER_FIELDS))],
};

impl RouteInput for CreateUserRequest {
    fn schema() -> &'static RouteSchema {
        &CREATE_USER
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /validate/
// ─────────────────────────────────────────────────────────────────────────────

pub static VALIDATE_USERNAME: RouteSchema = RouteSchema {
    name: "validate_username",
    method: "GET",
    path: "/validate/",
    summary: "Check a username against length and character constraints",
    fields: &[FieldSchema {
        name: "username",
        location: Location::Query,
        kind: FieldKind::Text,
        presence: Presence::Required,
        rules: &[
            Rule::MinLength(MIN_USERNAME_LENGTH),
            Rule::MaxLength(MAX_USERNAME_LENGTH),
            Rule::Pattern(&USERNAME_PATTERN),
        ],
    }],
};

impl RouteInput for UsernameQuery {
    fn schema() -> &'static RouteSchema {
        &VALIDATE_USERNAME
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// POST /reports/{report_id}
// ─────────────────────────────────────────────────────────────────────────────

static REPORT_FIELDS: [FieldSchema; 2] = [
    FieldSchema {
        name: "title",
        location: Location::Body,
        kind: FieldKind::Text,
        presence: Presence::Required,
        rules: &[Rule::MinLength(MIN_TITLE_LENGTH)],
    },
    FieldSchema {
        name: "content",
        location: Location::Body,
        kind: FieldKind::Text,
        presence: Presence::Required,
        rules: &[Rule::MinLength(MIN_CONTENT_LENGTH)],
    },
];

pub static CREATE_REPORT: RouteSchema = RouteSchema {
    name: "create_report",
    method: "POST",
    path: "/reports/{report_id}",
    summary: "Echo a report together with its id and date range",
    fields: &[
        FieldSchema {
            name: "report_id",
            location: Location::Path,
            kind: FieldKind::Integer,
            presence: Presence::Required,
            rules: &[Rule::GreaterThan(0)],
        },
        // Dates stay free text; no calendar parsing is applied.
        FieldSchema::required("start_date", Location::Query, FieldKind::Text),
        FieldSchema::required("end_date", Location::Query, FieldKind::Text),
        FieldSchema::required("report", Location::Body, FieldKind::Object(&REPORT_FIELDS)),
    ],
};

impl RouteInput for CreateReportRequest {
    fn schema() -> &'static RouteSchema {
        &CREATE_REPORT
    }
}

/// Every echo route, in registration order
pub static ROUTES: [&RouteSchema; 5] = [
    &GET_ITEMS,
    &SEARCH_ITEMS,
    &CREATE_USER,
    &VALIDATE_USERNAME,
    &CREATE_REPORT,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::extractors::Constraint;
    use crate::validation::schema::RawRequest;
    use serde_json::json;

    fn query(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn validate_query(schema: &RouteSchema, items: &[(&str, &str)]) -> Result<serde_json::Value, Vec<crate::validation::FieldError>> {
        let query = query(items);
        schema.validate(&RawRequest {
            path: &[],
            query: &query,
            body: b"",
            content_type: None,
        })
    }

    #[test]
    fn test_username_bounds() {
        assert!(validate_query(&VALIDATE_USERNAME, &[("username", "abc")]).is_ok());
        assert!(validate_query(&VALIDATE_USERNAME, &[("username", "a".repeat(50).as_str())]).is_ok());

        let errors = validate_query(&VALIDATE_USERNAME, &[("username", "ab")]).unwrap_err();
        assert_eq!(errors[0].constraint, Constraint::MinLength { limit: 3 });

        let errors = validate_query(&VALIDATE_USERNAME, &[("username", "a".repeat(51).as_str())]).unwrap_err();
        assert_eq!(errors[0].constraint, Constraint::MaxLength { limit: 50 });
    }

    #[test]
    fn test_username_pattern() {
        let errors = validate_query(&VALIDATE_USERNAME, &[("username", "bad!name")]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "query.username");
        assert_eq!(errors[0].constraint.kind(), "pattern");
    }

    #[test]
    fn test_search_defaults() {
        let value = validate_query(&SEARCH_ITEMS, &[("query", "rust")]).unwrap();
        assert_eq!(value, json!({"query": "rust", "page": 1, "size": 10}));
    }

    #[test]
    fn test_search_paging_is_unbounded() {
        let value = validate_query(&SEARCH_ITEMS, &[("query", "q"), ("page", "-4"), ("size", "0")]).unwrap();
        assert_eq!(value["page"], -4);
        assert_eq!(value["size"], 0);
    }

    #[test]
    fn test_items_price_must_be_numeric() {
        let errors = validate_query(
            &GET_ITEMS,
            &[("name", "pen"), ("category", "office"), ("price", "cheap")],
        )
        .unwrap_err();
        assert_eq!(errors[0].field, "query.price");
        assert_eq!(errors[0].constraint, Constraint::WrongType { expected: "number" });
    }

    #[test]
    fn test_user_nested_address_errors() {
        let body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "address": {"street": "1 Main St", "zip": 12345}
        })
        .to_string();

        let errors = CREATE_USER
            .validate(&RawRequest {
                path: &[],
                query: &[],
                body: body.as_bytes(),
                content_type: None,
            })
            .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["body.address.city", "body.address.zip"]);
    }

    #[test]
    fn test_report_id_must_be_positive() {
        let path = query(&[("report_id", "0")]);
        let q = query(&[("start_date", "2024-01-01"), ("end_date", "2024-01-02")]);
        let body = json!({"title": "Weekly", "content": "Everything is fine."}).to_string();

        let errors = CREATE_REPORT
            .validate(&RawRequest {
                path: &path,
                query: &q,
                body: body.as_bytes(),
                content_type: None,
            })
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "path.report_id");
        assert_eq!(errors[0].constraint, Constraint::GreaterThan { limit: 0 });
    }

    #[test]
    fn test_routes_are_unique() {
        for (i, a) in ROUTES.iter().enumerate() {
            for b in &ROUTES[i + 1..] {
                assert_ne!(a.name, b.name);
                assert!(a.method != b.method || a.path != b.path);
            }
        }
    }
}
