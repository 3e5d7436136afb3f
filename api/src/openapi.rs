//! OpenAPI 3.1 document generation from the route schemas.
//!
//! The same static schemas that drive request validation describe the API,
//! so the published document cannot drift from what the service enforces.

use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};
use crate::validation::{FieldKind, FieldSchema, Location, Presence, RouteSchema, Rule, ROUTES};

const OPENAPI_VERSION: &str = "3.1.0";
const JSON_MEDIA_TYPE: &str = "application/json";

/// OpenAPI root document
#[derive(Debug, Clone, Serialize)]
pub struct OpenApiDoc {
    pub openapi: String,
    pub info: OpenApiInfo,
    pub paths: BTreeMap<String, PathItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: Schema,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    pub required: bool,
    pub content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    pub schema: Schema,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// Build the document for every registered route
pub fn generate(routes: &[&RouteSchema]) -> OpenApiDoc {
    let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();

    for route in routes {
        let item = paths.entry(route.path.to_string()).or_default();
        let operation = Some(operation(route));
        match route.method {
            "GET" => item.get = operation,
            "POST" => item.post = operation,
            other => tracing::warn!(method = other, route = route.name, "method not described in OpenAPI"),
        }
    }

    OpenApiDoc {
        openapi: OPENAPI_VERSION.to_string(),
        info: OpenApiInfo {
            title: "Echo Validator".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        paths,
    }
}

fn operation(route: &RouteSchema) -> Operation {
    let parameters = route
        .fields_in(Location::Path)
        .chain(route.fields_in(Location::Query))
        .map(|field| Parameter {
            name: field.name.to_string(),
            location: field.location.as_str().to_string(),
            required: field.is_required(),
            schema: field_schema(field),
        })
        .collect();

    let request_body = route.fields_in(Location::Body).next().map(|field| RequestBody {
        required: field.is_required(),
        content: BTreeMap::from([(
            JSON_MEDIA_TYPE.to_string(),
            MediaType {
                schema: field_schema(field),
            },
        )]),
    });

    let responses = BTreeMap::from([
        (
            "200".to_string(),
            Response {
                description: "Successful Response".to_string(),
            },
        ),
        (
            "422".to_string(),
            Response {
                description: "Validation Error".to_string(),
            },
        ),
    ]);

    Operation {
        operation_id: route.name.to_string(),
        summary: route.summary.to_string(),
        parameters,
        request_body,
        responses,
    }
}

fn field_schema(field: &FieldSchema) -> Schema {
    let mut schema = Schema {
        schema_type: field.kind.type_name().to_string(),
        ..Schema::default()
    };

    if let Presence::Default(default) = field.presence {
        schema.default = Some(default.to_value());
    }

    for rule in field.rules {
        match rule {
            Rule::MinLength(n) => schema.min_length = Some(*n),
            Rule::MaxLength(n) => schema.max_length = Some(*n),
            Rule::Pattern(re) => schema.pattern = Some(re.as_str().to_string()),
            Rule::GreaterThan(n) => schema.exclusive_minimum = Some(*n),
            Rule::Email => schema.format = Some("email".to_string()),
        }
    }

    if let FieldKind::Object(fields) = field.kind {
        schema.properties = Some(
            fields
                .iter()
                .map(|nested| (nested.name.to_string(), field_schema(nested)))
                .collect(),
        );
        schema.required = Some(
            fields
                .iter()
                .filter(|nested| nested.is_required())
                .map(|nested| nested.name.to_string())
                .collect(),
        );
    }

    schema
}

/// GET /openapi.json
pub async fn openapi_document() -> ApiResult<Json<serde_json::Value>> {
    let doc = generate(&ROUTES);
    serde_json::to_value(doc)
        .map(Json)
        .map_err(|err| ApiError::internal(format!("Failed to render OpenAPI document: {}", err)))
}
