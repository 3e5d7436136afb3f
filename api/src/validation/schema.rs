//! Declarative per-route schemas
//!
//! A `RouteSchema` is a static value listing every field a route accepts:
//! where it is read from, its type, whether it has a default and which
//! constraints apply. `RouteSchema::validate` checks a raw request against it
//! and, when every field is acceptable, returns a JSON object holding exactly
//! the declared fields with their declared types.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::extractors::{Constraint, FieldError, ValidationBuilder};
use super::validators::{
    validate_email, validate_greater_than, validate_max_length, validate_min_length,
    validate_pattern,
};

/// Where a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
    Body,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Path => "path",
            Location::Query => "query",
            Location::Body => "body",
        }
    }
}

/// Declared type of a field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// JSON object with its own fields. A body field of this kind stands
    /// for the whole request body.
    Object(&'static [FieldSchema]),
}

impl FieldKind {
    /// Name used in error messages and the OpenAPI document
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "number",
            FieldKind::Object(_) => "object",
        }
    }
}

/// Default used when an optional field is absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Text(&'static str),
    Integer(i64),
    Decimal(f64),
}

impl Scalar {
    pub fn to_value(self) -> Value {
        match self {
            Scalar::Text(s) => Value::String(s.to_string()),
            Scalar::Integer(n) => Value::from(n),
            Scalar::Decimal(n) => Number::from_f64(n).map_or(Value::Null, Value::Number),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Required,
    Default(Scalar),
}

/// A single constraint on a field value
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinLength(usize),
    MaxLength(usize),
    Pattern(&'static Lazy<Regex>),
    GreaterThan(i64),
    Email,
}

impl Rule {
    fn check(&self, value: &Value) -> Result<(), Constraint> {
        match (self, value) {
            (Rule::MinLength(min), Value::String(s)) => validate_min_length(s, *min),
            (Rule::MaxLength(max), Value::String(s)) => validate_max_length(s, *max),
            (Rule::Pattern(re), Value::String(s)) => validate_pattern(s, re),
            (Rule::Email, Value::String(s)) => validate_email(s),
            (Rule::GreaterThan(limit), Value::Number(n)) => match n.as_f64() {
                Some(v) => validate_greater_than(v, *limit),
                None => Err(Constraint::WrongType { expected: "number" }),
            },
            // Rules only attach to fields of a matching kind; any other
            // pairing never reaches here once the type check passed.
            _ => Ok(()),
        }
    }
}

/// Declaration of one field
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub location: Location,
    pub kind: FieldKind,
    pub presence: Presence,
    pub rules: &'static [Rule],
}

impl FieldSchema {
    /// Required field without constraints
    pub const fn required(name: &'static str, location: Location, kind: FieldKind) -> Self {
        Self {
            name,
            location,
            kind,
            presence: Presence::Required,
            rules: &[],
        }
    }

    /// Field falling back to `default` when absent
    pub const fn with_default(
        name: &'static str,
        location: Location,
        kind: FieldKind,
        default: Scalar,
    ) -> Self {
        Self {
            name,
            location,
            kind,
            presence: Presence::Default(default),
            rules: &[],
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }
}

/// Schema of one route
#[derive(Debug)]
pub struct RouteSchema {
    /// Operation identifier, also used as log and metric label
    pub name: &'static str,
    pub method: &'static str,
    /// Path template with `{param}` placeholders
    pub path: &'static str,
    pub summary: &'static str,
    pub fields: &'static [FieldSchema],
}

/// Undecoded request input, as gathered by the extractor
#[derive(Debug, Clone, Copy)]
pub struct RawRequest<'a> {
    pub path: &'a [(String, String)],
    pub query: &'a [(String, String)],
    pub body: &'a [u8],
    /// `Content-Type` header, if the request carried one
    pub content_type: Option<&'a str>,
}

impl RawRequest<'_> {
    /// Bodies are read as JSON unless a non-JSON media type was declared
    fn declares_json(&self) -> bool {
        self.content_type.map_or(true, is_json_media_type)
    }

    /// Repeated parameters resolve to the last occurrence
    fn lookup(&self, location: Location, name: &str) -> Option<&str> {
        let pairs = match location {
            Location::Path => self.path,
            Location::Query => self.query,
            Location::Body => return None,
        };
        pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// `application/json` or any `application/*+json` type, parameters ignored
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Parsed request body
enum Body {
    Absent,
    Invalid(String),
    /// Non-empty body sent with a non-JSON media type
    Opaque,
    Json(Value),
}

impl Body {
    fn parse(raw: &RawRequest<'_>) -> Self {
        let bytes = raw.body;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Body::Absent;
        }
        if !raw.declares_json() {
            return Body::Opaque;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Body::Json(value),
            Err(err) => Body::Invalid(err.to_string()),
        }
    }
}

impl RouteSchema {
    /// Path template in the router's `:param` syntax
    pub fn router_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => format!(":{}", param),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Whether a concrete request path fits the path template
    pub fn matches_path(&self, path: &str) -> bool {
        let mut template = self.path.split('/');
        let mut actual = path.split('/');
        loop {
            match (template.next(), actual.next()) {
                (None, None) => return true,
                (Some(expected), Some(segment)) => {
                    let is_param = expected.starts_with('{') && expected.ends_with('}');
                    if (is_param && segment.is_empty()) || (!is_param && expected != segment) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }

    pub fn has_body(&self) -> bool {
        self.fields.iter().any(|f| f.location == Location::Body)
    }

    pub fn fields_in(&self, location: Location) -> impl Iterator<Item = &'static FieldSchema> {
        let fields: &'static [FieldSchema] = self.fields;
        fields.iter().filter(move |f| f.location == location)
    }

    /// Check `raw` against every declared field
    ///
    /// All violations are collected before returning. On success the result
    /// is an object keyed by field name.
    pub fn validate(&self, raw: &RawRequest<'_>) -> Result<Value, Vec<FieldError>> {
        let mut builder = ValidationBuilder::new();
        let mut out = Map::new();
        let body = if self.has_body() {
            Body::parse(raw)
        } else {
            Body::Absent
        };

        for field in self.fields {
            let value = match field.location {
                Location::Path | Location::Query => {
                    let path = format!("{}.{}", field.location.as_str(), field.name);
                    check_param(field, raw.lookup(field.location, field.name), &path, &mut builder)
                }
                Location::Body => check_body(field, &body, &mut builder),
            };
            if let Some(value) = value {
                out.insert(field.name.to_string(), value);
            }
        }

        builder.build()?;
        Ok(Value::Object(out))
    }
}

fn check_param(
    field: &FieldSchema,
    raw: Option<&str>,
    path: &str,
    builder: &mut ValidationBuilder,
) -> Option<Value> {
    let Some(text) = raw else {
        return absent(field, path, builder);
    };

    match coerce_text(field.kind, text) {
        Ok(value) => check_rules(field, value, path, builder),
        Err(constraint) => {
            builder.add_error(path, constraint);
            None
        }
    }
}

fn check_body(field: &FieldSchema, body: &Body, builder: &mut ValidationBuilder) -> Option<Value> {
    let path = Location::Body.as_str();
    match body {
        Body::Absent => absent(field, path, builder),
        Body::Invalid(detail) => {
            builder.add_error(
                path,
                Constraint::InvalidJson {
                    detail: detail.clone(),
                },
            );
            None
        }
        Body::Opaque => wrong_type(field, path, builder),
        Body::Json(value) => check_json(field, value, path, builder),
    }
}

fn absent(field: &FieldSchema, path: &str, builder: &mut ValidationBuilder) -> Option<Value> {
    match field.presence {
        Presence::Default(default) => Some(default.to_value()),
        Presence::Required => {
            builder.add_error(path, Constraint::Missing);
            None
        }
    }
}

/// Parse a path or query string into the field's type
fn coerce_text(kind: FieldKind, text: &str) -> Result<Value, Constraint> {
    match kind {
        FieldKind::Text => Ok(Value::String(text.to_string())),
        FieldKind::Integer => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| Constraint::WrongType { expected: "integer" }),
        FieldKind::Decimal => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(Constraint::WrongType { expected: "number" }),
        FieldKind::Object(_) => Err(Constraint::WrongType { expected: "object" }),
    }
}

/// Check a JSON value against the field, recursing into objects
fn check_json(
    field: &FieldSchema,
    value: &Value,
    path: &str,
    builder: &mut ValidationBuilder,
) -> Option<Value> {
    let typed = match (field.kind, value) {
        (FieldKind::Text, Value::String(_)) => value.clone(),
        (FieldKind::Integer, Value::Number(n)) if n.is_i64() => value.clone(),
        // Whole floats such as `5.0` are accepted as integers.
        (FieldKind::Integer, Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Value::from(f as i64)
            }
            _ => return wrong_type(field, path, builder),
        },
        (FieldKind::Decimal, Value::Number(_)) => value.clone(),
        (FieldKind::Object(fields), Value::Object(map)) => {
            return check_object(fields, map, path, builder);
        }
        _ => return wrong_type(field, path, builder),
    };

    check_rules(field, typed, path, builder)
}

fn check_object(
    fields: &'static [FieldSchema],
    map: &Map<String, Value>,
    path: &str,
    builder: &mut ValidationBuilder,
) -> Option<Value> {
    let before = builder.error_count();
    let mut out = Map::new();

    for nested in fields {
        let nested_path = format!("{}.{}", path, nested.name);
        let value = match map.get(nested.name) {
            Some(value) => check_json(nested, value, &nested_path, builder),
            None => absent(nested, &nested_path, builder),
        };
        if let Some(value) = value {
            out.insert(nested.name.to_string(), value);
        }
    }

    (builder.error_count() == before).then_some(Value::Object(out))
}

fn wrong_type(field: &FieldSchema, path: &str, builder: &mut ValidationBuilder) -> Option<Value> {
    builder.add_error(
        path,
        Constraint::WrongType {
            expected: field.kind.type_name(),
        },
    );
    None
}

/// Apply rules in declaration order; the first violation is reported
fn check_rules(
    field: &FieldSchema,
    value: Value,
    path: &str,
    builder: &mut ValidationBuilder,
) -> Option<Value> {
    let violation = field.rules.iter().find_map(|rule| rule.check(&value).err());
    match violation {
        Some(constraint) => {
            builder.add_error(path, constraint);
            None
        }
        None => Some(value),
    }
}
