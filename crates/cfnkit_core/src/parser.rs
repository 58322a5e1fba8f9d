//! Parsing template fragments back into property bags.

use cfnkit_schema::{FieldKind, PropertySchema, SchemaError, SchemaRegistry};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::token::{is_intrinsic, Token};
use crate::value::{PropertyBag, PropertyValue};

/// Parsed value plus the wire-format fields the schema did not recognize.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FromTemplateResult {
    pub value: PropertyValue,
    /// Unrecognized fields keyed by their dotted wire path, e.g. `Foo`,
    /// `Location.Foo` or `Items.0.Foo`. Dots and backslashes inside a key are
    /// escaped as `\.` and `\\`.
    pub extra_properties: IndexMap<String, Value>,
}

impl FromTemplateResult {
    fn value(value: PropertyValue) -> Self {
        Self {
            value,
            extra_properties: IndexMap::new(),
        }
    }

    /// Lift this result's extras under a parent wire path segment.
    fn absorb_extras(&mut self, parent: &str, child: IndexMap<String, Value>) {
        for (key, value) in child {
            self.extra_properties
                .insert(format!("{}.{}", escape_path_segment(parent), key), value);
        }
    }

    /// The parsed bag, if the fragment was an object.
    pub fn bag(&self) -> Option<&PropertyBag> {
        self.value.as_object()
    }
}

/// Parses wire-format template fragments into idiomatic property bags.
///
/// Values are coerced to their declared kind; the first value that cannot
/// be coerced aborts the parse.
pub struct PropertyParser<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> PropertyParser<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Parse a whole property object.
    pub fn parse(&self, schema: &PropertySchema, fragment: &Value) -> CoreResult<FromTemplateResult> {
        match fragment {
            Value::Null => Ok(FromTemplateResult::value(PropertyValue::Object(PropertyBag::new()))),
            v if is_intrinsic(v) => Ok(FromTemplateResult::value(PropertyValue::Deferred(
                Token::Intrinsic(v.clone()),
            ))),
            Value::Object(obj) => self.parse_object("", schema, obj),
            other => Ok(FromTemplateResult::value(PropertyValue::from_json(other))),
        }
    }

    fn parse_object(
        &self,
        path: &str,
        schema: &PropertySchema,
        obj: &Map<String, Value>,
    ) -> CoreResult<FromTemplateResult> {
        let mut result = FromTemplateResult::default();
        let mut bag = PropertyBag::new();

        for field in schema.fields() {
            let Some(raw) = obj.get(&field.wire_name).filter(|v| !v.is_null()) else {
                continue;
            };
            let field_path = join_path(path, &field.wire_name);
            let parsed = self.parse_kind(&field_path, &field.kind, raw)?;
            bag.insert(field.name.clone(), parsed.value);
            result.absorb_extras(&field.wire_name, parsed.extra_properties);
        }

        for (key, value) in obj {
            if schema.field_by_wire_name(key).is_none() {
                debug!("Keeping unrecognized property {} of {}", key, schema.type_name);
                result
                    .extra_properties
                    .insert(escape_path_segment(key), value.clone());
            }
        }

        result.value = PropertyValue::Object(bag);
        Ok(result)
    }

    fn parse_kind(&self, path: &str, kind: &FieldKind, value: &Value) -> CoreResult<FromTemplateResult> {
        if is_intrinsic(value) {
            return Ok(FromTemplateResult::value(PropertyValue::Deferred(
                Token::Intrinsic(value.clone()),
            )));
        }

        let parsed = match kind {
            FieldKind::Any => PropertyValue::from_json(value),
            FieldKind::String => PropertyValue::String(get_string(path, value)?),
            FieldKind::Number => PropertyValue::Number(get_number(path, value)?),
            FieldKind::Boolean => PropertyValue::Boolean(get_boolean(path, value)?),
            FieldKind::List(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| parse_error(path, kind, value))?;
                let mut result = FromTemplateResult::default();
                let mut list = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let parsed = self.parse_kind(&format!("{}[{}]", path, i), element, item)?;
                    list.push(parsed.value);
                    result.absorb_extras(&i.to_string(), parsed.extra_properties);
                }
                result.value = PropertyValue::List(list);
                return Ok(result);
            }
            FieldKind::Map(element) => {
                let entries = value
                    .as_object()
                    .ok_or_else(|| parse_error(path, kind, value))?;
                let mut result = FromTemplateResult::default();
                let mut bag = PropertyBag::new();
                for (key, item) in entries {
                    let parsed = self.parse_kind(&join_path(path, key), element, item)?;
                    bag.insert(key.clone(), parsed.value);
                    result.absorb_extras(key, parsed.extra_properties);
                }
                result.value = PropertyValue::Object(bag);
                return Ok(result);
            }
            FieldKind::Struct(type_name) => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| parse_error(path, kind, value))?;
                let schema = self
                    .registry
                    .get(type_name)
                    .ok_or_else(|| SchemaError::NotFound(type_name.clone()))?;
                return self.parse_object(path, schema, obj);
            }
        };

        Ok(FromTemplateResult::value(parsed))
    }
}

/// Escape one segment of a dotted property path so that a key containing
/// `.` stays a single segment.
pub fn escape_path_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c == '.' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn parse_error(path: &str, kind: &FieldKind, value: &Value) -> CoreError {
    CoreError::Parse {
        path: path.to_string(),
        expected: kind.to_string(),
        actual: format!("{} {}", json_kind(value), value),
    }
}

/// Strings accept numbers and booleans, which are stringified.
fn get_string(path: &str, value: &Value) -> CoreResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(parse_error(path, &FieldKind::String, other)),
    }
}

/// Numbers accept numeric strings.
fn get_number(path: &str, value: &Value) -> CoreResult<Number> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(i.into());
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(|| parse_error(path, &FieldKind::Number, value))
        }
        other => Err(parse_error(path, &FieldKind::Number, other)),
    }
}

/// Booleans accept `"true"` and `"false"` in any case.
fn get_boolean(path: &str, value: &Value) -> CoreResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(parse_error(path, &FieldKind::Boolean, other)),
    }
}
