//! Rendering property bags into template fragments.

use cfnkit_schema::{FieldKind, PropertySchema, SchemaError, SchemaRegistry};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreResult;
use crate::token::Resolver;
use crate::validator::PropertyValidator;
use crate::value::{PropertyBag, PropertyValue};

/// Renders idiomatic property bags into wire-format template fragments.
///
/// Rendering always validates first; an invalid bag is never rendered.
/// Output objects follow schema declaration order, and deferred values are
/// resolved in that same order.
pub struct PropertyRenderer<'a> {
    registry: &'a SchemaRegistry,
    resolver: &'a dyn Resolver,
    allow_unknown: bool,
}

impl<'a> PropertyRenderer<'a> {
    pub fn new(registry: &'a SchemaRegistry, resolver: &'a dyn Resolver) -> Self {
        Self {
            registry,
            resolver,
            allow_unknown: false,
        }
    }

    /// Accept (and drop) bag keys the schema does not declare.
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Validate and render a whole property object.
    pub fn render(&self, schema: &PropertySchema, value: &PropertyValue) -> CoreResult<Value> {
        PropertyValidator::new(self.registry)
            .allow_unknown(self.allow_unknown)
            .validate(schema, value)
            .assert_success(&schema.type_name)?;

        match value {
            PropertyValue::Deferred(token) => self.resolver.resolve(token),
            PropertyValue::Object(bag) => self.render_bag(schema, bag),
            other => Ok(other.to_json()),
        }
    }

    fn render_bag(&self, schema: &PropertySchema, bag: &PropertyBag) -> CoreResult<Value> {
        let mut out = Map::new();

        for field in schema.fields() {
            if let Some(value) = bag.present(&field.name) {
                out.insert(field.wire_name.clone(), self.render_kind(&field.kind, value)?);
            }
        }

        if self.allow_unknown {
            for key in bag.keys().filter(|k| schema.field(k).is_none()) {
                debug!("Dropping undeclared property {} of {}", key, schema.type_name);
            }
        }

        Ok(Value::Object(out))
    }

    fn render_kind(&self, kind: &FieldKind, value: &PropertyValue) -> CoreResult<Value> {
        match (kind, value) {
            (_, PropertyValue::Deferred(token)) => self.resolver.resolve(token),
            (FieldKind::List(element), PropertyValue::List(items)) => items
                .iter()
                .map(|item| self.render_kind(element, item))
                .collect::<CoreResult<Vec<_>>>()
                .map(Value::Array),
            (FieldKind::Map(element), PropertyValue::Object(entries)) => {
                let mut out = Map::new();
                for (key, item) in entries.iter() {
                    out.insert(key.clone(), self.render_kind(element, item)?);
                }
                Ok(Value::Object(out))
            }
            (FieldKind::Struct(type_name), PropertyValue::Object(bag)) => {
                let schema = self
                    .registry
                    .get(type_name)
                    .ok_or_else(|| SchemaError::NotFound(type_name.clone()))?;
                self.render_bag(schema, bag)
            }
            (_, other) => self.render_any(other),
        }
    }

    /// Render opaque values: keys kept verbatim, tokens resolved.
    fn render_any(&self, value: &PropertyValue) -> CoreResult<Value> {
        match value {
            PropertyValue::Deferred(token) => self.resolver.resolve(token),
            PropertyValue::List(items) => items
                .iter()
                .map(|item| self.render_any(item))
                .collect::<CoreResult<Vec<_>>>()
                .map(Value::Array),
            PropertyValue::Object(bag) => {
                let mut out = Map::new();
                for (key, item) in bag.iter() {
                    out.insert(key.clone(), self.render_any(item)?);
                }
                Ok(Value::Object(out))
            }
            scalar => Ok(scalar.to_json()),
        }
    }
}
