//! Property validation against a schema.

use cfnkit_schema::{FieldKind, PropertySchema, SchemaRegistry};

use crate::validation::{FieldError, ValidationResult};
use crate::value::{PropertyBag, PropertyValue};

/// Checks property bags against schemas.
///
/// Validation is pure and aggregates every error it finds. Deferred values
/// are valid for any kind, at any depth.
pub struct PropertyValidator<'a> {
    registry: &'a SchemaRegistry,
    allow_unknown: bool,
}

impl<'a> PropertyValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            allow_unknown: false,
        }
    }

    /// Accept bag keys the schema does not declare instead of reporting them.
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Validate a whole property object.
    pub fn validate(&self, schema: &PropertySchema, value: &PropertyValue) -> ValidationResult {
        match value {
            PropertyValue::Deferred(_) => ValidationResult::new(),
            PropertyValue::Object(bag) => self.validate_bag(schema, bag),
            other => {
                let mut result = ValidationResult::new();
                result.add_error(FieldError::NotAnObject {
                    actual: other.to_json().to_string(),
                });
                result
            }
        }
    }

    /// Validate a property bag.
    pub fn validate_bag(&self, schema: &PropertySchema, bag: &PropertyBag) -> ValidationResult {
        let mut result = ValidationResult::new();

        for field in schema.fields() {
            match bag.present(&field.name) {
                None if field.required => result.add_error(FieldError::MissingRequired {
                    path: field.name.clone(),
                }),
                None => {}
                Some(value) => {
                    result.merge_prefixed(&field.name, self.validate_kind(&field.kind, value));
                }
            }
        }

        if !self.allow_unknown {
            for key in bag.keys() {
                if schema.field(key).is_none() {
                    result.add_error(FieldError::UnknownProperty { path: key.clone() });
                }
            }
        }

        result
    }

    /// Validate one value against a kind. Paths in the result are relative
    /// to the value: `[i]` for list elements, `key` for map entries.
    fn validate_kind(&self, kind: &FieldKind, value: &PropertyValue) -> ValidationResult {
        let mut result = ValidationResult::new();

        if value.is_deferred() {
            return result;
        }

        match (kind, value) {
            (FieldKind::Any, _) => {}
            (FieldKind::String, PropertyValue::String(_))
            | (FieldKind::Number, PropertyValue::Number(_))
            | (FieldKind::Boolean, PropertyValue::Boolean(_)) => {}
            (FieldKind::List(element), PropertyValue::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    result.merge_prefixed(&format!("[{}]", i), self.validate_element(element, item));
                }
            }
            (FieldKind::Map(element), PropertyValue::Object(entries)) => {
                for (key, item) in entries.iter() {
                    result.merge_prefixed(key, self.validate_element(element, item));
                }
            }
            (FieldKind::Struct(type_name), PropertyValue::Object(bag)) => {
                match self.registry.get(type_name) {
                    Some(schema) => result.merge(self.validate_bag(schema, bag)),
                    None => result.add_error(FieldError::UnresolvedSchema {
                        path: String::new(),
                        type_name: type_name.clone(),
                    }),
                }
            }
            (kind, value) => result.add_error(FieldError::TypeMismatch {
                path: String::new(),
                expected: kind.to_string(),
                actual: value.kind_name().to_string(),
            }),
        }

        result
    }

    /// Elements of lists and maps may not be null.
    fn validate_element(&self, kind: &FieldKind, value: &PropertyValue) -> ValidationResult {
        if value.is_null() && *kind != FieldKind::Any {
            let mut result = ValidationResult::new();
            result.add_error(FieldError::TypeMismatch {
                path: String::new(),
                expected: kind.to_string(),
                actual: "null".to_string(),
            });
            return result;
        }
        self.validate_kind(kind, value)
    }
}
