//! Property schema definitions.
//!
//! A [`PropertySchema`] describes one resource type or one nested structure
//! type as plain data. Every validate/render/parse operation in cfnkit is an
//! interpretation of these values, so adding a resource type never requires
//! new code.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::naming::{to_camel_case, to_pascal_case};

/// Whether a schema describes a top-level resource or a nested structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaCategory {
    #[default]
    Resource,
    Structure,
}

/// Declared shape of a field.
///
/// In schema files a kind is written as a short string: `string`, `number`,
/// `boolean`, `any`, `list<KIND>`, `map<KIND>` or `struct<TypeName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Opaque JSON; accepted and rendered as-is.
    Any,
    List(Box<FieldKind>),
    Map(Box<FieldKind>),
    /// Reference to a structure schema by type name.
    Struct(String),
}

impl FieldKind {
    pub fn list(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    pub fn map(value: FieldKind) -> Self {
        FieldKind::Map(Box::new(value))
    }

    pub fn structure(type_name: impl Into<String>) -> Self {
        FieldKind::Struct(type_name.into())
    }

    /// Structure type names this kind refers to, at any depth.
    pub fn structure_refs(&self) -> Vec<&str> {
        match self {
            FieldKind::Struct(name) => vec![name.as_str()],
            FieldKind::List(inner) | FieldKind::Map(inner) => inner.structure_refs(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Any => write!(f, "any"),
            FieldKind::List(inner) => write!(f, "list<{}>", inner),
            FieldKind::Map(inner) => write!(f, "map<{}>", inner),
            FieldKind::Struct(name) => write!(f, "struct<{}>", name),
        }
    }
}

impl FromStr for FieldKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "string" => return Ok(FieldKind::String),
            "number" => return Ok(FieldKind::Number),
            "boolean" => return Ok(FieldKind::Boolean),
            "any" | "json" => return Ok(FieldKind::Any),
            _ => {}
        }

        let generic = |prefix: &str| {
            s.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix('>'))
                .map(str::trim)
        };

        if let Some(inner) = generic("list<") {
            return Ok(FieldKind::list(inner.parse()?));
        }
        if let Some(inner) = generic("map<") {
            return Ok(FieldKind::map(inner.parse()?));
        }
        if let Some(name) = generic("struct<") {
            if !name.is_empty() {
                return Ok(FieldKind::structure(name));
            }
        }

        Err(SchemaError::InvalidKind(s.to_string()))
    }
}

impl TryFrom<String> for FieldKind {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.to_string()
    }
}

/// One field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Idiomatic (camelCase) name used in property bags.
    pub name: String,
    /// Wire-format (PascalCase) name used in template fragments.
    pub wire_name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    /// Create an optional field; the wire name is derived from `name`.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            wire_name: to_pascal_case(&name),
            name,
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_wire_name(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = wire_name.into();
        self
    }
}

/// Field as written in a schema file, where either spelling may be omitted.
#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    wire_name: Option<String>,
    kind: FieldKind,
    #[serde(default)]
    required: bool,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    type_name: String,
    #[serde(default)]
    category: SchemaCategory,
    #[serde(default)]
    fields: Vec<RawField>,
}

/// Schema of one resource or nested-structure type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct PropertySchema {
    /// Type name, e.g. `AWS::Oam::Link` or `AWS::S3::Bucket.S3Location`.
    pub type_name: String,
    pub category: SchemaCategory,
    fields: Vec<FieldDescriptor>,
}

impl PropertySchema {
    /// Build a schema, rejecting duplicate idiomatic or wire names.
    pub fn new(
        type_name: impl Into<String>,
        category: SchemaCategory,
        fields: Vec<FieldDescriptor>,
    ) -> SchemaResult<Self> {
        let type_name = type_name.into();
        let mut names = HashSet::new();
        let mut wire_names = HashSet::new();

        for field in &fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name,
                    field: field.name.clone(),
                });
            }
            if !wire_names.insert(field.wire_name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name,
                    field: field.wire_name.clone(),
                });
            }
        }

        Ok(Self {
            type_name,
            category,
            fields,
        })
    }

    /// Start building a resource schema.
    pub fn resource(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name, SchemaCategory::Resource)
    }

    /// Start building a nested structure schema.
    pub fn structure(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name, SchemaCategory::Structure)
    }

    /// Schema with no fields; every property of a fragment becomes an extra.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            category: SchemaCategory::Resource,
            fields: Vec::new(),
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn is_resource(&self) -> bool {
        self.category == SchemaCategory::Resource
    }
}

impl TryFrom<RawSchema> for PropertySchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let mut fields = Vec::with_capacity(raw.fields.len());

        for field in raw.fields {
            let (name, wire_name) = match (field.name, field.wire_name) {
                (Some(name), Some(wire)) => (name, wire),
                (Some(name), None) => {
                    let wire = to_pascal_case(&name);
                    (name, wire)
                }
                (None, Some(wire)) => (to_camel_case(&wire), wire),
                (None, None) => {
                    return Err(SchemaError::UnnamedField {
                        type_name: raw.type_name,
                    })
                }
            };
            fields.push(FieldDescriptor {
                name,
                wire_name,
                kind: field.kind,
                required: field.required,
            });
        }

        PropertySchema::new(raw.type_name, raw.category, fields)
    }
}

/// Builder for [`PropertySchema`].
pub struct SchemaBuilder {
    type_name: String,
    category: SchemaCategory,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    fn new(type_name: impl Into<String>, category: SchemaCategory) -> Self {
        Self {
            type_name: type_name.into(),
            category,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required(self, name: &str, kind: FieldKind) -> Self {
        self.field(FieldDescriptor::new(name, kind).required())
    }

    pub fn optional(self, name: &str, kind: FieldKind) -> Self {
        self.field(FieldDescriptor::new(name, kind))
    }

    pub fn build(self) -> SchemaResult<PropertySchema> {
        PropertySchema::new(self.type_name, self.category, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_syntax() {
        let kind: FieldKind = "list<map<string>>".parse().unwrap();
        assert_eq!(kind, FieldKind::list(FieldKind::map(FieldKind::String)));
        assert_eq!(kind.to_string(), "list<map<string>>");

        let kind: FieldKind = "struct<AWS::S3::Bucket.S3Location>".parse().unwrap();
        assert_eq!(kind.structure_refs(), vec!["AWS::S3::Bucket.S3Location"]);

        assert!("list<".parse::<FieldKind>().is_err());
        assert!("struct<>".parse::<FieldKind>().is_err());
        assert!("float".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let result = PropertySchema::resource("AWS::Test::Thing")
            .required("name", FieldKind::String)
            .optional("name", FieldKind::Number)
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));

        let result = PropertySchema::resource("AWS::Test::Thing")
            .optional("name", FieldKind::String)
            .field(FieldDescriptor::new("other", FieldKind::String).with_wire_name("Name"))
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_schema_from_yaml() {
        let schema: PropertySchema = serde_yaml::from_str(
            r#"
type_name: AWS::Oam::Link
fields:
  - name: labelTemplate
    kind: string
    required: true
  - wire_name: ResourceTypes
    kind: list<string>
    required: true
  - name: tags
    kind: map<string>
"#,
        )
        .unwrap();

        assert!(schema.is_resource());
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field("labelTemplate").unwrap().wire_name, "LabelTemplate");
        assert_eq!(schema.field_by_wire_name("ResourceTypes").unwrap().name, "resourceTypes");
        assert_eq!(schema.required_fields().count(), 2);
    }

    #[test]
    fn test_unnamed_field_rejected() {
        let result: Result<PropertySchema, _> = serde_yaml::from_str(
            r#"
type_name: AWS::Test::Thing
fields:
  - kind: string
"#,
        );
        assert!(result.is_err());
    }
}
