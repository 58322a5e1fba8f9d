//! Registry of schemas keyed by type name.

use std::collections::BTreeMap;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{PropertySchema, SchemaCategory};

/// Registry of resource and structure schemas.
///
/// Structure references inside [`FieldKind::Struct`](crate::FieldKind::Struct)
/// are resolved by name against this registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, PropertySchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous schema with the same type name.
    pub fn register(&mut self, schema: PropertySchema) {
        self.schemas.insert(schema.type_name.clone(), schema);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, schema: PropertySchema) -> Self {
        self.register(schema);
        self
    }

    /// Merge another registry into this one.
    pub fn extend(&mut self, other: SchemaRegistry) {
        self.schemas.extend(other.schemas);
    }

    /// Get a schema by type name.
    pub fn get(&self, type_name: &str) -> Option<&PropertySchema> {
        self.schemas.get(type_name)
    }

    /// Get a schema by type name or fail.
    pub fn require(&self, type_name: &str) -> SchemaResult<&PropertySchema> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::NotFound(type_name.to_string()))
    }

    pub fn exists(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// List all schemas, sorted by type name.
    pub fn list(&self) -> Vec<&PropertySchema> {
        self.schemas.values().collect()
    }

    /// List resource schemas only.
    pub fn resources(&self) -> Vec<&PropertySchema> {
        self.by_category(SchemaCategory::Resource)
    }

    pub fn by_category(&self, category: SchemaCategory) -> Vec<&PropertySchema> {
        self.schemas
            .values()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Find every structure reference that does not resolve.
    pub fn check_references(&self) -> Vec<SchemaError> {
        let mut errors = Vec::new();

        for schema in self.schemas.values() {
            for field in schema.fields() {
                for structure in field.kind.structure_refs() {
                    if !self.exists(structure) {
                        errors.push(SchemaError::UnknownStructure {
                            type_name: schema.type_name.clone(),
                            structure: structure.to_string(),
                        });
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with(
                PropertySchema::resource("AWS::Test::Bucket")
                    .required("name", FieldKind::String)
                    .optional("location", FieldKind::structure("AWS::Test::Bucket.Location"))
                    .optional("rules", FieldKind::list(FieldKind::structure("AWS::Test::Bucket.Rule")))
                    .build()
                    .unwrap(),
            )
            .with(
                PropertySchema::structure("AWS::Test::Bucket.Location")
                    .required("bucket", FieldKind::String)
                    .build()
                    .unwrap(),
            )
    }

    #[test]
    fn test_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.exists("AWS::Test::Bucket"));
        assert!(registry.require("AWS::Test::Missing").is_err());
        assert_eq!(registry.resources().len(), 1);
    }

    #[test]
    fn test_dangling_references_reported() {
        let errors = registry().check_references();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("AWS::Test::Bucket.Rule"));
    }
}
