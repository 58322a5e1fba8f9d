//! Resource wrappers.

use cfnkit_core::{
    PropertyParser, PropertyRenderer, PropertyValidator, PropertyValue, Resolver, Token,
    ValidationResult,
};
use std::sync::LazyLock;

use cfnkit_schema::{PropertySchema, SchemaRegistry};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::options::ResourceOptions;
use crate::overrides::{apply_overrides, PropertyOverride};
use crate::scope::Scope;

/// Logical IDs: 1 to 255 ASCII letters or digits.
static LOGICAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,255}$").expect("logical ID pattern compiles"));

/// Whether `id` can be used as a logical ID in a template.
pub fn is_valid_logical_id(id: &str) -> bool {
    LOGICAL_ID_RE.is_match(id)
}

/// Lifecycle of a resource wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Properties validated; not yet rendered, or changed since.
    Constructed,
    /// Rendered into a template fragment and not changed since.
    Synthesized,
}

/// One resource of a template: a typed property bag plus its identity.
///
/// Properties are validated when the wrapper is created and again when it is
/// synthesized. Raw overrides are applied on top of the rendered properties
/// and are never validated.
#[derive(Debug, Clone)]
pub struct CfnResource {
    logical_id: String,
    path: String,
    schema: PropertySchema,
    properties: PropertyValue,
    options: ResourceOptions,
    overrides: Vec<PropertyOverride>,
    state: ResourceState,
}

impl CfnResource {
    /// Create a resource, failing with every validation error of `properties`.
    pub fn new(
        scope: &Scope,
        id: &str,
        schema: &PropertySchema,
        properties: impl Into<PropertyValue>,
        registry: &SchemaRegistry,
    ) -> TemplateResult<Self> {
        if !is_valid_logical_id(id) {
            return Err(TemplateError::InvalidLogicalId(id.to_string()));
        }

        let mut properties = properties.into();
        if properties.is_null() {
            properties = PropertyValue::Object(Default::default());
        }

        PropertyValidator::new(registry)
            .validate(schema, &properties)
            .assert_success(&schema.type_name)?;

        debug!("Constructed {} ({})", id, schema.type_name);

        Ok(Self {
            logical_id: id.to_string(),
            path: scope.path_of(id),
            schema: schema.clone(),
            properties,
            options: ResourceOptions::default(),
            overrides: Vec::new(),
            state: ResourceState::Constructed,
        })
    }

    /// Reconstruct a resource from its template JSON.
    ///
    /// Properties the schema does not know are kept as property overrides so
    /// that synthesizing the resource reproduces them.
    pub fn from_template(
        scope: &Scope,
        id: &str,
        resource: &Value,
        schema: &PropertySchema,
        registry: &SchemaRegistry,
    ) -> TemplateResult<Self> {
        let obj = resource.as_object().ok_or_else(|| {
            TemplateError::MalformedTemplate(format!("resource {} is not an object", id))
        })?;

        match obj.get("Type").and_then(Value::as_str) {
            Some(type_name) if type_name == schema.type_name => {}
            Some(type_name) => {
                return Err(TemplateError::MalformedTemplate(format!(
                    "resource {} has type {}, expected {}",
                    id, type_name, schema.type_name
                )))
            }
            None => {
                return Err(TemplateError::MalformedTemplate(format!(
                    "resource {} has no Type",
                    id
                )))
            }
        }

        let fragment = obj.get("Properties").cloned().unwrap_or(Value::Null);
        let parsed = PropertyParser::new(registry).parse(schema, &fragment)?;

        let mut resource = Self::new(scope, id, schema, parsed.value, registry)?;
        resource.options = ResourceOptions::read_from(id, obj)?;
        for (path, value) in parsed.extra_properties {
            debug!("Carrying {}.{} as an override", id, path);
            resource.overrides.push(PropertyOverride::set(&path, value)?);
        }

        Ok(resource)
    }

    pub fn type_name(&self) -> &str {
        &self.schema.type_name
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Construct path: scope segments plus the logical ID, joined with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Token for this resource's `Ref`.
    pub fn reference(&self) -> Token {
        Token::reference(&self.logical_id)
    }

    /// Token for one of this resource's attributes, e.g. `Arn`.
    pub fn attribute(&self, name: &str) -> Token {
        Token::attribute(&self.logical_id, name)
    }

    pub fn properties(&self) -> &PropertyValue {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.as_object().and_then(|bag| bag.present(name))
    }

    /// Set one declared property. The new value is checked at synthesis.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> TemplateResult<()> {
        if self.schema.field(name).is_none() {
            return Err(TemplateError::PropertyNotDeclared {
                type_name: self.schema.type_name.clone(),
                property: name.to_string(),
            });
        }
        let bag = self
            .properties
            .as_object_mut()
            .ok_or_else(|| TemplateError::DeferredProperties(self.logical_id.clone()))?;

        bag.insert(name, value);
        self.state = ResourceState::Constructed;
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> Option<PropertyValue> {
        let removed = self.properties.as_object_mut()?.remove(name);
        if removed.is_some() {
            self.state = ResourceState::Constructed;
        }
        removed
    }

    pub fn options(&self) -> &ResourceOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ResourceOptions {
        self.state = ResourceState::Constructed;
        &mut self.options
    }

    /// Make this resource depend on another one.
    pub fn add_dependency(&mut self, other: &CfnResource) {
        self.options_mut().add_dependency(other.logical_id());
    }

    /// Write `value` at a dotted path of the rendered properties.
    pub fn add_property_override(&mut self, path: &str, value: Value) -> TemplateResult<()> {
        self.overrides.push(PropertyOverride::set(path, value)?);
        self.state = ResourceState::Constructed;
        Ok(())
    }

    /// Remove the value at a dotted path of the rendered properties.
    pub fn add_property_deletion_override(&mut self, path: &str) -> TemplateResult<()> {
        self.overrides.push(PropertyOverride::delete(path)?);
        self.state = ResourceState::Constructed;
        Ok(())
    }

    pub fn overrides(&self) -> &[PropertyOverride] {
        &self.overrides
    }

    /// Check the current properties without rendering them.
    pub fn validate(&self, registry: &SchemaRegistry) -> ValidationResult {
        PropertyValidator::new(registry).validate(&self.schema, &self.properties)
    }

    /// Render this resource into its template entry.
    pub fn synthesize(
        &mut self,
        registry: &SchemaRegistry,
        resolver: &dyn Resolver,
    ) -> TemplateResult<Value> {
        let fragment = self.render(registry, resolver)?;
        self.mark_synthesized();
        Ok(fragment)
    }

    /// Render the resource fragment without changing its state.
    pub fn render(&self, registry: &SchemaRegistry, resolver: &dyn Resolver) -> TemplateResult<Value> {
        let mut properties = PropertyRenderer::new(registry, resolver).render(&self.schema, &self.properties)?;
        apply_overrides(&mut properties, &self.overrides);

        let mut out = Map::new();
        out.insert("Type".to_string(), Value::String(self.schema.type_name.clone()));
        if !is_empty_object(&properties) {
            out.insert("Properties".to_string(), properties);
        }
        self.options.write_to(&mut out);
        Ok(Value::Object(out))
    }

    pub(crate) fn mark_synthesized(&mut self) {
        self.state = ResourceState::Synthesized;
        debug!("Synthesized {} ({})", self.logical_id, self.schema.type_name);
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().map_or(false, Map::is_empty)
}
