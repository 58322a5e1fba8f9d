//! Whole template documents.

use cfnkit_core::Resolver;
use cfnkit_schema::{PropertySchema, SchemaRegistry};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{TemplateError, TemplateResult};
use crate::resource::CfnResource;
use crate::scope::Scope;

const FORMAT_VERSION: &str = "AWSTemplateFormatVersion";
const DESCRIPTION: &str = "Description";
const RESOURCES: &str = "Resources";

/// Top-level sections in the order they are written.
const SECTION_ORDER: [&str; 10] = [
    FORMAT_VERSION,
    DESCRIPTION,
    "Metadata",
    "Parameters",
    "Rules",
    "Mappings",
    "Conditions",
    "Transform",
    RESOURCES,
    "Outputs",
];

/// A template document: resources keyed by logical ID plus the sections cfnkit
/// passes through untouched.
#[derive(Debug, Clone, Default)]
pub struct Template {
    description: Option<String>,
    resources: IndexMap<String, CfnResource>,
    /// Every other top-level section, kept verbatim.
    sections: IndexMap<String, Value>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn add_resource(&mut self, resource: CfnResource) -> TemplateResult<()> {
        let id = resource.logical_id().to_string();
        if self.resources.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId(id));
        }
        self.resources.insert(id, resource);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&CfnResource> {
        self.resources.get(logical_id)
    }

    pub fn resource_mut(&mut self, logical_id: &str) -> Option<&mut CfnResource> {
        self.resources.get_mut(logical_id)
    }

    /// Like [`Template::resource`], but a missing resource is an error.
    pub fn require_resource(&self, logical_id: &str) -> TemplateResult<&CfnResource> {
        self.resource(logical_id)
            .ok_or_else(|| TemplateError::UnknownResource(logical_id.to_string()))
    }

    pub fn remove_resource(&mut self, logical_id: &str) -> Option<CfnResource> {
        self.resources.shift_remove(logical_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = &CfnResource> {
        self.resources.values()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Set a passthrough section such as `Parameters` or `Outputs`.
    pub fn set_section(&mut self, name: &str, value: Value) -> TemplateResult<()> {
        if name == RESOURCES || name == DESCRIPTION {
            return Err(TemplateError::MalformedTemplate(format!(
                "{} is not a passthrough section",
                name
            )));
        }
        self.sections.insert(name.to_string(), value);
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Render every resource and assemble the full document.
    ///
    /// Resources are marked synthesized only once all of them rendered.
    pub fn synthesize(
        &mut self,
        registry: &SchemaRegistry,
        resolver: &dyn Resolver,
    ) -> TemplateResult<Value> {
        let mut resources = Map::new();
        for (id, resource) in &self.resources {
            resources.insert(id.clone(), resource.render(registry, resolver)?);
        }
        for resource in self.resources.values_mut() {
            resource.mark_synthesized();
        }

        let mut out = Map::new();
        for name in SECTION_ORDER {
            match name {
                DESCRIPTION => {
                    if let Some(description) = &self.description {
                        out.insert(name.to_string(), Value::String(description.clone()));
                    }
                }
                RESOURCES => {
                    if !resources.is_empty() {
                        out.insert(name.to_string(), Value::Object(std::mem::take(&mut resources)));
                    }
                }
                _ => {
                    if let Some(section) = self.sections.get(name) {
                        out.insert(name.to_string(), section.clone());
                    }
                }
            }
        }
        for (name, section) in &self.sections {
            if !out.contains_key(name) {
                out.insert(name.clone(), section.clone());
            }
        }

        info!("Synthesized template with {} resources", self.resources.len());
        Ok(Value::Object(out))
    }

    /// Rebuild a template from its JSON form.
    ///
    /// Resources whose type has no resource schema in `registry` are imported
    /// with an empty schema, so all of their properties are carried as
    /// overrides.
    pub fn import(template: &Value, registry: &SchemaRegistry, scope: &Scope) -> TemplateResult<Self> {
        let obj = template
            .as_object()
            .ok_or_else(|| TemplateError::MalformedTemplate("template is not an object".to_string()))?;

        let mut document = Template::new();

        for (name, section) in obj {
            match name.as_str() {
                DESCRIPTION => {
                    let description = section.as_str().ok_or_else(|| {
                        TemplateError::MalformedTemplate("Description is not a string".to_string())
                    })?;
                    document.description = Some(description.to_string());
                }
                RESOURCES => {}
                _ => {
                    document.sections.insert(name.clone(), section.clone());
                }
            }
        }

        let resources = match obj.get(RESOURCES) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(resources)) => resources.clone(),
            Some(_) => {
                return Err(TemplateError::MalformedTemplate(
                    "Resources is not an object".to_string(),
                ))
            }
        };

        for (id, resource) in &resources {
            let type_name = resource
                .get("Type")
                .and_then(Value::as_str)
                .ok_or_else(|| TemplateError::MalformedTemplate(format!("resource {} has no Type", id)))?;

            let imported = match registry.get(type_name).filter(|s| s.is_resource()) {
                Some(schema) => CfnResource::from_template(scope, id, resource, schema, registry)?,
                None => {
                    warn!("No schema for {}, importing {} as raw overrides", type_name, id);
                    let schema = PropertySchema::opaque(type_name);
                    CfnResource::from_template(scope, id, resource, &schema, registry)?
                }
            };
            debug!("Imported {} ({})", id, type_name);
            document.add_resource(imported)?;
        }

        info!("Imported template with {} resources", document.resources.len());
        Ok(document)
    }
}
