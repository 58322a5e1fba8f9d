//! Resource-level attributes outside `Properties`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TemplateError, TemplateResult};

/// What happens to a resource when it is deleted or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    Delete,
    Retain,
    Snapshot,
    RetainExceptOnCreate,
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemovalPolicy::Delete => "Delete",
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Snapshot => "Snapshot",
            RemovalPolicy::RetainExceptOnCreate => "RetainExceptOnCreate",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RemovalPolicy {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Delete" => Ok(RemovalPolicy::Delete),
            "Retain" => Ok(RemovalPolicy::Retain),
            "Snapshot" => Ok(RemovalPolicy::Snapshot),
            "RetainExceptOnCreate" => Ok(RemovalPolicy::RetainExceptOnCreate),
            other => Err(TemplateError::MalformedTemplate(format!(
                "unknown removal policy: {}",
                other
            ))),
        }
    }
}

/// `DependsOn`, `Condition`, `DeletionPolicy`, `UpdateReplacePolicy` and
/// `Metadata` of a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceOptions {
    pub depends_on: Vec<String>,
    pub condition: Option<String>,
    pub deletion_policy: Option<RemovalPolicy>,
    pub update_replace_policy: Option<RemovalPolicy>,
    pub metadata: Option<Value>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency, ignoring duplicates.
    pub fn add_dependency(&mut self, logical_id: impl Into<String>) {
        let logical_id = logical_id.into();
        if !self.depends_on.contains(&logical_id) {
            self.depends_on.push(logical_id);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the options into a resource object, after `Type` and `Properties`.
    pub(crate) fn write_to(&self, resource: &mut Map<String, Value>) {
        if !self.depends_on.is_empty() {
            resource.insert(
                "DependsOn".to_string(),
                Value::Array(self.depends_on.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(policy) = self.update_replace_policy {
            resource.insert("UpdateReplacePolicy".to_string(), Value::String(policy.to_string()));
        }
        if let Some(policy) = self.deletion_policy {
            resource.insert("DeletionPolicy".to_string(), Value::String(policy.to_string()));
        }
        if let Some(metadata) = &self.metadata {
            resource.insert("Metadata".to_string(), metadata.clone());
        }
        if let Some(condition) = &self.condition {
            resource.insert("Condition".to_string(), Value::String(condition.clone()));
        }
    }

    /// Read the options of an imported resource object.
    pub(crate) fn read_from(logical_id: &str, resource: &Map<String, Value>) -> TemplateResult<Self> {
        let malformed = |what: &str| {
            TemplateError::MalformedTemplate(format!("{} of resource {} is not valid", what, logical_id))
        };

        let depends_on = match resource.get("DependsOn") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(id)) => vec![id.clone()],
            Some(Value::Array(ids)) => ids
                .iter()
                .map(|id| id.as_str().map(str::to_string).ok_or_else(|| malformed("DependsOn")))
                .collect::<TemplateResult<_>>()?,
            Some(_) => return Err(malformed("DependsOn")),
        };

        let condition = match resource.get("Condition") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(malformed("Condition")),
        };

        let policy = |key: &str| -> TemplateResult<Option<RemovalPolicy>> {
            match resource.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => s.parse().map(Some),
                Some(_) => Err(malformed(key)),
            }
        };

        Ok(Self {
            depends_on,
            condition,
            deletion_policy: policy("DeletionPolicy")?,
            update_replace_policy: policy("UpdateReplacePolicy")?,
            metadata: resource.get("Metadata").filter(|m| !m.is_null()).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_and_write() {
        let resource = json!({
            "Type": "AWS::Oam::Sink",
            "DependsOn": "Role",
            "DeletionPolicy": "Retain",
            "Condition": "IsProd",
            "Metadata": { "cfn_nag": { "rules_to_suppress": [] } }
        });
        let options = ResourceOptions::read_from("Sink", resource.as_object().unwrap()).unwrap();

        assert_eq!(options.depends_on, vec!["Role"]);
        assert_eq!(options.deletion_policy, Some(RemovalPolicy::Retain));
        assert_eq!(options.condition.as_deref(), Some("IsProd"));

        let mut out = Map::new();
        options.write_to(&mut out);
        assert_eq!(out["DependsOn"], json!(["Role"]));
        assert_eq!(out["DeletionPolicy"], json!("Retain"));
        assert_eq!(out["Metadata"], resource["Metadata"]);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let resource = json!({ "DeletionPolicy": "Shred" });
        assert!(ResourceOptions::read_from("Sink", resource.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_dependencies_are_unique() {
        let mut options = ResourceOptions::new();
        options.add_dependency("Role");
        options.add_dependency("Role");
        assert_eq!(options.depends_on.len(), 1);
        assert!(!options.is_empty());
    }
}
