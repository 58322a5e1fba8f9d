//! Error types for resources and template documents.

use std::path::PathBuf;

use cfnkit_core::CoreError;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while building, synthesizing or importing templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid logical ID {0:?}: must be 1-255 alphanumeric characters")]
    InvalidLogicalId(String),

    #[error("Duplicate logical ID: {0}")]
    DuplicateLogicalId(String),

    #[error("Resource not found: {0}")]
    UnknownResource(String),

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Invalid override path: {0:?}")]
    InvalidOverridePath(String),

    #[error("Property {property} is not declared by {type_name}")]
    PropertyNotDeclared { type_name: String, property: String },

    #[error("Properties of {0} are a single deferred value and cannot be edited by name")]
    DeferredProperties(String),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateError {
    /// Whether this error comes from property validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, TemplateError::Core(CoreError::Validation(_)))
    }
}
