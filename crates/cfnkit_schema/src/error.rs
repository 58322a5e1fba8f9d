//! Error types for schema definitions and catalogs.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building or loading schemas.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Duplicate field '{field}' in schema {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Field in schema {type_name} needs a name or a wire_name")]
    UnnamedField { type_name: String },

    #[error("Invalid field kind '{0}'")]
    InvalidKind(String),

    #[error("Schema {type_name} references unknown structure type {structure}")]
    UnknownStructure { type_name: String, structure: String },

    #[error("Schema type not found: {0}")]
    NotFound(String),

    #[error("Invalid schema file {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
