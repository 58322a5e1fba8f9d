//! Error types for the property engine.

use cfnkit_schema::SchemaError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by validation, rendering and parsing.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Every field error found in a property bag, aggregated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A template value could not be coerced to its declared kind.
    #[error("Cannot parse {path}: expected {expected}, got {actual}")]
    Parse {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Unresolved token: {0}")]
    Unresolved(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}
