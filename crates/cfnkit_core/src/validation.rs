//! Validation results and field errors.

use std::fmt;

use crate::error::CoreError;

/// A single problem found in a property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    MissingRequired {
        path: String,
    },
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    UnknownProperty {
        path: String,
    },
    /// A structure kind names a type the registry does not know.
    UnresolvedSchema {
        path: String,
        type_name: String,
    },
    /// The property object itself is not an object.
    NotAnObject {
        actual: String,
    },
}

impl FieldError {
    /// Path of the offending field, if the error is about one field.
    pub fn path(&self) -> Option<&str> {
        match self {
            FieldError::MissingRequired { path }
            | FieldError::TypeMismatch { path, .. }
            | FieldError::UnknownProperty { path }
            | FieldError::UnresolvedSchema { path, .. } => Some(path),
            FieldError::NotAnObject { .. } => None,
        }
    }

    /// Re-root this error under `parent`.
    fn prefixed(self, parent: &str) -> Self {
        let join = |path: String| {
            if path.is_empty() {
                parent.to_string()
            } else if path.starts_with('[') {
                format!("{}{}", parent, path)
            } else {
                format!("{}.{}", parent, path)
            }
        };

        match self {
            FieldError::MissingRequired { path } => FieldError::MissingRequired { path: join(path) },
            FieldError::TypeMismatch {
                path,
                expected,
                actual,
            } => FieldError::TypeMismatch {
                path: join(path),
                expected,
                actual,
            },
            FieldError::UnknownProperty { path } => FieldError::UnknownProperty { path: join(path) },
            FieldError::UnresolvedSchema { path, type_name } => FieldError::UnresolvedSchema {
                path: join(path),
                type_name,
            },
            FieldError::NotAnObject { actual } => FieldError::TypeMismatch {
                path: parent.to_string(),
                expected: "object".to_string(),
                actual,
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::MissingRequired { path } => write!(f, "{} is required", path),
            FieldError::TypeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "{}: expected {}, got {}", path, expected, actual),
            FieldError::UnknownProperty { path } => write!(f, "{}: unknown property", path),
            FieldError::UnresolvedSchema { path, type_name } => {
                write!(f, "{}: no schema registered for {}", path, type_name)
            }
            FieldError::NotAnObject { actual } => {
                write!(f, "Expected an object, but received: {}", actual)
            }
        }
    }
}

/// Outcome of validating a property bag. Empty means success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Append all errors of `other`; never short-circuits.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Append all errors of a child result, re-rooted under `parent`.
    pub fn merge_prefixed(&mut self, parent: &str, other: ValidationResult) {
        self.errors
            .extend(other.errors.into_iter().map(|e| e.prefixed(parent)));
    }

    /// Whether any error concerns the given path.
    pub fn mentions(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path() == Some(path))
    }

    /// Turn a failed result into a [`ValidationError`] for `type_name`.
    pub fn assert_success(self, type_name: &str) -> Result<(), CoreError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(CoreError::Validation(ValidationError {
                type_name: type_name.to_string(),
                errors: self.errors,
            }))
        }
    }
}

/// Aggregated validation failure for one property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub type_name: String,
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(
            f,
            "supplied properties not correct for \"{}\": {}",
            self.type_name,
            messages.join("; ")
        )
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefixed_paths() {
        let mut child = ValidationResult::new();
        child.add_error(FieldError::MissingRequired {
            path: "bucket".to_string(),
        });
        child.add_error(FieldError::TypeMismatch {
            path: "[2]".to_string(),
            expected: "string".to_string(),
            actual: "number".to_string(),
        });

        let mut result = ValidationResult::new();
        result.merge_prefixed("location", child);

        assert!(result.mentions("location.bucket"));
        assert!(result.mentions("location[2]"));
    }

    #[test]
    fn test_error_message_lists_every_failure() {
        let mut result = ValidationResult::new();
        result.add_error(FieldError::MissingRequired {
            path: "name".to_string(),
        });
        result.add_error(FieldError::MissingRequired {
            path: "input".to_string(),
        });

        let err = result.assert_success("AWS::Test::Thing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "supplied properties not correct for \"AWS::Test::Thing\": name is required; input is required"
        );
    }
}
