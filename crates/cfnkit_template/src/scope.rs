//! Construct scopes.

use std::fmt;

/// Position of a resource in a construct tree.
///
/// Scopes only contribute to a resource's path; they carry no behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    segments: Vec<String>,
}

impl Scope {
    /// The unnamed root scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// A scope with a single named segment, e.g. a stack name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// A child scope nested under this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of a construct with the given id inside this scope.
    pub fn path_of(&self, id: &str) -> String {
        if self.is_root() {
            id.to_string()
        } else {
            format!("{}/{}", self, id)
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
