//! Deferred values and their resolution.

use std::collections::HashMap;
use std::fmt;

use serde_json::{json, Value};

use crate::error::{CoreError, CoreResult};

/// Keys that mark a single-key JSON object as a CloudFormation intrinsic.
const INTRINSIC_KEYS: [&str; 2] = ["Ref", "Condition"];
const INTRINSIC_PREFIX: &str = "Fn::";

/// Placeholder for a value that is only known at a later synthesis phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reference to another resource's primary identifier.
    Ref { logical_id: String },
    /// Reference to an attribute of another resource.
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    /// An intrinsic function expression kept verbatim, e.g. from an imported template.
    Intrinsic(Value),
    /// A late-bound value looked up by key in the resolver.
    Context { key: String },
}

impl Token {
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Token::Ref {
            logical_id: logical_id.into(),
        }
    }

    pub fn attribute(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Token::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn intrinsic(expression: Value) -> Self {
        Token::Intrinsic(expression)
    }

    pub fn context(key: impl Into<String>) -> Self {
        Token::Context { key: key.into() }
    }

    /// Long-form template representation, without consulting any resolver.
    ///
    /// Context tokens have no template form and are shown as `${Token[key]}`.
    pub fn to_json(&self) -> Value {
        match self {
            Token::Ref { logical_id } => json!({ "Ref": logical_id }),
            Token::GetAtt {
                logical_id,
                attribute,
            } => json!({ "Fn::GetAtt": [logical_id, attribute] }),
            Token::Intrinsic(expression) => expression.clone(),
            Token::Context { .. } => Value::String(self.to_string()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ref { logical_id } => write!(f, "${{Token[{}.Ref]}}", logical_id),
            Token::GetAtt {
                logical_id,
                attribute,
            } => write!(f, "${{Token[{}.{}]}}", logical_id, attribute),
            Token::Intrinsic(expression) => write!(f, "${{Token[{}]}}", expression),
            Token::Context { key } => write!(f, "${{Token[{}]}}", key),
        }
    }
}

/// Whether a JSON value is a CloudFormation intrinsic function expression.
pub fn is_intrinsic(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) if obj.len() == 1 => obj
            .keys()
            .next()
            .map_or(false, |k| INTRINSIC_KEYS.contains(&k.as_str()) || k.starts_with(INTRINSIC_PREFIX)),
        _ => false,
    }
}

/// Turns deferred values into concrete template values at render time.
pub trait Resolver {
    fn resolve(&self, token: &Token) -> CoreResult<Value>;
}

/// Resolves references to intrinsic function expressions and context
/// tokens to explicitly bound values.
#[derive(Debug, Clone, Default)]
pub struct IntrinsicResolver {
    bindings: HashMap<String, Value>,
}

impl IntrinsicResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a context key to a concrete value.
    pub fn with_binding(mut self, key: impl Into<String>, value: Value) -> Self {
        self.bindings.insert(key.into(), value);
        self
    }

    pub fn bind(&mut self, key: impl Into<String>, value: Value) {
        self.bindings.insert(key.into(), value);
    }
}

impl Resolver for IntrinsicResolver {
    fn resolve(&self, token: &Token) -> CoreResult<Value> {
        match token {
            Token::Context { key } => self
                .bindings
                .get(key)
                .cloned()
                .ok_or_else(|| CoreError::Unresolved(key.clone())),
            other => Ok(other.to_json()),
        }
    }
}
