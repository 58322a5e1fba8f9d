//! Runtime property values.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::token::{is_intrinsic, Token};

/// A value held in a property bag.
///
/// `Object` is used both for nested structures and for map-kind values.
/// `Null` is treated as absent by validation and rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    #[default]
    Null,
    String(String),
    Number(Number),
    Boolean(bool),
    List(Vec<PropertyValue>),
    Object(PropertyBag),
    Deferred(Token),
}

impl PropertyValue {
    /// Convert plain JSON, turning intrinsic function objects into tokens.
    pub fn from_json(value: &Value) -> Self {
        if is_intrinsic(value) {
            return PropertyValue::Deferred(Token::Intrinsic(value.clone()));
        }

        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(*b),
            Value::Number(n) => PropertyValue::Number(n.clone()),
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Array(items) => {
                PropertyValue::List(items.iter().map(PropertyValue::from_json).collect())
            }
            Value::Object(obj) => PropertyValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), PropertyValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to plain JSON. Tokens use their unresolved template form.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Number(n) => Value::Number(n.clone()),
            PropertyValue::Boolean(b) => Value::Bool(*b),
            PropertyValue::List(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Object(bag) => bag.to_json(),
            PropertyValue::Deferred(token) => token.to_json(),
        }
    }

    /// Short name of this value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::String(_) => "string",
            PropertyValue::Number(_) => "number",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::List(_) => "list",
            PropertyValue::Object(_) => "object",
            PropertyValue::Deferred(_) => "token",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, PropertyValue::Deferred(_))
    }

    /// Whether this value or anything nested in it is deferred.
    pub fn contains_deferred(&self) -> bool {
        match self {
            PropertyValue::Deferred(_) => true,
            PropertyValue::List(items) => items.iter().any(PropertyValue::contains_deferred),
            PropertyValue::Object(bag) => bag.values().any(PropertyValue::contains_deferred),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PropertyBag> {
        match self {
            PropertyValue::Object(bag) => Some(bag),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut PropertyBag> {
        match self {
            PropertyValue::Object(bag) => Some(bag),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            PropertyValue::Deferred(token) => Some(token),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n.into())
    }
}

impl From<u64> for PropertyValue {
    fn from(n: u64) -> Self {
        PropertyValue::Number(n.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Number(n.into())
    }
}

impl From<f64> for PropertyValue {
    /// Non-finite numbers have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(PropertyValue::Null, PropertyValue::Number)
    }
}

impl From<Token> for PropertyValue {
    fn from(token: Token) -> Self {
        PropertyValue::Deferred(token)
    }
}

impl From<PropertyBag> for PropertyValue {
    fn from(bag: PropertyBag) -> Self {
        PropertyValue::Object(bag)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&Value> for PropertyValue {
    fn from(value: &Value) -> Self {
        PropertyValue::from_json(value)
    }
}

/// Serializes as plain JSON; tokens use their unresolved template form.
impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Deserializes any JSON-compatible input, detecting intrinsic functions.
impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|v| PropertyValue::from_json(&v))
    }
}

/// Mapping from idiomatic field name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: IndexMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.entries.shift_remove(name)
    }

    /// Raw lookup; may return `Null`.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        self.entries.get_mut(name)
    }

    /// Lookup that treats `Null` as absent.
    pub fn present(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.present(name).is_some()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropertyValue::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    pub fn list(&self, name: &str) -> Option<&[PropertyValue]> {
        self.get(name).and_then(PropertyValue::as_list)
    }

    pub fn object(&self, name: &str) -> Option<&PropertyBag> {
        self.get(name).and_then(PropertyValue::as_object)
    }

    pub fn token(&self, name: &str) -> Option<&Token> {
        self.get(name).and_then(PropertyValue::as_token)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a JSON object with the bag's own (idiomatic) keys.
    pub fn to_json(&self) -> Value {
        let obj: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(obj)
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PropertyBag {
    type Item = (String, PropertyValue);
    type IntoIter = indexmap::map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_detects_intrinsics() {
        let value = PropertyValue::from_json(&json!({
            "name": "x",
            "arn": { "Fn::GetAtt": ["Sink", "Arn"] },
            "items": [1, { "Ref": "Other" }]
        }));

        let bag = value.as_object().unwrap();
        assert_eq!(bag.string("name"), Some("x"));
        assert!(bag.token("arn").is_some());
        assert!(bag.list("items").unwrap()[1].is_deferred());
        assert!(value.contains_deferred());
    }

    #[test]
    fn test_bag_accessors() {
        let mut bag = PropertyBag::new()
            .with("name", "b1")
            .with("count", 3)
            .with("enabled", true)
            .with("tags", vec!["a", "b"])
            .with("gone", PropertyValue::Null);

        assert_eq!(bag.number("count"), Some(3.0));
        assert_eq!(bag.boolean("enabled"), Some(true));
        assert_eq!(bag.list("tags").unwrap().len(), 2);
        assert!(!bag.contains("gone"));
        assert!(bag.get("gone").is_some());

        bag.remove("name");
        assert!(!bag.contains("name"));
        assert_eq!(bag.keys().next().map(String::as_str), Some("count"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let value: PropertyValue =
            serde_yaml::from_str("name: central\nsink: { Ref: Sink }\nsizes: [1, 2]\n").unwrap();

        let bag = value.as_object().unwrap();
        assert_eq!(bag.string("name"), Some("central"));
        assert_eq!(bag.token("sink"), Some(&Token::Intrinsic(json!({ "Ref": "Sink" }))));
        assert_eq!(
            serde_json::to_value(bag).unwrap(),
            json!({ "name": "central", "sink": { "Ref": "Sink" }, "sizes": [1, 2] })
        );
    }

    #[test]
    fn test_non_finite_number_is_null() {
        assert!(PropertyValue::from(f64::NAN).is_null());
    }
}
