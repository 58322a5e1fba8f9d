//! Raw property overrides.
//!
//! An override writes (or deletes) a value at a dotted path inside the
//! rendered properties of a resource. Overrides bypass validation entirely and
//! are applied in the order they were added, after rendering.
//!
//! Path segments are separated by `.`; a literal dot is written `\.` and a
//! literal backslash `\\`. A numeric segment addresses an element when the
//! current value is a list, and is an ordinary object key otherwise. Setting
//! past the end of a list pads it with nulls.

use serde_json::{Map, Value};

use crate::error::{TemplateError, TemplateResult};

/// One raw edit of a resource's rendered properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyOverride {
    path: String,
    segments: Vec<String>,
    /// `None` deletes the value at `path`.
    value: Option<Value>,
}

impl PropertyOverride {
    pub fn set(path: &str, value: Value) -> TemplateResult<Self> {
        Ok(Self {
            path: path.to_string(),
            segments: split_path(path)?,
            value: Some(value),
        })
    }

    pub fn delete(path: &str) -> TemplateResult<Self> {
        Ok(Self {
            path: path.to_string(),
            segments: split_path(path)?,
            value: None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_deletion(&self) -> bool {
        self.value.is_none()
    }

    /// Apply this override to `target` in place.
    pub fn apply(&self, target: &mut Value) {
        match &self.value {
            Some(value) => set_path(target, &self.segments, value.clone()),
            None => remove_path(target, &self.segments),
        }
    }
}

/// Apply overrides in order.
pub fn apply_overrides(target: &mut Value, overrides: &[PropertyOverride]) {
    for o in overrides {
        o.apply(target);
    }
}

/// Split a dotted path, honoring `\.` and `\\` escapes.
fn split_path(path: &str) -> TemplateResult<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('.' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);

    if segments.iter().any(String::is_empty) {
        return Err(TemplateError::InvalidOverridePath(path.to_string()));
    }
    Ok(segments)
}

/// Element `index` of a list, growing the list with nulls as needed.
fn list_slot(items: &mut Vec<Value>, index: usize) -> &mut Value {
    if items.len() <= index {
        items.resize(index + 1, Value::Null);
    }
    &mut items[index]
}

/// Descend one segment, creating an object when there is nothing to descend into.
fn child_entry<'v>(current: &'v mut Value, segment: &str) -> &'v mut Value {
    match (current, segment.parse::<usize>()) {
        (Value::Array(items), Ok(index)) => list_slot(items, index),
        (current, _) => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            &mut current[segment]
        }
    }
}

fn set_path(target: &mut Value, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        current = child_entry(current, segment);
    }
    *child_entry(current, last) = value;
}

fn remove_path(target: &mut Value, segments: &[String]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let next = match current {
            Value::Object(obj) => obj.get_mut(segment.as_str()),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(move |i| items.get_mut(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return,
        }
    }

    match current {
        Value::Object(obj) => {
            obj.shift_remove(last.as_str());
        }
        Value::Array(items) => {
            if let Some(i) = last.parse::<usize>().ok().filter(|i| *i < items.len()) {
                items.remove(i);
            }
        }
        _ => {}
    }
}
