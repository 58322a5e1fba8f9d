//! Reading and writing template documents as JSON or YAML.
//!
//! YAML input may use the short-form intrinsic tags (`!Ref`, `!GetAtt`,
//! `!Sub`, `!If`, ...). They are expanded to their long JSON form while
//! reading, so the rest of cfnkit only ever sees long-form intrinsics.

use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value};
use serde_yaml::value::TaggedValue;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// Pretty JSON with two-space indentation.
pub fn to_json(value: &Value) -> TemplateResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn to_yaml(value: &Value) -> TemplateResult<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Serialize as JSON when `json` is set, YAML otherwise.
pub fn serialize_structure(value: &Value, json: bool) -> TemplateResult<String> {
    if json {
        to_json(value)
    } else {
        to_yaml(value)
    }
}

/// Parse either JSON or YAML.
pub fn deserialize_structure(input: &str) -> TemplateResult<Value> {
    if let Ok(value) = serde_json::from_str(input) {
        return Ok(value);
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(input)?;
    yaml_to_json(yaml)
}

/// Load a JSON or YAML file from disk.
pub fn load_structured_file(path: impl AsRef<Path>) -> TemplateResult<Value> {
    let path = path.as_ref();
    debug!("Loading {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| TemplateError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize_structure(&content)
}

/// Remove template elements that are not interesting to show to users.
///
/// Currently this is the bootstrap version check rule; the whole `Rules`
/// section goes when that rule was its only entry.
pub fn obscure_template(mut template: Value) -> Value {
    let Some(obj) = template.as_object_mut() else {
        return template;
    };

    let drop_rules = match obj.get_mut("Rules").and_then(Value::as_object_mut) {
        Some(rules) if rules.contains_key("CheckBootstrapVersion") => {
            if rules.len() > 1 {
                rules.shift_remove("CheckBootstrapVersion");
                false
            } else {
                true
            }
        }
        _ => false,
    };
    if drop_rules {
        obj.shift_remove("Rules");
    }

    template
}

fn yaml_to_json(value: serde_yaml::Value) -> TemplateResult<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(yaml_number(&n)?),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<TemplateResult<_>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut obj = Map::new();
            for (key, item) in mapping {
                obj.insert(yaml_key(key)?, yaml_to_json(item)?);
            }
            Value::Object(obj)
        }
        Yaml::Tagged(tagged) => expand_tag(*tagged)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> TemplateResult<Number> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| TemplateError::MalformedTemplate(format!("number {} has no JSON form", n)))
}

fn yaml_key(key: serde_yaml::Value) -> TemplateResult<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        other => Err(TemplateError::MalformedTemplate(format!(
            "mapping key {:?} is not a scalar",
            other
        ))),
    }
}

/// Expand a short-form intrinsic tag into its long form.
fn expand_tag(tagged: TaggedValue) -> TemplateResult<Value> {
    let tag = tagged.tag.to_string();
    let name = tag.trim_start_matches('!');
    let value = yaml_to_json(tagged.value)?;

    let expanded = match name {
        "Ref" | "Condition" => single(name, value),
        "GetAtt" => {
            let args = match value {
                Value::String(s) => match s.split_once('.') {
                    Some((resource, attribute)) => {
                        Value::Array(vec![Value::String(resource.into()), Value::String(attribute.into())])
                    }
                    None => Value::String(s),
                },
                other => other,
            };
            single("Fn::GetAtt", args)
        }
        _ => single(&format!("Fn::{}", name), value),
    };
    Ok(expanded)
}

fn single(key: &str, value: Value) -> Value {
    let mut obj = Map::new();
    obj.insert(key.to_string(), value);
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_form_tags() {
        let yaml = r#"
Resources:
  Link:
    Type: AWS::Oam::Link
    Properties:
      SinkIdentifier: !GetAtt Sink.Arn
      LabelTemplate: !Sub "${AWS::AccountId}-link"
      ResourceTypes:
        - !Ref LogType
      Tags: !If [IsProd, { env: prod }, !Ref AWS::NoValue]
"#;
        let value = deserialize_structure(yaml).unwrap();
        let props = &value["Resources"]["Link"]["Properties"];

        assert_eq!(props["SinkIdentifier"], json!({ "Fn::GetAtt": ["Sink", "Arn"] }));
        assert_eq!(props["LabelTemplate"], json!({ "Fn::Sub": "${AWS::AccountId}-link" }));
        assert_eq!(props["ResourceTypes"], json!([{ "Ref": "LogType" }]));
        assert_eq!(
            props["Tags"],
            json!({ "Fn::If": ["IsProd", { "env": "prod" }, { "Ref": "AWS::NoValue" }] })
        );
    }

    #[test]
    fn test_json_input() {
        let value = deserialize_structure(r#"{"Resources": {}, "Description": "d"}"#).unwrap();
        assert_eq!(value, json!({ "Resources": {}, "Description": "d" }));
    }

    #[test]
    fn test_to_json_is_pretty() {
        let out = to_json(&json!({ "A": { "B": 1 } })).unwrap();
        assert_eq!(out, "{\n  \"A\": {\n    \"B\": 1\n  }\n}");
    }

    #[test]
    fn test_yaml_round_trip() {
        let value = json!({ "Resources": { "Sink": { "Type": "AWS::Oam::Sink", "Properties": { "Name": "n" } } } });
        let yaml = serialize_structure(&value, false).unwrap();
        assert_eq!(deserialize_structure(&yaml).unwrap(), value);
    }

    #[test]
    fn test_obscure_template() {
        let only = json!({ "Rules": { "CheckBootstrapVersion": {} }, "Resources": {} });
        assert_eq!(obscure_template(only), json!({ "Resources": {} }));

        let more = json!({ "Rules": { "CheckBootstrapVersion": {}, "Mine": {} } });
        assert_eq!(obscure_template(more), json!({ "Rules": { "Mine": {} } }));
    }

    #[test]
    fn test_load_structured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        std::fs::write(&path, "Description: from disk\n").unwrap();

        let value = load_structured_file(&path).unwrap();
        assert_eq!(value, json!({ "Description": "from disk" }));

        let err = load_structured_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, TemplateError::ReadFile { .. }));
    }
}
