//! End-to-end tests of the cfnkit binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn catalog_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

fn cfnkit(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cfnkit"))
        .current_dir(cwd)
        .arg("--schemas")
        .arg(catalog_dir())
        .args(args)
        .env_remove("CFNKIT_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

const LINK: &str = r#"
labelTemplate: $AccountName
resourceTypes:
  - AWS::Logs::LogGroup
sinkIdentifier: !GetAtt Sink.Arn
"#;

#[test]
fn test_validate_success_and_failure() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("link.yaml"), LINK).unwrap();
    fs::write(temp.path().join("bad.yaml"), "labelTemplate: x\ncolour: blue\n").unwrap();

    let ok = cfnkit(temp.path(), &["validate", "-t", "AWS::Oam::Link", "-p", "link.yaml"]);
    assert!(ok.status.success());

    let bad = cfnkit(temp.path(), &["validate", "-t", "AWS::Oam::Link", "-p", "bad.yaml"]);
    assert_eq!(bad.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&bad.stdout);
    assert!(stdout.contains("resourceTypes is required"));
    assert!(stdout.contains("colour: unknown property"));

    let lenient = cfnkit(
        temp.path(),
        &["--allow-unknown", "validate", "-t", "AWS::Oam::Link", "-p", "bad.yaml"],
    );
    assert_eq!(lenient.status.code(), Some(3));
    assert!(!String::from_utf8_lossy(&lenient.stdout).contains("colour"));
}

#[test]
fn test_render_fragment() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("link.yaml"), LINK).unwrap();

    let output = cfnkit(temp.path(), &["render", "-t", "AWS::Oam::Link", "-p", "link.yaml"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        json!({
            "LabelTemplate": "$AccountName",
            "ResourceTypes": ["AWS::Logs::LogGroup"],
            "SinkIdentifier": { "Fn::GetAtt": ["Sink", "Arn"] }
        })
    );
}

#[test]
fn test_unknown_type_is_invalid_argument() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("link.yaml"), LINK).unwrap();

    let output = cfnkit(temp.path(), &["render", "-t", "AWS::Nope::Thing", "-p", "link.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_synth_round_trips_template() {
    let temp = TempDir::new().unwrap();
    let template = json!({
        "Resources": {
            "Sink": { "Type": "AWS::Oam::Sink", "Properties": { "Name": "central", "Extra": [1, 2] } },
            "Topic": { "Type": "AWS::SNS::Topic", "Properties": { "TopicName": "alerts" } }
        },
        "Rules": { "CheckBootstrapVersion": { "Assertions": [] } }
    });
    fs::write(temp.path().join("template.json"), template.to_string()).unwrap();

    let output = cfnkit(temp.path(), &["synth", "-t", "template.json", "-o", "json", "--obscure"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let mut expected = template.clone();
    expected.as_object_mut().unwrap().remove("Rules");
    assert_eq!(stdout_json(&output), expected);
}

#[test]
fn test_import_parse_failure() {
    let temp = TempDir::new().unwrap();
    let template = json!({
        "Resources": {
            "Link": {
                "Type": "AWS::Oam::Link",
                "Properties": { "LabelTemplate": "x", "ResourceTypes": "not-a-list", "SinkIdentifier": "s" }
            }
        }
    });
    fs::write(temp.path().join("template.json"), template.to_string()).unwrap();

    let output = cfnkit(temp.path(), &["import", "-t", "template.json"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ResourceTypes"));
}

#[test]
fn test_import_bags() {
    let temp = TempDir::new().unwrap();
    let template = json!({
        "Resources": {
            "Sink": { "Type": "AWS::Oam::Sink", "Properties": { "Name": "central", "Extra": true } }
        }
    });
    fs::write(temp.path().join("template.json"), template.to_string()).unwrap();

    let output = cfnkit(temp.path(), &["import", "-t", "template.json", "--bags", "-o", "json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "Sink": {
                "type": "AWS::Oam::Sink",
                "properties": { "name": "central" },
                "extraProperties": { "Extra": true }
            }
        })
    );
}

#[test]
fn test_schemas_listing() {
    let temp = TempDir::new().unwrap();
    let output = cfnkit(temp.path(), &["schemas"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AWS::Oam::Link"));
    assert!(!stdout.contains("AWS::S3::Bucket.Rule"));

    let described = cfnkit(temp.path(), &["schemas", "-t", "AWS::Oam::Link"]);
    assert!(String::from_utf8_lossy(&described.stdout).contains("labelTemplate / LabelTemplate: string (required)"));
}
