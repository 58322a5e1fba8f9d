//! Integration tests for schema catalogs.

use std::fs;
use std::path::PathBuf;

use cfnkit_schema::{FieldKind, SchemaCategory, SchemaError, SchemaLoader};
use tempfile::TempDir;

fn catalog_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

#[test]
fn test_shipped_catalogs() {
    let registry = SchemaLoader::new(catalog_dir()).load_all().unwrap();

    let link = registry.require("AWS::Oam::Link").unwrap();
    assert_eq!(link.category, SchemaCategory::Resource);
    let names: Vec<&str> = link.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["labelTemplate", "resourceTypes", "sinkIdentifier", "tags"]);
    assert_eq!(link.required_fields().count(), 3);

    let bucket = registry.require("AWS::S3::Bucket").unwrap();
    assert_eq!(
        bucket.field("tags").unwrap().kind,
        FieldKind::list(FieldKind::structure("Tag"))
    );
    assert_eq!(bucket.field_by_wire_name("BucketName").unwrap().name, "bucketName");

    assert!(registry
        .by_category(SchemaCategory::Structure)
        .iter()
        .all(|s| !s.is_resource()));
    assert!(registry.check_references().is_empty());
}

#[test]
fn test_wire_name_only_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("vpc.yaml");
    fs::write(
        &path,
        r#"
types:
  - type_name: AWS::EC2::Subnet
    fields:
      - wire_name: VPCId
        kind: string
        required: true
      - name: cidrBlock
        wire_name: CidrBlock
        kind: string
"#,
    )
    .unwrap();

    let document = SchemaLoader::load_file(&path).unwrap();
    let subnet = &document.types[0];
    assert_eq!(subnet.field("vpcId").unwrap().wire_name, "VPCId");
    assert!(subnet.field("vpcId").unwrap().required);
}

#[test]
fn test_invalid_catalogs_are_reported_by_load_file() {
    let temp = TempDir::new().unwrap();

    let bad_kind = temp.path().join("bad_kind.yaml");
    fs::write(
        &bad_kind,
        "types:\n  - type_name: AWS::Test::Thing\n    fields:\n      - name: a\n        kind: tuple<string>\n",
    )
    .unwrap();
    assert!(matches!(
        SchemaLoader::load_file(&bad_kind),
        Err(SchemaError::InvalidFile { .. })
    ));

    let duplicate = temp.path().join("duplicate.json");
    fs::write(
        &duplicate,
        r#"{"types": [{"type_name": "AWS::Test::Thing", "fields": [
            {"name": "a", "kind": "string"},
            {"name": "a", "kind": "number"}
        ]}]}"#,
    )
    .unwrap();
    let err = SchemaLoader::load_file(&duplicate).unwrap_err();
    assert!(err.to_string().contains("Duplicate field"));

    let registry = SchemaLoader::new(temp.path()).load_all().unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_multiple_paths_merge() {
    let first = TempDir::new().unwrap();
    fs::write(
        first.path().join("a.yaml"),
        "types:\n  - type_name: AWS::Test::A\n    fields: []\n",
    )
    .unwrap();

    let registry = SchemaLoader::new(first.path())
        .with_path(catalog_dir())
        .with_path(first.path().join("missing"))
        .load_all()
        .unwrap();

    assert!(registry.exists("AWS::Test::A"));
    assert!(registry.exists("AWS::Oam::Sink"));
}
