//! Integration tests for the property engine.

use cfnkit_core::{
    CoreError, IntrinsicResolver, PropertyBag, PropertyParser, PropertyRenderer,
    PropertyValidator, PropertyValue, Token,
};
use cfnkit_schema::{FieldKind, PropertySchema, SchemaRegistry};
use serde_json::{json, Value};

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(
            PropertySchema::resource("AWS::Glue::Job")
                .required("name", FieldKind::String)
                .required("input", FieldKind::String)
                .build()
                .unwrap(),
        )
        .with(
            PropertySchema::resource("AWS::Comprehend::Flywheel")
                .optional("entityTypes", FieldKind::list(FieldKind::String))
                .build()
                .unwrap(),
        )
        .with(
            PropertySchema::resource("AWS::Test::Artifact")
                .required("name", FieldKind::String)
                .optional("location", FieldKind::structure("AWS::Test::Artifact.S3Location"))
                .optional("mirrors", FieldKind::list(FieldKind::structure("AWS::Test::Artifact.S3Location")))
                .optional("sizes", FieldKind::map(FieldKind::Number))
                .optional("enabled", FieldKind::Boolean)
                .optional("metadata", FieldKind::Any)
                .build()
                .unwrap(),
        )
        .with(
            PropertySchema::structure("AWS::Test::Artifact.S3Location")
                .required("bucket", FieldKind::String)
                .optional("key", FieldKind::String)
                .build()
                .unwrap(),
        )
        .with(
            PropertySchema::resource("AWS::Test::Named")
                .optional("name", FieldKind::String)
                .build()
                .unwrap(),
        )
}

fn render(registry: &SchemaRegistry, type_name: &str, bag: PropertyBag) -> Result<Value, CoreError> {
    let resolver = IntrinsicResolver::new();
    let schema = registry.get(type_name).unwrap();
    PropertyRenderer::new(registry, &resolver).render(schema, &PropertyValue::Object(bag))
}

fn artifact_bag() -> PropertyBag {
    PropertyBag::new()
        .with("name", "release")
        .with("location", PropertyBag::new().with("bucket", "b1").with("key", "k1"))
        .with(
            "mirrors",
            vec![
                PropertyBag::new().with("bucket", "m1"),
                PropertyBag::new().with("bucket", "m2").with("key", "k2"),
            ],
        )
        .with("sizes", PropertyBag::new().with("small", 1).with("large", 2.5))
        .with("enabled", false)
        .with(
            "metadata",
            PropertyValue::from_json(&json!({ "owner": "ops", "nested": [1, "two", null] })),
        )
}

/// A required field missing from the bag fails validation and names the field.
#[test]
fn test_scenario_missing_required_input() {
    let registry = registry();
    let schema = registry.get("AWS::Glue::Job").unwrap();
    let bag = PropertyBag::new().with("name", "x");

    let result = PropertyValidator::new(&registry).validate_bag(schema, &bag);
    assert!(!result.is_success());
    assert!(result.mentions("input"));

    let err = render(&registry, "AWS::Glue::Job", bag).unwrap_err();
    assert!(err.to_string().contains("input is required"));
    assert!(err.to_string().contains("AWS::Glue::Job"));
}

#[test]
fn test_scenario_list_of_strings() {
    let registry = registry();
    let bag = PropertyBag::new().with("entityTypes", vec!["EMAIL", "PHONE_NUMBER"]);

    let fragment = render(&registry, "AWS::Comprehend::Flywheel", bag).unwrap();
    assert_eq!(fragment, json!({ "EntityTypes": ["EMAIL", "PHONE_NUMBER"] }));
}

#[test]
fn test_scenario_nested_structure() {
    let registry = registry();
    let bag = PropertyBag::new()
        .with("name", "n")
        .with("location", PropertyBag::new().with("bucket", "b1").with("key", "k1"));

    let fragment = render(&registry, "AWS::Test::Artifact", bag).unwrap();
    assert_eq!(fragment["Location"], json!({ "Bucket": "b1", "Key": "k1" }));
}

#[test]
fn test_scenario_import_with_unknown_field() {
    let registry = registry();
    let schema = registry.get("AWS::Test::Named").unwrap();

    let result = PropertyParser::new(&registry)
        .parse(schema, &json!({ "Name": "x", "Foo": "bar" }))
        .unwrap();

    assert_eq!(result.bag(), Some(&PropertyBag::new().with("name", "x")));
    assert_eq!(result.extra_properties.len(), 1);
    assert_eq!(result.extra_properties["Foo"], json!("bar"));
}

#[test]
fn test_render_then_parse_round_trips() {
    let registry = registry();
    let schema = registry.get("AWS::Test::Artifact").unwrap();
    let bag = artifact_bag();

    let fragment = render(&registry, "AWS::Test::Artifact", bag.clone()).unwrap();
    let parsed = PropertyParser::new(&registry).parse(schema, &fragment).unwrap();

    assert_eq!(parsed.value, PropertyValue::Object(bag));
    assert!(parsed.extra_properties.is_empty());
}

#[test]
fn test_rendering_is_idempotent() {
    let registry = registry();
    let bag = artifact_bag();

    let first = render(&registry, "AWS::Test::Artifact", bag.clone()).unwrap();
    let second = render(&registry, "AWS::Test::Artifact", bag).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_extras_merge_back_into_rendered_fragment() {
    let registry = registry();
    let schema = registry.get("AWS::Test::Named").unwrap();
    let original = json!({ "Name": "x", "Foo": "bar", "Bar": { "Deep": [1, 2] } });

    let parsed = PropertyParser::new(&registry).parse(schema, &original).unwrap();
    let mut fragment = render(&registry, "AWS::Test::Named", parsed.bag().unwrap().clone()).unwrap();

    let obj = fragment.as_object_mut().unwrap();
    for (key, value) in parsed.extra_properties {
        obj.insert(key, value);
    }
    assert_eq!(fragment, original);
}

#[test]
fn test_deferred_values_never_type_errors() {
    let registry = registry();
    let schema = registry.get("AWS::Test::Artifact").unwrap();
    let token = || Token::intrinsic(json!({ "Fn::ImportValue": "shared" }));

    let bag = PropertyBag::new()
        .with("name", token())
        .with("location", token())
        .with("mirrors", vec![token()])
        .with("sizes", PropertyBag::new().with("small", token()))
        .with("enabled", token());

    let result = PropertyValidator::new(&registry).validate_bag(schema, &bag);
    assert!(result.is_success(), "{:?}", result.errors());

    let fragment = render(&registry, "AWS::Test::Artifact", bag).unwrap();
    assert_eq!(fragment["Enabled"], json!({ "Fn::ImportValue": "shared" }));
    assert_eq!(fragment["Sizes"]["small"], json!({ "Fn::ImportValue": "shared" }));
}

#[test]
fn test_parse_error_is_not_aggregated() {
    let registry = registry();
    let schema = registry.get("AWS::Test::Artifact").unwrap();

    let err = PropertyParser::new(&registry)
        .parse(
            schema,
            &json!({ "Name": "x", "Enabled": "maybe", "Sizes": { "small": "tiny" } }),
        )
        .unwrap_err();

    match err {
        CoreError::Parse { path, .. } => assert_eq!(path, "Sizes.small"),
        other => panic!("unexpected error: {}", other),
    }
}
