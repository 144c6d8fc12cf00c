use serde_json::json;

use cirrus_reconciler::diff::{changes, touches, AttributeSchema, Mutability};
use cirrus_reconciler::ReconcileError;

const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new("id", Mutability::Computed),
    AttributeSchema::new("name", Mutability::Mutable),
    AttributeSchema::new("size", Mutability::Mutable),
    AttributeSchema::new("location", Mutability::Immutable),
];

#[test]
fn equal_records_produce_no_changes() {
    let previous = json!({"id": 42, "name": "foo", "size": 10, "location": 1});
    let desired = json!({"name": "foo", "size": 10, "location": 1});

    let diff = changes(SCHEMA, &previous, &desired).unwrap();

    assert!(diff.is_empty());
}

#[test]
fn changed_mutable_attributes_are_listed() {
    let previous = json!({"id": 42, "name": "foo", "size": 10, "location": 1});
    let desired = json!({"name": "bar", "size": 20, "location": 1});

    let diff = changes(SCHEMA, &previous, &desired).unwrap();

    assert_eq!(diff.len(), 2);
    assert!(touches(&diff, "name"));
    assert!(touches(&diff, "size"));
    assert!(!touches(&diff, "location"));
}

#[test]
fn unspecified_attributes_are_wildcards() {
    let previous = json!({"id": 42, "name": "foo", "size": 10, "location": 1});
    // `name` left out entirely, `size` explicitly null — both wildcards.
    let desired = json!({"size": null, "location": 1});

    let diff = changes(SCHEMA, &previous, &desired).unwrap();

    assert!(diff.is_empty());
}

#[test]
fn computed_attributes_are_never_compared() {
    let previous = json!({"id": 42, "name": "foo", "size": 10, "location": 1});
    let desired = json!({"id": 999, "name": "foo", "size": 10, "location": 1});

    let diff = changes(SCHEMA, &previous, &desired).unwrap();

    assert!(diff.is_empty());
}

#[test]
fn changed_immutable_attribute_refuses() {
    let previous = json!({"id": 42, "name": "foo", "size": 10, "location": 1});
    let desired = json!({"name": "foo", "size": 10, "location": 2});

    let err = changes(SCHEMA, &previous, &desired).unwrap_err();

    match err {
        ReconcileError::NotSupported(msg) => assert!(msg.contains("location")),
        other => panic!("expected NotSupported, got {other:?}"),
    }
}

#[test]
fn change_records_previous_and_desired_values() {
    let previous = json!({"name": "foo"});
    let desired = json!({"name": "bar"});

    let diff = changes(SCHEMA, &previous, &desired).unwrap();

    assert_eq!(diff[0].attribute, "name");
    assert_eq!(diff[0].previous, json!("foo"));
    assert_eq!(diff[0].desired, json!("bar"));
}
