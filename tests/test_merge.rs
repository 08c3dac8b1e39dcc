//! Deterministic merge tests

use recurl::config::{merge, Mapping};
use serde_json::{json, Value};

fn map(value: Value) -> Mapping {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected an object"),
    }
}

fn layers() -> [Mapping; 4] {
    [
        map(json!({"headers": {"Accept": "application/json"}, "tags": ["a", "b"], "timeout": 30})),
        map(json!({"base_url": "https://api.example.com", "tags": ["b", "c"]})),
        map(json!({"timeout": 5, "headers": {"X-Env": "prod"}})),
        map(json!({"endpoint": {"path": "/users"}, "timeout": 1})),
    ]
}

#[test]
fn test_merge_is_deterministic() {
    let layers = layers();
    let first = merge(&layers);
    let second = merge(&layers);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_highest_precedence_scalar_wins() {
    let merged = merge(&layers());
    assert_eq!(merged["timeout"], json!(1));
    assert_eq!(merged["base_url"], json!("https://api.example.com"));
}

#[test]
fn test_nested_mappings_combine() {
    let merged = merge(&layers());
    assert_eq!(merged["headers"], json!({"Accept": "application/json", "X-Env": "prod"}));
}

#[test]
fn test_sequences_append_unique_in_order() {
    let merged = merge(&layers());
    assert_eq!(merged["tags"], json!(["a", "b", "c"]));
}

#[test]
fn test_shape_mismatch_later_wins() {
    let merged = merge(&[
        map(json!({"headers": {"A": "1"}, "x": [1]})),
        map(json!({"headers": "none", "x": {"k": 1}})),
    ]);
    assert_eq!(merged["headers"], json!("none"));
    assert_eq!(merged["x"], json!({"k": 1}));
}

#[test]
fn test_order_matters() {
    let a = map(json!({"k": 1}));
    let b = map(json!({"k": 2}));
    assert_eq!(merge([&a, &b])["k"], json!(2));
    assert_eq!(merge([&b, &a])["k"], json!(1));
}

#[test]
fn test_empty_layers_are_identity() {
    let empty = Mapping::new();
    let layer = map(json!({"k": {"n": [1, 2]}}));
    assert_eq!(merge([&empty, &layer, &empty]), layer);
    assert!(merge(std::iter::empty::<&Mapping>()).is_empty());
}
