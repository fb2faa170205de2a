//! Tests for JSON and YAML text conversions

use jutge_api_client::util::{emit_yaml, from_yaml, json_to_yaml, to_json, to_yaml, yaml_to_json};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Problem {
    problem_nm: String,
    title: String,
    tags: Vec<String>,
}

#[test]
fn test_typed_yaml_round_trip() {
    let problem = Problem {
        problem_nm: "P68688".to_string(),
        title: "Hola, món: \"primer\" programa".to_string(),
        tags: vec!["io".to_string(), "yes".to_string()],
    };
    let yaml = to_yaml(&problem).unwrap();
    assert_eq!(from_yaml::<Problem>(&yaml).unwrap(), problem);
}

#[test]
fn test_json_to_yaml_document() {
    let yaml = json_to_yaml(r#"{"languages":[{"id":"ca","name":"Català"}],"total":1}"#).unwrap();
    assert_eq!(yaml, "languages:\n    -   id: ca\n        name: Català\ntotal: 1\n");
}

#[test]
fn test_yaml_to_json_keeps_unicode() {
    let json = yaml_to_json("nom: \"Ñandú 🦀\"\n").unwrap();
    assert_eq!(json, r#"{"nom":"Ñandú 🦀"}"#);
}

#[test]
fn test_invalid_json_is_error() {
    assert!(json_to_yaml("{not json").is_err());
}

#[test]
fn test_invalid_yaml_is_error() {
    assert!(yaml_to_json("a: [1, 2").is_err());
}

#[test]
fn test_nested_sequences() {
    let value = json!([[1, 2], {"a": [true, null]}]);
    let yaml = emit_yaml(&value);
    assert_eq!(yaml, "-   - 1\n    - 2\n-   a:\n        - true\n        - null\n");
    assert_eq!(from_yaml::<Value>(&yaml).unwrap(), value);
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _:#'\"\\\\{}\\[\\],&*!|>%@`?~=<.\\-éñç中🦀\n\t]{0,12}"
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        prop::sample::select(vec![0.5, -2.25, 1024.0, 3.125]).prop_map(Value::from),
        text().prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(text(), inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Converting to YAML and back preserves the value
    #[test]
    fn yaml_preserves_json_values(value in json_value()) {
        let yaml = json_to_yaml(&to_json(&value).unwrap()).unwrap();
        let back: Value = serde_json::from_str(&yaml_to_json(&yaml).unwrap()).unwrap();
        prop_assert_eq!(back, value);
    }
}
