use pretty_assertions::assert_eq;

use crate::evaluator::{Activation, EvalError};
use crate::stdlib::map::map_contains_key_value;
use crate::test_utils::test_env;
use crate::values::{ErrorKind, Value};

fn eval(source: &str, activation: &Activation) -> Result<Value, EvalError> {
    test_env()
        .compile(source)
        .unwrap_or_else(|err| panic!("{:?}: {:?}", source, err.diagnostics()))
        .evaluate(activation)
}

fn properties() -> Value {
    Value::from(serde_json::json!({
        "mode": "standard",
        "level": 3,
        "nested": {"a": [1, 2]},
    }))
}

#[test]
fn test_contains_key_value() {
    let map = properties();
    assert_eq!(
        map_contains_key_value(&[map.clone(), Value::from("mode"), Value::from("standard")]),
        Value::Bool(true)
    );
    assert_eq!(
        map_contains_key_value(&[map.clone(), Value::from("level"), Value::from(3.0)]),
        Value::Bool(true)
    );
    assert_eq!(
        map_contains_key_value(&[map.clone(), Value::from("level"), Value::from("3")]),
        Value::Bool(false)
    );
    assert_eq!(
        map_contains_key_value(&[map, Value::from("absent"), Value::Null]),
        Value::Bool(false)
    );
}

#[test]
fn test_contains_nested_value() {
    let nested = Value::from(serde_json::json!({"a": [1, 2]}));
    assert_eq!(
        map_contains_key_value(&[properties(), Value::from("nested"), nested]),
        Value::Bool(true)
    );
}

#[test]
fn test_contains_unsupported_key() {
    let result = map_contains_key_value(&[
        properties(),
        Value::from(vec![Value::from(1.0)]),
        Value::Bool(true),
    ]);
    assert_eq!(
        result.as_error().map(|err| err.kind),
        Some(ErrorKind::UnsupportedKeyType)
    );
}

#[test]
fn test_contains_scalar_key_of_wrong_kind() {
    for key in [Value::from(1.0), Value::Bool(true)] {
        let result = map_contains_key_value(&[properties(), key.clone(), Value::from("standard")]);
        assert_eq!(
            result.as_error().map(|err| err.kind),
            Some(ErrorKind::UnsupportedKeyType),
            "key {}",
            key
        );
    }
}

#[test]
fn test_contains_numeric_key_on_literal_map() {
    let activation = Activation::new();
    assert_eq!(
        eval("{1: 'one', 2: 'two'}.contains(1, 'one')", &activation),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        eval("{1: 'one', 2: 'two'}.contains(3, 'one')", &activation),
        Ok(Value::Bool(false))
    );
}

#[test]
fn test_contains_non_map_receiver() {
    let result = map_contains_key_value(&[Value::from("mode"), Value::from("a"), Value::Null]);
    assert_eq!(
        result.as_error().map(|err| err.kind),
        Some(ErrorKind::NoMatchingOverload)
    );
}

#[test]
fn test_string_predicates() {
    let activation = Activation::new().with("name", Value::from("policy-engine"));
    for (source, expected) in [
        ("name.contains('-eng')", true),
        ("name.contains('Engine')", false),
        ("name.startsWith('policy')", true),
        ("name.startsWith('engine')", false),
        ("name.endsWith('engine')", true),
        ("name.endsWith('')", true),
    ] {
        assert_eq!(eval(source, &activation), Ok(Value::Bool(expected)), "{}", source);
    }
}

#[test]
fn test_size_counts_scalar_values() {
    let activation = Activation::new()
        .with("name", Value::from("héllo"))
        .with("tags", Value::from(vec![Value::from("a"), Value::from("b")]))
        .with("scores", Value::from(serde_json::json!({"x": 1})));
    for (source, expected) in [
        ("size(name)", 5.0),
        ("name.size()", 5.0),
        ("size(tags)", 2.0),
        ("tags.size()", 2.0),
        ("size(scores)", 1.0),
        ("scores.size()", 1.0),
        ("size('')", 0.0),
        ("size([])", 0.0),
    ] {
        assert_eq!(eval(source, &activation), Ok(Value::Number(expected)), "{}", source);
    }
}

#[test]
fn test_contains_through_dyn_map() {
    let activation = Activation::new().with("any", properties());
    assert_eq!(
        eval("any.contains('mode', 'standard')", &activation),
        Ok(Value::Bool(true))
    );
    for source in [
        "any.contains(1, 'standard')",
        "any.contains(true, 'standard')",
        "!any.contains(1, 'standard')",
    ] {
        assert!(
            matches!(
                eval(source, &activation),
                Err(EvalError::UnsupportedKeyType { .. })
            ),
            "{}",
            source
        );
    }
}
