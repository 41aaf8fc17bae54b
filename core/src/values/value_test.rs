use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::types::Type;
use crate::values::{ErrorKind, KeyDomain, MapKey, MapValue, Value, format_number, quote_str};

fn properties() -> MapValue {
    [
        (MapKey::Str(Arc::from("mode")), Value::from("standard")),
        (MapKey::Str(Arc::from("level")), Value::from(3i64)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_find_present_key() {
    let map = properties();
    let found = map.find(&Value::from("mode")).unwrap();
    assert_eq!(found, Some(&Value::from("standard")));
}

#[test]
fn test_find_absent_key_is_not_an_error() {
    let map = properties();
    assert_eq!(map.find(&Value::from("missing")).unwrap(), None);
    assert_eq!(map.find(&Value::Bool(true)).unwrap(), None);
}

#[test]
fn test_find_integral_number_key() {
    let map: MapValue = [(MapKey::Int(1), Value::from("one"))].into_iter().collect();
    assert_eq!(map.find(&Value::Number(1.0)).unwrap(), Some(&Value::from("one")));
    let err = map.find(&Value::Number(1.5)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedKeyType);
}

#[test]
fn test_find_unsupported_key_types() {
    let map = properties();
    for key in [
        Value::Null,
        Value::list(vec![]),
        Value::map(vec![]),
        Value::Number(f64::NAN),
    ] {
        let err = map.find(&key).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedKeyType, "key {}", key);
    }
}

#[test]
fn test_object_rejects_keys_of_other_kinds() {
    let object = Value::object(vec![("mode", Value::from("standard"))]);
    let map = object.as_map().unwrap();
    assert_eq!(map.key_domain(), KeyDomain::String);
    assert_eq!(map.find(&Value::from("missing")).unwrap(), None);
    for key in [Value::from(1i64), Value::Bool(true)] {
        let err = map.find(&key).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedKeyType, "key {}", key);
    }
    let err = map.find(&Value::from(1i64)).unwrap_err();
    assert_eq!(err.message, "unsupported key type: number");
}

#[test]
fn test_decoded_json_object_is_string_keyed() {
    let value = Value::from(serde_json::json!({"outer": {"inner": 1}}));
    let outer = value.as_map().unwrap();
    assert_eq!(outer.key_domain(), KeyDomain::String);
    let inner = outer.get_str("outer").and_then(Value::as_map).unwrap();
    assert_eq!(inner.key_domain(), KeyDomain::String);
}

#[test]
fn test_key_domain_does_not_affect_equality() {
    let object = Value::object(vec![("a", Value::from(1i64))]);
    let literal = Value::map(vec![(MapKey::Str(Arc::from("a")), Value::from(1i64))]);
    assert_eq!(object, literal);
}

#[test]
fn test_insert_outside_domain_widens_it() {
    let mut map = MapValue::string_keyed();
    map.insert(MapKey::Str(Arc::from("a")), Value::Null);
    assert_eq!(map.key_domain(), KeyDomain::String);
    map.insert(MapKey::Int(1), Value::Null);
    assert_eq!(map.key_domain(), KeyDomain::Any);
    assert_eq!(map.find(&Value::from(1i64)).unwrap(), Some(&Value::Null));
}

#[test]
fn test_find_error_key_passes_error_through() {
    let map = properties();
    let key = Value::error(ErrorKind::NoSuchKey, "gone");
    let err = map.find(&key).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoSuchKey);
    assert_eq!(err.message, "gone");
}

#[test]
fn test_equals() {
    assert_eq!(Value::from("a").equals(&Value::from("a")), Value::Bool(true));
    assert_eq!(Value::from(1i64).equals(&Value::from(2i64)), Value::Bool(false));
    assert_eq!(Value::from("1").equals(&Value::from(1i64)), Value::Bool(false));
    assert_eq!(Value::Null.equals(&Value::Null), Value::Bool(true));
    assert_eq!(
        Value::list(vec![Value::from(1i64)]).equals(&Value::list(vec![Value::from(1i64)])),
        Value::Bool(true)
    );
}

#[test]
fn test_equals_propagates_errors() {
    let left = Value::error(ErrorKind::NoSuchKey, "left");
    let right = Value::error(ErrorKind::InvalidIndex, "right");
    assert_eq!(left.equals(&right), left);
    assert_eq!(Value::Null.equals(&right), right);
}

#[test]
fn test_type_of() {
    assert_eq!(Value::Null.type_of(), Type::Null);
    assert_eq!(Value::from("x").type_of(), Type::String);
    assert_eq!(Value::list(vec![]).type_of(), Type::list(Type::Dyn));
    assert_eq!(
        Value::Map(Arc::new(properties())).type_of(),
        Type::map(Type::Dyn, Type::Dyn)
    );
}

#[test]
fn test_display_sorts_map_keys() {
    let value = Value::Map(Arc::new(properties()));
    assert_eq!(value.to_string(), "{'level': 3, 'mode': 'standard'}");
    assert_eq!(
        Value::list(vec![Value::Null, Value::Bool(false), Value::Number(2.5)]).to_string(),
        "[null, false, 2.5]"
    );
}

#[test]
fn test_display_error() {
    let value = Value::error(ErrorKind::UnsupportedKeyType, "unsupported key type: list");
    assert_eq!(
        value.to_string(),
        "error(unsupported key type: unsupported key type: list)"
    );
}

#[test]
fn test_from_json() {
    let json = serde_json::json!({
        "mode": "standard",
        "tags": ["a", 1, null],
        "nested": {"on": true},
    });
    let value = Value::from(json);
    let map = value.as_map().unwrap();
    assert_eq!(map.get_str("mode"), Some(&Value::from("standard")));
    assert_eq!(
        map.get_str("tags"),
        Some(&Value::list(vec![Value::from("a"), Value::Number(1.0), Value::Null]))
    );
    let nested = map.get_str("nested").and_then(Value::as_map).unwrap();
    assert_eq!(nested.get_str("on"), Some(&Value::Bool(true)));
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-42.0), "-42");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(f64::NAN), "nan");
    assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_number(1e21 + 0.5), format!("{}", 1e21));
}

#[test]
fn test_quote_str_escapes() {
    assert_eq!(quote_str("mode"), "'mode'");
    assert_eq!(quote_str("it's\n"), "'it\\'s\\n'");
    assert_eq!(quote_str("a\\b"), "'a\\\\b'");
}
