//! Map functions.

use std::sync::Arc;

use crate::api::{EnvironmentBuilder, EnvironmentError};
use crate::functions::Overload;
use crate::types::Type;
use crate::values::Value;

pub fn register(env: &mut EnvironmentBuilder) -> Result<(), EnvironmentError> {
    env.register_function(
        "contains",
        Overload::member(
            "map_contains_key_value",
            vec![
                Type::map(Type::param("A"), Type::param("B")),
                Type::param("A"),
                Type::param("B"),
            ],
            Type::Bool,
            map_contains_key_value,
        ),
    )
}

/// `m.contains(k, v)`: whether `m` maps `k` to a value equal to `v`.
///
/// An absent key is `false`. A key that can never be a map key, or whose
/// kind the map does not admit (a number against a JSON object), is an
/// `UnsupportedKeyType` error, not `false`.
pub fn map_contains_key_value(args: &[Value]) -> Value {
    let [map, key, value] = args else {
        return Value::no_overload("contains", &args.iter().collect::<Vec<_>>());
    };
    let Some(entries) = map.as_map() else {
        return Value::no_overload("contains", &[map, key, value]);
    };
    match entries.find(key) {
        Ok(Some(found)) => found.equals(value),
        Ok(None) => Value::Bool(false),
        Err(err) => Value::Error(Arc::new(err)),
    }
}
