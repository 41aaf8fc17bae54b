//! String functions. Matching is by Unicode scalar values, case-sensitive.

use crate::api::{EnvironmentBuilder, EnvironmentError};
use crate::functions::{NativeFn, Overload};
use crate::types::Type;
use crate::values::Value;

pub fn register(env: &mut EnvironmentBuilder) -> Result<(), EnvironmentError> {
    let string_predicate = |id: &str, function: NativeFn| {
        Overload::member(id, vec![Type::String, Type::String], Type::Bool, function)
    };
    env.register_function("contains", string_predicate("string_contains_string", string_contains))?;
    env.register_function("startsWith", string_predicate("string_starts_with", string_starts_with))?;
    env.register_function("endsWith", string_predicate("string_ends_with", string_ends_with))?;
    Ok(())
}

fn string_args<'a>(name: &str, args: &'a [Value]) -> Result<(&'a str, &'a str), Value> {
    match args {
        [Value::Str(haystack), Value::Str(needle)] => Ok((haystack, needle)),
        _ => Err(Value::no_overload(name, &args.iter().collect::<Vec<_>>())),
    }
}

fn string_contains(args: &[Value]) -> Value {
    match string_args("contains", args) {
        Ok((haystack, needle)) => Value::Bool(haystack.contains(needle)),
        Err(err) => err,
    }
}

fn string_starts_with(args: &[Value]) -> Value {
    match string_args("startsWith", args) {
        Ok((s, prefix)) => Value::Bool(s.starts_with(prefix)),
        Err(err) => err,
    }
}

fn string_ends_with(args: &[Value]) -> Value {
    match string_args("endsWith", args) {
        Ok((s, suffix)) => Value::Bool(s.ends_with(suffix)),
        Err(err) => err,
    }
}
