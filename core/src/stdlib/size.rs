//! `size(x)` and `x.size()`.

use crate::api::{EnvironmentBuilder, EnvironmentError};
use crate::functions::Overload;
use crate::types::Type;
use crate::values::Value;

pub fn register(env: &mut EnvironmentBuilder) -> Result<(), EnvironmentError> {
    let shapes = [
        ("string", Type::String),
        ("list", Type::list(Type::param("T"))),
        ("map", Type::map(Type::param("K"), Type::param("V"))),
    ];
    for (kind, ty) in shapes {
        env.register_function(
            "size",
            Overload::global(&format!("size_{}", kind), vec![ty.clone()], Type::Number, size),
        )?;
        env.register_function(
            "size",
            Overload::member(&format!("{}_size", kind), vec![ty], Type::Number, size),
        )?;
    }
    Ok(())
}

/// Length in Unicode scalar values for strings, entries for containers.
fn size(args: &[Value]) -> Value {
    match args {
        [Value::Str(s)] => Value::Number(s.chars().count() as f64),
        [Value::List(items)] => Value::Number(items.len() as f64),
        [Value::Map(map)] => Value::Number(map.len() as f64),
        _ => Value::no_overload("size", &args.iter().collect::<Vec<_>>()),
    }
}
