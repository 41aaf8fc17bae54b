//! Sharing environments and programs across threads.

use std::sync::Arc;
use std::thread;

use gavel_core::api::{CompilationOptions, EngineOptions, Environment, Program};
use gavel_core::evaluator::Activation;
use gavel_core::stdlib::register_stdlib;
use gavel_core::types::Type;
use gavel_core::values::Value;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

static ENV: Lazy<Arc<Environment>> = Lazy::new(|| {
    Environment::new(EngineOptions::default(), |env| {
        env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
        env.declare_variable("limit", Type::Number)?;
        register_stdlib(env)
    })
    .unwrap()
});

const POLICY: &str = "properties.contains('mode', 'standard') && size(properties) <= limit";

fn input(mode: &str, limit: f64) -> Activation {
    Activation::new()
        .with("properties", Value::from(serde_json::json!({"mode": mode})))
        .with("limit", Value::from(limit))
}

#[test]
fn concurrent_compilation_against_one_environment() {
    let programs: Vec<Program> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| ENV.compile_with(POLICY, &CompilationOptions::predicate())))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    let activation = input("standard", 1.0);
    for program in &programs {
        assert_eq!(program.output_type(), &Type::Bool);
        assert_eq!(program.evaluate(&activation), Ok(Value::Bool(true)));
    }
    assert_eq!(ENV.variables().count(), 2);
}

#[test]
fn one_program_many_threads() {
    let program = ENV.compile(POLICY).unwrap();
    let cases = [
        ("standard", 1.0, true),
        ("standard", 0.0, false),
        ("strict", 5.0, false),
    ];

    thread::scope(|scope| {
        for (mode, limit, expected) in cases {
            let program = &program;
            scope.spawn(move || {
                let activation = input(mode, limit);
                for _ in 0..100 {
                    assert_eq!(program.evaluate(&activation), Ok(Value::Bool(expected)));
                }
            });
        }
    });
}

#[test]
fn programs_move_between_threads() {
    let program = ENV.compile(POLICY).unwrap();
    let result = thread::spawn(move || program.evaluate(&input("standard", 3.0)))
        .join()
        .unwrap();
    assert_eq!(result, Ok(Value::Bool(true)));
}
