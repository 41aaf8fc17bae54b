//! Batch compilation and evaluation.

use std::sync::Arc;

use gavel::functions::Overload;
use gavel::stdlib::register_stdlib;
use gavel::{
    Activation, CancelToken, CompilationOptions, EngineOptions, Environment, EvalError,
    ExecutionOptions, Type, Value, compile_n, evaluate_all,
};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

fn explode(_: &[Value]) -> Value {
    panic!("native function exploded")
}

static ENV: Lazy<Arc<Environment>> = Lazy::new(|| {
    Environment::new(EngineOptions::default(), |env| {
        env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
        env.register_function(
            "explode",
            Overload::global("explode_dyn", vec![Type::Dyn], Type::Bool, explode),
        )?;
        register_stdlib(env)
    })
    .unwrap()
});

fn input() -> Activation {
    Activation::new().with(
        "properties",
        Value::from(serde_json::json!({"mode": "standard", "replicas": 3})),
    )
}

#[test]
fn compiled_copies_are_equivalent() {
    let source = "properties.contains('mode', 'standard')";
    let programs = compile_n(&ENV, source, 5, &CompilationOptions::predicate()).unwrap();
    assert_eq!(programs.len(), 5);
    for program in &programs {
        assert_eq!(program.output_type(), &Type::Bool);
        assert_eq!(program.source(), source);
    }

    let results = evaluate_all(
        &programs,
        &input(),
        &CancelToken::new(),
        &ExecutionOptions::default(),
    );
    assert_eq!(results, vec![Ok(Value::Bool(true)); 5]);
}

#[test]
fn compile_n_reports_the_failure() {
    let err = compile_n(&ENV, "properties.mode ==", 3, &CompilationOptions::default())
        .unwrap_err();
    assert_eq!(err.diagnostics().len(), 1);
}

#[test]
fn compile_zero_copies() {
    let programs = compile_n(&ENV, "true", 0, &CompilationOptions::default()).unwrap();
    assert!(programs.is_empty());
}

#[test]
fn failures_stay_isolated() {
    let sources = [
        "properties.replicas > 1",
        "properties.missing == 1",
        "explode(properties)",
        "properties.mode.startsWith('stan')",
    ];
    let programs: Vec<_> = sources
        .iter()
        .map(|source| ENV.compile(source).unwrap())
        .collect();

    let results = evaluate_all(
        &programs,
        &input(),
        &CancelToken::new(),
        &ExecutionOptions::default(),
    );

    assert_eq!(results[0], Ok(Value::Bool(true)));
    assert!(matches!(results[1], Err(EvalError::NoSuchKey { .. })));
    assert_eq!(
        results[2],
        Err(EvalError::Panicked {
            message: "native function exploded".to_string()
        })
    );
    assert_eq!(results[3], Ok(Value::Bool(true)));
}

#[test]
fn cancelled_batch() {
    let programs = compile_n(&ENV, "properties.mode == 'standard'", 4, &Default::default())
        .unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let results = evaluate_all(&programs, &input(), &cancel, &ExecutionOptions::default());
    assert!(results.iter().all(|result| result == &Err(EvalError::Cancelled)));
}
