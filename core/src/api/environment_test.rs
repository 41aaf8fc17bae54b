use pretty_assertions::assert_eq;

use crate::api::{
    CompilationOptions, EngineOptions, Environment, EnvironmentError, Error,
};
use crate::compiler::CompileError;
use crate::evaluator::Activation;
use crate::test_utils::{init_test_logging, test_env};
use crate::types::Type;
use crate::values::Value;

#[test]
fn test_duplicate_declaration() {
    let mut builder = Environment::builder();
    builder.declare_variable("x", Type::Number).unwrap();
    assert_eq!(
        builder.declare_variable("x", Type::String),
        Err(EnvironmentError::DuplicateDeclaration {
            name: "x".to_string()
        })
    );
}

#[test]
fn test_generic_variable_rejected() {
    let mut builder = Environment::builder();
    assert_eq!(
        builder.declare_variable("x", Type::list(Type::param("T"))),
        Err(EnvironmentError::GenericVariable {
            name: "x".to_string()
        })
    );
}

#[test]
fn test_new_propagates_init_error() {
    let result = Environment::new(EngineOptions::default(), |env| {
        env.declare_variable("x", Type::Number)?;
        env.declare_variable("x", Type::Number)
    });
    assert!(matches!(
        result,
        Err(EnvironmentError::DuplicateDeclaration { .. })
    ));
}

#[test]
fn test_environment_ids_are_unique() {
    let a = Environment::builder().build(EngineOptions::default());
    let b = Environment::builder().build(EngineOptions::default());
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_lookup() {
    let env = test_env();
    assert_eq!(env.variable("age"), Some(&Type::Number));
    assert_eq!(env.variable("missing"), None);
    assert!(env.functions().contains("size"));
    assert_eq!(env.variables().count(), 7);
}

#[test]
fn test_compile_end_to_end() {
    init_test_logging();
    let env = test_env();
    let program = env
        .compile_with(
            "properties.mode == 'standard'",
            &CompilationOptions::predicate(),
        )
        .unwrap();
    assert_eq!(program.output_type(), &Type::Bool);
    assert_eq!(program.source(), "properties.mode == 'standard'");

    let activation = Activation::new().with(
        "properties",
        Value::object(vec![("mode", Value::from("standard"))]),
    );
    assert_eq!(program.evaluate(&activation), Ok(Value::Bool(true)));
}

#[test]
fn test_wrong_root_type() {
    let env = test_env();
    let err = env
        .compile_with("properties.mode", &CompilationOptions::predicate())
        .unwrap_err();
    let Error::Compilation { diagnostics } = err else {
        panic!("expected compilation error");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("E006"));
    assert_eq!(diagnostics[0].message, "Expression has type dyn, expected bool");
}

#[test]
fn test_compile_without_expected_type_accepts_any_root() {
    let env = test_env();
    let program = env.compile("age + 1").unwrap();
    assert_eq!(program.output_type(), &Type::Number);
}

#[test]
fn test_syntax_error_surfaces_as_compilation_error() {
    let env = test_env();
    let err = env.compile("age +").unwrap_err();
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code.as_deref(), Some("P001"));
}

#[test]
fn test_max_nesting_depth_option() {
    let env = test_env();
    let options = CompilationOptions {
        max_nesting_depth: 2,
        ..CompilationOptions::default()
    };
    let err = env.compile_with("[[[age]]]", &options).unwrap_err();
    assert_eq!(err.diagnostics()[0].code.as_deref(), Some("P005"));
    let err = env.compile_with("age + 1 + 1 + 1", &options).unwrap_err();
    assert_eq!(err.diagnostics()[0].code.as_deref(), Some("P005"));
    assert!(env.compile_with("age + 1 + 1", &options).is_ok());
}

#[test]
fn test_all_type_errors_reported() {
    let env = test_env();
    let err = env.compile("missing == 1 && other").unwrap_err();
    let codes: Vec<_> = err
        .diagnostics()
        .iter()
        .map(|d| d.code.clone().unwrap_or_default())
        .collect();
    assert_eq!(codes, vec!["E001", "E001"]);
}

#[test]
fn test_program_from_other_environment_rejected() {
    let env = test_env();
    let other = test_env();
    let parsed = env.parse("age > 1").unwrap();
    let checked = env.check(&parsed).unwrap();
    let err = other.program(&checked).unwrap_err();
    assert_eq!(
        err,
        CompileError::EnvironmentMismatch {
            checked: env.id(),
            compiling: other.id(),
        }
    );
}

#[test]
fn test_parse_check_program_steps() {
    let env = test_env();
    let parsed = env.parse("size(tags) > 0").unwrap();
    let checked = env.check(&parsed).unwrap();
    assert_eq!(checked.output_type(), &Type::Bool);
    let program = env.program(&checked).unwrap();
    let activation = Activation::new().with("tags", Value::list(vec![Value::from("a")]));
    assert_eq!(program.evaluate(&activation), Ok(Value::Bool(true)));
}

#[test]
fn test_check_is_generic_over_root_type() {
    let env = test_env();
    let parsed = env.parse("name").unwrap();
    let checked = env.check(&parsed).unwrap();
    assert_eq!(checked.output_type(), &Type::String);

    let err = env
        .compile_with("name", &CompilationOptions::predicate())
        .unwrap_err();
    assert!(matches!(err, Error::Compilation { .. }));
}
