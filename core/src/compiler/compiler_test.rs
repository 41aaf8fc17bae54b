use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::analyzer::{CheckedAst, OverloadRef};
use crate::api::Environment;
use crate::compiler::{CompileError, compile};
use crate::evaluator::Activation;
use crate::parser::NodeId;
use crate::test_utils::test_env;
use crate::types::Type;
use crate::values::Value;

fn checked(env: &Arc<Environment>, source: &str) -> CheckedAst {
    let parsed = env.parse(source).unwrap();
    env.check(&parsed).unwrap()
}

#[test]
fn test_compile_keeps_output_type() {
    let env = test_env();
    let checked = checked(&env, "size(name) + 1");
    let program = compile(&env, &checked).unwrap();
    assert_eq!(program.output_type(), &Type::Number);
    assert_eq!(program.source(), "size(name) + 1");
}

#[test]
fn test_compiling_twice_gives_equivalent_programs() {
    let env = test_env();
    let checked = checked(&env, "name.startsWith('ga') && size(tags) == 2");
    let first = compile(&env, &checked).unwrap();
    let second = compile(&env, &checked).unwrap();

    let inputs = [
        Activation::new()
            .with("name", Value::from("gavel"))
            .with("tags", Value::list(vec![Value::from("a"), Value::from("b")])),
        Activation::new()
            .with("name", Value::from("hammer"))
            .with("tags", Value::list(vec![])),
    ];
    for activation in &inputs {
        assert_eq!(first.evaluate(activation), second.evaluate(activation));
    }
}

#[test]
fn test_compile_does_not_modify_checked_tree() {
    let env = test_env();
    let checked = checked(&env, "tags[0] == 'x'");
    let before = format!("{:?}", checked.expr());
    compile(&env, &checked).unwrap();
    assert_eq!(format!("{:?}", checked.expr()), before);
}

#[test]
fn test_unresolved_call() {
    let env = test_env();
    let mut checked = checked(&env, "size(tags)");
    let root = checked.expr().id;
    checked.overloads.clear();
    assert_eq!(
        compile(&env, &checked).unwrap_err(),
        CompileError::UnresolvedCall { node: root }
    );
}

#[test]
fn test_unknown_overload() {
    let env = test_env();
    let mut checked = checked(&env, "size(tags)");
    let root = checked.expr().id;
    checked.overloads.insert(
        root,
        OverloadRef {
            function: "size".to_string(),
            overload_id: Arc::from("size_bytes"),
        },
    );
    assert_eq!(
        compile(&env, &checked).unwrap_err(),
        CompileError::UnknownOverload {
            function: "size".to_string(),
            overload_id: "size_bytes".to_string(),
        }
    );
}

#[test]
fn test_missing_type() {
    let env = test_env();
    let mut checked = checked(&env, "age > 1");
    checked.types.remove(&NodeId(1));
    assert_eq!(
        compile(&env, &checked).unwrap_err(),
        CompileError::MissingType { node: NodeId(1) }
    );
}
