use std::sync::Arc;

use crate::analyzer::CheckedAst;
use crate::api::{Environment, Program};
use crate::compiler::CompileError;
use crate::compiler::plan::{Plan, PlanKind};
use crate::parser::{Expr, ExprKind, Literal};
use crate::values::Value;

/// Compile `checked` into a [`Program`] bound to `env`.
///
/// Compilation reads the environment and the tree only; compiling the same
/// tree any number of times, concurrently or not, yields equivalent
/// programs.
pub fn compile(env: &Arc<Environment>, checked: &CheckedAst) -> Result<Program, CompileError> {
    if checked.environment_id() != env.id() {
        return Err(CompileError::EnvironmentMismatch {
            checked: checked.environment_id(),
            compiling: env.id(),
        });
    }

    let plan = Compiler {
        env: env.as_ref(),
        checked,
    }
    .compile(checked.expr())?;
    tracing::debug!(output_type = %checked.output_type(), "expression compiled");
    Ok(Program::new(
        Arc::new(plan),
        checked.output_type().clone(),
        env.clone(),
        checked.source().clone(),
    ))
}

struct Compiler<'a> {
    env: &'a Environment,
    checked: &'a CheckedAst,
}

impl Compiler<'_> {
    fn boxed(&self, expr: &Expr) -> Result<Box<Plan>, CompileError> {
        self.compile(expr).map(Box::new)
    }

    fn compile(&self, expr: &Expr) -> Result<Plan, CompileError> {
        if self.checked.type_of(expr.id).is_none() {
            return Err(CompileError::MissingType { node: expr.id });
        }

        let kind = match &expr.kind {
            ExprKind::Literal(literal) => PlanKind::Constant(match literal {
                Literal::Null => Value::Null,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::from(s.as_str()),
            }),
            ExprKind::Ident(name) => PlanKind::Variable(Arc::from(name.as_str())),
            ExprKind::Field { value, field } => PlanKind::Field {
                target: self.boxed(value)?,
                field: Arc::from(field.as_str()),
            },
            ExprKind::Index { value, index } => PlanKind::Index {
                target: self.boxed(value)?,
                index: self.boxed(index)?,
            },
            ExprKind::Call {
                target,
                function,
                args,
            } => {
                let reference = self
                    .checked
                    .overload(expr.id)
                    .ok_or(CompileError::UnresolvedCall { node: expr.id })?;
                let overload = self
                    .env
                    .functions()
                    .find(&reference.function, &reference.overload_id)
                    .ok_or_else(|| CompileError::UnknownOverload {
                        function: reference.function.clone(),
                        overload_id: reference.overload_id.to_string(),
                    })?;
                let args = target
                    .as_deref()
                    .into_iter()
                    .chain(args)
                    .map(|arg| self.compile(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                PlanKind::Call {
                    function: Arc::from(function.as_str()),
                    native: overload.function,
                    args,
                }
            }
            ExprKind::Unary { op, expr: operand } => PlanKind::Unary {
                op: *op,
                operand: self.boxed(operand)?,
            },
            ExprKind::Binary { op, left, right } => PlanKind::Binary {
                op: *op,
                left: self.boxed(left)?,
                right: self.boxed(right)?,
            },
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => PlanKind::Conditional {
                cond: self.boxed(cond)?,
                then_branch: self.boxed(then_branch)?,
                else_branch: self.boxed(else_branch)?,
            },
            ExprKind::List(items) => PlanKind::List(
                items
                    .iter()
                    .map(|item| self.compile(item))
                    .collect::<Result<_, _>>()?,
            ),
            ExprKind::Map(entries) => PlanKind::Map(
                entries
                    .iter()
                    .map(|(key, value)| Ok((self.compile(key)?, self.compile(value)?)))
                    .collect::<Result<_, CompileError>>()?,
            ),
        };

        Ok(Plan {
            id: expr.id,
            span: expr.span.clone(),
            kind,
        })
    }
}
