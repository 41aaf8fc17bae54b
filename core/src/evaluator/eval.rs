//! Core evaluation logic.

use std::sync::Arc;

use crate::api::ExecutionOptions;
use crate::compiler::plan::{Plan, PlanKind};
use crate::evaluator::operators::{eval_binary, eval_unary};
use crate::evaluator::{Activation, CancelToken, EvalError, EvalTrace};
use crate::parser::{BinaryOp, Span};
use crate::values::{ErrorKind, MapKey, MapValue, Value, is_integral};

/// Tree-walking evaluator over a compiled plan.
///
/// Holds only per-evaluation state; the plan itself is shared and never
/// modified.
pub(crate) struct Evaluator<'a> {
    activation: &'a Activation,
    cancel: &'a CancelToken,
    max_depth: usize,
    depth: usize,
    trace: Option<EvalTrace>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        activation: &'a Activation,
        cancel: &'a CancelToken,
        options: &ExecutionOptions,
    ) -> Self {
        Self {
            activation,
            cancel,
            max_depth: options.max_depth,
            depth: 0,
            trace: options.trace.then(EvalTrace::new),
        }
    }

    pub fn into_trace(self) -> Option<EvalTrace> {
        self.trace
    }

    /// Evaluate a plan node.
    ///
    /// The cancel token is polled before anything else, so even a constant
    /// observes a cancelled token.
    pub fn eval(&mut self, plan: &Plan) -> Result<Value, EvalError> {
        self.cancel.check()?;

        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        self.depth += 1;
        let result = self.eval_inner(plan);
        self.depth -= 1;

        let value = result?;
        if let Some(trace) = &mut self.trace {
            trace.record(plan.id, value.clone());
        }
        Ok(value)
    }

    fn eval_inner(&mut self, plan: &Plan) -> Result<Value, EvalError> {
        match &plan.kind {
            PlanKind::Constant(value) => Ok(value.clone()),

            PlanKind::Variable(name) => self.activation.get(name).cloned().ok_or_else(|| {
                EvalError::UnboundVariable {
                    name: name.to_string(),
                }
            }),

            PlanKind::Field { target, field } => {
                let value = self.eval(target)?;
                match &value {
                    Value::Error(_) => Ok(value.clone()),
                    Value::Map(map) => Ok(map.get_str(field).cloned().unwrap_or_else(|| {
                        Value::error(ErrorKind::NoSuchKey, format!("no such key: '{}'", field))
                    })),
                    other => Err(invalid_access(other, format!("field '{}'", field), &plan.span)),
                }
            }

            PlanKind::Index { target, index } => {
                let value = self.eval(target)?;
                let index = self.eval(index)?;
                if value.is_error() {
                    return Ok(value);
                }
                if index.is_error() {
                    return Ok(index);
                }
                match &value {
                    Value::List(items) => Ok(list_index(items, &index)),
                    Value::Map(map) => Ok(match map.find(&index) {
                        Ok(Some(found)) => found.clone(),
                        Ok(None) => {
                            Value::error(ErrorKind::NoSuchKey, format!("no such key: {}", index))
                        }
                        Err(err) => Value::Error(Arc::new(err)),
                    }),
                    other => Err(invalid_access(other, "index".to_string(), &plan.span)),
                }
            }

            PlanKind::Call {
                function,
                native,
                args,
            } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let value = self.eval(arg)?;
                    if value.is_error() {
                        return Ok(value);
                    }
                    values.push(value);
                }
                self.cancel.check()?;
                tracing::trace!(%function, "invoking native function");
                Ok(native(&values))
            }

            PlanKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Ok(eval_unary(*op, &value))
            }

            PlanKind::Binary { op, left, right } => match op {
                BinaryOp::And => self.eval_logical(*op, left, right, false),
                BinaryOp::Or => self.eval_logical(*op, left, right, true),
                _ => {
                    let left = self.eval(left)?;
                    let right = self.eval(right)?;
                    Ok(eval_binary(*op, &left, &right))
                }
            },

            PlanKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => match self.eval(cond)? {
                Value::Bool(true) => self.eval(then_branch),
                Value::Bool(false) => self.eval(else_branch),
                Value::Error(err) => Ok(Value::Error(err)),
                other => Ok(Value::no_overload("_?_:_", &[&other])),
            },

            PlanKind::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let value = self.eval(item)?;
                    if value.is_error() {
                        return Ok(value);
                    }
                    values.push(value);
                }
                Ok(Value::from(values))
            }

            PlanKind::Map(entries) => {
                let mut map = MapValue::new();
                for (key_plan, value_plan) in entries {
                    let key = self.eval(key_plan)?;
                    if key.is_error() {
                        return Ok(key);
                    }
                    let value = self.eval(value_plan)?;
                    if value.is_error() {
                        return Ok(value);
                    }
                    let key = match MapKey::from_value(&key) {
                        Ok(key) => key,
                        Err(err) => return Ok(Value::Error(Arc::new(err))),
                    };
                    let message = format!("duplicate map key: {}", key);
                    if map.insert(key, value).is_some() {
                        return Ok(Value::error(ErrorKind::DuplicateKey, message));
                    }
                }
                Ok(Value::Map(Arc::new(map)))
            }
        }
    }

    /// `&&` and `||`, strictly left to right.
    ///
    /// `short_circuit` is the left value that decides the result without
    /// evaluating the right operand.
    fn eval_logical(
        &mut self,
        op: BinaryOp,
        left: &Plan,
        right: &Plan,
        short_circuit: bool,
    ) -> Result<Value, EvalError> {
        let left = self.eval(left)?;
        match left {
            Value::Bool(b) if b == short_circuit => Ok(left),
            Value::Bool(_) => {
                let right = self.eval(right)?;
                match right {
                    Value::Bool(_) | Value::Error(_) => Ok(right),
                    other => Ok(Value::no_overload(op.symbol(), &[&other])),
                }
            }
            Value::Error(_) => Ok(left),
            other => Ok(Value::no_overload(op.symbol(), &[&other])),
        }
    }
}

fn invalid_access(value: &Value, access: String, span: &Span) -> EvalError {
    EvalError::InvalidAccess {
        kind: value.describe(),
        access,
        span: span.clone(),
    }
}

fn list_index(items: &[Value], index: &Value) -> Value {
    match index {
        Value::Number(n) if is_integral(*n) && *n >= 0.0 && (*n as usize) < items.len() => {
            items[*n as usize].clone()
        }
        Value::Number(_) => Value::error(
            ErrorKind::InvalidIndex,
            format!("invalid list index {} for list of size {}", index, items.len()),
        ),
        other => Value::error(
            ErrorKind::InvalidIndex,
            format!("invalid list index of type {}", other.describe()),
        ),
    }
}
