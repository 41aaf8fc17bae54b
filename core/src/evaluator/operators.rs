//! Binary and unary operator implementations.
//!
//! Operands arrive already evaluated. An error operand is returned as the
//! result, left first; operands of kinds an operator is not defined for
//! produce a `NoMatchingOverload` error value.

use std::cmp::Ordering;

use crate::parser::{BinaryOp, UnaryOp};
use crate::values::Value;

pub(super) fn eval_unary(op: UnaryOp, operand: &Value) -> Value {
    match (op, operand) {
        (_, Value::Error(_)) => operand.clone(),
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        (UnaryOp::Neg, Value::Number(n)) => Value::Number(-n),
        _ => Value::no_overload(op.symbol(), &[operand]),
    }
}

/// Evaluate a non-short-circuiting binary operator.
pub(super) fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    if left.is_error() {
        return left.clone();
    }
    if right.is_error() {
        return right.clone();
    }

    match op {
        BinaryOp::Eq => left.equals(right),
        BinaryOp::Ne => match left.equals(right) {
            Value::Bool(b) => Value::Bool(!b),
            other => other,
        },
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            match compare(left, right) {
                Some(ordering) => Value::Bool(match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }),
                None if matches!((left, right), (Value::Number(_), Value::Number(_))) => {
                    // NaN is unordered.
                    Value::Bool(false)
                }
                None => Value::no_overload(op.symbol(), &[left, right]),
            }
        }
        BinaryOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::Str(a), Value::Str(b)) => Value::from(format!("{}{}", a, b)),
            (Value::List(a), Value::List(b)) => Value::list(a.iter().chain(b.iter()).cloned()),
            _ => Value::no_overload(op.symbol(), &[left, right]),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Value::Number(eval_binary_number(op, *a, *b)),
            _ => Value::no_overload(op.symbol(), &[left, right]),
        },
        BinaryOp::In => match right {
            Value::List(items) => {
                for item in items.iter() {
                    match left.equals(item) {
                        Value::Bool(false) => continue,
                        found => return found,
                    }
                }
                Value::Bool(false)
            }
            Value::Map(map) => match map.find(left) {
                Ok(found) => Value::Bool(found.is_some()),
                Err(err) => Value::Error(err.into()),
            },
            _ => Value::no_overload(op.symbol(), &[left, right]),
        },
        BinaryOp::And | BinaryOp::Or => Value::no_overload(op.symbol(), &[left, right]),
    }
}

/// Arithmetic on numbers.
///
/// Follows IEEE 754 semantics (produces inf/nan rather than failing).
fn eval_binary_number(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Rem => left % right,
        _ => f64::NAN,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
