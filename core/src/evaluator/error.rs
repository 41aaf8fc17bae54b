//! Evaluation errors.
//!
//! Two kinds of failure exist at runtime. Functional errors are
//! `Value::Error` values flowing through the expression as data; they only
//! become an [`EvalError`] when they reach the root. Structural errors
//! (unbound variables, access on a non-container, cancellation, limits)
//! abort the evaluation immediately.

use thiserror::Error;

use crate::parser::Span;
use crate::values::{ErrorKind, ErrorValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A declared variable with no binding in the activation.
    #[error("no value bound for variable '{name}'")]
    UnboundVariable { name: String },

    /// Field or index access on a value that is not a container.
    #[error("cannot access {access} on a {kind} value")]
    InvalidAccess {
        kind: &'static str,
        access: String,
        span: Span,
    },

    #[error("{message}")]
    UnsupportedKeyType { message: String },

    #[error("{message}")]
    NoSuchKey { message: String },

    #[error("{message}")]
    InvalidIndex { message: String },

    /// Operator or function applied at runtime to operands it does not accept.
    #[error("{message}")]
    NoMatchingOverload { message: String },

    #[error("{message}")]
    DuplicateKey { message: String },

    /// Implementation-specific failure reported by a native function.
    #[error("native function error: {message}")]
    NativeFunction { message: String },

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation depth exceeds maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// A batch worker panicked.
    #[error("evaluation panicked: {message}")]
    Panicked { message: String },
}

impl EvalError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EvalError::Cancelled)
    }
}

impl From<ErrorValue> for EvalError {
    fn from(err: ErrorValue) -> Self {
        let message = err.message;
        match err.kind {
            ErrorKind::UnsupportedKeyType => EvalError::UnsupportedKeyType { message },
            ErrorKind::NoSuchKey => EvalError::NoSuchKey { message },
            ErrorKind::InvalidIndex => EvalError::InvalidIndex { message },
            ErrorKind::NoMatchingOverload => EvalError::NoMatchingOverload { message },
            ErrorKind::DuplicateKey => EvalError::DuplicateKey { message },
            ErrorKind::NativeFunction => EvalError::NativeFunction { message },
        }
    }
}
