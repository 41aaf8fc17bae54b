//! Compilation errors.

use thiserror::Error;

use crate::api::EnvironmentId;
use crate::parser::NodeId;

/// Inconsistency between a checked tree and the environment compiling it.
///
/// A tree checked against the same environment never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("expression was checked against environment {checked:?}, not {compiling:?}")]
    EnvironmentMismatch {
        checked: EnvironmentId,
        compiling: EnvironmentId,
    },

    #[error("call node {node} has no resolved overload")]
    UnresolvedCall { node: NodeId },

    #[error("overload '{overload_id}' of '{function}' is not registered")]
    UnknownOverload {
        function: String,
        overload_id: String,
    },

    #[error("node {node} has no type")]
    MissingType { node: NodeId },
}
