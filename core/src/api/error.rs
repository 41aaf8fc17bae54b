//! Public error types.
//!
//! Stage-specific errors (syntax, type, compile, evaluation) convert into
//! [`Error`] at API boundaries so `?` works across a whole pipeline.

use core::fmt;

use thiserror::Error;

use crate::analyzer::TypeError;
use crate::compiler::CompileError;
use crate::evaluator::EvalError;
use crate::parser::{ParseError, Span};

/// Public error type for all operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid environment declaration.
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// Syntax or type errors.
    ///
    /// Contains one or more diagnostics with source locations and context.
    #[error("compilation failed with {} error(s)", .diagnostics.len())]
    Compilation { diagnostics: Vec<Diagnostic> },

    /// A checked tree that does not belong to the environment compiling it.
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

impl Error {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Compilation { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

/// Errors raised while declaring variables and functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("variable '{name}' is already declared")]
    DuplicateDeclaration { name: String },

    /// Variables have concrete types; only signatures may be generic.
    #[error("variable '{name}' cannot have a generic type")]
    GenericVariable { name: String },

    #[error("overload '{overload_id}' of '{function}' has the same parameters as an existing overload")]
    ConflictingOverload {
        function: String,
        overload_id: String,
    },

    #[error("overload id '{overload_id}' is already registered")]
    DuplicateOverloadId { overload_id: String },
}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(ref help) = self.help {
            write!(f, "\nhelp: {}", help)?;
        }
        Ok(())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "in call to function 'size'").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
        }
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
        }
    }
}

impl From<Vec<TypeError>> for Error {
    fn from(errors: Vec<TypeError>) -> Self {
        Error::Compilation {
            diagnostics: errors.iter().map(TypeError::to_diagnostic).collect(),
        }
    }
}
