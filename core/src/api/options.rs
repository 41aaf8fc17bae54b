//! Configuration options.

use crate::types::Type;

/// Options for parsing, checking and compiling an expression.
///
/// # Example
///
/// ```
/// use gavel_core::api::CompilationOptions;
/// use gavel_core::types::Type;
///
/// let options = CompilationOptions {
///     expected_type: Some(Type::Bool),
///     ..CompilationOptions::default()
/// };
/// assert_eq!(options.max_nesting_depth, 100);
/// ```
#[derive(Debug, Clone)]
pub struct CompilationOptions {
    /// Maximum bracket/operator nesting accepted by the parser.
    ///
    /// Default: 100
    pub max_nesting_depth: usize,

    /// Required type of the whole expression, if any.
    ///
    /// Checked by strict equality, so a `dyn` result does not satisfy
    /// `Some(Type::Bool)`.
    ///
    /// Default: None
    pub expected_type: Option<Type>,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: crate::parser::DEFAULT_MAX_DEPTH,
            expected_type: None,
        }
    }
}

impl CompilationOptions {
    /// Options for boolean predicates.
    pub fn predicate() -> Self {
        Self {
            expected_type: Some(Type::Bool),
            ..Self::default()
        }
    }
}

/// Options for a single evaluation.
///
/// # Example
///
/// ```
/// use gavel_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 500,
///     trace: true,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum evaluation depth.
    ///
    /// Default: 1000
    pub max_depth: usize,

    /// Record every intermediate value by node id.
    ///
    /// Default: false
    pub trace: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            trace: false,
        }
    }
}

/// Defaults carried by an [`Environment`](crate::api::Environment), which
/// can be overridden per call.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub default_compilation_options: CompilationOptions,
    pub default_execution_options: ExecutionOptions,
}
