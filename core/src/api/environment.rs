//! Variable and function declarations shared by every stage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;

use super::{CompilationOptions, EngineOptions, EnvironmentError, Error, Program};
use crate::analyzer::{self, CheckedAst, TypeError, TypeErrorKind};
use crate::compiler::{self, CompileError};
use crate::functions::{FunctionRegistry, Overload};
use crate::parser::{self, ParseError, ParsedExpr};
use crate::types::Type;

static NEXT_ENVIRONMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentId(u64);

/// Builder for an [`Environment`].
///
/// Declarations are validated as they are added; the first conflict is
/// returned as an error.
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    variables: HashMap<String, Type>,
    functions: FunctionRegistry,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an input variable.
    pub fn declare_variable(&mut self, name: &str, ty: Type) -> Result<(), EnvironmentError> {
        if self.variables.contains_key(name) {
            return Err(EnvironmentError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        if ty.has_params() {
            return Err(EnvironmentError::GenericVariable {
                name: name.to_string(),
            });
        }
        self.variables.insert(name.to_string(), ty);
        Ok(())
    }

    /// Add an overload to the function `name`.
    pub fn register_function(
        &mut self,
        name: &str,
        overload: Overload,
    ) -> Result<(), EnvironmentError> {
        self.functions.register(name, overload)
    }

    pub fn build(self, options: EngineOptions) -> Arc<Environment> {
        let id = EnvironmentId(NEXT_ENVIRONMENT_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(
            environment = id.0,
            variables = self.variables.len(),
            "environment built"
        );
        Arc::new(Environment {
            id,
            variables: self.variables,
            functions: self.functions,
            options,
        })
    }
}

/// Immutable declarations: input variables, functions, and default options.
///
/// Built once and shared read-only, typically behind an `Arc`, by any number
/// of concurrent compilations and evaluations.
///
/// # Example
///
/// ```
/// use gavel_core::api::{Environment, EngineOptions};
/// use gavel_core::evaluator::Activation;
/// use gavel_core::types::Type;
/// use gavel_core::values::Value;
///
/// let env = Environment::new(EngineOptions::default(), |env| {
///     env.declare_variable("age", Type::Number)
/// })
/// .unwrap();
///
/// let program = env.compile("age >= 18").unwrap();
/// let activation = Activation::new().with("age", Value::from(21i64));
/// assert_eq!(program.evaluate(&activation).unwrap(), Value::Bool(true));
/// ```
#[derive(Debug)]
pub struct Environment {
    id: EnvironmentId,
    variables: HashMap<String, Type>,
    functions: FunctionRegistry,
    options: EngineOptions,
}

impl Environment {
    /// Create an environment, populating it with `init`.
    pub fn new<E>(
        options: EngineOptions,
        init: impl FnOnce(&mut EnvironmentBuilder) -> Result<(), E>,
    ) -> Result<Arc<Self>, E> {
        let mut builder = EnvironmentBuilder::new();
        init(&mut builder)?;
        Ok(builder.build(options))
    }

    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::new()
    }

    pub fn id(&self) -> EnvironmentId {
        self.id
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Declared type of a variable.
    pub fn variable(&self, name: &str) -> Option<&Type> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.variables.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn parse(&self, source: &str) -> Result<ParsedExpr, ParseError> {
        parser::parse_with_max_depth(
            source,
            self.options.default_compilation_options.max_nesting_depth,
        )
    }

    /// Type check a parsed expression against this environment.
    pub fn check(&self, parsed: &ParsedExpr) -> Result<CheckedAst, Vec<TypeError>> {
        analyzer::check(self, parsed)
    }

    /// Compile a checked expression into a reusable [`Program`].
    pub fn program(self: &Arc<Self>, checked: &CheckedAst) -> Result<Program, CompileError> {
        compiler::compile(self, checked)
    }

    /// Parse, check and compile `source` with the default options.
    pub fn compile(self: &Arc<Self>, source: &str) -> Result<Program, Error> {
        let options = self.options.default_compilation_options.clone();
        self.compile_with(source, &options)
    }

    /// Parse, check and compile `source`, validating the result type against
    /// `options.expected_type`.
    pub fn compile_with(
        self: &Arc<Self>,
        source: &str,
        options: &CompilationOptions,
    ) -> Result<Program, Error> {
        let parsed = parser::parse_with_max_depth(source, options.max_nesting_depth)?;
        let checked = self.check(&parsed)?;
        if let Some(expected) = &options.expected_type {
            if checked.output_type() != expected {
                return Err(TypeError::new(
                    TypeErrorKind::WrongRootType {
                        expected: expected.clone(),
                        found: checked.output_type().clone(),
                        span: parsed.expr.span.clone(),
                    },
                    source.to_string(),
                )
                .into());
            }
        }
        Ok(self.program(&checked)?)
    }
}
