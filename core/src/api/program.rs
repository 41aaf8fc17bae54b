//! Compiled, repeatedly evaluable expressions.

use std::sync::Arc;

use crate::api::{Environment, ExecutionOptions};
use crate::compiler::plan::Plan;
use crate::evaluator::{self, Activation, CancelToken, EvalError, Evaluation};
use crate::types::Type;
use crate::values::Value;

/// A compiled expression.
///
/// Programs hold no evaluation state: cloning is cheap, and one program may
/// be evaluated any number of times, from any number of threads at once.
///
/// # Example
///
/// ```
/// use gavel_core::api::{Environment, EngineOptions, ExecutionOptions};
/// use gavel_core::evaluator::{Activation, CancelToken};
/// use gavel_core::stdlib::register_stdlib;
/// use gavel_core::types::Type;
/// use gavel_core::values::Value;
///
/// let env = Environment::new(EngineOptions::default(), |env| {
///     env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
///     register_stdlib(env)
/// })
/// .unwrap();
/// let program = env.compile("properties.contains('mode', 'standard')").unwrap();
///
/// let activation = Activation::new().with(
///     "properties",
///     Value::object(vec![("mode", Value::from("standard"))]),
/// );
/// let options = ExecutionOptions { trace: true, ..ExecutionOptions::default() };
/// let evaluation = program.evaluate_with(&activation, &CancelToken::new(), &options);
/// assert_eq!(evaluation.result, Ok(Value::Bool(true)));
/// assert_eq!(evaluation.trace.map(|trace| trace.len()), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct Program {
    plan: Arc<Plan>,
    output_type: Type,
    environment: Arc<Environment>,
    source: Arc<str>,
}

impl Program {
    pub(crate) fn new(
        plan: Arc<Plan>,
        output_type: Type,
        environment: Arc<Environment>,
        source: Arc<str>,
    ) -> Self {
        Self {
            plan,
            output_type,
            environment,
            source,
        }
    }

    /// Checked type of the expression.
    pub fn output_type(&self) -> &Type {
        &self.output_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// Evaluate with the environment's default execution options and no
    /// cancellation.
    pub fn evaluate(&self, activation: &Activation) -> Result<Value, EvalError> {
        let options = &self.environment.options().default_execution_options;
        self.evaluate_with(activation, &CancelToken::new(), options)
            .into_result()
    }

    pub fn evaluate_with(
        &self,
        activation: &Activation,
        cancel: &CancelToken,
        options: &ExecutionOptions,
    ) -> Evaluation {
        tracing::debug!(source = %self.source, trace = options.trace, "evaluating");
        evaluator::evaluate(&self.plan, activation, cancel, options)
    }
}
