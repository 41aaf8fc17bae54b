//! Tree-walking evaluator for compiled expressions.
//!
//! ## Design Principles
//!
//! - **Never panic**: adversarial inputs surface as errors or error values
//! - **Stack-safe**: depth tracking bounds recursion on deeply nested plans
//! - **Cancellable**: the cancel token is polled on entry to every node and
//!   before every native call
//! - **Deterministic**: operands are evaluated left to right, depth first

mod activation;
mod cancel;
mod error;
pub(crate) mod eval;
mod operators;
mod trace;


pub use activation::Activation;
pub use cancel::CancelToken;
pub use error::EvalError;
pub use trace::EvalTrace;

use crate::api::ExecutionOptions;
use crate::compiler::plan::Plan;
use crate::values::Value;

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The expression's value. An error value reaching the root is reported
    /// as the matching [`EvalError`].
    pub result: Result<Value, EvalError>,
    /// Per-node values, when tracing was requested. Kept even when the
    /// evaluation fails.
    pub trace: Option<EvalTrace>,
}

impl Evaluation {
    pub fn into_result(self) -> Result<Value, EvalError> {
        self.result
    }
}

pub(crate) fn evaluate(
    plan: &Plan,
    activation: &Activation,
    cancel: &CancelToken,
    options: &ExecutionOptions,
) -> Evaluation {
    let mut evaluator = eval::Evaluator::new(activation, cancel, options);
    let result = evaluator.eval(plan).and_then(|value| match value {
        Value::Error(err) => Err(EvalError::from(err.as_ref().clone())),
        value => Ok(value),
    });
    if let Err(err) = &result {
        tracing::debug!(%err, "evaluation failed");
    }
    Evaluation {
        result,
        trace: evaluator.into_trace(),
    }
}
