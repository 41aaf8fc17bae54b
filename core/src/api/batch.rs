//! Compiling and evaluating many programs at once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;

use crate::api::{CompilationOptions, Environment, Error, ExecutionOptions, Program};
use crate::evaluator::{Activation, CancelToken, EvalError};
use crate::values::Value;

/// Compile `source` `count` times, in parallel.
///
/// Every program is an independent instance; all of them behave
/// identically. The first failure is returned.
pub fn compile_n(
    env: &Arc<Environment>,
    source: &str,
    count: usize,
    options: &CompilationOptions,
) -> Result<Vec<Program>, Error> {
    tracing::debug!(count, "compiling batch");
    (0..count)
        .into_par_iter()
        .map(|_| env.compile_with(source, options))
        .collect()
}

/// Evaluate every program against the same input, in parallel.
///
/// Results are in program order. One program failing, or even panicking,
/// does not affect the others.
pub fn evaluate_all(
    programs: &[Program],
    activation: &Activation,
    cancel: &CancelToken,
    options: &ExecutionOptions,
) -> Vec<Result<Value, EvalError>> {
    tracing::debug!(programs = programs.len(), "evaluating batch");
    programs
        .par_iter()
        .enumerate()
        .map(|(index, program)| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                program.evaluate_with(activation, cancel, options).into_result()
            }));
            outcome.unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::warn!(index, %message, "evaluation panicked");
                Err(EvalError::Panicked { message })
            })
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
