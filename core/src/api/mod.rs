//! Public API.
//!
//! Declare an [`Environment`], compile expressions into [`Program`]s, and
//! evaluate them against [`Activation`](crate::evaluator::Activation)s:
//!
//! ```
//! use gavel_core::api::{CompilationOptions, Environment, EngineOptions};
//! use gavel_core::evaluator::Activation;
//! use gavel_core::types::Type;
//! use gavel_core::values::Value;
//!
//! let env = Environment::new(EngineOptions::default(), |env| {
//!     env.declare_variable("properties", Type::map(Type::String, Type::Dyn))
//! })
//! .unwrap();
//!
//! let program = env
//!     .compile_with("properties.mode == 'standard'", &CompilationOptions::predicate())
//!     .unwrap();
//! assert_eq!(program.output_type(), &Type::Bool);
//!
//! let document = serde_json::json!({"properties": {"mode": "standard"}});
//! let activation = match document {
//!     serde_json::Value::Object(fields) => Activation::from_json_object(fields),
//!     _ => unreachable!(),
//! };
//! assert_eq!(program.evaluate(&activation).unwrap(), Value::Bool(true));
//! ```

pub mod batch;
pub mod environment;
pub mod error;
pub mod options;
pub mod program;

pub use batch::{compile_n, evaluate_all};
pub use environment::{Environment, EnvironmentBuilder, EnvironmentId};
pub use error::{Diagnostic, EnvironmentError, Error, RelatedInfo, Severity};
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};
pub use program::Program;

#[cfg(test)]
mod environment_test;
