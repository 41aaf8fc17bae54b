//! Gavel - typed policy expressions over JSON-like documents
//!
//! # Overview
//!
//! Gavel checks small boolean expressions against declared input variables
//! before they ever run, then evaluates them many times against untrusted
//! documents. Common use cases include:
//!
//! - Admission and authorization rules
//! - Feature flags and conditional logic
//! - Routing and filtering rules
//!
//! # Quick Start
//!
//! ```
//! use gavel::{CompilationOptions, EngineOptions, Environment, Type, Value};
//! use gavel::evaluator::Activation;
//! use gavel::stdlib::register_stdlib;
//!
//! let env = Environment::new(EngineOptions::default(), |env| {
//!     env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
//!     register_stdlib(env)
//! })
//! .unwrap();
//!
//! let program = env
//!     .compile_with(
//!         "properties.contains('mode', 'standard')",
//!         &CompilationOptions::predicate(),
//!     )
//!     .unwrap();
//!
//! let input = Activation::new().with(
//!     "properties",
//!     Value::from(serde_json::json!({"mode": "standard"})),
//! );
//! assert_eq!(program.evaluate(&input).unwrap(), Value::Bool(true));
//! ```
//!
//! # Registering Functions
//!
//! Native functions are plain `fn(&[Value]) -> Value`. Failures are returned
//! as error values, which propagate through the rest of the expression:
//!
//! ```
//! use gavel::{EngineOptions, Environment, Type, Value};
//! use gavel::functions::Overload;
//! use gavel::values::ErrorKind;
//!
//! fn percent(args: &[Value]) -> Value {
//!     match args {
//!         [Value::Number(part), Value::Number(total)] if *total != 0.0 => {
//!             Value::Number(part / total * 100.0)
//!         }
//!         _ => Value::error(ErrorKind::NativeFunction, "percent of zero"),
//!     }
//! }
//!
//! let env = Environment::new(EngineOptions::default(), |env| {
//!     env.register_function(
//!         "percent",
//!         Overload::global(
//!             "percent_number_number",
//!             vec![Type::Number, Type::Number],
//!             Type::Number,
//!             percent,
//!         ),
//!     )
//! })
//! .unwrap();
//!
//! let program = env.compile("percent(1, 4)").unwrap();
//! assert_eq!(program.evaluate(&Default::default()).unwrap(), Value::Number(25.0));
//! ```

mod error_renderer;

// Re-export public API from gavel_core
pub use gavel_core::api::{
    CompilationOptions, Diagnostic, EngineOptions, Environment, EnvironmentBuilder,
    EnvironmentError, Error, ExecutionOptions, Program, RelatedInfo, Severity, compile_n,
    evaluate_all,
};

// Re-export commonly used types and values
pub use gavel_core::types::{self, Type};
pub use gavel_core::values::{self, ErrorKind, Value};
pub use gavel_core::{functions, stdlib};

// Re-export evaluation
pub use gavel_core::evaluator::{self, Activation, CancelToken, EvalError, EvalTrace, Evaluation};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
