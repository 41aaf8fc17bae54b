//! Typed policy expressions: declare, parse, check, compile, evaluate.
//!
//! The pipeline is
//! [`Environment`](api::Environment) → [`parser`] → [`analyzer`] →
//! [`compiler`] → [`evaluator`]. Environments and compiled
//! [`Program`](api::Program)s are immutable and shared freely across threads.

pub mod analyzer;
pub mod api;
pub mod compiler;
pub mod diagnostics;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod stdlib;
pub mod types;
pub mod values;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use crate::api::{EngineOptions, Environment};
    use crate::stdlib::register_stdlib;
    use crate::types::Type;

    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Environment with a few typed variables and the stdlib.
    ///
    /// - `properties: map(string, dyn)`
    /// - `tags: list(string)`
    /// - `scores: map(string, number)`
    /// - `age: number`, `name: string`, `flag: bool`, `any: dyn`
    pub fn test_env() -> Arc<Environment> {
        let declared = Environment::new(EngineOptions::default(), |env| {
            env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
            env.declare_variable("tags", Type::list(Type::String))?;
            env.declare_variable("scores", Type::map(Type::String, Type::Number))?;
            env.declare_variable("age", Type::Number)?;
            env.declare_variable("name", Type::String)?;
            env.declare_variable("flag", Type::Bool)?;
            env.declare_variable("any", Type::Dyn)?;
            register_stdlib(env)
        });
        match declared {
            Ok(env) => env,
            Err(err) => panic!("test environment: {}", err),
        }
    }
}
