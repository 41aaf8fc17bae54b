//! Standard library functions.
//!
//! Registered through the same registry API available to embedders, so the
//! stdlib is just a set of ordinary overloads:
//! - `contains`: key/value membership on maps, substring test on strings
//! - `size`: length of strings, lists and maps, as a free or member call
//! - `startsWith`, `endsWith`: string prefix and suffix tests

use crate::api::{EnvironmentBuilder, EnvironmentError};

pub mod map;
pub mod size;
pub mod string;

/// Register every stdlib overload in `env`.
///
/// ```
/// use gavel_core::api::{Environment, EngineOptions};
/// use gavel_core::stdlib::register_stdlib;
///
/// let env = Environment::new(EngineOptions::default(), |env| register_stdlib(env)).unwrap();
/// assert!(env.functions().contains("contains"));
/// ```
pub fn register_stdlib(env: &mut EnvironmentBuilder) -> Result<(), EnvironmentError> {
    map::register(env)?;
    string::register(env)?;
    size::register(env)?;
    Ok(())
}

#[cfg(test)]
mod stdlib_test;
