//! Lowering of checked expressions into executable plans.
//!
//! A plan mirrors the checked tree, with every call bound to its native
//! implementation and literals turned into values.

mod compiler;
mod error;
pub(crate) mod plan;

#[cfg(test)]
mod compiler_test;

pub use compiler::compile;
pub use error::CompileError;
