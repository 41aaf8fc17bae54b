//! Context attached to diagnostics.

pub mod context;

pub use context::Context;
