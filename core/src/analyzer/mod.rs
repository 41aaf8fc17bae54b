//! Static checking of parsed expressions.
//!
//! The analyzer walks the tree bottom-up, assigning every node a [`Type`]
//! and resolving every call to a single registered overload. Operators are
//! typed here directly; only named calls go through the function registry.
//!
//! [`Type`]: crate::types::Type

mod analyzer;
mod checked_ast;
mod error;


pub use analyzer::check;
pub use checked_ast::{CheckedAst, OverloadRef};
pub use error::{TypeError, TypeErrorKind};
