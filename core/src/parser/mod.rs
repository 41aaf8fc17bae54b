//! Expression text to untyped syntax tree.

pub mod error;
mod parsed_expr;
pub mod parser;
mod string_literal;
mod syntax;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, ExprKind, Literal, ParsedExpr};
pub use syntax::{BinaryOp, NodeId, Span, UnaryOp};
