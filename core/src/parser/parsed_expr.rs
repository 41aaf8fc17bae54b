use std::sync::Arc;

use serde::Serialize;

use crate::parser::{BinaryOp, NodeId, Span, UnaryOp};

/// An untyped expression tree together with the source it was parsed from.
#[derive(Debug, Clone)]
pub struct ParsedExpr {
    pub expr: Expr,
    pub source: Arc<str>,
    /// Exclusive upper bound on the node ids in `expr`.
    pub node_count: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    /// `function(args)` or, with a target, `target.function(args)`.
    Call {
        target: Option<Box<Expr>>,
        function: String,
        args: Vec<Expr>,
    },
    Index {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Field {
        value: Box<Expr>,
        field: String,
    },
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    List(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Literal(Literal),
    Ident(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Expr {
    /// Visit this node and all of its descendants, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Unary { expr, .. } => expr.walk(visit),
            ExprKind::Call { target, args, .. } => {
                if let Some(target) = target {
                    target.walk(visit);
                }
                for arg in args {
                    arg.walk(visit);
                }
            }
            ExprKind::Index { value, index } => {
                value.walk(visit);
                index.walk(visit);
            }
            ExprKind::Field { value, .. } => value.walk(visit),
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.walk(visit);
                then_branch.walk(visit);
                else_branch.walk(visit);
            }
            ExprKind::List(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            ExprKind::Map(entries) => {
                for (key, value) in entries {
                    key.walk(visit);
                    value.walk(visit);
                }
            }
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
        }
    }
}

/// Renders the expression fully parenthesized, e.g. `((a.b == 'x') && c)`.
impl core::fmt::Display for Expr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            ExprKind::Literal(literal) => match literal {
                Literal::Null => write!(f, "null"),
                Literal::Bool(b) => write!(f, "{}", b),
                Literal::Number(n) => write!(f, "{}", crate::values::format_number(*n)),
                Literal::Str(s) => write!(f, "{}", crate::values::quote_str(s)),
            },
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Field { value, field } => write!(f, "{}.{}", value, field),
            ExprKind::Index { value, index } => write!(f, "{}[{}]", value, index),
            ExprKind::Call {
                target,
                function,
                args,
            } => {
                if let Some(target) = target {
                    write!(f, "{}.", target)?;
                }
                write!(f, "{}(", function)?;
                write_separated(f, args.iter())?;
                write!(f, ")")
            }
            ExprKind::Unary { op, expr } => write!(f, "({}{})", op.symbol(), expr),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "({} ? {} : {})", cond, then_branch, else_branch),
            ExprKind::List(items) => {
                write!(f, "[")?;
                write_separated(f, items.iter())?;
                write!(f, "]")
            }
            ExprKind::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_separated<'a>(
    f: &mut core::fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Expr>,
) -> core::fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
