use std::sync::Arc;

use crate::functions::NativeFn;
use crate::parser::{BinaryOp, NodeId, Span, UnaryOp};
use crate::values::Value;

/// Executable form of a checked expression.
///
/// Calls carry their native implementation directly, so evaluation never
/// consults the registry.
#[derive(Debug)]
pub(crate) struct Plan {
    pub id: NodeId,
    pub span: Span,
    pub kind: PlanKind,
}

#[derive(Debug)]
pub(crate) enum PlanKind {
    Constant(Value),
    Variable(Arc<str>),
    Field {
        target: Box<Plan>,
        field: Arc<str>,
    },
    Index {
        target: Box<Plan>,
        index: Box<Plan>,
    },
    /// Arguments include the receiver of a member call, first.
    Call {
        function: Arc<str>,
        native: NativeFn,
        args: Vec<Plan>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Plan>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Plan>,
        right: Box<Plan>,
    },
    Conditional {
        cond: Box<Plan>,
        then_branch: Box<Plan>,
        else_branch: Box<Plan>,
    },
    List(Vec<Plan>),
    Map(Vec<(Plan, Plan)>),
}
