use std::sync::Arc;

use hashbrown::HashMap;

use crate::api::EnvironmentId;
use crate::parser::{Expr, NodeId, ParsedExpr};
use crate::types::Type;

/// The overload a call node resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadRef {
    pub function: String,
    pub overload_id: Arc<str>,
}

/// A parsed expression annotated with the type of every node and the
/// overload chosen for every call.
///
/// Annotations never contain type parameters.
#[derive(Debug, Clone)]
pub struct CheckedAst {
    pub(crate) parsed: ParsedExpr,
    pub(crate) types: HashMap<NodeId, Type>,
    pub(crate) overloads: HashMap<NodeId, OverloadRef>,
    pub(crate) output_type: Type,
    pub(crate) environment: EnvironmentId,
}

impl CheckedAst {
    pub fn expr(&self) -> &Expr {
        &self.parsed.expr
    }

    pub fn source(&self) -> &Arc<str> {
        &self.parsed.source
    }

    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn overload(&self, id: NodeId) -> Option<&OverloadRef> {
        self.overloads.get(&id)
    }

    /// Type of the whole expression.
    pub fn output_type(&self) -> &Type {
        &self.output_type
    }

    /// Identity of the environment this tree was checked against.
    pub fn environment_id(&self) -> EnvironmentId {
        self.environment
    }
}
