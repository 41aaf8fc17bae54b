use std::collections::BTreeMap;

use crate::parser::NodeId;
use crate::values::Value;

/// Intermediate values of an evaluation, keyed and ordered by node id.
///
/// Nodes that were never evaluated (a short-circuited operand, the branch a
/// conditional did not take, anything after a structural error) are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalTrace {
    values: BTreeMap<NodeId, Value>,
}

impl EvalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, id: NodeId, value: Value) {
        self.values.insert(id, value);
    }

    pub fn get(&self, id: NodeId) -> Option<&Value> {
        self.values.get(&id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in ascending node id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Value)> {
        self.values.iter().map(|(id, value)| (*id, value))
    }
}
