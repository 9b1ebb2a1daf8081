use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A directed connection between two canvas nodes.
///
/// Endpoints are node ids; existence is not validated on insert. Removing a
/// node removes every edge that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl WorkflowEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
