use super::edge::WorkflowEdge;
use super::node::WorkflowNode;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named snapshot of the canvas, persisted under `saved-workflows`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SavedWorkflow {
    pub id: String,
    pub name: String,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    /// ISO-8601 timestamp with millisecond precision.
    pub saved_at: String,
}

impl SavedWorkflow {
    /// Snapshot the given collections under a timestamp-suffixed id.
    pub fn snapshot(name: String, nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("workflow-{}", now.timestamp_millis()),
            name,
            nodes,
            edges,
            saved_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
