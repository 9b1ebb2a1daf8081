//! Authoritative in-memory canvas state with a persistent mirror.
//!
//! The store owns the node and edge collections, the selection, the
//! executing flag, the saved-workflow list, and the last execution report.
//! Every mutation rewrites the affected storage blobs; storage failures are
//! logged and swallowed, the in-memory state stays authoritative for the
//! session either way.

use crate::models::{
    ExecutionReport, NodeStatus, SavedWorkflow, WorkflowEdge, WorkflowNode,
};
use crate::storage::Storage;
use anyhow::{Result, anyhow};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Default)]
struct GraphState {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    selected_node_id: Option<String>,
    executing: bool,
    saved_workflows: Vec<SavedWorkflow>,
    report: Option<ExecutionReport>,
}

pub struct GraphStore {
    state: RwLock<GraphState>,
    storage: Arc<Storage>,
}

impl GraphStore {
    /// Build the store, loading the persisted canvas and saved-workflow
    /// list. Unreadable blobs degrade to empty collections.
    pub fn new(storage: Arc<Storage>) -> Self {
        let nodes = match storage.canvas.load_nodes() {
            Ok(nodes) => nodes.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Failed to load canvas nodes, starting empty");
                Vec::new()
            }
        };
        let edges = match storage.canvas.load_edges() {
            Ok(edges) => edges.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Failed to load canvas edges, starting empty");
                Vec::new()
            }
        };
        let saved_workflows = match storage.workflows.list_workflows() {
            Ok(workflows) => workflows,
            Err(e) => {
                error!(error = %e, "Failed to load saved workflows, starting empty");
                Vec::new()
            }
        };

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            saved_workflows = saved_workflows.len(),
            "Graph store loaded"
        );

        Self {
            state: RwLock::new(GraphState {
                nodes,
                edges,
                saved_workflows,
                ..GraphState::default()
            }),
            storage,
        }
    }

    fn persist_canvas(&self, nodes: &[WorkflowNode], edges: &[WorkflowEdge]) {
        if let Err(e) = self.storage.canvas.save_nodes(nodes) {
            error!(error = %e, "Failed to persist canvas nodes");
        }
        if let Err(e) = self.storage.canvas.save_edges(edges) {
            error!(error = %e, "Failed to persist canvas edges");
        }
    }

    pub fn nodes(&self) -> Vec<WorkflowNode> {
        self.state.read().nodes.clone()
    }

    pub fn edges(&self) -> Vec<WorkflowEdge> {
        self.state.read().edges.clone()
    }

    /// Both collections under one lock
    pub fn canvas(&self) -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
        let state = self.state.read();
        (state.nodes.clone(), state.edges.clone())
    }

    pub fn set_nodes(&self, nodes: Vec<WorkflowNode>) {
        let mut state = self.state.write();
        state.nodes = nodes;
        self.persist_canvas(&state.nodes, &state.edges);
    }

    pub fn set_edges(&self, edges: Vec<WorkflowEdge>) {
        let mut state = self.state.write();
        state.edges = edges;
        self.persist_canvas(&state.nodes, &state.edges);
    }

    /// Append a node. Ids are caller-supplied and not checked for
    /// collisions; lookups return the first match.
    pub fn add_node(&self, node: WorkflowNode) {
        let mut state = self.state.write();
        state.nodes.push(node);
        self.persist_canvas(&state.nodes, &state.edges);
    }

    /// Remove a node and every edge referencing it as source or target.
    /// Returns whether a node was removed.
    pub fn remove_node(&self, node_id: &str) -> bool {
        let mut state = self.state.write();
        let before = state.nodes.len();
        state.nodes.retain(|node| node.id != node_id);
        let removed = state.nodes.len() != before;
        if removed {
            state.edges.retain(|edge| !edge.touches(node_id));
            self.persist_canvas(&state.nodes, &state.edges);
        }
        removed
    }

    /// Shallow-merge a JSON patch into the matching node's data. Unknown
    /// ids are a silent no-op (`Ok(None)`); a patch that breaks the typed
    /// payload is an error and leaves the node unchanged.
    pub fn update_node_data(
        &self,
        node_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Option<WorkflowNode>> {
        let mut state = self.state.write();
        let Some(node) = state.nodes.iter_mut().find(|node| node.id == node_id) else {
            return Ok(None);
        };
        node.config.merge_data(patch)?;
        let updated = node.clone();
        self.persist_canvas(&state.nodes, &state.edges);
        Ok(Some(updated))
    }

    /// Write one node's status. No-op when the id is unknown, which covers
    /// late timer callbacks for removed nodes.
    pub fn update_node_status(&self, node_id: &str, status: NodeStatus) -> bool {
        let mut state = self.state.write();
        let Some(node) = state.nodes.iter_mut().find(|node| node.id == node_id) else {
            return false;
        };
        node.config.set_status(status);
        self.persist_canvas(&state.nodes, &state.edges);
        true
    }

    pub fn select_node(&self, node_id: Option<String>) {
        self.state.write().selected_node_id = node_id;
    }

    pub fn selected_node_id(&self) -> Option<String> {
        self.state.read().selected_node_id.clone()
    }

    pub fn is_executing(&self) -> bool {
        self.state.read().executing
    }

    /// Set the executing flag if no run is active. Returns false when a run
    /// already holds it.
    pub fn try_begin_execution(&self) -> bool {
        let mut state = self.state.write();
        if state.executing {
            return false;
        }
        state.executing = true;
        true
    }

    /// Drop the executing flag without touching anything else (stop).
    pub fn clear_executing(&self) {
        self.state.write().executing = false;
    }

    /// Clear the executing flag at the end of a run. Returns true only if
    /// the flag was still set, i.e. the run was not stopped meanwhile.
    pub fn finish_execution(&self) -> bool {
        let mut state = self.state.write();
        let was_executing = state.executing;
        state.executing = false;
        was_executing
    }

    pub fn report(&self) -> Option<ExecutionReport> {
        self.state.read().report.clone()
    }

    pub fn set_report(&self, report: Option<ExecutionReport>) {
        self.state.write().report = report;
    }

    /// Snapshot the live canvas under a new id and append it to the saved
    /// list.
    pub fn save_workflow(&self, name: &str) -> SavedWorkflow {
        let mut state = self.state.write();
        let snapshot =
            SavedWorkflow::snapshot(name.to_string(), state.nodes.clone(), state.edges.clone());
        if let Err(e) = self.storage.workflows.save_workflow(&snapshot) {
            error!(error = %e, workflow_id = %snapshot.id, "Failed to persist saved workflow");
        }
        state.saved_workflows.push(snapshot.clone());
        info!(workflow_id = %snapshot.id, name = %snapshot.name, "Workflow saved");
        snapshot
    }

    pub fn saved_workflows(&self) -> Vec<SavedWorkflow> {
        self.state.read().saved_workflows.clone()
    }

    /// Replace the live canvas with a saved snapshot.
    pub fn load_workflow(&self, id: &str) -> Result<SavedWorkflow> {
        let mut state = self.state.write();
        let snapshot = state
            .saved_workflows
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Workflow {} not found", id))?;
        state.nodes = snapshot.nodes.clone();
        state.edges = snapshot.edges.clone();
        self.persist_canvas(&state.nodes, &state.edges);
        info!(workflow_id = %id, "Workflow loaded onto canvas");
        Ok(snapshot)
    }

    pub fn delete_workflow(&self, id: &str) -> Result<()> {
        let mut state = self.state.write();
        let before = state.saved_workflows.len();
        state.saved_workflows.retain(|w| w.id != id);
        if state.saved_workflows.len() == before {
            return Err(anyhow!("Workflow {} not found", id));
        }
        if let Err(e) = self.storage.workflows.delete_workflow(id) {
            error!(error = %e, workflow_id = %id, "Failed to delete persisted workflow");
        }
        Ok(())
    }

    /// Clear the canvas back to the empty state, dropping selection and the
    /// last report. Saved workflows are untouched.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.nodes.clear();
        state.edges.clear();
        state.selected_node_id = None;
        state.report = None;
        self.persist_canvas(&state.nodes, &state.edges);
        info!("Canvas reset");
    }
}
