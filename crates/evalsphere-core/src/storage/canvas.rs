//! Typed canvas storage wrapper.

use crate::models::{WorkflowEdge, WorkflowNode};
use anyhow::Result;
use redb::Database;
use std::sync::Arc;

/// Typed canvas persistence around evalsphere-storage::CanvasStorage.
///
/// Nodes and edges are stored as two independent blobs, the same granularity
/// the browser build used for its two localStorage keys.
pub struct CanvasStorage {
    inner: evalsphere_storage::CanvasStorage,
}

impl CanvasStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            inner: evalsphere_storage::CanvasStorage::new(db)?,
        })
    }

    /// Persist the full node collection
    pub fn save_nodes(&self, nodes: &[WorkflowNode]) -> Result<()> {
        let json_bytes = serde_json::to_vec(nodes)?;
        self.inner.put_raw(evalsphere_storage::canvas::NODES_KEY, &json_bytes)
    }

    /// Persist the full edge collection
    pub fn save_edges(&self, edges: &[WorkflowEdge]) -> Result<()> {
        let json_bytes = serde_json::to_vec(edges)?;
        self.inner.put_raw(evalsphere_storage::canvas::EDGES_KEY, &json_bytes)
    }

    /// Load the node collection; `None` when never written
    pub fn load_nodes(&self) -> Result<Option<Vec<WorkflowNode>>> {
        match self.inner.get_raw(evalsphere_storage::canvas::NODES_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the edge collection; `None` when never written
    pub fn load_edges(&self) -> Result<Option<Vec<WorkflowEdge>>> {
        match self.inner.get_raw(evalsphere_storage::canvas::EDGES_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove both blobs
    pub fn clear(&self) -> Result<()> {
        self.inner.delete(evalsphere_storage::canvas::NODES_KEY)?;
        self.inner.delete(evalsphere_storage::canvas::EDGES_KEY)?;
        Ok(())
    }
}
