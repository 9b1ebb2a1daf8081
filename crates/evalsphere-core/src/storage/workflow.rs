//! Typed saved-workflow storage wrapper.

use crate::models::SavedWorkflow;
use anyhow::Result;
use redb::Database;
use std::sync::Arc;

/// Typed snapshot storage around evalsphere-storage::SavedWorkflowStorage.
pub struct SavedWorkflowStorage {
    inner: evalsphere_storage::SavedWorkflowStorage,
}

impl SavedWorkflowStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            inner: evalsphere_storage::SavedWorkflowStorage::new(db)?,
        })
    }

    /// Store a snapshot under its id
    pub fn save_workflow(&self, workflow: &SavedWorkflow) -> Result<()> {
        let json_bytes = serde_json::to_vec(workflow)?;
        self.inner.put_raw(&workflow.id, &json_bytes)
    }

    /// Get a snapshot by id
    pub fn get_workflow(&self, id: &str) -> Result<SavedWorkflow> {
        let bytes = self
            .inner
            .get_raw(id)?
            .ok_or_else(|| anyhow::anyhow!("Workflow {} not found", id))?;
        let workflow: SavedWorkflow = serde_json::from_slice(&bytes)?;
        Ok(workflow)
    }

    /// List all snapshots. Ids embed a millisecond timestamp of equal width,
    /// so key order is save order.
    pub fn list_workflows(&self) -> Result<Vec<SavedWorkflow>> {
        let raw_workflows = self.inner.list_raw()?;
        let mut workflows = Vec::new();
        for (_, bytes) in raw_workflows {
            let workflow: SavedWorkflow = serde_json::from_slice(&bytes)?;
            workflows.push(workflow);
        }
        Ok(workflows)
    }

    /// Delete a snapshot by id
    pub fn delete_workflow(&self, id: &str) -> Result<()> {
        if !self.inner.delete(id)? {
            return Err(anyhow::anyhow!("Workflow {} not found", id));
        }
        Ok(())
    }
}
