//! Saved-workflow storage - byte-level API for workflow snapshots.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

pub const SAVED_WORKFLOWS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("saved-workflows");

/// Low-level saved-workflow storage with byte-level API
pub struct SavedWorkflowStorage {
    db: Arc<Database>,
}

impl SavedWorkflowStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SAVED_WORKFLOWS_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store raw snapshot data
    pub fn put_raw(&self, id: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SAVED_WORKFLOWS_TABLE)?;
            table.insert(id, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get raw snapshot data by ID
    pub fn get_raw(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SAVED_WORKFLOWS_TABLE)?;

        if let Some(value) = table.get(id)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// List all raw snapshots
    pub fn list_raw(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SAVED_WORKFLOWS_TABLE)?;

        let mut snapshots = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            snapshots.push((key.value().to_string(), value.value().to_vec()));
        }

        Ok(snapshots)
    }

    /// Check if a snapshot exists
    pub fn exists(&self, id: &str) -> Result<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SAVED_WORKFLOWS_TABLE)?;
        Ok(table.get(id)?.is_some())
    }

    /// Delete a snapshot by ID
    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(SAVED_WORKFLOWS_TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}
