//! Canvas storage - byte-level API for the live canvas collections.
//!
//! The canvas UI historically kept its state in browser localStorage under two
//! keys, each holding the whole collection as one JSON array. This table keeps
//! the same granularity: one blob per key, rewritten on every mutation. Nodes
//! and edges are written as separate entries with no joint transaction.

use anyhow::Result;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::sync::Arc;

pub const CANVAS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("canvas");

/// Key for the node collection blob.
pub const NODES_KEY: &str = "workflow-nodes";
/// Key for the edge collection blob.
pub const EDGES_KEY: &str = "workflow-edges";

/// Low-level canvas storage with byte-level API
pub struct CanvasStorage {
    db: Arc<Database>,
}

impl CanvasStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(CANVAS_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store a raw collection blob under the given key
    pub fn put_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CANVAS_TABLE)?;
            table.insert(key, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a raw collection blob by key
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CANVAS_TABLE)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// Delete a collection blob by key
    pub fn delete(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(CANVAS_TABLE)?;
            table.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_and_get_raw() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = CanvasStorage::new(db).unwrap();

        let data = br#"[{"id":"test-suite-1"}]"#;
        storage.put_raw(NODES_KEY, data).unwrap();

        let retrieved = storage.get_raw(NODES_KEY).unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap(), data);
    }

    #[test]
    fn test_missing_key_returns_none() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = CanvasStorage::new(db).unwrap();

        assert!(storage.get_raw(EDGES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_previous_blob() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = CanvasStorage::new(db).unwrap();

        storage.put_raw(EDGES_KEY, b"[]").unwrap();
        storage.put_raw(EDGES_KEY, br#"[{"id":"e1"}]"#).unwrap();

        let retrieved = storage.get_raw(EDGES_KEY).unwrap().unwrap();
        assert_eq!(retrieved, br#"[{"id":"e1"}]"#);
    }

    #[test]
    fn test_delete() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = CanvasStorage::new(db).unwrap();

        storage.put_raw(NODES_KEY, b"[]").unwrap();
        assert!(storage.delete(NODES_KEY).unwrap());
        assert!(!storage.delete(NODES_KEY).unwrap());
        assert!(storage.get_raw(NODES_KEY).unwrap().is_none());
    }
}
