//! Session storage - byte-level API for auth and wizard session state.
//!
//! Mirrors the keys the canvas UI kept in browser storage: localStorage-scoped
//! auth keys (`isAuthenticated`, `user`, `token`, `refreshToken`, `language`)
//! and sessionStorage-scoped wizard keys (`selectedSuites`, `workflow_step2`).
//! The wizard keys are volatile and cleared together on logout.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

pub const SESSION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

/// Keys with sessionStorage semantics, cleared by `clear_volatile`.
pub const VOLATILE_KEYS: [&str; 2] = ["selectedSuites", "workflow_step2"];

/// Keys cleared on logout, in addition to the volatile set.
pub const AUTH_KEYS: [&str; 4] = ["isAuthenticated", "user", "token", "refreshToken"];

/// Low-level session storage with byte-level API
pub struct SessionStorage {
    db: Arc<Database>,
}

impl SessionStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SESSION_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store a raw value under the given key
    pub fn put_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            table.insert(key, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a raw value by key
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// List all stored keys
    pub fn list_keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        let mut keys = Vec::new();
        for item in table.iter()? {
            let (key, _) = item?;
            keys.push(key.value().to_string());
        }

        Ok(keys)
    }

    /// Delete a value by key
    pub fn delete(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            table.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Clear the sessionStorage-scoped keys in one transaction
    pub fn clear_volatile(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            for key in VOLATILE_KEYS {
                table.remove(key)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Clear auth keys and volatile keys, as the UI does on logout
    pub fn clear_auth(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            for key in AUTH_KEYS.iter().chain(VOLATILE_KEYS.iter()) {
                table.remove(key)?;
            }
        }
        write_txn.commit()?;
        Ok(())
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
        let storage = SessionStorage::new(db).unwrap();

        storage.put_raw("token", b"abc123").unwrap();

        let retrieved = storage.get_raw("token").unwrap();
        assert_eq!(retrieved.unwrap(), b"abc123");
    }

    #[test]
    fn test_clear_volatile_leaves_auth_keys() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = SessionStorage::new(db).unwrap();

        storage.put_raw("token", b"abc123").unwrap();
        storage.put_raw("selectedSuites", b"[1,2]").unwrap();
        storage.put_raw("workflow_step2", b"{}").unwrap();

        storage.clear_volatile().unwrap();

        assert!(storage.get_raw("token").unwrap().is_some());
        assert!(storage.get_raw("selectedSuites").unwrap().is_none());
        assert!(storage.get_raw("workflow_step2").unwrap().is_none());
    }

    #[test]
    fn test_clear_auth_removes_everything_session_scoped() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = SessionStorage::new(db).unwrap();

        storage.put_raw("isAuthenticated", b"true").unwrap();
        storage.put_raw("user", br#"{"username":"admin"}"#).unwrap();
        storage.put_raw("token", b"abc").unwrap();
        storage.put_raw("refreshToken", b"def").unwrap();
        storage.put_raw("language", b"en").unwrap();
        storage.put_raw("selectedSuites", b"[]").unwrap();

        storage.clear_auth().unwrap();

        assert!(storage.get_raw("isAuthenticated").unwrap().is_none());
        assert!(storage.get_raw("user").unwrap().is_none());
        assert!(storage.get_raw("token").unwrap().is_none());
        assert!(storage.get_raw("refreshToken").unwrap().is_none());
        assert!(storage.get_raw("selectedSuites").unwrap().is_none());
        // language is a preference, not an auth key
        assert!(storage.get_raw("language").unwrap().is_some());
    }

    #[test]
    fn test_list_keys() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = SessionStorage::new(db).unwrap();

        storage.put_raw("token", b"a").unwrap();
        storage.put_raw("language", b"en").unwrap();

        let keys = storage.list_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"token".to_string()));
    }
}
