//! EvalSphere Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence layer for EvalSphere, using redb as the
//! embedded database. It exposes byte-level APIs to avoid circular dependencies
//! with the core crate's models.
//!
//! # Architecture
//!
//! The storage layer mirrors the browser-storage model of the canvas UI: each
//! table corresponds to one localStorage/sessionStorage concern, and values
//! are opaque JSON blobs. Higher-level type wrappers are provided by the
//! evalsphere-core crate.
//!
//! # Tables
//!
//! - `canvas` - Live canvas collections (nodes, edges) as whole-collection blobs
//! - `saved-workflows` - Named workflow snapshots
//! - `session` - Auth tokens, user record, and wizard session keys

pub mod canvas;
pub mod session;
pub mod workflows;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use canvas::{CanvasStorage, EDGES_KEY, NODES_KEY};
pub use session::SessionStorage;
pub use workflows::SavedWorkflowStorage;

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub canvas: CanvasStorage,
    pub workflows: SavedWorkflowStorage,
    pub session: SessionStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);

        let canvas = CanvasStorage::new(db.clone())?;
        let workflows = SavedWorkflowStorage::new(db.clone())?;
        let session = SessionStorage::new(db.clone())?;

        Ok(Self {
            db,
            canvas,
            workflows,
            session,
        })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
