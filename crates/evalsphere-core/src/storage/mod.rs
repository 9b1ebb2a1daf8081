pub mod canvas;
pub mod session;
pub mod workflow;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use canvas::CanvasStorage;
pub use session::SessionStorage;
pub use workflow::SavedWorkflowStorage;

pub struct Storage {
    db: Arc<Database>,
    pub canvas: CanvasStorage,
    pub workflows: SavedWorkflowStorage,
    pub session: SessionStorage,
}

impl Storage {
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

    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
