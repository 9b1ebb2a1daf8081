//! EvalSphere Core - Canvas state, execution simulation, and backend clients
//!
//! This crate carries the domain logic behind the evaluation canvas: the
//! graph store with its persisted nodes and edges, the timer-driven
//! execution pass and its deterministic report synthesizer, and the HTTP
//! clients for the external evaluation services. The byte-level persistence
//! lives in the evalsphere-storage crate; the HTTP surface lives in
//! evalsphere-server.

pub mod engine;
pub mod models;
pub mod paths;
pub mod services;
pub mod storage;
pub mod store;

pub use models::*;

use engine::{SimulatorTiming, WorkflowSimulator};
use services::BackendClient;
use std::sync::Arc;
use storage::Storage;
use store::GraphStore;
use tracing::info;

/// Core application state shared between the HTTP server and tests
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub graph: Arc<GraphStore>,
    pub simulator: WorkflowSimulator,
    pub backend: BackendClient,
}

impl AppCore {
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        Self::with_timing(db_path, SimulatorTiming::default())
    }

    /// Same as [`new`](Self::new) but with explicit pass timings, so tests
    /// can run the execution pass in milliseconds.
    pub fn with_timing(db_path: &str, timing: SimulatorTiming) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new(db_path)?);
        let graph = Arc::new(GraphStore::new(storage.clone()));
        let simulator = WorkflowSimulator::with_timing(graph.clone(), timing);
        let backend = BackendClient::from_env();

        info!(
            nodes = graph.nodes().len(),
            workflows = graph.saved_workflows().len(),
            "Initializing EvalSphere"
        );

        Ok(Self {
            storage,
            graph,
            simulator,
            backend,
        })
    }
}
