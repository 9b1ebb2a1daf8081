//! Timer-driven execution simulation.
//!
//! Runs are cosmetic: each node is walked in collection order on a fixed
//! stagger and unconditionally reaches `success`. No evaluation backend is
//! contacted and no node ever ends in `error`. When the last node settles
//! and the run was not stopped, the report synthesizer derives the result
//! from the canvas configuration.

use crate::engine::report::{ReportInputs, synthesize_report};
use crate::models::{NodeStatus, builtin_catalog};
use crate::store::GraphStore;
use anyhow::{Result, bail};
use chrono::Local;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, info};

/// Delays driving the status animation. Tests shrink these.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorTiming {
    /// Gap between consecutive node starts.
    pub node_stagger: Duration,
    /// Time a node spends in `running`.
    pub node_run: Duration,
    /// Pause after the last node succeeds before the run finishes.
    pub completion_settle: Duration,
}

impl Default for SimulatorTiming {
    fn default() -> Self {
        Self {
            node_stagger: Duration::from_millis(3500),
            node_run: Duration::from_millis(3000),
            completion_settle: Duration::from_millis(500),
        }
    }
}

pub struct WorkflowSimulator {
    store: Arc<GraphStore>,
    timing: SimulatorTiming,
}

impl WorkflowSimulator {
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self::with_timing(store, SimulatorTiming::default())
    }

    pub fn with_timing(store: Arc<GraphStore>, timing: SimulatorTiming) -> Self {
        Self { store, timing }
    }

    pub fn is_executing(&self) -> bool {
        self.store.is_executing()
    }

    /// Start a run over the current node collection. Fails when a run is
    /// already active.
    pub fn execute(&self) -> Result<()> {
        if !self.store.try_begin_execution() {
            bail!("Workflow is already executing");
        }

        let nodes = self.store.nodes();
        if nodes.is_empty() {
            self.store.clear_executing();
            info!("Execution requested on an empty canvas, nothing to run");
            return Ok(());
        }

        info!(nodes = nodes.len(), "Workflow execution started");

        let last_index = nodes.len() - 1;
        for (index, node) in nodes.into_iter().enumerate() {
            let store = self.store.clone();
            let timing = self.timing;

            // Timers are fire-and-forget on purpose: stop() does not cancel
            // them, it only drops the executing flag. Late callbacks still
            // mutate status; the completion check is what keeps a stopped
            // run from committing a report.
            tokio::spawn(async move {
                tokio::time::sleep(timing.node_stagger * index as u32).await;
                store.update_node_status(&node.id, NodeStatus::Running);
                debug!(node_id = %node.id, "Node running");

                tokio::time::sleep(timing.node_run).await;
                store.update_node_status(&node.id, NodeStatus::Success);
                debug!(node_id = %node.id, "Node succeeded");

                if index == last_index {
                    tokio::time::sleep(timing.completion_settle).await;
                    complete_run(&store);
                }
            });
        }

        Ok(())
    }

    /// Drop the executing flag. Scheduled transitions keep firing.
    pub fn stop(&self) {
        self.store.clear_executing();
        info!("Workflow execution stopped");
    }
}

/// End-of-run handling: only a run that still holds the executing flag and
/// whose nodes all reached `success` commits a report.
fn complete_run(store: &GraphStore) {
    if !store.finish_execution() {
        debug!("Run was stopped before completion, skipping report");
        return;
    }

    let nodes = store.nodes();
    if nodes.is_empty() || !nodes.iter().all(|n| n.status() == NodeStatus::Success) {
        debug!("Run finished without full success, no report synthesized");
        return;
    }

    let inputs = ReportInputs::from_nodes(&nodes);
    let report = synthesize_report(&inputs, &builtin_catalog(), Local::now());
    info!(
        agents = report.total_agents,
        test_cases = report.total_test_cases,
        overall_pass_rate = report.overall_pass_rate,
        "Execution report synthesized"
    );
    store.set_report(Some(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeKind, Position, WorkflowNode};
    use crate::storage::Storage;
    use serde_json::json;
    use tempfile::tempdir;

    fn fast_timing() -> SimulatorTiming {
        SimulatorTiming {
            node_stagger: Duration::from_millis(20),
            node_run: Duration::from_millis(15),
            completion_settle: Duration::from_millis(5),
        }
    }

    fn test_simulator() -> (WorkflowSimulator, Arc<GraphStore>, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Arc::new(Storage::new(db_path.to_str().unwrap()).unwrap());
        let store = Arc::new(GraphStore::new(storage));
        let simulator = WorkflowSimulator::with_timing(store.clone(), fast_timing());
        (simulator, store, temp_dir)
    }

    fn configured_canvas() -> Vec<WorkflowNode> {
        let mut agent_node =
            WorkflowNode::new(NodeKind::AgentSelector, Position { x: 0.0, y: 0.0 });
        agent_node.id = "agent-select-1".to_string();
        agent_node
            .config
            .merge_data(json!({ "selectedAgents": ["1", "2"] }).as_object().unwrap())
            .unwrap();

        let mut suite_node = WorkflowNode::new(NodeKind::TestSuite, Position { x: 200.0, y: 0.0 });
        suite_node.id = "test-suite-1".to_string();
        suite_node
            .config
            .merge_data(
                json!({ "testCases": ["case A", "case B", "case C"] })
                    .as_object()
                    .unwrap(),
            )
            .unwrap();

        vec![agent_node, suite_node]
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 2s");
    }

    #[tokio::test]
    async fn test_run_reaches_success_and_commits_report() {
        let (simulator, store, _guard) = test_simulator();
        store.set_nodes(configured_canvas());

        simulator.execute().unwrap();
        assert!(simulator.is_executing());

        wait_until(|| store.report().is_some()).await;

        assert!(!simulator.is_executing());
        assert!(
            store
                .nodes()
                .iter()
                .all(|n| n.status() == NodeStatus::Success)
        );

        let report = store.report().unwrap();
        assert_eq!(report.total_agents, 2);
        assert_eq!(report.total_test_cases, 3);
    }

    #[tokio::test]
    async fn test_empty_canvas_clears_flag_immediately() {
        let (simulator, store, _guard) = test_simulator();

        simulator.execute().unwrap();

        assert!(!simulator.is_executing());
        assert!(store.report().is_none());
        assert!(store.nodes().is_empty());
    }

    #[tokio::test]
    async fn test_execute_while_running_is_rejected() {
        let (simulator, store, _guard) = test_simulator();
        store.set_nodes(configured_canvas());

        simulator.execute().unwrap();
        let second = simulator.execute();
        assert!(second.is_err());
        assert!(
            second
                .unwrap_err()
                .to_string()
                .contains("already executing")
        );

        wait_until(|| !simulator.is_executing()).await;
    }

    #[tokio::test]
    async fn test_stopped_run_never_commits_a_report() {
        let (simulator, store, _guard) = test_simulator();
        store.set_nodes(configured_canvas());

        simulator.execute().unwrap();
        simulator.stop();
        assert!(!simulator.is_executing());

        // wait past the full schedule; orphaned timers still flip statuses
        wait_until(|| {
            store
                .nodes()
                .iter()
                .all(|n| n.status() == NodeStatus::Success)
        })
        .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.report().is_none());
    }

    #[tokio::test]
    async fn test_new_run_clears_nothing_but_commits_fresh_report() {
        let (simulator, store, _guard) = test_simulator();
        store.set_nodes(configured_canvas());

        simulator.execute().unwrap();
        wait_until(|| store.report().is_some()).await;
        let first = store.report().unwrap();

        simulator.execute().unwrap();
        // the previous report stays visible until the new run completes
        assert_eq!(store.report(), Some(first.clone()));

        wait_until(|| !simulator.is_executing()).await;
        let second = store.report().unwrap();
        // identical configuration reproduces the identical report body
        assert_eq!(first.agent_results, second.agent_results);
        assert_eq!(first.totals, second.totals);
    }

    #[tokio::test]
    async fn test_node_removed_mid_run_is_skipped_by_late_timers() {
        let (simulator, store, _guard) = test_simulator();

        let mut nodes = configured_canvas();
        let doomed = WorkflowNode::new(NodeKind::Notification, Position { x: 400.0, y: 0.0 });
        let doomed_id = doomed.id.clone();
        nodes.push(doomed);
        store.set_nodes(nodes);

        simulator.execute().unwrap();
        store.remove_node(&doomed_id);

        wait_until(|| !simulator.is_executing()).await;

        // the run completes; the surviving nodes all succeeded
        assert!(
            store
                .nodes()
                .iter()
                .all(|n| n.status() == NodeStatus::Success)
        );
        assert!(store.nodes().iter().all(|n| n.id != doomed_id));
    }
}
