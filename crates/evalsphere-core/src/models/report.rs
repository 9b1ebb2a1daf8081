use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Synthesized summary of one completed execution pass.
///
/// Derived, never persisted; replaced on the next run and cleared on reset.
/// The JSON shape matches the exported `workflow-report-{timestamp}.json`
/// artifact consumed by the review UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub total_agents: usize,
    pub total_test_cases: usize,
    pub dimensions: Vec<String>,
    /// Human-readable local timestamp of when the pass finished.
    pub execution_time: String,
    pub agent_results: Vec<AgentResult>,
    pub totals: ReportTotals,
    /// Percentage with one decimal; 0 when nothing executed.
    pub overall_pass_rate: f64,
    /// Percentage of planned tests that actually executed.
    pub overall_coverage: f64,
    pub dimension_breakdown: BTreeMap<String, DimensionTally>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_tests: usize,
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_version: String,
    pub model_type: String,
    pub total_tests: usize,
    pub executed: usize,
    pub skipped: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage with one decimal; 0 when nothing executed.
    pub pass_rate: f64,
    /// Mean execution time over executed tests, rounded to ms.
    pub avg_time: u32,
    /// 95th-percentile execution time over executed tests.
    pub p95_time: u32,
    pub test_results: Vec<TestCaseResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub test_case: String,
    pub status: TestStatus,
    pub dimension: String,
    /// Milliseconds; always 0 for skipped tests.
    pub execution_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionTally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}
