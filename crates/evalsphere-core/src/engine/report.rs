//! Synthetic execution-report generation.
//!
//! Reports are a pure function of the canvas configuration: the selected
//! agent ids, the test-case list, the dimension list, and the completion
//! timestamp. All randomness comes from a [`Mulberry32`] generator seeded per
//! agent from those inputs, so re-running the same canvas yields an
//! identical report.

use crate::engine::rng::Mulberry32;
use crate::models::{
    AgentProfile, AgentResult, DimensionTally, ExecutionReport, NodeConfig, ReportTotals,
    TestCaseResult, TestStatus, WorkflowNode,
};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Dimensions assumed when the test-suite node configures none.
pub const DEFAULT_DIMENSIONS: [&str; 5] =
    ["Accuracy", "Robustness", "Bias", "Resilience", "Latency"];

/// Reasons assigned to skipped tests, drawn uniformly.
pub const SKIP_REASONS: [&str; 5] = [
    "Rate limited",
    "Timeout",
    "Unsupported input",
    "Dependency unavailable",
    "Validation failed",
];

fn dimension_base_pass_rate(dim_key: &str) -> f64 {
    match dim_key {
        "accuracy" => 0.90,
        "robustness" => 0.84,
        "bias" => 0.88,
        "resilience" => 0.78,
        "latency" => 0.86,
        _ => 0.85,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Report configuration pulled off the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportInputs {
    pub selected_agents: Vec<String>,
    pub test_cases: Vec<String>,
    pub dimensions: Vec<String>,
}

impl ReportInputs {
    /// Extract inputs from the node collection: the first agent-selector
    /// node supplies the agents, the first test-suite node the cases and
    /// dimensions (empty dimension entries are dropped).
    pub fn from_nodes(nodes: &[WorkflowNode]) -> Self {
        let mut inputs = Self::default();
        let mut saw_agents = false;
        let mut saw_suite = false;

        for node in nodes {
            match &node.config {
                NodeConfig::AgentSelector(data) if !saw_agents => {
                    saw_agents = true;
                    inputs.selected_agents = data.selected_agents.clone();
                }
                NodeConfig::TestSuite(data) if !saw_suite => {
                    saw_suite = true;
                    inputs.test_cases = data.test_cases.clone();
                    inputs.dimensions = data
                        .dimensions
                        .iter()
                        .filter(|d| !d.is_empty())
                        .cloned()
                        .collect();
                }
                _ => {}
            }
        }

        inputs
    }
}

/// Format a completion instant the way the report header shows it,
/// e.g. `8/24/2026, 10:15:30 AM`.
pub fn locale_timestamp(at: DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Synthesize the report for one completed pass.
pub fn synthesize_report(
    inputs: &ReportInputs,
    catalog: &[AgentProfile],
    finished_at: DateTime<Local>,
) -> ExecutionReport {
    let effective_dimensions: Vec<String> = if inputs.dimensions.is_empty() {
        DEFAULT_DIMENSIONS.iter().map(|d| d.to_string()).collect()
    } else {
        inputs.dimensions.clone()
    };

    let agent_results: Vec<AgentResult> = inputs
        .selected_agents
        .iter()
        .map(|agent_id| {
            synthesize_agent(
                agent_id,
                &inputs.test_cases,
                &effective_dimensions,
                catalog,
            )
        })
        .collect();

    let mut totals = ReportTotals::default();
    for result in &agent_results {
        totals.total_tests += result.total_tests;
        totals.executed += result.executed;
        totals.passed += result.passed;
        totals.failed += result.failed;
        totals.skipped += result.skipped;
    }

    let overall_pass_rate = if totals.executed > 0 {
        round_one_decimal(totals.passed as f64 / totals.executed as f64 * 100.0)
    } else {
        0.0
    };
    let overall_coverage = if totals.total_tests > 0 {
        round_one_decimal(totals.executed as f64 / totals.total_tests as f64 * 100.0)
    } else {
        0.0
    };

    let mut dimension_breakdown: BTreeMap<String, DimensionTally> = effective_dimensions
        .iter()
        .map(|d| (d.clone(), DimensionTally::default()))
        .collect();
    for result in &agent_results {
        for test in &result.test_results {
            let tally = dimension_breakdown.entry(test.dimension.clone()).or_default();
            match test.status {
                TestStatus::Passed => tally.passed += 1,
                TestStatus::Failed => tally.failed += 1,
                TestStatus::Skipped => tally.skipped += 1,
            }
        }
    }

    ExecutionReport {
        total_agents: inputs.selected_agents.len(),
        total_test_cases: inputs.test_cases.len(),
        dimensions: effective_dimensions,
        execution_time: locale_timestamp(finished_at),
        agent_results,
        totals,
        overall_pass_rate,
        overall_coverage,
        dimension_breakdown,
    }
}

fn synthesize_agent(
    agent_id: &str,
    test_cases: &[String],
    dimensions: &[String],
    catalog: &[AgentProfile],
) -> AgentResult {
    let agent = catalog.iter().find(|a| a.id == agent_id);
    let total_tests = test_cases.len();

    let key = format!("{}|{}|{}", agent_id, total_tests, dimensions.join(","));
    let mut rng = Mulberry32::from_key(&key);

    let agent_quality = 0.82 + rng.next_f64() * 0.12;
    let exec_rate = 0.88 + rng.next_f64() * 0.1;

    let test_results: Vec<TestCaseResult> = test_cases
        .iter()
        .enumerate()
        .map(|(index, test_case)| {
            let dim = match dimensions.get(index % dimensions.len()) {
                Some(d) if !d.is_empty() => d.as_str(),
                _ => "Accuracy",
            };
            let dim_key = dim.to_lowercase();

            let will_execute = rng.next_f64() < exec_rate;
            if !will_execute {
                let reason_index = (rng.next_f64() * SKIP_REASONS.len() as f64) as usize;
                return TestCaseResult {
                    test_case: test_case.clone(),
                    status: TestStatus::Skipped,
                    dimension: dim.to_string(),
                    execution_time: 0,
                    skip_reason: Some(SKIP_REASONS[reason_index].to_string()),
                };
            }

            let base = dimension_base_pass_rate(&dim_key);
            let pass_prob = (base * agent_quality).max(0.4).min(0.98);
            let passed = rng.next_f64() < pass_prob;

            let latency_jitter = (120.0 + rng.next_f64() * 420.0).floor() as u32;
            let dim_latency_boost = if dim_key == "latency" {
                (80.0 + rng.next_f64() * 220.0).floor() as u32
            } else {
                0
            };

            TestCaseResult {
                test_case: test_case.clone(),
                status: if passed {
                    TestStatus::Passed
                } else {
                    TestStatus::Failed
                },
                dimension: dim.to_string(),
                execution_time: latency_jitter + dim_latency_boost,
                skip_reason: None,
            }
        })
        .collect();

    let executed: Vec<&TestCaseResult> = test_results
        .iter()
        .filter(|t| t.status != TestStatus::Skipped)
        .collect();
    let passed = executed
        .iter()
        .filter(|t| t.status == TestStatus::Passed)
        .count();
    let failed = executed
        .iter()
        .filter(|t| t.status == TestStatus::Failed)
        .count();
    let skipped = test_results.len() - executed.len();

    let mut times: Vec<u32> = executed.iter().map(|t| t.execution_time).collect();
    times.sort_unstable();
    let avg_time = if times.is_empty() {
        0
    } else {
        (times.iter().map(|&t| t as f64).sum::<f64>() / times.len() as f64).round() as u32
    };
    let p95_time = if times.is_empty() {
        0
    } else {
        let index = ((times.len() as f64 * 0.95).floor() as usize).min(times.len() - 1);
        times[index]
    };

    let pass_rate = if executed.is_empty() {
        0.0
    } else {
        round_one_decimal(passed as f64 / executed.len() as f64 * 100.0)
    };

    AgentResult {
        agent_id: agent_id.to_string(),
        agent_name: agent
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown Agent".to_string()),
        agent_version: agent
            .map(|a| a.version.clone())
            .unwrap_or_else(|| "1.0".to_string()),
        model_type: agent
            .map(|a| a.model_type.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        total_tests,
        executed: executed.len(),
        skipped,
        passed,
        failed,
        pass_rate,
        avg_time,
        p95_time,
        test_results,
    }
}
