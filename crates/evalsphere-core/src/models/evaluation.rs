use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Step 1 of the evaluation wizard: the agent and scenario under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub scenario_name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub agent_name: String,
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// A suite chosen in step 2. The designer saves these loosely, so most
/// fields are optional and unknown keys are retained.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | number | null")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_test_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,
    /// Legacy single-string form, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl SuiteSelection {
    /// Display label: name when non-empty, otherwise the raw id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match &self.id {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Dimensions covered by this suite, normalizing the legacy
    /// comma-separated form.
    pub fn dimension_names(&self) -> Vec<String> {
        if !self.dimensions.is_empty() {
            return self.dimensions.clone();
        }
        match &self.dimension {
            Some(joined) => joined
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Planned test count: the explicit count, else the selected cases.
    pub fn planned_total(&self) -> usize {
        match self.test_count {
            Some(count) => count as usize,
            None => self.selected_test_cases.len(),
        }
    }
}

/// A benchmark row from step 3: one dimension and its target score.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTarget {
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub target: f64,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardMeta {
    /// ISO-8601 timestamp of the submission.
    pub requested_at: String,
}

/// The full wizard snapshot submitted to `POST /evaluation/`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WizardPayload {
    pub step1: Option<ScenarioConfig>,
    #[serde(default)]
    pub step2: Vec<SuiteSelection>,
    #[serde(default)]
    pub step3: Vec<BenchmarkTarget>,
    pub meta: WizardMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionScore {
    pub name: String,
    pub score: f64,
    pub failed: u32,
}

/// A completed evaluation record as shown in the results dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub id: String,
    pub agent_name: String,
    pub version: String,
    pub model_type: String,
    pub endpoint: String,
    pub scenario_name: String,
    pub description: String,
    pub overall_score: f64,
    pub is_deployment_ready: bool,
    pub dimensions: Vec<DimensionScore>,
    /// ISO-8601 completion timestamp.
    pub evaluation_date: String,
    pub tags: Vec<String>,
    pub test_suites: Vec<String>,
}

/// How a submission's response was interpreted.
///
/// `Completed` carries the backend's synchronous scores; `Accepted` means
/// the response did not match that schema and the result was synthesized
/// locally from the benchmark targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EvaluationOutcome {
    Completed {
        result: EvaluationResult,
    },
    #[serde(rename_all = "camelCase")]
    Accepted {
        job_id: String,
        result: EvaluationResult,
    },
}

impl EvaluationOutcome {
    pub fn result(&self) -> &EvaluationResult {
        match self {
            EvaluationOutcome::Completed { result } => result,
            EvaluationOutcome::Accepted { result, .. } => result,
        }
    }
}

/// Dimension weighting used by the overall quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionWeights {
    pub accuracy: f64,
    pub robustness: f64,
    pub bias: f64,
    pub resilience: f64,
}

/// Statistical parity difference: absolute gap between group means.
///
/// Returns 0 when either group is empty.
pub fn statistical_parity_difference(group_a: &[f64], group_b: &[f64]) -> f64 {
    if group_a.is_empty() || group_b.is_empty() {
        return 0.0;
    }
    let mean_a = group_a.iter().sum::<f64>() / group_a.len() as f64;
    let mean_b = group_b.iter().sum::<f64>() / group_b.len() as f64;
    (mean_a - mean_b).abs()
}

/// Weighted overall quality score, rounded to the nearest integer.
///
/// Returns 0 when the weights sum to zero.
pub fn overall_quality_score(weights: &DimensionWeights, scores: &DimensionWeights) -> u32 {
    let total_weight = weights.accuracy + weights.robustness + weights.bias + weights.resilience;
    if total_weight == 0.0 {
        return 0;
    }
    let weighted = weights.accuracy * scores.accuracy
        + weights.robustness * scores.robustness
        + weights.bias * scores.bias
        + weights.resilience * scores.resilience;
    (weighted / total_weight).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suite_display_name_prefers_nonempty_name() {
        let suite: SuiteSelection = serde_json::from_value(json!({
            "id": 7,
            "name": ""
        }))
        .unwrap();
        assert_eq!(suite.display_name(), "7");

        let suite: SuiteSelection = serde_json::from_value(json!({
            "id": "s-1",
            "name": "Bias Detection Suite"
        }))
        .unwrap();
        assert_eq!(suite.display_name(), "Bias Detection Suite");
    }

    #[test]
    fn test_suite_dimension_names_normalizes_legacy_form() {
        let suite: SuiteSelection = serde_json::from_value(json!({
            "name": "legacy",
            "dimension": "Accuracy, Robustness , "
        }))
        .unwrap();
        assert_eq!(suite.dimension_names(), vec!["Accuracy", "Robustness"]);

        let suite: SuiteSelection = serde_json::from_value(json!({
            "name": "modern",
            "dimensions": ["Bias"],
            "dimension": "Accuracy"
        }))
        .unwrap();
        assert_eq!(suite.dimension_names(), vec!["Bias"]);
    }

    #[test]
    fn test_suite_planned_total_prefers_explicit_count() {
        let suite: SuiteSelection = serde_json::from_value(json!({
            "name": "s",
            "testCount": 12,
            "selectedTestCases": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(suite.planned_total(), 12);

        let suite: SuiteSelection = serde_json::from_value(json!({
            "name": "s",
            "selectedTestCases": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(suite.planned_total(), 2);
    }

    #[test]
    fn test_spd_is_absolute_mean_gap() {
        let a = [0.8, 0.9];
        let b = [0.6, 0.7];
        assert!((statistical_parity_difference(&a, &b) - 0.2).abs() < 1e-9);
        assert!((statistical_parity_difference(&b, &a) - 0.2).abs() < 1e-9);
        assert_eq!(statistical_parity_difference(&[], &b), 0.0);
    }

    #[test]
    fn test_overall_quality_score_weighted_round() {
        let weights = DimensionWeights {
            accuracy: 2.0,
            robustness: 1.0,
            bias: 1.0,
            resilience: 0.0,
        };
        let scores = DimensionWeights {
            accuracy: 90.0,
            robustness: 80.0,
            bias: 70.0,
            resilience: 0.0,
        };
        // (180 + 80 + 70) / 4 = 82.5 -> 83
        assert_eq!(overall_quality_score(&weights, &scores), 83);

        let zero = DimensionWeights {
            accuracy: 0.0,
            robustness: 0.0,
            bias: 0.0,
            resilience: 0.0,
        };
        assert_eq!(overall_quality_score(&zero, &scores), 0);
    }

    #[test]
    fn test_wizard_payload_round_trip() {
        let payload: WizardPayload = serde_json::from_value(json!({
            "step1": {
                "scenarioName": "Procurement QA",
                "description": "spot checks",
                "tags": ["nightly"],
                "agentName": "SupplierAgent",
                "modelType": "OpenAI GPT-4o"
            },
            "step2": [{ "name": "Accuracy - Supplier Quotes", "testCount": 15 }],
            "step3": [{ "dimension": "Accuracy", "target": 90 }],
            "meta": { "requestedAt": "2026-08-24T10:00:00.000Z" }
        }))
        .unwrap();

        assert_eq!(payload.step1.as_ref().unwrap().agent_name, "SupplierAgent");
        assert_eq!(payload.step2[0].planned_total(), 15);
        assert_eq!(payload.step3[0].target, 90.0);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["meta"]["requestedAt"], "2026-08-24T10:00:00.000Z");
        assert_eq!(value["step2"][0]["testCount"], 15);
    }
}
