//! Interpretation of evaluation submission responses.
//!
//! The backend has two observable behaviors. When it evaluates
//! synchronously it returns per-dimension `scores` plus a numeric
//! `overall_score`. Any other response body is treated as an accepted job
//! and a result is synthesized locally from the wizard's benchmark targets.
//! Note the second branch also swallows malformed responses; callers log a
//! warning when it is taken.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashSet;

use crate::models::{DimensionScore, EvaluationOutcome, EvaluationResult, WizardPayload};

/// Mapping from backend score keys to dashboard dimension names, in display
/// order. The backend spells bias as `Biasness`.
const SCORE_KEYS: [(&str, &str); 4] = [
    ("Accuracy", "Accuracy"),
    ("Robustness", "Robustness"),
    ("Biasness", "Bias"),
    ("Resilience", "Resilience"),
];

const DEPLOYMENT_READY_THRESHOLD: f64 = 70.0;

/// Turn the raw response body into an outcome. `now` stamps the result and
/// seeds generated ids.
pub fn interpret_response(
    payload: &WizardPayload,
    body: &Value,
    now: DateTime<Utc>,
) -> EvaluationOutcome {
    if has_synchronous_result(body) {
        EvaluationOutcome::Completed {
            result: synchronous_result(payload, body, now),
        }
    } else {
        let job_id = fallback_job_id(body, now);
        let result = fallback_result(payload, &job_id, now);
        EvaluationOutcome::Accepted { job_id, result }
    }
}

fn has_synchronous_result(body: &Value) -> bool {
    body.get("scores").map(is_truthy).unwrap_or(false)
        && body
            .get("overall_score")
            .map(Value::is_number)
            .unwrap_or(false)
}

fn synchronous_result(
    payload: &WizardPayload,
    body: &Value,
    now: DateTime<Utc>,
) -> EvaluationResult {
    let scores = body.get("scores").cloned().unwrap_or(Value::Null);
    let active = active_dimensions(payload);

    let dimensions = SCORE_KEYS
        .iter()
        .filter(|(_, name)| active.contains(&name.to_lowercase()))
        .map(|(key, name)| DimensionScore {
            name: name.to_string(),
            score: score_value(scores.get(*key)),
            failed: 0,
        })
        .collect();

    let overall = body
        .get("overall_score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let step1 = payload.step1.as_ref();

    EvaluationResult {
        id: body
            .get("id")
            .and_then(truthy_string)
            .unwrap_or_else(|| format!("eval-{}", now.timestamp_millis())),
        agent_name: step1.map(|s| s.agent_name.clone()).unwrap_or_default(),
        version: "v1.0".to_string(),
        model_type: step1.map(|s| s.model_type.clone()).unwrap_or_default(),
        endpoint: step1.and_then(|s| s.endpoint.clone()).unwrap_or_default(),
        scenario_name: step1.map(|s| s.scenario_name.clone()).unwrap_or_default(),
        description: step1.map(|s| s.description.clone()).unwrap_or_default(),
        overall_score: overall,
        is_deployment_ready: overall > DEPLOYMENT_READY_THRESHOLD,
        dimensions,
        evaluation_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        tags: step1.map(|s| s.tags.clone()).unwrap_or_default(),
        test_suites: payload.step2.iter().map(|s| s.display_name()).collect(),
    }
}

/// Dimensions the user asked to measure: the step-3 benchmark rows, falling
/// back to the selected suites' dimensions when step 3 is empty. Lowercased
/// for case-insensitive matching.
fn active_dimensions(payload: &WizardPayload) -> HashSet<String> {
    let mut active: HashSet<String> = payload
        .step3
        .iter()
        .filter(|b| !b.dimension.is_empty())
        .map(|b| b.dimension.to_lowercase())
        .collect();
    if active.is_empty() {
        for suite in &payload.step2 {
            for dim in suite.dimension_names() {
                if !dim.is_empty() {
                    active.insert(dim.to_lowercase());
                }
            }
        }
    }
    active
}

fn fallback_job_id(body: &Value, now: DateTime<Utc>) -> String {
    body.get("jobId")
        .and_then(truthy_string)
        .or_else(|| body.get("id").and_then(truthy_string))
        .unwrap_or_else(|| format!("local-{}", now.timestamp_millis()))
}

/// The locally synthesized stand-in result: benchmark targets become scores
/// and the overall score is their capped mean (80 when no targets are set).
fn fallback_result(payload: &WizardPayload, job_id: &str, now: DateTime<Utc>) -> EvaluationResult {
    let sum: f64 = payload.step3.iter().map(|b| b.target).sum();
    let numerator = if sum == 0.0 { 80.0 } else { sum };
    let denominator = payload.step3.len().max(1) as f64;
    let overall = (numerator / denominator).min(100.0).round();

    let dimensions = payload
        .step3
        .iter()
        .map(|b| DimensionScore {
            name: b.dimension.clone(),
            score: b.target,
            failed: 0,
        })
        .collect();

    let step1 = payload.step1.as_ref();
    EvaluationResult {
        id: job_id.to_string(),
        agent_name: step1.map(|s| s.agent_name.clone()).unwrap_or_default(),
        version: "mock-local".to_string(),
        model_type: step1.map(|s| s.model_type.clone()).unwrap_or_default(),
        endpoint: step1.and_then(|s| s.endpoint.clone()).unwrap_or_default(),
        scenario_name: step1.map(|s| s.scenario_name.clone()).unwrap_or_default(),
        description: step1.map(|s| s.description.clone()).unwrap_or_default(),
        overall_score: overall,
        is_deployment_ready: true,
        dimensions,
        evaluation_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        tags: step1.map(|s| s.tags.clone()).unwrap_or_default(),
        test_suites: payload.step2.iter().map(|s| s.display_name()).collect(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String coercion with the UI's truthiness rules: empty strings, zero and
/// null all fall through to the next candidate.
fn truthy_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map(|f| f != 0.0).unwrap_or(true) => Some(n.to_string()),
        _ => None,
    }
}

fn score_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
