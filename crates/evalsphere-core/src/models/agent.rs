use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// A demo agent known to the report synthesizer.
///
/// The catalog resolves agent ids selected on the canvas into display
/// metadata; ids not in the catalog fall back to `Unknown Agent` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub version: String,
    pub model_type: String,
    pub endpoint: String,
    pub created_at: String,
}

/// Built-in demo agent catalog.
pub fn builtin_catalog() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: "1".to_string(),
            name: "SupplierAgent".to_string(),
            version: "1.0".to_string(),
            model_type: "OpenAI GPT-4o".to_string(),
            endpoint: "https://api.example.com/v1".to_string(),
            created_at: "2025-12-16".to_string(),
        },
        AgentProfile {
            id: "2".to_string(),
            name: "Procurement Agent".to_string(),
            version: "1.0".to_string(),
            model_type: "Local LLM".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            created_at: "2025-12-15".to_string(),
        },
        AgentProfile {
            id: "3".to_string(),
            name: "Downtime Analysis Agent".to_string(),
            version: "1.0".to_string(),
            model_type: "Custom API".to_string(),
            endpoint: "https://ai.internal.com/inspect".to_string(),
            created_at: "2025-12-16".to_string(),
        },
        AgentProfile {
            id: "4".to_string(),
            name: "Summarizer Agent".to_string(),
            version: "1.0".to_string(),
            model_type: "DeepSeek".to_string(),
            endpoint: "https://ai.internal.com/inspect".to_string(),
            created_at: "2024-03-10".to_string(),
        },
    ]
}

/// An agent record in the external registry service.
///
/// Wire names are snake_case as served by the registry; `id` is assigned by
/// the service and absent on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisteredAgent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub model_provider: String,
    pub model_name: String,
    pub api_version: String,
    pub api_endpoint: String,
    pub api_key: String,
    #[serde(default)]
    pub description: String,
}

/// Response envelope of `GET /agents/`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentListResponse {
    pub agents: Vec<RegisteredAgent>,
}

/// A normalized row from the legacy testing service's agent listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LegacyAgentSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub url: String,
    pub description: String,
}

/// Normalize whatever shape the legacy listing endpoint served.
///
/// Known shapes: `{agents: [...]}`, a bare array, `{response: [...]}`, and
/// `{results: [...]}` / `{data: [...]}`. Rows use inconsistent field names,
/// so each output field falls back through the aliases that have been seen
/// in the wild; the name doubles as the id when no id is present.
pub fn normalize_agent_listing(body: &Value) -> Vec<LegacyAgentSummary> {
    let rows = body
        .get("agents")
        .and_then(Value::as_array)
        .or_else(|| body.as_array())
        .or_else(|| body.get("response").and_then(Value::as_array))
        .or_else(|| body.get("results").and_then(Value::as_array))
        .or_else(|| body.get("data").and_then(Value::as_array));

    let Some(rows) = rows else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| LegacyAgentSummary {
            id: first_field(row, &["id", "name"]).unwrap_or_default(),
            name: first_field(row, &["name"]).unwrap_or_default(),
            version: first_field(row, &["version", "model_version"])
                .unwrap_or_else(|| "1.0".to_string()),
            url: first_field(row, &["endpoint", "model_url", "url"]).unwrap_or_default(),
            description: first_field(row, &["description"]).unwrap_or_default(),
        })
        .collect()
}

/// First present, non-null key coerced to a string. Empty strings and zeros
/// count as present.
fn first_field(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| coerce_string(row.get(*key)?))
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
