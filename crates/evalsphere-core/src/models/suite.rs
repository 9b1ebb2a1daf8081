use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// A test-suite record as served by the external backend's `/test-suits/`
/// listing. Ids may arrive as strings or numbers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestSuitRecord {
    #[ts(type = "string | number")]
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub jira_link: String,
    #[serde(default, rename = "type")]
    pub suite_type: String,
    #[serde(default)]
    pub test_dimensions: Vec<String>,
    #[serde(default)]
    pub selected_test_cases: Vec<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl TestSuitRecord {
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Response envelope of `GET /test-suits/`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestSuitListResponse {
    pub test_suits: Vec<TestSuitRecord>,
}
