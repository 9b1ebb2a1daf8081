use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// A node on the evaluation canvas.
///
/// The wire shape is `{id, type, data, position}`; `type` and `data` are
/// carried together as a tagged [`NodeConfig`] so each node kind gets its own
/// payload struct instead of a stringly-keyed lookup.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(flatten)]
    pub config: NodeConfig,
    pub position: Position,
}

impl WorkflowNode {
    /// Create a node of the given kind at a position, with the palette
    /// defaults for its payload and a timestamp-suffixed id.
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            id: format!("{}-{}", kind.as_str(), Utc::now().timestamp_millis()),
            config: NodeConfig::default_for(kind),
            position,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    pub fn status(&self) -> NodeStatus {
        self.config.status()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    ScheduleTrigger,
    AgentSelector,
    TestSuite,
    ParallelExecutor,
    ResultsAggregator,
    Notification,
}

impl NodeKind {
    /// All kinds in palette order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::ScheduleTrigger,
        NodeKind::AgentSelector,
        NodeKind::TestSuite,
        NodeKind::ParallelExecutor,
        NodeKind::ResultsAggregator,
        NodeKind::Notification,
    ];

    /// The kebab-case tag used on the wire and in node ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::ScheduleTrigger => "schedule-trigger",
            NodeKind::AgentSelector => "agent-selector",
            NodeKind::TestSuite => "test-suite",
            NodeKind::ParallelExecutor => "parallel-executor",
            NodeKind::ResultsAggregator => "results-aggregator",
            NodeKind::Notification => "notification",
        }
    }

    /// One-line blurb shown on the palette card.
    pub fn palette_description(&self) -> &'static str {
        match self {
            NodeKind::ScheduleTrigger => "Trigger workflow on schedule",
            NodeKind::AgentSelector => "Select test agents",
            NodeKind::TestSuite => "Define test cases",
            NodeKind::ParallelExecutor => "Run tests in parallel",
            NodeKind::ResultsAggregator => "Aggregate test results",
            NodeKind::Notification => "Send notifications",
        }
    }
}

/// A palette entry: display metadata plus the default payload a drop onto
/// the canvas starts from. Serializes with the same `{type, data}` tagging
/// as the nodes themselves.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NodeTemplate {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub config: NodeConfig,
}

/// The node library palette, in display order.
pub fn node_library() -> Vec<NodeTemplate> {
    NodeKind::ALL
        .into_iter()
        .map(|kind| {
            let config = NodeConfig::default_for(kind);
            NodeTemplate {
                name: config.name().to_string(),
                description: kind.palette_description().to_string(),
                config,
            }
        })
        .collect()
}

/// Per-node lifecycle status as driven by the execution pass.
///
/// `Error` is accepted on the wire but no run path emits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

/// Unified node configuration enum. Each variant corresponds to a node kind's
/// payload structure.
///
/// Note: Uses `#[serde(tag = "type", content = "data")]` so the tag doubles as
/// the canvas node type and detached payload JSON stays parseable on its own.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum NodeConfig {
    ScheduleTrigger(ScheduleTriggerData),
    AgentSelector(AgentSelectorData),
    TestSuite(TestSuiteData),
    ParallelExecutor(ParallelExecutorData),
    ResultsAggregator(ResultsAggregatorData),
    Notification(NotificationData),
}

impl NodeConfig {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::ScheduleTrigger(_) => NodeKind::ScheduleTrigger,
            NodeConfig::AgentSelector(_) => NodeKind::AgentSelector,
            NodeConfig::TestSuite(_) => NodeKind::TestSuite,
            NodeConfig::ParallelExecutor(_) => NodeKind::ParallelExecutor,
            NodeConfig::ResultsAggregator(_) => NodeKind::ResultsAggregator,
            NodeConfig::Notification(_) => NodeKind::Notification,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeConfig::ScheduleTrigger(d) => &d.name,
            NodeConfig::AgentSelector(d) => &d.name,
            NodeConfig::TestSuite(d) => &d.name,
            NodeConfig::ParallelExecutor(d) => &d.name,
            NodeConfig::ResultsAggregator(d) => &d.name,
            NodeConfig::Notification(d) => &d.name,
        }
    }

    pub fn status(&self) -> NodeStatus {
        match self {
            NodeConfig::ScheduleTrigger(d) => d.status,
            NodeConfig::AgentSelector(d) => d.status,
            NodeConfig::TestSuite(d) => d.status,
            NodeConfig::ParallelExecutor(d) => d.status,
            NodeConfig::ResultsAggregator(d) => d.status,
            NodeConfig::Notification(d) => d.status,
        }
    }

    pub fn set_status(&mut self, status: NodeStatus) {
        match self {
            NodeConfig::ScheduleTrigger(d) => d.status = status,
            NodeConfig::AgentSelector(d) => d.status = status,
            NodeConfig::TestSuite(d) => d.status = status,
            NodeConfig::ParallelExecutor(d) => d.status = status,
            NodeConfig::ResultsAggregator(d) => d.status = status,
            NodeConfig::Notification(d) => d.status = status,
        }
    }

    /// Palette default payload for a node kind, as dropped onto the canvas
    /// (defaults plus an idle status).
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::ScheduleTrigger => NodeConfig::ScheduleTrigger(ScheduleTriggerData {
                name: "Schedule Trigger".to_string(),
                status: NodeStatus::Idle,
                cron: Some("0 2 * * 4".to_string()),
                schedule_type: None,
                scheduled_time: None,
                interval: None,
                extra: Map::new(),
            }),
            NodeKind::AgentSelector => NodeConfig::AgentSelector(AgentSelectorData {
                name: "Agent Selector".to_string(),
                status: NodeStatus::Idle,
                selected_agents: Vec::new(),
                business_unit: Some("Manufacturing".to_string()),
                extra: Map::new(),
            }),
            NodeKind::TestSuite => NodeConfig::TestSuite(TestSuiteData {
                name: "Test Suite".to_string(),
                status: NodeStatus::Idle,
                tests: Some(0),
                test_cases: Vec::new(),
                dimensions: vec![
                    "Accuracy".to_string(),
                    "Bias".to_string(),
                    "Robustness".to_string(),
                    "Resilience".to_string(),
                ],
                extra: Map::new(),
            }),
            NodeKind::ParallelExecutor => NodeConfig::ParallelExecutor(ParallelExecutorData {
                name: "Parallel Executor".to_string(),
                status: NodeStatus::Idle,
                max_concurrent: Some(4),
                extra: Map::new(),
            }),
            NodeKind::ResultsAggregator => NodeConfig::ResultsAggregator(ResultsAggregatorData {
                name: "Results Aggregator".to_string(),
                status: NodeStatus::Idle,
                pass_threshold: Some(88),
                extra: Map::new(),
            }),
            NodeKind::Notification => NodeConfig::Notification(NotificationData {
                name: "Notification".to_string(),
                status: NodeStatus::Idle,
                channels: vec!["email".to_string()],
                recipients: Vec::new(),
                extra: Map::new(),
            }),
        }
    }

    /// Shallow-merge a JSON patch into this config's payload, keeping the
    /// node kind fixed. Unknown keys land in the payload's extras.
    pub fn merge_data(&mut self, patch: &Map<String, Value>) -> anyhow::Result<()> {
        let mut value = serde_json::to_value(&*self)?;
        if let Some(data) = value.get_mut("data").and_then(|d| d.as_object_mut()) {
            for (key, val) in patch {
                data.insert(key.clone(), val.clone());
            }
        }
        *self = serde_json::from_value(value)?;
        Ok(())
    }
}

/// Schedule trigger payload. `scheduleType` selects which of the other
/// fields is meaningful; the canvas leaves the unused ones in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTriggerData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Cron,
    Datetime,
    Interval,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgentSelectorData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParallelExecutorData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResultsAggregatorData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_threshold: Option<u32>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub name: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_canvas_node() {
        let node: WorkflowNode = serde_json::from_value(json!({
            "id": "test-suite-1700000000000",
            "type": "test-suite",
            "data": {
                "name": "Test Suite",
                "status": "idle",
                "tests": 0,
                "testCases": ["case A", "case B"],
                "dimensions": ["Accuracy", "Bias"]
            },
            "position": { "x": 250.0, "y": 100.0 }
        }))
        .unwrap();

        assert_eq!(node.kind(), NodeKind::TestSuite);
        assert_eq!(node.status(), NodeStatus::Idle);
        if let NodeConfig::TestSuite(data) = &node.config {
            assert_eq!(data.test_cases, vec!["case A", "case B"]);
            assert_eq!(data.dimensions, vec!["Accuracy", "Bias"]);
            assert_eq!(data.tests, Some(0));
        } else {
            panic!("Expected TestSuite config");
        }
    }

    #[test]
    fn test_unknown_data_keys_survive_round_trip() {
        // The palette seeds agent-selector nodes with a vestigial `agents`
        // key that the panel never reads; it must not be dropped.
        let source = json!({
            "id": "agent-selector-1700000000001",
            "type": "agent-selector",
            "data": {
                "name": "Agent Selector",
                "status": "idle",
                "agents": [],
                "businessUnit": "Manufacturing"
            },
            "position": { "x": 0.0, "y": 0.0 }
        });

        let node: WorkflowNode = serde_json::from_value(source).unwrap();
        if let NodeConfig::AgentSelector(data) = &node.config {
            assert!(data.extra.contains_key("agents"));
            assert_eq!(data.business_unit.as_deref(), Some("Manufacturing"));
        } else {
            panic!("Expected AgentSelector config");
        }

        let out = serde_json::to_value(&node).unwrap();
        assert_eq!(out["type"], "agent-selector");
        assert_eq!(out["data"]["agents"], json!([]));
    }

    #[test]
    fn test_default_for_matches_palette() {
        let config = NodeConfig::default_for(NodeKind::ResultsAggregator);
        assert_eq!(config.name(), "Results Aggregator");
        assert_eq!(config.status(), NodeStatus::Idle);
        if let NodeConfig::ResultsAggregator(data) = config {
            assert_eq!(data.pass_threshold, Some(88));
        } else {
            panic!("Expected ResultsAggregator config");
        }

        let config = NodeConfig::default_for(NodeKind::Notification);
        if let NodeConfig::Notification(data) = config {
            assert_eq!(data.channels, vec!["email"]);
            assert!(data.recipients.is_empty());
        } else {
            panic!("Expected Notification config");
        }
    }

    #[test]
    fn test_merge_data_overwrites_and_keeps_variant() {
        let mut config = NodeConfig::default_for(NodeKind::TestSuite);
        let patch = json!({
            "testCases": ["new case"],
            "customNote": "kept"
        });
        config
            .merge_data(patch.as_object().unwrap())
            .unwrap();

        assert_eq!(config.kind(), NodeKind::TestSuite);
        if let NodeConfig::TestSuite(data) = &config {
            assert_eq!(data.test_cases, vec!["new case"]);
            assert_eq!(data.extra["customNote"], "kept");
            // untouched fields stay
            assert_eq!(data.dimensions.len(), 4);
        } else {
            panic!("Expected TestSuite config");
        }
    }

    #[test]
    fn test_merge_data_updates_status() {
        let mut config = NodeConfig::default_for(NodeKind::ParallelExecutor);
        let patch = json!({ "status": "running" });
        config.merge_data(patch.as_object().unwrap()).unwrap();
        assert_eq!(config.status(), NodeStatus::Running);
    }

    #[test]
    fn test_merge_data_rejects_wrongly_typed_field() {
        let mut config = NodeConfig::default_for(NodeKind::ParallelExecutor);
        let patch = json!({ "maxConcurrent": "not a number" });
        assert!(config.merge_data(patch.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_node_id_is_kind_prefixed() {
        let node = WorkflowNode::new(NodeKind::ScheduleTrigger, Position { x: 1.0, y: 2.0 });
        assert!(node.id.starts_with("schedule-trigger-"));
    }

    #[test]
    fn test_node_library_covers_all_kinds() {
        let palette = node_library();
        assert_eq!(palette.len(), NodeKind::ALL.len());
        assert_eq!(palette[0].name, "Schedule Trigger");
        assert_eq!(palette[0].description, "Trigger workflow on schedule");

        let value = serde_json::to_value(&palette[2]).unwrap();
        assert_eq!(value["type"], "test-suite");
        assert_eq!(value["data"]["dimensions"][0], "Accuracy");
    }

    #[test]
    fn test_status_wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_value(NodeStatus::Success).unwrap(),
            json!("success")
        );
        assert_eq!(
            serde_json::from_value::<NodeStatus>(json!("error")).unwrap(),
            NodeStatus::Error
        );
    }
}
