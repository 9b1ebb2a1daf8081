pub mod agent;
pub mod auth;
pub mod edge;
pub mod evaluation;
pub mod node;
pub mod report;
pub mod suite;
pub mod workflow;

pub use agent::{
    AgentListResponse, AgentProfile, LegacyAgentSummary, RegisteredAgent, builtin_catalog,
    normalize_agent_listing,
};
pub use auth::{AuthSession, LoginRequest, RegisterRequest, UserRecord};
pub use edge::WorkflowEdge;
pub use evaluation::{
    BenchmarkTarget, DimensionScore, DimensionWeights, EvaluationOutcome, EvaluationResult,
    ScenarioConfig, SuiteSelection, WizardMeta, WizardPayload, overall_quality_score,
    statistical_parity_difference,
};
pub use node::{
    AgentSelectorData, NodeConfig, NodeKind, NodeStatus, NodeTemplate, NotificationData,
    ParallelExecutorData, Position, ResultsAggregatorData, ScheduleTriggerData, ScheduleType,
    TestSuiteData, WorkflowNode, node_library,
};
pub use report::{
    AgentResult, DimensionTally, ExecutionReport, ReportTotals, TestCaseResult, TestStatus,
};
pub use suite::{TestSuitListResponse, TestSuitRecord};
pub use workflow::SavedWorkflow;
