use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use evalsphere_core::models::{ExecutionReport, NodeStatus};
use serde::Serialize;

#[derive(Serialize)]
pub struct NodeStatusEntry {
    pub id: String,
    pub name: String,
    pub status: NodeStatus,
}

#[derive(Serialize)]
pub struct ExecutionStatus {
    pub executing: bool,
    pub nodes: Vec<NodeStatusEntry>,
}

pub async fn start_execution(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    match state.simulator.execute() {
        Ok(()) => Json(ApiResponse::message("Workflow execution started")),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn stop_execution(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    state.simulator.stop();
    Json(ApiResponse::message("Workflow execution stopped"))
}

pub async fn execution_status(State(state): State<AppState>) -> Json<ApiResponse<ExecutionStatus>> {
    let nodes = state
        .graph
        .nodes()
        .into_iter()
        .map(|node| NodeStatusEntry {
            status: node.status(),
            name: node.config.name().to_string(),
            id: node.id,
        })
        .collect();
    Json(ApiResponse::ok(ExecutionStatus {
        executing: state.graph.is_executing(),
        nodes,
    }))
}

pub async fn get_report(State(state): State<AppState>) -> Json<ApiResponse<ExecutionReport>> {
    match state.graph.report() {
        Some(report) => Json(ApiResponse::ok(report)),
        None => Json(ApiResponse::error("No execution report available")),
    }
}

pub async fn download_report(State(state): State<AppState>) -> Response {
    match state.graph.report() {
        Some(report) => {
            let body = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|_| "{}".to_string());
            let filename = format!(
                "attachment; filename=\"workflow-report-{}.json\"",
                Utc::now().timestamp_millis()
            );
            (
                [
                    (CONTENT_TYPE, "application/json".to_string()),
                    (CONTENT_DISPOSITION, filename),
                ],
                body,
            )
                .into_response()
        }
        None => Json(ApiResponse::<()>::error("No execution report available")).into_response(),
    }
}
