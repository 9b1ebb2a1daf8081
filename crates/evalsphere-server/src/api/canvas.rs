use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use evalsphere_core::models::{self, NodeStatus, NodeTemplate, WorkflowEdge, WorkflowNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Both live canvas collections as one payload.
#[derive(Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: NodeStatus,
}

#[derive(Serialize, Deserialize)]
pub struct SelectionUpdate {
    #[serde(rename = "nodeId")]
    pub node_id: Option<String>,
}

pub async fn get_canvas(State(state): State<AppState>) -> Json<ApiResponse<CanvasSnapshot>> {
    let (nodes, edges) = state.graph.canvas();
    Json(ApiResponse::ok(CanvasSnapshot { nodes, edges }))
}

pub async fn replace_canvas(
    State(state): State<AppState>,
    Json(snapshot): Json<CanvasSnapshot>,
) -> Json<ApiResponse<()>> {
    state.graph.set_nodes(snapshot.nodes);
    state.graph.set_edges(snapshot.edges);
    Json(ApiResponse::message("Canvas replaced"))
}

pub async fn add_node(
    State(state): State<AppState>,
    Json(node): Json<WorkflowNode>,
) -> Json<ApiResponse<WorkflowNode>> {
    state.graph.add_node(node.clone());
    Json(ApiResponse::ok_with_message(node, "Node added to canvas"))
}

pub async fn remove_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<()>> {
    if state.graph.remove_node(&id) {
        Json(ApiResponse::message(format!("Node {} removed!", id)))
    } else {
        Json(ApiResponse::error(format!("Node {} not found", id)))
    }
}

pub async fn update_node_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> Json<ApiResponse<WorkflowNode>> {
    match state.graph.update_node_data(&id, &patch) {
        Ok(Some(node)) => Json(ApiResponse::ok(node)),
        Ok(None) => Json(ApiResponse::error(format!("Node {} not found", id))),
        Err(e) => Json(ApiResponse::error(format!(
            "Failed to update node data: {}",
            e
        ))),
    }
}

pub async fn update_node_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Json<ApiResponse<()>> {
    if state.graph.update_node_status(&id, update.status) {
        Json(ApiResponse::message(format!("Node {} status updated", id)))
    } else {
        Json(ApiResponse::error(format!("Node {} not found", id)))
    }
}

pub async fn set_selection(
    State(state): State<AppState>,
    Json(update): Json<SelectionUpdate>,
) -> Json<ApiResponse<()>> {
    state.graph.select_node(update.node_id);
    Json(ApiResponse::message("Selection updated"))
}

pub async fn reset_canvas(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    state.graph.reset();
    Json(ApiResponse::message("Canvas reset"))
}

pub async fn get_node_library() -> Json<ApiResponse<Vec<NodeTemplate>>> {
    Json(ApiResponse::ok(models::node_library()))
}
