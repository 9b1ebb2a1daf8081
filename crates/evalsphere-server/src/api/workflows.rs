use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use evalsphere_core::models::SavedWorkflow;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SaveWorkflowRequest {
    pub name: String,
}

pub async fn list_workflows(State(state): State<AppState>) -> Json<ApiResponse<Vec<SavedWorkflow>>> {
    Json(ApiResponse::ok(state.graph.saved_workflows()))
}

pub async fn save_workflow(
    State(state): State<AppState>,
    Json(request): Json<SaveWorkflowRequest>,
) -> Json<ApiResponse<SavedWorkflow>> {
    let snapshot = state.graph.save_workflow(&request.name);
    let message = format!("Workflow {} saved!", snapshot.name);
    Json(ApiResponse::ok_with_message(snapshot, message))
}

pub async fn load_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<SavedWorkflow>> {
    match state.graph.load_workflow(&id) {
        Ok(workflow) => {
            let message = format!("Workflow {} loaded", workflow.name);
            Json(ApiResponse::ok_with_message(workflow, message))
        }
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<()>> {
    match state.graph.delete_workflow(&id) {
        Ok(()) => Json(ApiResponse::message(format!("Workflow {} deleted!", id))),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
