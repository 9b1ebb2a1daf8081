use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use evalsphere_core::models::{self, AgentProfile, LegacyAgentSummary, RegisteredAgent};
use serde_json::Value;

/// The curated agents the wizard offers before any backend is consulted.
pub async fn agent_catalog() -> Json<ApiResponse<Vec<AgentProfile>>> {
    Json(ApiResponse::ok(models::builtin_catalog()))
}

pub async fn list_agents(State(state): State<AppState>) -> Json<ApiResponse<Vec<RegisteredAgent>>> {
    match state.backend.list_agents().await {
        Ok(agents) => Json(ApiResponse::ok(agents)),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn create_agent(
    State(state): State<AppState>,
    Json(agent): Json<RegisteredAgent>,
) -> Json<ApiResponse<Value>> {
    match state.backend.create_agent(&agent).await {
        Ok(body) => Json(ApiResponse::ok_with_message(body, "Agent registered!")),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<()>> {
    match state.backend.delete_agent(&id).await {
        Ok(()) => Json(ApiResponse::message(format!("Agent {} deleted!", id))),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

/// Listing from the older inventory service, reshaped into catalog rows.
pub async fn legacy_agents(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<LegacyAgentSummary>>> {
    match state.backend.legacy_agent_list().await {
        Ok(agents) => Json(ApiResponse::ok(agents)),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
