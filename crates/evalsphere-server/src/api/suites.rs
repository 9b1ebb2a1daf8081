use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use evalsphere_core::models::TestSuitRecord;

pub async fn list_test_suites(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<TestSuitRecord>>> {
    match state.backend.list_test_suits().await {
        Ok(suites) => Json(ApiResponse::ok(suites)),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn delete_test_suite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<()>> {
    match state.backend.delete_test_suit(&id).await {
        Ok(()) => Json(ApiResponse::message(format!("Test suite {} deleted!", id))),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
