use crate::api::{ApiResponse, state::AppState};
use axum::{Json, extract::State};
use evalsphere_core::models::{AuthSession, LoginRequest, RegisterRequest};
use serde_json::Value;
use tracing::warn;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Json<ApiResponse<AuthSession>> {
    match state.backend.login(&request).await {
        Ok(session) => {
            // Mirror the session locally so a restart keeps the user signed in.
            if let Err(e) = state.storage.session.store_auth(&session) {
                warn!("Failed to persist auth session: {}", e);
            }
            Json(ApiResponse::ok_with_message(session, "Login successful"))
        }
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Json<ApiResponse<Value>> {
    match state.backend.register(&request).await {
        Ok(body) => Json(ApiResponse::ok_with_message(body, "Registration successful")),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn logout(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    match state.storage.session.clear_auth() {
        Ok(()) => Json(ApiResponse::message("Logged out")),
        Err(e) => Json(ApiResponse::error(format!("Failed to clear session: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalsphere_core::AppCore;
    use evalsphere_core::models::UserRecord;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn create_test_app() -> (Arc<AppCore>, TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let app = Arc::new(AppCore::new(db_path.to_str().unwrap()).unwrap());
        (app, temp_dir)
    }

    #[tokio::test]
    async fn test_logout_clears_stored_session() {
        let (app, _tmp_dir) = create_test_app();
        let session = AuthSession {
            user: UserRecord {
                username: "admin".to_string(),
                role: Some("admin".to_string()),
            },
            token: Some("token-1".to_string()),
            refresh_token: None,
        };
        app.storage.session.store_auth(&session).unwrap();
        assert!(app.storage.session.load_auth().unwrap().is_some());

        let response = logout(State(app.clone())).await;
        let body = response.0;
        assert!(body.success);
        assert_eq!(body.message.unwrap(), "Logged out");
        assert!(app.storage.session.load_auth().unwrap().is_none());
    }
}
