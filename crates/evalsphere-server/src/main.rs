#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod api;

use api::{
    agents::*, auth::*, canvas::*, evaluations::*, executions::*, suites::*, workflows::*,
};
use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get, patch, post, put},
};
use evalsphere_core::{AppCore, paths};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "evalsphere is working!".to_string(),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,evalsphere_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting EvalSphere canvas server");

    let db_path = paths::ensure_database_path_string()
        .expect("Failed to determine EvalSphere database path");
    let core = Arc::new(AppCore::new(&db_path).expect("Failed to initialize app core"));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // AppState is just an alias for Arc<AppCore>
    let shared_state = core.clone();

    let app = Router::new()
        .route("/health", get(health))
        // Live canvas state
        .route("/api/canvas", get(get_canvas).put(replace_canvas))
        .route("/api/canvas/nodes", post(add_node))
        .route("/api/canvas/nodes/{id}", delete(remove_node))
        .route("/api/canvas/nodes/{id}/data", patch(update_node_data))
        .route("/api/canvas/nodes/{id}/status", patch(update_node_status))
        .route("/api/canvas/selection", put(set_selection))
        .route("/api/canvas/reset", post(reset_canvas))
        .route("/api/node-library", get(get_node_library))
        // Execution pass and report
        .route("/api/executions", post(start_execution))
        .route("/api/executions/stop", post(stop_execution))
        .route("/api/executions/status", get(execution_status))
        .route("/api/report", get(get_report))
        .route("/api/report/download", get(download_report))
        // Saved workflow snapshots
        .route("/api/workflows", get(list_workflows).post(save_workflow))
        .route("/api/workflows/{id}/load", post(load_workflow))
        .route("/api/workflows/{id}", delete(delete_workflow))
        // Agents: built-in catalog plus registry pass-through
        .route("/api/agents/catalog", get(agent_catalog))
        .route("/api/agents/legacy", get(legacy_agents))
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/agents/{id}", delete(delete_agent))
        // Test suite pass-through
        .route("/api/test-suites", get(list_test_suites))
        .route("/api/test-suites/{id}", delete(delete_test_suite))
        // Evaluation wizard
        .route("/api/evaluations", post(submit_evaluation))
        .route("/api/analysis", post(save_analysis))
        // Auth pass-through with session mirroring
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .layer(cors)
        .with_state(shared_state);

    let addr = std::env::var("EVALSPHERE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("EvalSphere running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
