//! HTTP client for the evaluation backend and the legacy testing service.
//!
//! Every call is a single request with no retries; callers surface failures
//! to the UI as-is.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use thiserror::Error;

use crate::models::{
    AgentListResponse, AuthSession, LegacyAgentSummary, LoginRequest, RegisterRequest,
    RegisteredAgent, TestSuitListResponse, TestSuitRecord, WizardPayload, normalize_agent_listing,
};

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8900";
const DEFAULT_LEGACY_BACKEND_URL: &str = "http://127.0.0.1:8448";

const BACKEND_URL_ENV: &str = "EVALSPHERE_BACKEND_URL";
const LEGACY_BACKEND_URL_ENV: &str = "EVALSPHERE_LEGACY_BACKEND_URL";

/// Backend error types
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error: {status} {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Base URLs of the two external services.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Evaluation backend (auth, agents registry, test suites, evaluation).
    pub base_url: String,
    /// Legacy testing service (agent listing only).
    pub legacy_base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            legacy_base_url: DEFAULT_LEGACY_BACKEND_URL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Read EVALSPHERE_BACKEND_URL / EVALSPHERE_LEGACY_BACKEND_URL, falling
    /// back to the local defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: env_url(BACKEND_URL_ENV, DEFAULT_BACKEND_URL),
            legacy_base_url: env_url(LEGACY_BACKEND_URL_ENV, DEFAULT_LEGACY_BACKEND_URL),
        }
    }
}

fn env_url(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}

/// A raw CSV file captured by the test designer's upload step, forwarded
/// verbatim with the evaluation submission.
#[derive(Debug, Clone)]
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn legacy_url(&self, path: &str) -> String {
        format!("{}{}", self.config.legacy_base_url, path)
    }

    /// `POST /auth/login`. Token extraction is tolerant of the shapes the
    /// auth service has served; see [`AuthSession::from_response`].
    pub async fn login(&self, request: &LoginRequest) -> BackendResult<AuthSession> {
        let body = self.post_json("/auth/login", request).await?;
        Ok(AuthSession::from_response(&body, &request.username))
    }

    /// `POST /auth/register`. Returns the raw response body.
    pub async fn register(&self, request: &RegisterRequest) -> BackendResult<Value> {
        self.post_json("/auth/register", request).await
    }

    /// `GET /test-suits/` (the backend's spelling).
    pub async fn list_test_suits(&self) -> BackendResult<Vec<TestSuitRecord>> {
        let body = self.get_json("/test-suits/").await?;
        let listing: TestSuitListResponse = serde_json::from_value(body)?;
        Ok(listing.test_suits)
    }

    /// `DELETE /test-suit/delete/{id}`.
    pub async fn delete_test_suit(&self, id: &str) -> BackendResult<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/test-suit/delete/{}", id)))
            .send()
            .await?;
        read_body(resp).await?;
        Ok(())
    }

    /// `GET /agents/`.
    pub async fn list_agents(&self) -> BackendResult<Vec<RegisteredAgent>> {
        let body = self.get_json("/agents/").await?;
        let listing: AgentListResponse = serde_json::from_value(body)?;
        Ok(listing.agents)
    }

    /// `POST /agents/`. Returns the raw response body.
    pub async fn create_agent(&self, agent: &RegisteredAgent) -> BackendResult<Value> {
        self.post_json("/agents/", agent).await
    }

    /// `DELETE /agents/?id={id}`. The registry deletes by query parameter,
    /// not path segment.
    pub async fn delete_agent(&self, id: &str) -> BackendResult<()> {
        let resp = self
            .client
            .delete(self.url("/agents/"))
            .query(&[("id", id)])
            .send()
            .await?;
        read_body(resp).await?;
        Ok(())
    }

    /// `GET {legacy}/testing/agentlist`, normalized to a stable row shape.
    pub async fn legacy_agent_list(&self) -> BackendResult<Vec<LegacyAgentSummary>> {
        let resp = self
            .client
            .get(self.legacy_url("/testing/agentlist"))
            .send()
            .await?;
        let body = read_body(resp).await?;
        Ok(normalize_agent_listing(&body))
    }

    /// `POST /evaluation/`: the wizard snapshot as JSON, or as multipart
    /// form data when a CSV upload rides along (`csv_file` plus a `workflow`
    /// text field holding the snapshot).
    ///
    /// Returns the raw response body; interpretation lives in
    /// [`super::evaluation`].
    pub async fn submit_evaluation(
        &self,
        payload: &WizardPayload,
        csv: Option<CsvUpload>,
    ) -> BackendResult<Value> {
        let request = match csv {
            Some(upload) => {
                let form = Form::new()
                    .part(
                        "csv_file",
                        Part::bytes(upload.bytes).file_name(upload.file_name),
                    )
                    .text("workflow", serde_json::to_string(payload)?);
                self.client.post(self.url("/evaluation/")).multipart(form)
            }
            None => self.client.post(self.url("/evaluation/")).json(payload),
        };
        let resp = request.send().await?;
        read_body(resp).await
    }

    /// `POST /save-analysis`. The service expects the analysis wrapped under
    /// a `workflow` key.
    pub async fn save_analysis(&self, analysis: &Value) -> BackendResult<Value> {
        self.post_json("/save-analysis", &json!({ "workflow": analysis }))
            .await
    }

    async fn get_json(&self, path: &str) -> BackendResult<Value> {
        let resp = self.client.get(self.url(path)).send().await?;
        read_body(resp).await
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> BackendResult<Value> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        read_body(resp).await
    }
}

/// Read a response body as JSON, carrying non-JSON bodies as plain strings.
/// Non-2xx statuses become [`BackendError::Status`] with a best-effort
/// message from the body.
async fn read_body(resp: reqwest::Response) -> BackendResult<Value> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = parse_body(&text);
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(body)
}

fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn error_message(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
