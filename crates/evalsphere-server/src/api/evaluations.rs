use crate::api::{ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
};
use chrono::Utc;
use evalsphere_core::models::{EvaluationOutcome, WizardPayload};
use evalsphere_core::services::{CsvUpload, interpret_response};
use serde_json::Value;
use tracing::{error, warn};

/// Submit the wizard snapshot for evaluation.
///
/// Accepts either a plain JSON body or multipart form data carrying a
/// `csv_file` attachment alongside a `workflow` JSON field, matching what
/// the upstream service expects on `POST /evaluation/`.
pub async fn submit_evaluation(
    State(state): State<AppState>,
    request: Request,
) -> Json<ApiResponse<EvaluationOutcome>> {
    let (payload, csv) = match parse_submission(request).await {
        Ok(parts) => parts,
        Err(message) => return Json(ApiResponse::error(message)),
    };

    match state.backend.submit_evaluation(&payload, csv).await {
        Ok(body) => {
            let outcome = interpret_response(&payload, &body, Utc::now());
            if let EvaluationOutcome::Accepted { job_id, .. } = &outcome {
                warn!(
                    job_id = %job_id,
                    "Evaluation response carried no scores, synthesized a local result"
                );
            }
            Json(ApiResponse::ok(outcome))
        }
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

pub async fn save_analysis(
    State(state): State<AppState>,
    Json(analysis): Json<Value>,
) -> Json<ApiResponse<Value>> {
    match state.backend.save_analysis(&analysis).await {
        Ok(body) => Json(ApiResponse::ok_with_message(body, "Analysis saved")),
        Err(e) => {
            error!("Failed to save analysis: {}", e);
            Json(ApiResponse::error(e.to_string()))
        }
    }
}

/// Pull the wizard payload (and optional CSV attachment) out of either
/// body encoding.
async fn parse_submission(
    request: Request,
) -> Result<(WizardPayload, Option<CsvUpload>), String> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| format!("Invalid multipart request: {}", e))?;

        let mut payload: Option<WizardPayload> = None;
        let mut csv: Option<CsvUpload> = None;
        while let Ok(Some(field)) = multipart.next_field().await {
            match field.name() {
                Some("csv_file") => {
                    let file_name = field.file_name().unwrap_or("upload.csv").to_string();
                    if let Ok(bytes) = field.bytes().await {
                        csv = Some(CsvUpload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                Some("workflow") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| format!("Invalid workflow field: {}", e))?;
                    payload = Some(
                        serde_json::from_str(&text)
                            .map_err(|e| format!("Invalid workflow JSON: {}", e))?,
                    );
                }
                _ => {}
            }
        }

        let payload =
            payload.ok_or_else(|| "Missing workflow field in multipart request".to_string())?;
        Ok((payload, csv))
    } else {
        let Json(payload) = Json::<WizardPayload>::from_request(request, &())
            .await
            .map_err(|e| format!("Invalid JSON body: {}", e))?;
        Ok((payload, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/api/evaluations")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(boundary: &str, body: String) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/api/evaluations")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_parse_json_submission() {
        let request = json_request(r#"{"meta":{"requestedAt":"2026-08-24T10:00:00.000Z"}}"#);

        let (payload, csv) = parse_submission(request).await.unwrap();
        assert!(payload.step1.is_none());
        assert!(payload.step2.is_empty());
        assert!(csv.is_none());
    }

    #[tokio::test]
    async fn test_parse_multipart_with_csv() {
        let boundary = "cases-upload";
        let workflow = r#"{"meta":{"requestedAt":"2026-08-24T10:00:00.000Z"}}"#;
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"workflow\"\r\n\r\n\
             {workflow}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"csv_file\"; filename=\"cases.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             prompt,expected\r\n\
             --{boundary}--\r\n"
        );

        let (payload, csv) = parse_submission(multipart_request(boundary, body))
            .await
            .unwrap();
        assert_eq!(payload.meta.requested_at, "2026-08-24T10:00:00.000Z");
        let csv = csv.unwrap();
        assert_eq!(csv.file_name, "cases.csv");
        assert_eq!(csv.bytes, b"prompt,expected");
    }

    #[tokio::test]
    async fn test_multipart_without_workflow_is_rejected() {
        let boundary = "cases-upload";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"csv_file\"; filename=\"cases.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             prompt,expected\r\n\
             --{boundary}--\r\n"
        );

        let error = parse_submission(multipart_request(boundary, body))
            .await
            .unwrap_err();
        assert_eq!(error, "Missing workflow field in multipart request");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let error = parse_submission(json_request("not json")).await.unwrap_err();
        assert!(error.starts_with("Invalid JSON body"));
    }
}
