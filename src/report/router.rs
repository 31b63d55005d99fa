use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use super::error::{ErrorResponse, ReportError};
use super::store::ReportStore;
use super::types::{ReportRequest, RequestMeta};

#[derive(Clone)]
struct ReportState {
    store: Arc<dyn ReportStore>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

/// Routes: `POST /api/report` and `GET /health`.
pub fn build_router(store: Arc<dyn ReportStore>) -> Router {
    Router::new()
        .route("/api/report", post(submit_report))
        .route("/health", get(health))
        .with_state(ReportState { store })
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "cyberqr".to_string(),
    })
}

async fn submit_report(
    State(state): State<ReportState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    match store_report(&state, &headers, &body).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true })),
        )
            .into_response(),
        Err(err) => {
            if err.status_code().is_server_error() {
                tracing::error!(request_id = %request_id, error = %err, "Failed to store report");
            } else {
                tracing::debug!(request_id = %request_id, error = %err, "Rejected report");
            }
            ErrorResponse::from_error(&err, &request_id)
        }
    }
}

async fn store_report(
    state: &ReportState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), ReportError> {
    let request: ReportRequest = serde_json::from_slice(body)
        .map_err(|_| ReportError::InvalidRequest("Request body must be a JSON object".to_string()))?;
    let document = request.into_document(RequestMeta::from_headers(headers), Utc::now())?;

    let store = Arc::clone(&state.store);
    let url = document.url.clone();
    let report_type = document.report_type;
    tokio::task::spawn_blocking(move || store.persist(&document))
        .await
        .map_err(|e| ReportError::Internal(format!("persist task failed: {}", e)))??;

    tracing::info!(url = %url, report_type = %report_type, "Report stored");
    Ok(())
}
