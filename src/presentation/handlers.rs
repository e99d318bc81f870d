// HTTP request handlers
use crate::error::PipelineError;
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Response body for a handled batch, matching what the capture client
/// expects: the stored raw file and the map's URL path (null when no map
/// was generated).
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: String,
    pub received: String,
    pub map: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Receive a batch of samples, persist it and render its map.
///
/// A malformed batch must never take the server down: every failure is
/// reported as an error response and the next request is served normally.
pub async fn collect_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    match state.ingest_service.ingest(&body) {
        Ok(outcome) => {
            let response = IngestResponse {
                status: "ok".to_string(),
                received: outcome.raw_path.display().to_string(),
                map: outcome.map_path.map(|p| format!("/{}", p.display())),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => {
            tracing::error!("error while handling POST /data_collector: {error}");
            (status_for(&error), error.to_string()).into_response()
        }
    }
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Decode(_) | PipelineError::EmptyBatch => StatusCode::BAD_REQUEST,
        PipelineError::SourceNotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::Render(_) | PipelineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
