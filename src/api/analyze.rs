//! Message analysis endpoint

use axum::{extract::State, response::Json};

use super::dto::{AnalyzeRequest, AnalyzeResponse};
use super::extract::ApiJson;
use crate::AppState;

/// POST /v1/analyze
///
/// Never fails on classification problems: remote errors degrade to the
/// local heuristic scorer inside the orchestrator.
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let outcome = state
        .analysis
        .analyze(&request.text, request.request_id)
        .await;

    Json(outcome.into())
}
