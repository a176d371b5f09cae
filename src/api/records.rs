//! Saved analysis endpoints
//!
//! Every operation is scoped to the caller's `X-Client-Id`.

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::client_id::ClientId;
use super::dto::{AnalysisListResponse, AnalysisRecordResponse, ListParams, SaveAnalysisRequest};
use super::extract::{ApiJson, ApiQuery};
use crate::AppState;
use crate::error::AppError;
use crate::service::{AnalysisRecordService, PageRequest};

fn build_record_service(state: &AppState) -> AnalysisRecordService {
    AnalysisRecordService::new(state.db.clone())
}

/// POST /v1/analysis
pub async fn create_record(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    ApiJson(request): ApiJson<SaveAnalysisRequest>,
) -> Result<Json<AnalysisRecordResponse>, AppError> {
    let record = build_record_service(&state)
        .create(&client_id, &request.message_id, request.analysis)
        .await?;

    Ok(Json(record.into()))
}

/// GET /v1/analysis
pub async fn list_records(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let page = PageRequest::from_query(params.cursor.as_deref(), params.limit)?;

    let page = build_record_service(&state).list(&client_id, page).await?;

    Ok(Json(page.into()))
}

/// GET /v1/analysis/:analysis_id
pub async fn get_record(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    Path(analysis_id): Path<String>,
) -> Result<Json<AnalysisRecordResponse>, AppError> {
    let record = build_record_service(&state)
        .get(&client_id, &analysis_id)
        .await?;

    Ok(Json(record.into()))
}
