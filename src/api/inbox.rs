//! Inbox endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::dto::{InboxParams, InboxResponse, MessageDetail};
use super::extract::ApiQuery;
use crate::AppState;
use crate::data::Channel;
use crate::error::AppError;
use crate::service::{InboxService, PageRequest};

fn build_inbox_service(state: &AppState) -> InboxService {
    InboxService::new(state.db.clone())
}

/// GET /v1/inbox
pub async fn list_inbox(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<InboxParams>,
) -> Result<Json<InboxResponse>, AppError> {
    let channel = match params.channel.as_deref() {
        None | Some("") => Channel::Sms,
        Some(raw) => raw.parse::<Channel>().map_err(AppError::Validation)?,
    };
    let page = PageRequest::from_query(params.cursor.as_deref(), params.limit)?;

    let page = build_inbox_service(&state).list(channel, page).await?;

    Ok(Json(page.into()))
}

/// GET /v1/messages/:id
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageDetail>, AppError> {
    let message = build_inbox_service(&state).get(&id).await?;

    Ok(Json(message.into()))
}
