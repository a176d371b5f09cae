//! API layer
//!
//! HTTP handlers for:
//! - Message analysis
//! - Inbox browsing
//! - Saved analyses (scoped by `X-Client-Id`)
//! - Share target hand-off
//! - Metrics (Prometheus)

mod analyze;
mod client_id;
mod dto;
mod extract;
mod inbox;
pub mod metrics;
mod records;
mod share;

pub use client_id::{ANONYMOUS_CLIENT_ID, CLIENT_ID_HEADER, ClientId};
pub use dto::*;
pub use extract::{ApiJson, ApiQuery};
pub use metrics::metrics_router;
pub use share::ShareSubmission;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Create the versioned JSON API router
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/v1/analyze", post(analyze::analyze))
        .route("/v1/inbox", get(inbox::list_inbox))
        .route("/v1/messages/:id", get(inbox::get_message))
        .route(
            "/v1/analysis",
            get(records::list_records).post(records::create_record),
        )
        .route("/v1/analysis/:analysis_id", get(records::get_record))
        .route("/v1/shared-text", get(share::get_shared_text))
}

/// Create the share target router (`POST /share`)
pub fn share_router() -> Router<AppState> {
    Router::new().route("/share", post(share::submit_share))
}
