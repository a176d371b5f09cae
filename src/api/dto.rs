//! API request/response DTOs
//!
//! Field names follow what the web client already speaks: the analyze
//! endpoint uses snake_case, inbox and saved-analysis payloads camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{AnalysisRecord, Channel, ClassificationResult, Message, RiskHint};
use crate::service::{AnalysisOutcome, Page, preview};

// =============================================================================
// Analyze
// =============================================================================

/// POST /v1/analyze body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// POST /v1/analyze response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub success: bool,
    pub result: ClassificationResult,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            request_id: outcome.request_id,
            success: outcome.success,
            result: outcome.result,
        }
    }
}

// =============================================================================
// Inbox
// =============================================================================

/// GET /v1/inbox query
#[derive(Debug, Clone, Deserialize)]
pub struct InboxParams {
    pub channel: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Inbox list entry with a truncated preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxItem {
    pub id: String,
    pub channel: Channel,
    pub sender_name: String,
    pub sender_id: String,
    pub preview: String,
    pub ts: DateTime<Utc>,
    pub risk_hint: Option<RiskHint>,
}

impl From<Message> for InboxItem {
    fn from(message: Message) -> Self {
        Self {
            preview: preview(&message.content),
            id: message.id,
            channel: message.channel,
            sender_name: message.sender_name,
            sender_id: message.sender_id,
            ts: message.ts,
            risk_hint: message.risk_hint,
        }
    }
}

/// GET /v1/inbox response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    pub items: Vec<InboxItem>,
    pub next_cursor: Option<String>,
}

impl From<Page<Message>> for InboxResponse {
    fn from(page: Page<Message>) -> Self {
        let page = page.map(InboxItem::from);
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

/// GET /v1/messages/:id response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetail {
    pub id: String,
    pub channel: Channel,
    pub sender_id: String,
    pub content: String,
    pub ts: DateTime<Utc>,
}

impl From<Message> for MessageDetail {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            channel: message.channel,
            sender_id: message.sender_id,
            content: message.content,
            ts: message.ts,
        }
    }
}

// =============================================================================
// Saved analyses
// =============================================================================

/// POST /v1/analysis body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnalysisRequest {
    pub message_id: String,
    pub analysis: ClassificationResult,
}

/// GET /v1/analysis query
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Saved analysis as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecordResponse {
    pub analysis_id: String,
    pub client_id: String,
    pub message_id: String,
    pub created_at: DateTime<Utc>,
    pub analysis: ClassificationResult,
}

impl From<AnalysisRecord> for AnalysisRecordResponse {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            analysis_id: record.analysis_id,
            client_id: record.client_id,
            message_id: record.message_id,
            created_at: record.created_at,
            analysis: record.analysis,
        }
    }
}

/// GET /v1/analysis response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisListResponse {
    pub items: Vec<AnalysisRecordResponse>,
    pub next_cursor: Option<String>,
}

impl From<Page<AnalysisRecord>> for AnalysisListResponse {
    fn from(page: Page<AnalysisRecord>) -> Self {
        let page = page.map(AnalysisRecordResponse::from);
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

// =============================================================================
// Share bridge
// =============================================================================

/// GET /v1/shared-text query
#[derive(Debug, Clone, Deserialize)]
pub struct SharedTextParams {
    pub token: String,
}
