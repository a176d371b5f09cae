//! Data models
//!
//! Rust structs representing database entities and the classification
//! result shared by the analysis and record layers.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ID Types
// =============================================================================

/// Saved analysis ID: `an_` followed by a lowercase ULID
///
/// Example: "an_01arz3ndektsv4rrffq69g5fav"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    /// Generate a new ID (48-bit timestamp + 80 random bits)
    pub fn new() -> Self {
        Self(format!("an_{}", ulid::Ulid::new().to_string().to_ascii_lowercase()))
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase hex string carrying `len * 4` random bits
pub fn random_hex(len: usize) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

/// Fresh analysis request ID: `req_` followed by 12 hex characters
pub fn new_request_id() -> String {
    format!("req_{}", random_hex(12))
}

// =============================================================================
// Channel / Risk hint
// =============================================================================

/// Inbox channel a message was received on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Facebook,
    Instagram,
    Kakao,
    Email,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Sms,
        Channel::Facebook,
        Channel::Instagram,
        Channel::Kakao,
        Channel::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Kakao => "kakao",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| format!("unknown channel: {s}"))
    }
}

/// Precomputed risk hint shown next to an inbox item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RiskHint {
    Warn,
    Safe,
}

// =============================================================================
// Classification
// =============================================================================

/// Risk label attached to an analyzed text
///
/// Serialized with the labels the client and model server speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "스미싱", alias = "phishing-style", alias = "phishing", alias = "smishing")]
    Smishing,
    #[serde(rename = "정상", alias = "benign", alias = "normal")]
    Benign,
    #[default]
    #[serde(rename = "불명", alias = "unknown")]
    Unknown,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smishing => "스미싱",
            Self::Benign => "정상",
            Self::Unknown => "불명",
        }
    }

    /// Map a label reported by a remote model, degrading anything
    /// unrecognized to [`Label::Unknown`]
    pub fn from_remote(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "스미싱" | "phishing-style" | "phishing" | "smishing" => Self::Smishing,
            "정상" | "benign" | "normal" => Self::Benign,
            _ => Self::Unknown,
        }
    }
}

/// Outcome of classifying one text
///
/// Every field has a default so partial payloads degrade field by field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default)]
    pub label: Label,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub raw_output: Option<serde_json::Value>,
}

// =============================================================================
// Inbox messages
// =============================================================================

/// A message received on one of the inbox channels
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub channel: Channel,
    pub sender_name: String,
    pub sender_id: String,
    /// Full, untruncated text
    pub content: String,
    pub ts: DateTime<Utc>,
    pub risk_hint: Option<RiskHint>,
}

// =============================================================================
// Saved analyses
// =============================================================================

/// Row of the `analyses` table, analysis still serialized
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub analysis_id: String,
    pub client_id: String,
    pub message_id: String,
    pub created_at: DateTime<Utc>,
    pub analysis_json: String,
}

/// Saved analysis, visible only to the client that created it
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub client_id: String,
    pub message_id: String,
    pub created_at: DateTime<Utc>,
    pub analysis: ClassificationResult,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = serde_json::Error;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        Ok(Self {
            analysis: serde_json::from_str(&row.analysis_json)?,
            analysis_id: row.analysis_id,
            client_id: row.client_id,
            message_id: row.message_id,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Share bridge
// =============================================================================

/// Payload captured from an external share action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SharedPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}
