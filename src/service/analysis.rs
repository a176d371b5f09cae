//! Analysis orchestration
//!
//! Prefers the remote classification model and falls back to the local
//! heuristic scorer on any remote failure. Remote errors are typed
//! ([`RemoteError`]) and consumed by [`select_outcome`]; they never reach
//! the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;

use super::heuristic;
use crate::data::{ClassificationResult, Label, new_request_id};

/// Why a remote classification attempt was discarded
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection failure, timeout or other transport problem
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model answered with a non-2xx status
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// The body was not a JSON object
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl RemoteError {
    fn reason(&self) -> &'static str {
        match self {
            RemoteError::Transport(_) => "transport",
            RemoteError::Status(_) => "status",
            RemoteError::Decode(_) => "decode",
        }
    }
}

/// Successful remote answer, merged over result defaults
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteVerdict {
    /// Request ID echoed by the model, if it reported one
    pub request_id: Option<String>,
    pub success: bool,
    pub result: ClassificationResult,
}

impl RemoteVerdict {
    /// Build a verdict from a decoded response body
    ///
    /// Missing, null or mistyped fields take their defaults one by one.
    pub fn from_body(body: &Value) -> Result<Self, RemoteError> {
        let body = body
            .as_object()
            .ok_or_else(|| RemoteError::Decode("expected a JSON object".to_string()))?;

        let request_id = body
            .get("request_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned);
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);

        let result = match body.get("result").and_then(Value::as_object) {
            Some(result) => ClassificationResult {
                label: result
                    .get("label")
                    .and_then(Value::as_str)
                    .map(Label::from_remote)
                    .unwrap_or_default(),
                score: result.get("score").and_then(Value::as_f64),
                explanation: result
                    .get("explanation")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                patterns: string_list(result.get("patterns")),
                recommended_actions: string_list(result.get("recommended_actions")),
                raw_output: result.get("raw_output").filter(|v| !v.is_null()).cloned(),
            },
            None => ClassificationResult::default(),
        };

        Ok(Self {
            request_id,
            success,
            result,
        })
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Which path produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPath {
    Remote,
    Fallback,
}

impl AnalysisPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPath::Remote => "remote",
            AnalysisPath::Fallback => "fallback",
        }
    }
}

/// Final answer for one analysis request
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub request_id: String,
    pub success: bool,
    pub result: ClassificationResult,
    pub path: AnalysisPath,
}

/// Pick the outcome for a request
///
/// `remote` is `None` when no remote model is configured. Any remote
/// error selects the heuristic result, which always reports success.
pub fn select_outcome(
    request_id: String,
    text: &str,
    remote: Option<Result<RemoteVerdict, RemoteError>>,
) -> AnalysisOutcome {
    match remote {
        Some(Ok(verdict)) => AnalysisOutcome {
            request_id: verdict.request_id.unwrap_or(request_id),
            success: verdict.success,
            result: verdict.result,
            path: AnalysisPath::Remote,
        },
        Some(Err(error)) => {
            tracing::warn!(
                %request_id,
                %error,
                "Remote classification failed; using heuristic fallback"
            );
            fallback(request_id, text)
        }
        None => fallback(request_id, text),
    }
}

fn fallback(request_id: String, text: &str) -> AnalysisOutcome {
    AnalysisOutcome {
        request_id,
        success: true,
        result: heuristic::score(text),
        path: AnalysisPath::Fallback,
    }
}

/// HTTP client for the remote classification model
pub struct RemoteClassifier {
    http_client: Arc<reqwest::Client>,
    endpoint: String,
    timeout: Duration,
}

impl RemoteClassifier {
    /// Create a classifier for `endpoint`, bounding each call by `timeout`
    pub fn new(http_client: Arc<reqwest::Client>, endpoint: String, timeout: Duration) -> Self {
        Self {
            http_client,
            endpoint,
            timeout,
        }
    }

    /// Make exactly one classification call
    pub async fn classify(&self, request_id: &str, text: &str) -> Result<RemoteVerdict, RemoteError> {
        let started = Instant::now();
        let outcome = self.send(request_id, text).await;

        let label = if outcome.is_ok() { "success" } else { "error" };
        crate::metrics::REMOTE_REQUEST_DURATION_SECONDS
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());
        if let Err(error) = &outcome {
            crate::metrics::REMOTE_FAILURES_TOTAL
                .with_label_values(&[error.reason()])
                .inc();
        }

        outcome
    }

    async fn send(&self, request_id: &str, text: &str) -> Result<RemoteVerdict, RemoteError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&serde_json::json!({
                "request_id": request_id,
                "text": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let bytes = response.bytes().await?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;

        RemoteVerdict::from_body(&body)
    }
}

/// Analysis orchestrator
pub struct AnalysisService {
    remote: Option<RemoteClassifier>,
}

impl AnalysisService {
    /// Create the orchestrator; `remote` is `None` to always score locally
    pub fn new(remote: Option<RemoteClassifier>) -> Self {
        Self { remote }
    }

    /// Analyze `text`
    ///
    /// A non-empty caller-supplied `request_id` is used verbatim;
    /// otherwise a fresh one is generated.
    pub async fn analyze(&self, text: &str, request_id: Option<String>) -> AnalysisOutcome {
        let request_id = request_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_request_id);

        let remote = match &self.remote {
            Some(classifier) => Some(classifier.classify(&request_id, text).await),
            None => None,
        };

        let outcome = select_outcome(request_id, text, remote);
        crate::metrics::ANALYSES_TOTAL
            .with_label_values(&[outcome.path.as_str()])
            .inc();
        tracing::debug!(
            request_id = %outcome.request_id,
            path = outcome.path.as_str(),
            label = outcome.result.label.as_str(),
            "Analysis completed"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_remote_body_is_taken_as_is() {
        let verdict = RemoteVerdict::from_body(&json!({
            "request_id": "remote-1",
            "success": true,
            "result": {
                "label": "스미싱",
                "score": 0.97,
                "explanation": "lookalike domain",
                "patterns": ["url", "urgency"],
                "recommended_actions": ["do not click"],
                "raw_output": { "logits": [0.1, 0.9] }
            }
        }))
        .unwrap();

        assert_eq!(verdict.request_id.as_deref(), Some("remote-1"));
        assert!(verdict.success);
        assert_eq!(verdict.result.label, Label::Smishing);
        assert_eq!(verdict.result.score, Some(0.97));
        assert_eq!(verdict.result.patterns, vec!["url", "urgency"]);
        assert_eq!(
            verdict.result.raw_output,
            Some(json!({ "logits": [0.1, 0.9] }))
        );
    }

    #[test]
    fn partial_remote_body_falls_back_field_by_field() {
        let verdict = RemoteVerdict::from_body(&json!({
            "result": {
                "label": "suspicious",
                "score": "high",
                "patterns": ["url", 3, null],
                "recommended_actions": null
            }
        }))
        .unwrap();

        assert_eq!(verdict.request_id, None);
        assert!(verdict.success);
        assert_eq!(verdict.result.label, Label::Unknown);
        assert_eq!(verdict.result.score, None);
        assert_eq!(verdict.result.explanation, "");
        assert_eq!(verdict.result.patterns, vec!["url"]);
        assert!(verdict.result.recommended_actions.is_empty());
        assert_eq!(verdict.result.raw_output, None);
    }

    #[test]
    fn missing_result_uses_defaults() {
        let verdict = RemoteVerdict::from_body(&json!({ "success": false })).unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.result, ClassificationResult::default());
    }

    #[test]
    fn non_object_body_is_a_decode_error() {
        assert!(matches!(
            RemoteVerdict::from_body(&json!(["not", "an", "object"])),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn remote_request_id_supersedes_local_one() {
        let verdict = RemoteVerdict {
            request_id: Some("from-model".to_string()),
            success: true,
            result: ClassificationResult::default(),
        };

        let outcome = select_outcome("req_local".to_string(), "text", Some(Ok(verdict)));
        assert_eq!(outcome.request_id, "from-model");
        assert_eq!(outcome.path, AnalysisPath::Remote);
    }

    #[test]
    fn remote_error_selects_heuristic_result() {
        let text = "긴급! 계좌 정지. 즉시 인증번호 입력 http://bit.ly/abc";
        let error = RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY);

        let outcome = select_outcome("req_1".to_string(), text, Some(Err(error)));

        assert_eq!(outcome.request_id, "req_1");
        assert!(outcome.success);
        assert_eq!(outcome.path, AnalysisPath::Fallback);
        assert_eq!(outcome.result, heuristic::score(text));
    }

    #[test]
    fn no_remote_selects_heuristic_result() {
        let outcome = select_outcome("req_2".to_string(), "hello", None);
        assert!(outcome.success);
        assert_eq!(outcome.path, AnalysisPath::Fallback);
        assert_eq!(outcome.result, heuristic::score("hello"));
    }

    #[tokio::test]
    async fn analyze_without_remote_generates_request_id() {
        let service = AnalysisService::new(None);

        let outcome = service.analyze("hello", None).await;
        assert!(outcome.request_id.starts_with("req_"));
        assert!(outcome.success);

        let outcome = service.analyze("hello", Some(String::new())).await;
        assert!(outcome.request_id.starts_with("req_"));

        let outcome = service.analyze("hello", Some("mine".to_string())).await;
        assert_eq!(outcome.request_id, "mine");
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back() {
        let classifier = RemoteClassifier::new(
            Arc::new(reqwest::Client::new()),
            "http://127.0.0.1:1/predict".to_string(),
            Duration::from_secs(2),
        );
        let service = AnalysisService::new(Some(classifier));
        let text = "Your parcel is held. Pay the customs fee at https://tinyurl.com/fee";

        let outcome = service.analyze(text, Some("req_x".to_string())).await;

        assert_eq!(outcome.request_id, "req_x");
        assert!(outcome.success);
        assert_eq!(outcome.path, AnalysisPath::Fallback);
        assert_eq!(outcome.result, heuristic::score(text));
    }
}
