//! Local heuristic scorer
//!
//! Pure, deterministic fallback used whenever the remote model is not
//! configured or fails. Matches a fixed table of weighted signals in
//! Korean and English wording.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::{ClassificationResult, Label};

/// Score at or above which a text is labelled as smishing
pub const SMISHING_THRESHOLD: f64 = 0.5;

struct Signal {
    name: &'static str,
    weight: f64,
    pattern: Regex,
}

static SIGNALS: LazyLock<Vec<Signal>> = LazyLock::new(|| {
    let table: [(&str, f64, &str); 9] = [
        ("url", 0.25, r"(?i)\bhttps?://\S+|\bwww\.\S+"),
        (
            "shortened_url",
            0.25,
            r"(?i)\b(bit\.ly|tinyurl\.com|goo\.gl|t\.co|me2\.do|vo\.la|han\.gl|url\.kr|is\.gd|ow\.ly)/\S*",
        ),
        (
            "urgency",
            0.2,
            r"(?i)(즉시|긴급|급하게|지금\s*바로|24시간|기한|만료|정지|immediately|urgent|within 24 hours|expires?\b|suspend|disabled)",
        ),
        (
            "account_or_payment",
            0.2,
            r"(?i)(계좌|송금|입금|결제|카드|환급|대출|상품권|\baccount\b|payment|\bbank\b|refund|gift ?card|wire transfer)",
        ),
        (
            "impersonation",
            0.2,
            r"(?i)(택배|배송|우체국|통운|검찰|경찰|국세청|건강보험|은행|delivery|parcel|customs|police|tax office|support team|security team)",
        ),
        (
            "personal_info_request",
            0.3,
            r"(?i)(인증번호|비밀번호|보안카드|주민등록번호|신분증|개인정보|\botp\b|password|verification code|social security|verify your (account|identity)|\blog ?in\b)",
        ),
        (
            "app_install",
            0.3,
            r"(?i)(앱[을를]?\s*설치|어플[을를]?\s*설치|\.apk\b|install (the|this|our) app|download (the|this|our) app)",
        ),
        (
            "prize_lure",
            0.2,
            r"(?i)(당첨|경품|무료\s*쿠폰|congratulations|you won|winner|claim your (prize|reward))",
        ),
        (
            "callback_number",
            0.1,
            r"\+?\d{2,3}[-\s]\d{3,4}[-\s]\d{4}",
        ),
    ];

    table
        .into_iter()
        .map(|(name, weight, pattern)| Signal {
            name,
            weight,
            pattern: Regex::new(pattern).expect("signal pattern is a valid regex"),
        })
        .collect()
});

/// Classify `text` with the local signal table
pub fn score(text: &str) -> ClassificationResult {
    if text.trim().is_empty() {
        return ClassificationResult {
            label: Label::Unknown,
            score: None,
            explanation: "The message is empty; there is nothing to analyze.".to_string(),
            patterns: Vec::new(),
            recommended_actions: vec!["Paste the full message text and try again.".to_string()],
            raw_output: Some(serde_json::json!({ "engine": "heuristic", "signals": 0 })),
        };
    }

    let matched: Vec<&Signal> = SIGNALS
        .iter()
        .filter(|signal| signal.pattern.is_match(text))
        .collect();

    let total: f64 = matched.iter().map(|signal| signal.weight).sum();
    let score = ((total.min(1.0)) * 100.0).round() / 100.0;
    let patterns: Vec<String> = matched.iter().map(|signal| signal.name.to_string()).collect();

    let label = if score >= SMISHING_THRESHOLD {
        Label::Smishing
    } else {
        Label::Benign
    };

    let explanation = match (label, patterns.is_empty()) {
        (Label::Smishing, _) => format!(
            "Matched {} phishing signals ({}). Treat this message as a likely smishing attempt.",
            patterns.len(),
            patterns.join(", ")
        ),
        (_, true) => "No phishing signals were found in this message.".to_string(),
        (_, false) => format!(
            "Matched weak signals ({}), below the phishing threshold.",
            patterns.join(", ")
        ),
    };

    ClassificationResult {
        label,
        score: Some(score),
        explanation,
        raw_output: Some(serde_json::json!({
            "engine": "heuristic",
            "signals": patterns.len(),
        })),
        patterns,
        recommended_actions: recommended_actions(label),
    }
}

fn recommended_actions(label: Label) -> Vec<String> {
    let actions: &[&str] = match label {
        Label::Smishing => &[
            "Do not open links or install apps from this message.",
            "Never share verification codes, passwords or card numbers.",
            "Contact the sender through an official phone number or app.",
            "Report the message to 118 (KISA) and delete it.",
        ],
        Label::Benign => &["No action needed. Stay cautious with unexpected links."],
        Label::Unknown => &["Paste the full message text and try again."],
    };
    actions.iter().map(|action| action.to_string()).collect()
}
