//! Screening of raw topic strings before they reach any prompt.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ErrorKind, PipelineError, PipelineResult};

pub const MIN_TOPIC_CHARS: usize = 2;
pub const MAX_TOPIC_CHARS: usize = 200;

static HTML_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>"'&]"#).unwrap());

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap());

static SCRIPT_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)script|javascript|vbscript|onload|onerror|onclick").unwrap());

static ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_.,!?()&+:;/\\]{2,200}$").unwrap());

const SUSPICIOUS_PATTERNS: [&str; 7] = [
    "<script",
    "javascript:",
    "data:text/html",
    "eval(",
    "function(",
    "settimeout(",
    "setinterval(",
];

/// Strips markup, control characters and script keywords, then trims and
/// truncates to [`MAX_TOPIC_CHARS`].
///
/// Keyword removal repeats until nothing matches, so fragments such as
/// `scrscriptipt` cannot reassemble into a keyword. That also makes the
/// function idempotent.
pub fn sanitize(raw: &str) -> String {
    let without_html = HTML_CHARS.replace_all(raw, "");
    let mut cleaned = CONTROL_CHARS.replace_all(&without_html, "").into_owned();

    while SCRIPT_KEYWORDS.is_match(&cleaned) {
        cleaned = SCRIPT_KEYWORDS.replace_all(&cleaned, "").into_owned();
    }

    let truncated: String = cleaned.trim().chars().take(MAX_TOPIC_CHARS).collect();
    truncated.trim().to_string()
}

/// Allow-list check plus a deny-list of script-injection fragments
pub fn validate(input: &str) -> bool {
    let len = input.chars().count();
    if !(MIN_TOPIC_CHARS..=MAX_TOPIC_CHARS).contains(&len) {
        return false;
    }

    if !ALLOWED.is_match(input) {
        return false;
    }

    let lowered = input.to_lowercase();
    !SUSPICIOUS_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Sanitize then validate; the only way a string becomes a topic
pub(crate) fn accept(raw: &str) -> PipelineResult<String> {
    if raw.trim().is_empty() {
        return Err(PipelineError::with_diagnostic(
            ErrorKind::InvalidTopic,
            "empty topic",
        ));
    }

    let sanitized = sanitize(raw);
    if !validate(&sanitized) {
        tracing::debug!(
            raw_len = raw.len(),
            sanitized_len = sanitized.len(),
            "Topic rejected by input guard"
        );
        return Err(PipelineError::with_diagnostic(
            ErrorKind::InvalidTopic,
            "topic failed allow-list or deny-list check",
        ));
    }

    Ok(sanitized)
}
