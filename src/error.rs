use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Closed set of failure kinds the recommendation pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Topic failed sanitization/validation and never entered the pipeline
    InvalidTopic,
    /// The completion service returned an empty candidate array
    NoBooksReturned,
    /// The completion service answered without any array at all
    AiDeclinedNonsensical,
    /// Every candidate was rejected by the validation stage
    ValidationFailed,
    /// Non-success response or malformed envelope from the completion service
    ApiError,
    /// The completion service could not be reached
    NetworkError,
    /// An array was found in the model output but could not be decoded
    ParseError,
}

impl ErrorKind {
    /// Fixed, user-facing message for this kind.
    ///
    /// These strings are the only error text that ever leaves the service.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidTopic => {
                "Please enter a valid learning topic (letters, numbers, and common punctuation only)."
            }
            ErrorKind::NoBooksReturned => {
                "No books found for your search. Please try a different topic."
            }
            ErrorKind::AiDeclinedNonsensical => "Please enter a valid learning topic.",
            ErrorKind::ValidationFailed => {
                "We encountered an issue finding books for your topic. Please try a different search."
            }
            ErrorKind::ApiError => "Service temporarily unavailable. Please try again later.",
            ErrorKind::NetworkError => {
                "Connection issue. Please check your internet and try again."
            }
            ErrorKind::ParseError => {
                "There was an issue processing the results. Please try again."
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidTopic => "invalid_topic",
            ErrorKind::NoBooksReturned => "no_books_returned",
            ErrorKind::AiDeclinedNonsensical => "ai_declined_nonsensical",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::ApiError => "api_error",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::ParseError => "parse_error",
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidTopic => StatusCode::BAD_REQUEST,
            ErrorKind::NoBooksReturned => StatusCode::NOT_FOUND,
            ErrorKind::AiDeclinedNonsensical | ErrorKind::ValidationFailed => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorKind::ApiError | ErrorKind::ParseError => StatusCode::BAD_GATEWAY,
            ErrorKind::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Pipeline-level error: a kind plus an optional operator-only diagnostic
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct PipelineError {
    pub kind: ErrorKind,
    /// Free-form detail for logs. Never rendered to end users.
    pub diagnostic: Option<String>,
}

impl PipelineError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(kind: ErrorKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl From<ErrorKind> for PipelineError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() {
            ErrorKind::NetworkError
        } else {
            ErrorKind::ApiError
        };
        Self::with_diagnostic(kind, err.to_string())
    }
}

impl PipelineError {
    /// Logs the failure with its diagnostic, at a level matching its status
    pub(crate) fn log(&self, request_id: Option<&str>) {
        let request_id = request_id.unwrap_or("none");
        let diagnostic = self.diagnostic.as_deref().unwrap_or("");

        if self.kind.status().is_server_error() {
            tracing::error!(
                kind = %self.kind,
                request_id = %request_id,
                diagnostic,
                "Recommendation request failed"
            );
        } else {
            tracing::warn!(
                kind = %self.kind,
                request_id = %request_id,
                diagnostic,
                "Recommendation request rejected"
            );
        }
    }

    /// The public JSON body: fixed message and code, never the diagnostic
    pub(crate) fn body(&self) -> Value {
        json!({
            "error": self.kind.user_message(),
            "kind": self.kind.code(),
        })
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        self.log(None);
        (self.kind.status(), Json(self.body())).into_response()
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
