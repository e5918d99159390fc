//! Request correlation for recommendation runs.
//!
//! One pipeline run fans out into several completion calls, so the request
//! id is the only thing tying their log lines together. It is honoured from
//! `x-request-id`, echoed back on every response, and included in error
//! bodies so a user-visible failure can be matched to the operator-only
//! diagnostic in the logs.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::PipelineError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Caller-supplied id, if present and a valid UUID
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(RequestId)
    }

    /// Binds a pipeline failure to this request
    pub fn tag(self, error: PipelineError) -> RequestFailure {
        RequestFailure {
            request_id: self,
            error,
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A pipeline failure rendered with the id of the request it ended
#[derive(Debug)]
pub struct RequestFailure {
    pub request_id: RequestId,
    pub error: PipelineError,
}

impl IntoResponse for RequestFailure {
    fn into_response(self) -> Response {
        let request_id = self.request_id.to_string();
        self.error.log(Some(&request_id));

        let mut body = self.error.body();
        body["request_id"] = request_id.into();

        (self.error.kind.status(), Json(body)).into_response()
    }
}

/// Assigns the [`RequestId`] before routing and echoes it on the way out
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers()).unwrap_or_default();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Trace span carrying the request id, for `TraceLayer::make_span_with`
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "recommendation_http",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
