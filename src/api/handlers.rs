use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{ErrorKind, PipelineError},
    middleware::{RequestFailure, RequestId},
    models::{AnalyzedBook, Topic},
    services::report::{self, AnalysisSection},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub index: usize,
    pub title: String,
    pub author: String,
    pub description: String,
    pub analysis: String,
    pub analysis_available: bool,
    pub sections: Vec<AnalysisSection>,
}

impl From<&AnalyzedBook> for BookResponse {
    fn from(book: &AnalyzedBook) -> Self {
        let sections = if book.analysis.is_available() {
            report::sections(book.analysis.as_str())
        } else {
            Vec::new()
        };

        Self {
            index: book.index,
            title: book.title().to_string(),
            author: book.author().to_string(),
            description: book.book.description().to_string(),
            analysis: book.analysis.as_str().to_string(),
            analysis_available: book.analysis.is_available(),
            sections,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub books: Vec<BookResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub analysis: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Runs the recommendation pipeline for a topic
///
/// An unreadable body is reported as an invalid topic; extractor detail
/// stays in the logs.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, RequestFailure> {
    let tag = move |err: PipelineError| request_id.tag(err);

    let Json(request) = payload.map_err(|rejection| {
        tag(PipelineError::with_diagnostic(
            ErrorKind::InvalidTopic,
            rejection.body_text(),
        ))
    })?;

    tracing::info!(
        request_id = %request_id,
        topic_len = request.topic.len(),
        "Processing recommendation request"
    );

    let topic = Topic::parse(&request.topic).map_err(tag)?;
    let books = state.pipeline.run_topic(&topic).await.map_err(tag)?;

    tracing::info!(
        request_id = %request_id,
        books = books.len(),
        unavailable = books.iter().filter(|b| !b.analysis.is_available()).count(),
        "Recommendations ready"
    );

    Ok(Json(RecommendationResponse {
        topic: topic.to_string(),
        generated_at: Utc::now(),
        books: books.iter().map(BookResponse::from).collect(),
    }))
}

/// Renders one book's report as markdown
pub async fn markdown_report(Json(request): Json<ReportRequest>) -> impl IntoResponse {
    let markdown = report::to_markdown(&request.title, &request.author, request.analysis.as_deref());
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    )
}
