//! End-to-end recommendation run: guard → recommend → validate → prefetch.

use std::{sync::Arc, time::Duration};

use crate::{
    error::{ErrorKind, PipelineError, PipelineResult},
    models::{AnalyzedBook, Topic},
    services::{
        analysis::AnalysisPrefetchStage, completion::CompletionClient,
        recommendation::RecommendationStage, validation::ValidationStage,
    },
};

/// Composes the pipeline stages over one completion backend
///
/// Holds no per-run state; concurrent `run` calls are independent.
#[derive(Clone)]
pub struct BookPipeline {
    recommender: RecommendationStage,
    validator: ValidationStage,
    analyst: AnalysisPrefetchStage,
}

impl BookPipeline {
    pub fn new(client: Arc<dyn CompletionClient>, analysis_timeout: Duration) -> Self {
        Self {
            recommender: RecommendationStage::new(client.clone()),
            validator: ValidationStage::new(client.clone()),
            analyst: AnalysisPrefetchStage::new(client, analysis_timeout),
        }
    }

    /// Runs the full pipeline for raw user input
    ///
    /// Input failing the guard is rejected with `InvalidTopic` before any
    /// completion request is made.
    pub async fn run(&self, raw_topic: &str) -> PipelineResult<Vec<AnalyzedBook>> {
        let topic = Topic::parse(raw_topic)?;
        self.run_topic(&topic).await
    }

    #[tracing::instrument(skip(self, topic), fields(topic = %topic))]
    pub async fn run_topic(&self, topic: &Topic) -> PipelineResult<Vec<AnalyzedBook>> {
        let candidates = self
            .recommender
            .recommend(topic)
            .await
            .map_err(normalize_stage_error)?;

        if candidates.is_empty() {
            return Err(PipelineError::with_diagnostic(
                ErrorKind::NoBooksReturned,
                "recommendation stage returned an empty array",
            ));
        }

        let candidate_count = candidates.len();
        let outcome = self.validator.validate(candidates).await;

        if outcome.books().is_empty() {
            return Err(PipelineError::with_diagnostic(
                ErrorKind::ValidationFailed,
                format!("all {} candidates rejected", candidate_count),
            ));
        }

        if outcome.is_fail_open() {
            tracing::warn!(
                candidates = candidate_count,
                "Proceeding with unvalidated candidates"
            );
        } else if outcome.books().len() < candidate_count {
            tracing::warn!(
                validated = outcome.books().len(),
                candidates = candidate_count,
                "Only some recommended books passed validation"
            );
        }

        let analyzed = self.analyst.prefetch_all(outcome.into_books()).await;

        tracing::info!(books = analyzed.len(), "Recommendation run completed");

        Ok(analyzed)
    }
}

/// Keeps categorized kinds and folds anything outside the stage taxonomy
/// into `ApiError`
fn normalize_stage_error(err: PipelineError) -> PipelineError {
    match err.kind {
        ErrorKind::AiDeclinedNonsensical
        | ErrorKind::ParseError
        | ErrorKind::ApiError
        | ErrorKind::NetworkError => err,
        ErrorKind::InvalidTopic | ErrorKind::NoBooksReturned | ErrorKind::ValidationFailed => {
            PipelineError {
                kind: ErrorKind::ApiError,
                diagnostic: err.diagnostic,
            }
        }
    }
}
