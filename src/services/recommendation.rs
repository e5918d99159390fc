use std::sync::Arc;

use crate::{
    error::{ErrorKind, PipelineError, PipelineResult},
    models::{CandidateBook, Topic},
    services::{
        completion::{CompletionClient, CompletionOptions},
        json_extract::{self, ExtractError},
        prompts,
    },
};

pub const MAX_RECOMMENDATIONS: usize = 3;

const RECOMMEND_OPTIONS: CompletionOptions = CompletionOptions::new(0.7, 1000);

/// Asks the completion service for a short list of real books on a topic
#[derive(Clone)]
pub struct RecommendationStage {
    client: Arc<dyn CompletionClient>,
}

impl RecommendationStage {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Returns up to [`MAX_RECOMMENDATIONS`] candidates
    ///
    /// An empty vector is a valid answer. A reply without any array means the
    /// model declined the topic (`AiDeclinedNonsensical`); an array that does
    /// not decode is a `ParseError`.
    #[tracing::instrument(skip(self, topic), fields(topic = %topic))]
    pub async fn recommend(&self, topic: &Topic) -> PipelineResult<Vec<CandidateBook>> {
        let prompt = prompts::recommendation(topic, MAX_RECOMMENDATIONS);
        let content = self.client.complete(&prompt, RECOMMEND_OPTIONS).await?;

        let mut candidates: Vec<CandidateBook> =
            json_extract::parse_array(&content).map_err(|e| match e {
                ExtractError::NoArray => {
                    tracing::info!("Completion service declined to recommend books for topic");
                    PipelineError::with_diagnostic(ErrorKind::AiDeclinedNonsensical, e.to_string())
                }
                ExtractError::Malformed(_) => {
                    tracing::error!(error = %e, content = %content, "Failed to parse recommendations");
                    PipelineError::with_diagnostic(ErrorKind::ParseError, e.to_string())
                }
            })?;

        if candidates.len() > MAX_RECOMMENDATIONS {
            tracing::debug!(
                returned = candidates.len(),
                kept = MAX_RECOMMENDATIONS,
                "Dropping surplus recommendations"
            );
            candidates.truncate(MAX_RECOMMENDATIONS);
        }

        tracing::info!(
            candidates = candidates.len(),
            provider = self.client.name(),
            "Recommendations received"
        );

        Ok(candidates)
    }
}
