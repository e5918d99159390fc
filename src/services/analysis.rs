use futures::future::join_all;
use std::{sync::Arc, time::Duration};

use crate::{
    error::{ErrorKind, PipelineError, PipelineResult},
    models::{Analysis, AnalyzedBook, ValidatedBook},
    services::{
        completion::{CompletionClient, CompletionOptions},
        prompts,
    },
};

const ANALYSIS_OPTIONS: CompletionOptions = CompletionOptions::new(0.7, 1200);

/// Concurrently fetches a long-form analysis for every validated book
///
/// Failures are isolated per book: a failed or timed-out request yields
/// [`Analysis::Unavailable`] for that book and never fails the batch.
#[derive(Clone)]
pub struct AnalysisPrefetchStage {
    client: Arc<dyn CompletionClient>,
    per_book_timeout: Duration,
}

impl AnalysisPrefetchStage {
    pub fn new(client: Arc<dyn CompletionClient>, per_book_timeout: Duration) -> Self {
        Self {
            client,
            per_book_timeout,
        }
    }

    /// Resolves once every request has settled; output order and `index`
    /// follow input order
    pub async fn prefetch_all(&self, books: Vec<ValidatedBook>) -> Vec<AnalyzedBook> {
        tracing::info!(book_count = books.len(), "Prefetching analyses");

        let requests = books.iter().map(|book| self.analyze(book));
        let settled = join_all(requests).await;

        let mut unavailable = 0;
        let analyzed: Vec<AnalyzedBook> = books
            .into_iter()
            .zip(settled)
            .enumerate()
            .map(|(index, (book, result))| {
                let analysis = match result {
                    Ok(text) => Analysis::Available(text),
                    Err(e) => {
                        unavailable += 1;
                        tracing::error!(
                            title = %book.title(),
                            kind = %e.kind,
                            diagnostic = e.diagnostic.as_deref().unwrap_or(""),
                            "Analysis failed for book"
                        );
                        Analysis::Unavailable
                    }
                };
                AnalyzedBook {
                    index,
                    book,
                    analysis,
                }
            })
            .collect();

        if unavailable > 0 {
            tracing::warn!(
                success_count = analyzed.len() - unavailable,
                error_count = unavailable,
                "Partial analysis prefetch failure"
            );
        }

        analyzed
    }

    async fn analyze(&self, book: &ValidatedBook) -> PipelineResult<String> {
        let prompt = prompts::analysis(book);
        let request = self.client.complete(&prompt, ANALYSIS_OPTIONS);

        let text = tokio::time::timeout(self.per_book_timeout, request)
            .await
            .map_err(|_| {
                PipelineError::with_diagnostic(
                    ErrorKind::NetworkError,
                    format!("analysis timed out after {:?}", self.per_book_timeout),
                )
            })??;

        if text.trim().is_empty() {
            return Err(PipelineError::with_diagnostic(
                ErrorKind::ApiError,
                "empty analysis returned",
            ));
        }

        Ok(text)
    }
}
