use std::sync::Arc;

use crate::{
    error::{ErrorKind, PipelineError, PipelineResult},
    models::{CandidateBook, ValidatedBook},
    services::{
        completion::{CompletionClient, CompletionOptions},
        json_extract, prompts,
    },
};

const VALIDATE_OPTIONS: CompletionOptions = CompletionOptions::new(0.1, 1000);

/// Result of asking the completion service to weed out fabricated books
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The service answered; these candidates survived, in candidate order
    Filtered(Vec<ValidatedBook>),
    /// The service could not judge the list, so every candidate is accepted
    FailOpen(Vec<ValidatedBook>),
}

impl ValidationOutcome {
    pub fn books(&self) -> &[ValidatedBook] {
        match self {
            ValidationOutcome::Filtered(books) | ValidationOutcome::FailOpen(books) => books,
        }
    }

    pub fn into_books(self) -> Vec<ValidatedBook> {
        match self {
            ValidationOutcome::Filtered(books) | ValidationOutcome::FailOpen(books) => books,
        }
    }

    pub fn is_fail_open(&self) -> bool {
        matches!(self, ValidationOutcome::FailOpen(_))
    }
}

/// Second-opinion filter over recommendation candidates
///
/// Advisory only: any failure while asking for or reading the verdict falls
/// back to the unfiltered list.
#[derive(Clone)]
pub struct ValidationStage {
    client: Arc<dyn CompletionClient>,
}

impl ValidationStage {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn validate(&self, candidates: Vec<CandidateBook>) -> ValidationOutcome {
        if candidates.is_empty() {
            return ValidationOutcome::Filtered(Vec::new());
        }

        match self.judge(&candidates).await {
            Ok(verdict) => {
                match select_survivors(&candidates, &verdict) {
                    Some(survivors) => {
                        tracing::info!(
                            validated = survivors.len(),
                            candidates = candidates.len(),
                            "Validation completed"
                        );
                        ValidationOutcome::Filtered(
                            survivors.into_iter().map(ValidatedBook::accept).collect(),
                        )
                    }
                    None => {
                        tracing::warn!(
                            returned = verdict.len(),
                            "Validation reply matched no candidate, using all books"
                        );
                        Self::fail_open(candidates)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    kind = %e.kind,
                    diagnostic = e.diagnostic.as_deref().unwrap_or(""),
                    "Validation unavailable, using all books"
                );
                Self::fail_open(candidates)
            }
        }
    }

    async fn judge(&self, candidates: &[CandidateBook]) -> PipelineResult<Vec<CandidateBook>> {
        let prompt = prompts::validation(candidates);
        let content = self.client.complete(&prompt, VALIDATE_OPTIONS).await?;

        json_extract::parse_array(&content)
            .map_err(|e| PipelineError::with_diagnostic(ErrorKind::ParseError, e.to_string()))
    }

    fn fail_open(candidates: Vec<CandidateBook>) -> ValidationOutcome {
        ValidationOutcome::FailOpen(candidates.into_iter().map(ValidatedBook::accept).collect())
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn same_book(a: &CandidateBook, b: &CandidateBook) -> bool {
    normalize(&a.title) == normalize(&b.title) && normalize(&a.author) == normalize(&b.author)
}

/// Keeps candidates the verdict vouches for, in candidate order
///
/// Returns `None` when the verdict is non-empty but names none of the
/// candidates: the reply is unusable rather than a rejection of everything.
fn select_survivors(
    candidates: &[CandidateBook],
    verdict: &[CandidateBook],
) -> Option<Vec<CandidateBook>> {
    let survivors: Vec<CandidateBook> = candidates
        .iter()
        .filter(|candidate| verdict.iter().any(|kept| same_book(candidate, kept)))
        .cloned()
        .collect();

    if survivors.is_empty() && !verdict.is_empty() {
        return None;
    }

    Some(survivors)
}
