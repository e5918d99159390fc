use crate::error::PipelineResult;

pub mod openrouter;

pub use openrouter::OpenRouterClient;

/// Generation parameters for a single completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionOptions {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Text-generation backend abstraction
///
/// The pipeline stages depend only on this trait. Transport, authentication
/// and endpoint details stay inside the implementation, so a different
/// provider can be plugged in without touching stage logic.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit a single-turn prompt and return the generated text
    ///
    /// Fails with `NetworkError` when the service could not be reached and
    /// `ApiError` for any other transport or envelope problem.
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> PipelineResult<String>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
