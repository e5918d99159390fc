pub mod analysis;
pub mod completion;
pub mod input_guard;
pub mod json_extract;
pub mod pipeline;
pub mod prompts;
pub mod recommendation;
pub mod report;
pub mod validation;

pub use analysis::AnalysisPrefetchStage;
pub use completion::{CompletionClient, CompletionOptions, OpenRouterClient};
pub use pipeline::BookPipeline;
pub use recommendation::RecommendationStage;
pub use validation::{ValidationOutcome, ValidationStage};
