//! Data records flowing through the recommendation pipeline.
//!
//! Each stage produces fresh values instead of mutating its input:
//! `Topic` → `CandidateBook` → `ValidatedBook` → `AnalyzedBook`.

pub mod book;
pub mod topic;

pub use book::{Analysis, AnalyzedBook, CandidateBook, ValidatedBook, ANALYSIS_UNAVAILABLE};
pub use topic::Topic;
