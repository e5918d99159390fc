use serde::{Deserialize, Serialize, Serializer};

/// Placeholder stored in place of an analysis whose request failed
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis not available at this time.";

/// A book suggested by the completion service, not yet checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl CandidateBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: description.into(),
        }
    }
}

/// A candidate that survived validation (or was accepted by the fail-open path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedBook(CandidateBook);

impl ValidatedBook {
    /// Only the validation stage decides what counts as validated
    pub(crate) fn accept(candidate: CandidateBook) -> Self {
        Self(candidate)
    }

    pub fn title(&self) -> &str {
        &self.0.title
    }

    pub fn author(&self) -> &str {
        &self.0.author
    }

    pub fn description(&self) -> &str {
        &self.0.description
    }

    pub fn as_candidate(&self) -> &CandidateBook {
        &self.0
    }
}

/// Outcome of one book's analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Available(String),
    Unavailable,
}

impl Analysis {
    /// Analysis text, or the fixed sentinel when unavailable
    pub fn as_str(&self) -> &str {
        match self {
            Analysis::Available(text) => text,
            Analysis::Unavailable => ANALYSIS_UNAVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Analysis::Available(_))
    }
}

impl Serialize for Analysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Final record handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedBook {
    /// Dense 0-based position in the final result
    pub index: usize,
    #[serde(flatten)]
    pub book: ValidatedBook,
    pub analysis: Analysis,
}

impl AnalyzedBook {
    pub fn title(&self) -> &str {
        self.book.title()
    }

    pub fn author(&self) -> &str {
        self.book.author()
    }
}
