use serde::Serialize;
use std::fmt::Display;

use crate::{error::PipelineResult, services::input_guard};

/// A sanitized, validated learning topic
///
/// Only obtainable through [`Topic::parse`], so holding one proves the
/// string passed the input guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Sanitizes and validates raw user input
    pub fn parse(raw: &str) -> PipelineResult<Self> {
        input_guard::accept(raw).map(Topic)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
