//! Extract-then-parse for JSON arrays embedded in free-form model output.
//!
//! Models often wrap the requested JSON in prose or code fences, and the
//! prose may itself contain brackets ("see [1]"). Each `[` is tried in turn
//! and the first one that opens a decodable array wins. "No array at all"
//! stays distinguishable from "an array that does not decode".

use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON array found in model output")]
    NoArray,

    #[error("JSON array could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Byte offsets of every `[` that has a `]` somewhere after it
fn array_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let last_close = text.rfind(']');
    text.match_indices('[')
        .map(|(start, _)| start)
        .take_while(move |start| last_close.is_some_and(|close| *start < close))
}

/// Locates and decodes the first array of `T` in model output
///
/// Text after the array is ignored. When bracketed spans exist but none
/// decode, the error from the earliest span is returned.
pub fn parse_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ExtractError> {
    let mut first_error = None;

    for start in array_starts(text) {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<T>>();
        match values.next() {
            Some(Ok(items)) => return Ok(items),
            Some(Err(err)) => {
                first_error.get_or_insert(err);
            }
            None => {}
        }
    }

    Err(first_error.map_or(ExtractError::NoArray, ExtractError::Malformed))
}
