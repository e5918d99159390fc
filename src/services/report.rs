//! Structured views over analysis text for export and display.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::ANALYSIS_UNAVAILABLE;

/// Bold headings recognised as section breaks. Includes `Chapter Outline`,
/// which older analyses sometimes contain.
static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\*\*(Complete Synopsis|Key Themes and Concepts|Chapter Outline|Critical Review|Who Should Read This|Key Takeaways)\*\*",
    )
    .unwrap()
});

static INLINE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSection {
    /// `None` for any preamble before the first recognised heading
    pub heading: Option<String>,
    pub paragraphs: Vec<String>,
}

fn paragraphs(body: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(body)
        .map(|para| INLINE_BOLD.replace_all(para.trim(), "$1").into_owned())
        .filter(|para| !para.is_empty())
        .collect()
}

/// Splits analysis text on its section headings
pub fn sections(analysis: &str) -> Vec<AnalysisSection> {
    let mut result = Vec::new();
    let mut heading: Option<String> = None;
    let mut cursor = 0;

    for caps in SECTION_HEADING.captures_iter(analysis) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_section(&mut result, heading.take(), &analysis[cursor..whole.start()]);
        heading = Some(name.as_str().to_string());
        cursor = whole.end();
    }
    push_section(&mut result, heading, &analysis[cursor..]);

    result
}

fn push_section(result: &mut Vec<AnalysisSection>, heading: Option<String>, body: &str) {
    let paragraphs = paragraphs(body);
    if heading.is_none() && paragraphs.is_empty() {
        return;
    }
    result.push(AnalysisSection {
        heading,
        paragraphs,
    });
}

/// Markdown export of one book's report
pub fn to_markdown(title: &str, author: &str, analysis: Option<&str>) -> String {
    let body = match analysis {
        Some(text) if !text.trim().is_empty() && text != ANALYSIS_UNAVAILABLE => text.trim(),
        _ => "Analysis not available.",
    };
    format!("# {}\n\n*by {}*\n\n{}\n", title, author, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS: &str = "Intro line.\n\n**Complete Synopsis**\nFirst para.\n\nSecond **bold** para.\n\n**key takeaways**\nTakeaway.";

    #[test]
    fn test_sections_split_on_headings() {
        let parsed = sections(ANALYSIS);
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0].heading, None);
        assert_eq!(parsed[0].paragraphs, vec!["Intro line."]);

        assert_eq!(parsed[1].heading.as_deref(), Some("Complete Synopsis"));
        assert_eq!(parsed[1].paragraphs, vec!["First para.", "Second bold para."]);

        assert_eq!(parsed[2].heading.as_deref(), Some("key takeaways"));
        assert_eq!(parsed[2].paragraphs, vec!["Takeaway."]);
    }

    #[test]
    fn test_sections_without_headings() {
        let parsed = sections("Just one paragraph.");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].heading, None);
    }

    #[test]
    fn test_sections_of_empty_text() {
        assert!(sections("  \n\n ").is_empty());
    }

    #[test]
    fn test_markdown_export() {
        let md = to_markdown("Dune", "Frank Herbert", Some("**Complete Synopsis**\nSpice."));
        assert_eq!(md, "# Dune\n\n*by Frank Herbert*\n\n**Complete Synopsis**\nSpice.\n");
    }

    #[test]
    fn test_markdown_export_for_sentinel() {
        let md = to_markdown("Dune", "Frank Herbert", Some(ANALYSIS_UNAVAILABLE));
        assert!(md.ends_with("Analysis not available.\n"));
        let md = to_markdown("Dune", "Frank Herbert", None);
        assert!(md.ends_with("Analysis not available.\n"));
    }
}
