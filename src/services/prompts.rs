//! Prompt templates for each completion call the pipeline makes.

use crate::models::{CandidateBook, Topic, ValidatedBook};

/// Section headings every analysis is asked to use, in order
pub const ANALYSIS_SECTIONS: [&str; 5] = [
    "Complete Synopsis",
    "Key Themes and Concepts",
    "Critical Review",
    "Who Should Read This",
    "Key Takeaways",
];

pub fn recommendation(topic: &Topic, max_books: usize) -> String {
    format!(
        r#"You are a knowledgeable librarian and book expert. A user wants to learn about "{topic}".

CRITICAL: ONLY RECOMMEND REAL BOOKS THAT ACTUALLY EXIST

STRICT REQUIREMENTS:
- You MUST recommend only REAL, PUBLISHED books by verified authors
- You MUST provide EXACT titles and author names as they appear on the book
- NEVER invent, hallucinate, or create fictional books, authors, or titles
- If uncertain about a book's existence, DO NOT include it
- Verify each book is real and well-known in its field

DO NOT DO THIS (common AI mistakes):
- Creating fake author names with random combinations of names
- Making up book titles that sound plausible but don't exist
- Combining real authors with fake titles or vice versa
- Including books that "might exist" without certainty

WHAT TO DO:
- Only include books you're 100% confident exist
- Use exact titles and author names from real publications
- Focus on popular, well-established books in the field
- If fewer than {max_books} real books exist on the topic, return fewer books

Please recommend up to {max_books} REAL, VERIFIED books for learning about "{topic}":

Format as JSON array:
[
  {{
    "title": "Exact Real Book Title",
    "author": "Real Author Name",
    "description": "Two-sentence description of actual book content and why it's valuable."
  }}
]

Double-check each book is REAL before including it. Quality over quantity - better to return 1-2 real books than include any fake ones. If the topic is not something a person could learn about from books, do not return a JSON array at all."#
    )
}

pub fn validation(candidates: &[CandidateBook]) -> String {
    // CandidateBook only holds strings, so serialization cannot fail
    let books_json = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a book validation expert. Analyze the following book recommendations and determine which ones are REAL, EXISTING books vs fake/nonsensical content.

BOOKS TO VALIDATE:
{books_json}

VALIDATION CRITERIA:
KEEP books that are:
- Real published books with legitimate titles and authors
- Have reasonable descriptions that match the actual book
- Authors with proper names (even if uncommon)
- Titles that make sense for actual books

REJECT books that are:
- Completely made-up or fake books
- Nonsensical titles like "s,fnsd lfkj" or random character sequences
- Fake author names like "John Doe" or obvious placeholders
- Author names with excessive repetition or garbled text (e.g., "A. B. C. D. E. F. G. H..." with dozens of repeated names)
- Gibberish descriptions or content

IMPORTANT: Be generous with validation - only reject obvious fakes/gibberish. Many legitimate books have unusual titles or author names.

Respond with ONLY a JSON array of the VALID books (exact same format, in the same order). If all books are valid, return all of them. If none are valid, return an empty array."#
    )
}

pub fn analysis(book: &ValidatedBook) -> String {
    let title = book.title();
    let author = book.author();

    format!(
        r#"Create a comprehensive 800-word analysis for the REAL, EXISTING book "{title}" by {author}.

CRITICAL REQUIREMENTS:
- This book MUST actually exist - verify the title and author are correct
- All information must be FACTUALLY ACCURATE about the actual book
- NEVER make up or hallucinate content that isn't in the real book
- Base your analysis on the ACTUAL published book content only
- If you're not certain about specific details, be general but accurate

Structure your analysis with these main sections using **section headings**:

**{synopsis}**
Write 2-3 detailed paragraphs about the ACTUAL book's content, main arguments, and structure. Only include information that is factually correct about this real book.

**{themes}**
Write 2-3 paragraphs explaining the ACTUAL themes and concepts from the real book. Focus on what the book truly covers.

**{review}**
Write 2-3 paragraphs analyzing the book's actual strengths, weaknesses, writing style, and effectiveness based on the real book.

**{audience}**
Write 1-2 paragraphs about who would actually benefit from this specific book based on its real content.

**{takeaways}**
Write 2-3 paragraphs about insights readers will actually gain from this real book.

Important requirements:
- ALL information must be factually accurate
- Use **Section Title** only for the 5 main sections above
- Write in complete paragraphs with flowing text
- Do not use numbered lists, bullet points, or sub-headings
- Only include information you're confident is accurate about this specific book
- Aim for exactly 800 words total"#,
        synopsis = ANALYSIS_SECTIONS[0],
        themes = ANALYSIS_SECTIONS[1],
        review = ANALYSIS_SECTIONS[2],
        audience = ANALYSIS_SECTIONS[3],
        takeaways = ANALYSIS_SECTIONS[4],
    )
}
