//! Exhibit markup to plain text.
//!
//! The exhibit body is HTML of wildly varying quality (or no HTML at all for
//! older filings). Financial tables are dropped outright: they are mostly
//! numbers, and regex cleanup of them is unreliable. The remaining prose is
//! segmented by paragraph when the markup has paragraphs, and taken as one
//! block otherwise.

use dom_query::{Document, Selection};

use crate::noise::BLOCK_SEPARATOR;
use crate::patterns::{
    ANY_TAG, BREAK_TAG, HTML_COMMENT, LINE_WHITESPACE, MULTIPLE_NEWLINES, SCRIPT_STYLE, SPACE_RUN,
};

/// Extract the prose of an exhibit fragment.
///
/// Returns an empty string when there is nothing to extract; never fails.
///
/// # Example
///
/// ```rust
/// use earnings_corpus::normalize::extract_text;
///
/// let fragment = "<TEXT>\n<p>Revenue rose.</p>\n<table><tr><td>1,024</td></tr></table>\n<p>Margins held.</p>\n</TEXT>";
/// assert_eq!(extract_text(fragment), "Revenue rose.\n\nMargins held.");
/// ```
#[must_use]
pub fn extract_text(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    let fragment = BREAK_TAG.replace_all(fragment, "\n");
    let doc = Document::from(fragment.as_ref());
    let body = doc.select("body");
    if !body.exists() {
        return String::new();
    }

    doc.select("table").remove();
    doc.select("script, style").remove();

    let raw = match paragraph_blocks(&body) {
        Some(blocks) => blocks,
        None => body.text().to_string(),
    };
    clean_markup(&raw)
}

/// Paragraph-segmented text, or `None` when the body has fewer than two
/// non-empty paragraph-level elements. `<div>` stands in when there are no
/// `<p>`.
fn paragraph_blocks(body: &Selection) -> Option<String> {
    let mut blocks = body.select("p");
    if blocks.is_empty() {
        blocks = body.select("div");
    }

    let texts: Vec<String> = blocks
        .iter()
        .map(|block| block.text().replace('\n', " ").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    if texts.len() < 2 {
        return None;
    }
    Some(texts.join(BLOCK_SEPARATOR))
}

/// Reduce leftover markup in extracted text to plain text.
///
/// Drops script/style blocks and comments, replaces remaining tags with a
/// space, and normalizes spaces while keeping paragraph breaks.
#[must_use]
pub fn clean_markup(text: &str) -> String {
    let text = SCRIPT_STYLE.replace_all(text.trim(), "");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, " ");
    let text = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = LINE_WHITESPACE.replace_all(&text, "");
    let text = MULTIPLE_NEWLINES.replace_all(&text, BLOCK_SEPARATOR);
    text.trim().to_string()
}
