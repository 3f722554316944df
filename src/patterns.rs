//! Compiled regex patterns and literal markers used across the pipeline.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the pipeline stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::noise::NoiseRule;

// =============================================================================
// Filing Container Markers
// =============================================================================

/// Document type line opening an EX-99 exhibit (99.1, 99.2, ... all match).
pub const EXHIBIT_MARKER: &str = "<TYPE>EX-99";

/// Opens the text body of a document inside the container.
pub const TEXT_OPEN_MARKER: &str = "<TEXT>";

/// Closes the text body of a document.
pub const TEXT_CLOSE_MARKER: &str = "</TEXT>";

/// Inline earnings announcement, for filings without a clean EX-99 marker.
/// "accounced" is a misspelling that shows up in real filings.
pub static ANNOUNCEMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i).+(announces|reports|accounced|reported).+quarter.+")
        .expect("ANNOUNCEMENT_LINE regex")
});

// =============================================================================
// Discovery Patterns
// =============================================================================

/// `<symbol>-<date>-8-K.txt`; the symbol stops at the first dash.
pub static FILING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\w+)-(.+)-8-K\.txt$").expect("FILING_NAME regex")
});

// =============================================================================
// Markup Cleanup Patterns
// =============================================================================

/// `<br>` in any of its spellings; becomes a newline before parsing.
pub static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("BREAK_TAG regex")
});

pub static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script.*?>.*?</script>|<style.*?>.*?</style>").expect("SCRIPT_STYLE regex")
});

pub static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->\n?").expect("HTML_COMMENT regex")
});

/// Any tag left over after tree extraction (escaped SGML tags, stray markup).
pub static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<.*?>").expect("ANY_TAG regex")
});

/// Runs of spaces. Newlines are kept so paragraph breaks survive.
pub static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" {2,}").expect("SPACE_RUN regex")
});

/// Matches leading/trailing whitespace on lines.
pub static LINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]+|[ \t]+$").expect("LINE_WHITESPACE regex")
});

/// Matches three or more consecutive newlines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex")
});

// =============================================================================
// Noise Rules
// =============================================================================

/// Flags for every noise rule except the whole-block table header.
const NOISE_FLAGS: &str = "(?ims)";

/// (name, description, pattern) for the default noise battery, in evaluation order.
///
/// Patterns without `NOISE_FLAGS` are marked with a leading `!`.
const NOISE_RULE_TABLE: &[(&str, &str, &str)] = &[
    ("ACCOUNTING", "GAAP accounting boilerplate",
        r"^.+accordance with.+(generally accepted|GAAP).+$"),
    ("FORWARD-LOOKING", "forward-looking statement disclaimer",
        r"^\s*.*forward-looking.+statement.*$"),
    ("CAUTIONARY-STATEMENT", "cautionary statement disclaimer",
        r"^\s*.*cautionary.+statement.*$"),
    ("CONFERENCE CALL", "conference call announcement",
        r"^\s*.*conference call.*$"),
    ("LIVE WEBCAST", "webcast announcement",
        r"^.+live webcast.+$"),
    ("COMPANY INFO1", "company listing blurb",
        r"^.+ is.+(a|an|the).+under.+the.+symbol [A-Z]+.$"),
    ("COMPANY INFO2", "company founding blurb",
        r"^.+founded.+is (a|an|the)"),
    ("COMPANY INFO3", "company founding blurb",
        r"^Founded.+is"),
    ("COMPANY INFO4", "pointer to additional information",
        r".+(additional|more).+information.+"),
    ("COMPANY INFO5", "company description blurb",
        r"^.+ is (a|an|the).+company.+"),
    ("COMPANY CONTACT", "phone number",
        r".+\d{1}\D*\d{3}\D*\d{3}\D*\d{4}\D*.+"),
    ("TABLE HEADER1", "parenthesized table column tag",
        r"!^\([0-9A-Z]+\)$"),
    ("TABLE HEADER2", "in millions table header",
        r"\D+.*in\s+millions\D*.*\D+$"),
    ("TABLE HEADER3", "in thousands table header",
        r"\D+.*in\s+thousands\D*.*\D+$"),
    ("TABLE HEADER4", "unaudited table header",
        r"\D+.*unaudited.*\D+$"),
    ("ABOUT HEADER", "ABOUT section header",
        r"^ABOUT .+"),
    ("NOTES", "note marker",
        r"^note\w{0,2}\D*.+"),
    ("EXHIBIT", "exhibit reference",
        r".*Exhibit\s*\W*99.*"),
    ("FOOTNOTES", "numbered footnote",
        r"^\s*\(\d+\)\s*.+"),
    ("TRADEMARKS1", "registered trademark notice",
        r".+registered trademark.+"),
    ("TRADEMARKS2", "trademark ownership notice",
        r".+trademark.+of.+"),
    ("PAGE NUMBERS1", "lone number artifact",
        r"^\s*\D*\d+\D*\s*$"),
    ("PAGE NUMBERS2", "page number artifact",
        r"\s*page\s*\d+\s*\w*\d*.+"),
    ("RELEASE NOTE1", "press release legal note",
        r"^this.+press.+release.+"),
    ("RELEASE NOTE2", "securities act reference",
        r".+securities.+act.+of.+"),
    ("COPYRIGHTS", "copyright notice",
        r".+copyright.+all rights reserved."),
];

/// Default noise battery.
pub static NOISE_RULES: LazyLock<Vec<NoiseRule>> = LazyLock::new(|| {
    NOISE_RULE_TABLE
        .iter()
        .map(|(name, description, pattern)| {
            let pattern = match pattern.strip_prefix('!') {
                Some(bare) => (*bare).to_string(),
                None => format!("{NOISE_FLAGS}{pattern}"),
            };
            NoiseRule::new(name, description, &pattern).expect("default noise rule")
        })
        .collect()
});
