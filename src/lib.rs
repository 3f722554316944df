//! # earnings-corpus
//!
//! Builds a labeled text corpus of quarterly earnings releases from SEC 8-K
//! filings.
//!
//! Each filing is reduced to the prose of its EX-99 exhibit, stripped of
//! tables and boilerplate, and filed under `neg`, `neut` or `pos` by how the
//! issuer's stock moved over the following business days.
//!
//! ## Quick Start
//!
//! ```rust
//! use earnings_corpus::{clean_exhibit, FilingLines};
//!
//! let filing = b"<TYPE>EX-99.1\n<TEXT>\n<p>ACME reports fourth quarter results.</p>\n<p>Sales rose.</p>\n</TEXT>\n";
//! let text = clean_exhibit(FilingLines::from_bytes(filing), 0.05)?;
//! assert_eq!(text, "ACME reports fourth quarter results.\n\nSales rose.");
//! # Ok::<(), earnings_corpus::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Exhibit location** ([`exhibit`]): first EX-99 text body of the filing
//! - **Normalization** ([`normalize`]): markup to paragraphs, tables dropped
//! - **Noise filtering** ([`noise`]): named regex rules drop boilerplate blocks
//! - **Classification** ([`classify`]): compounded return over a business-day window
//!
//! [`Pipeline`] ties these together over a directory of filings found by
//! [`discovery::discover`], writing into a [`Corpus`].

use std::io::BufRead;

mod error;
mod options;
mod patterns;

/// Business-day arithmetic.
pub mod bday;

/// Return-window classification.
pub mod classify;

/// On-disk labeled corpus.
pub mod corpus;

/// Filing discovery on disk.
pub mod discovery;

/// Byte decoding and cp1252 gremlin repair.
pub mod encoding;

/// Exhibit location inside a filing container.
pub mod exhibit;

/// Raw filings and line streams.
pub mod filing;

/// Block-level boilerplate filter.
pub mod noise;

/// Exhibit markup to plain text.
pub mod normalize;

/// Per-filing orchestration.
pub mod pipeline;

/// Closing-price series and sources.
pub mod prices;

// Public API - re-exports
pub use classify::{ClassLabel, ClassScheme, ReturnClassifier};
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use filing::{FilingLines, FilingReference};
pub use noise::{NoiseFilter, NoiseRule};
pub use options::Options;
pub use pipeline::{FilingOutcome, Pipeline, RunSummary};
pub use prices::{CsvPriceSource, EquityCache, PriceSeries, PriceSource, StaticPriceSource};

/// Runs the text stages on a filing's lines: exhibit location, normalization,
/// gremlin repair and noise filtering.
///
/// Returns an empty string when the filing has no exhibit text, and
/// `Error::Io` when the stream broke off before the exhibit was complete. No
/// relevance check is made.
pub fn clean_exhibit<R: BufRead>(mut lines: FilingLines<R>, trim_limit: f64) -> Result<String> {
    let fragment = exhibit::locate_exhibit(lines.by_ref());
    lines.check()?;

    let text = normalize::extract_text(&fragment);
    if text.is_empty() {
        return Ok(text);
    }
    let text = encoding::repair_gremlins(&text);
    Ok(NoiseFilter::new(trim_limit).filter(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_exhibit_without_exhibit() {
        let lines = FilingLines::from_bytes(b"<TYPE>8-K\n<TEXT>\n</TEXT>\n");
        assert_eq!(clean_exhibit(lines, 0.05).unwrap(), "");
    }

    #[test]
    fn test_clean_exhibit_drops_boilerplate() {
        let filing = "<TYPE>EX-99.1\n<TEXT>\n<p>Sales rose on demand.</p>\n\
            <p>A conference call will be held tomorrow.</p>\n</TEXT>\n";
        let text = clean_exhibit(FilingLines::from_bytes(filing.as_bytes()), 0.05).unwrap();
        assert_eq!(text, "Sales rose on demand.");
    }
}
