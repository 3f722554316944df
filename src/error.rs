//! Error types for earnings-corpus.
//!
//! Most of these never escape a single filing: the pipeline turns them into a
//! [`FilingOutcome`](crate::FilingOutcome) and logs them. Only configuration and
//! worker-pool errors reach the caller of [`Pipeline::run`](crate::Pipeline::run).

use std::path::PathBuf;

use chrono::NaiveDate;

/// Error type for corpus building operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a filing or writing a corpus entry failed.
    #[error("I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A price file could not be read as CSV.
    #[error("Price file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// No price series could be obtained for the symbol.
    #[error("No price series for {symbol}: {reason}")]
    NoPriceSeries { symbol: String, reason: String },

    /// The price series has no close for a date inside the return window.
    #[error("No close price for {symbol} on {date}")]
    DataUnavailable { symbol: String, date: NaiveDate },

    /// A noise rule pattern failed to compile.
    #[error("Noise rule {name} has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Options are out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The worker pool could not be built.
    #[error("Worker pool failed to start: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the missing-price-data family, which is skipped and not retried.
    #[must_use]
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. } | Self::NoPriceSeries { .. }
        )
    }
}

/// Result type alias for corpus building operations.
pub type Result<T> = std::result::Result<T, Error>;
