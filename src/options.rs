//! Configuration options for corpus building.
//!
//! The `Options` struct holds every tunable of the pipeline: the return window,
//! the labeling boundary, the filing-delay adjustment, the noise-filter trim
//! limit, and the worker pool size.

use crate::classify::ClassScheme;
use crate::error::{Error, Result};

/// Upper bound for `window_days`, about forty years of trading days.
pub const MAX_WINDOW_DAYS: usize = 10_000;

/// Upper bound for the magnitude of `delay_days`.
pub const MAX_DELAY_DAYS: i64 = 10_000;

/// Configuration options for corpus building.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use earnings_corpus::{ClassScheme, Options};
///
/// let options = Options {
///     window_days: 5,
///     classes: ClassScheme::Binary,
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Length of the return window in business days.
    ///
    /// The window starts at the delay-adjusted event date. It must cover at
    /// least two closes for a return to exist.
    ///
    /// Default: `10`
    pub window_days: usize,

    /// Return boundary used for labeling.
    ///
    /// Ternary: `neg` below `-limit`, `pos` above `limit`, `neut` otherwise.
    /// Binary: `neg` below `limit`, `pos` otherwise.
    ///
    /// Default: `0.05`
    pub limit: f64,

    /// Label scheme (2 or 3 classes).
    ///
    /// Default: `ClassScheme::Ternary`
    pub classes: ClassScheme,

    /// Business days added to the filing date before the window starts.
    ///
    /// Negative values move the window back to compensate for the lag
    /// between an earnings release and its 8-K filing (Item 9 allows four
    /// business days).
    ///
    /// Default: `-4`
    pub delay_days: i64,

    /// Minimum fraction of the extracted text the noise filter must keep.
    ///
    /// Default: `0.05`
    pub trim_limit: f64,

    /// Number of worker threads; symbols are distributed across them.
    ///
    /// Default: `10`
    pub workers: usize,
}

impl Options {
    /// Check that every field is within its usable range.
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(Error::Config(format!(
                "window_days must be between 2 and {MAX_WINDOW_DAYS}, got {}",
                self.window_days
            )));
        }
        if self.delay_days.unsigned_abs() > MAX_DELAY_DAYS.unsigned_abs() {
            return Err(Error::Config(format!(
                "delay_days must be within ±{MAX_DELAY_DAYS}, got {}",
                self.delay_days
            )));
        }
        if !self.limit.is_finite() || self.limit < 0.0 {
            return Err(Error::Config(format!(
                "limit must be a non-negative number, got {}",
                self.limit
            )));
        }
        if !(0.0..=1.0).contains(&self.trim_limit) {
            return Err(Error::Config(format!(
                "trim_limit must be between 0 and 1, got {}",
                self.trim_limit
            )));
        }
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_days: 10,
            limit: 0.05,
            classes: ClassScheme::Ternary,
            delay_days: -4,
            trim_limit: 0.05,
            workers: 10,
        }
    }
}
