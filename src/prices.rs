//! Equity closing-price series and their sources.
//!
//! [`PriceSource`] is the seam to whatever provides historical closes;
//! [`EquityCache`] sits in front of it so each symbol is fetched at most once
//! per worker.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Date-indexed closing prices for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, close: f64) {
        self.closes.insert(date, close);
    }

    #[must_use]
    pub fn close(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next().copied()
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next_back().copied()
    }
}

impl FromIterator<(NaiveDate, f64)> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, f64)>>(iter: T) -> Self {
        Self {
            closes: iter.into_iter().collect(),
        }
    }
}

/// Provider of historical closes.
///
/// Implementations must be shareable across worker threads; each worker
/// keeps its own [`EquityCache`] on top.
pub trait PriceSource: Send + Sync {
    /// Fetch the full series for `symbol`.
    fn fetch(&self, symbol: &str) -> Result<PriceSeries>;
}

impl<S: PriceSource + ?Sized> PriceSource for &S {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries> {
        (**self).fetch(symbol)
    }
}

impl<S: PriceSource + ?Sized> PriceSource for Arc<S> {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries> {
        (**self).fetch(symbol)
    }
}

// =============================================================================
// CSV files
// =============================================================================

/// One row of a Yahoo-style daily price export.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date", alias = "date", alias = "DATE")]
    date: NaiveDate,
    #[serde(
        rename = "Close",
        alias = "close",
        alias = "CLOSE",
        deserialize_with = "csv::invalid_option"
    )]
    close: Option<f64>,
}

/// Reads `<dir>/<SYMBOL>.csv` with `Date` (`YYYY-MM-DD`) and `Close` columns.
///
/// Other columns are ignored. Rows whose close is blank, `null`, or not a
/// number are skipped.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn read_series(path: &Path) -> Result<PriceSeries> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut series = PriceSeries::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row?;
            if let Some(close) = row.close {
                series.insert(row.date, close);
            }
        }
        Ok(series)
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries> {
        let path = self.path_for(symbol);
        match Self::read_series(&path) {
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(Error::NoPriceSeries {
                    symbol: symbol.to_string(),
                    reason: format!("{} not found", path.display()),
                })
            }
            other => other,
        }
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Fixed in-memory series, keyed by symbol. Useful for tests and replay.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, PriceSeries>,
}

impl StaticPriceSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_series(mut self, symbol: &str, series: PriceSeries) -> Self {
        self.insert(symbol, series);
        self
    }

    pub fn insert(&mut self, symbol: &str, series: PriceSeries) {
        self.series.insert(symbol.to_string(), series);
    }
}

impl PriceSource for StaticPriceSource {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::NoPriceSeries {
                symbol: symbol.to_string(),
                reason: "symbol not loaded".to_string(),
            })
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Per-worker cache of price series in front of a [`PriceSource`].
///
/// A failed fetch is remembered too: within one cache the symbol is never
/// fetched again, and every lookup for it reports no data.
pub struct EquityCache<S> {
    source: S,
    series: HashMap<String, Option<Arc<PriceSeries>>>,
    fetches: usize,
}

impl<S: PriceSource> EquityCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            series: HashMap::new(),
            fetches: 0,
        }
    }

    /// Series for `symbol`, fetching it on first use.
    pub fn series(&mut self, symbol: &str) -> Result<Arc<PriceSeries>> {
        if let Some(cached) = self.series.get(symbol) {
            return cached.clone().ok_or_else(|| Error::NoPriceSeries {
                symbol: symbol.to_string(),
                reason: "earlier fetch failed".to_string(),
            });
        }

        self.fetches += 1;
        match self.source.fetch(symbol) {
            Ok(series) => {
                log::debug!("loaded {} closes for {symbol}", series.len());
                let series = Arc::new(series);
                self.series.insert(symbol.to_string(), Some(Arc::clone(&series)));
                Ok(series)
            }
            Err(e) => {
                self.series.insert(symbol.to_string(), None);
                Err(e)
            }
        }
    }

    /// Close for `symbol` on `date`, or `None` when there is no data.
    pub fn get_close(&mut self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.series(symbol).ok().and_then(|s| s.close(date))
    }

    /// Number of calls made to the underlying source.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_csv_source_reads_yahoo_export() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ABC.csv"),
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2013-01-14,10.0,10.5,9.9,10.25,10.25,1000\n\
             2013-01-15,10.3,10.6,10.1,null,null,0\n\
             2013-01-16,10.4,10.9,10.2,10.75,10.75,1200\n",
        )
        .unwrap();

        let series = CsvPriceSource::new(dir.path()).fetch("abc").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.close(d(2013, 1, 14)), Some(10.25));
        assert_eq!(series.close(d(2013, 1, 15)), None);
        assert_eq!(series.last_date(), Some(d(2013, 1, 16)));
    }

    #[test]
    fn test_csv_source_lowercase_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("XYZ.csv"), "date,close\n2013-01-14, 5.5\n").unwrap();

        let series = CsvPriceSource::new(dir.path()).fetch("XYZ").unwrap();
        assert_eq!(series.close(d(2013, 1, 14)), Some(5.5));
    }

    #[test]
    fn test_csv_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvPriceSource::new(dir.path()).fetch("NOPE").unwrap_err();
        assert!(matches!(err, Error::NoPriceSeries { .. }));
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn test_csv_source_bad_date_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BAD.csv"), "Date,Close\nyesterday,1.0\n").unwrap();
        let err = CsvPriceSource::new(dir.path()).fetch("BAD").unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_cache_fetches_once_per_symbol() {
        let series: PriceSeries = [(d(2013, 1, 14), 1.0)].into_iter().collect();
        let source = StaticPriceSource::new().with_series("ABC", series);
        let mut cache = EquityCache::new(&source);

        assert_eq!(cache.get_close("ABC", d(2013, 1, 14)), Some(1.0));
        assert_eq!(cache.get_close("ABC", d(2013, 1, 15)), None);
        assert_eq!(cache.fetch_count(), 1);
    }

    #[test]
    fn test_cache_remembers_failures() {
        let source = StaticPriceSource::new();
        let mut cache = EquityCache::new(&source);

        assert!(cache.series("MISSING").is_err());
        assert!(cache.series("MISSING").is_err());
        assert_eq!(cache.get_close("MISSING", d(2013, 1, 14)), None);
        assert_eq!(cache.fetch_count(), 1);
    }
}
