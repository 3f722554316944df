//! Labeling filings by the stock's return after the event.
//!
//! The label of a filing is the compounded close-to-close return of the
//! issuer's stock over a window of business days starting near the filing
//! date, bucketed against a symmetric (3-class) or single (2-class) boundary.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::bday::{business_days_from, shift_business_days};
use crate::error::{Error, Result};
use crate::options::{Options, MAX_DELAY_DAYS, MAX_WINDOW_DAYS};
use crate::prices::{EquityCache, PriceSource};

/// Corpus class of one filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Negative,
    Neutral,
    Positive,
}

impl ClassLabel {
    /// Directory name of the label inside a corpus.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Negative => "neg",
            Self::Neutral => "neut",
            Self::Positive => "pos",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Number of classes a corpus is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ClassScheme {
    /// `neg` / `pos`.
    Binary,
    /// `neg` / `neut` / `pos`.
    #[default]
    Ternary,
}

impl ClassScheme {
    #[must_use]
    pub const fn labels(self) -> &'static [ClassLabel] {
        match self {
            Self::Binary => &[ClassLabel::Negative, ClassLabel::Positive],
            Self::Ternary => &[ClassLabel::Negative, ClassLabel::Neutral, ClassLabel::Positive],
        }
    }

    #[must_use]
    pub const fn class_count(self) -> u8 {
        match self {
            Self::Binary => 2,
            Self::Ternary => 3,
        }
    }
}

impl TryFrom<u8> for ClassScheme {
    type Error = Error;

    fn try_from(classes: u8) -> Result<Self> {
        match classes {
            2 => Ok(Self::Binary),
            3 => Ok(Self::Ternary),
            n => Err(Error::Config(format!("classes must be 2 or 3, got {n}"))),
        }
    }
}

/// Compounded return of a close series: `Π(1 + r_i) − 1` over consecutive
/// closes. Fewer than two closes give `0.0`.
#[must_use]
pub fn cumulative_return(closes: &[f64]) -> f64 {
    closes
        .windows(2)
        .map(|pair| pair[1] / pair[0])
        .product::<f64>()
        - 1.0
}

/// Maps an (event date, symbol) pair to a [`ClassLabel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnClassifier {
    pub window_days: usize,
    pub scheme: ClassScheme,
    pub delay_days: i64,
    pub limit: f64,
}

impl ReturnClassifier {
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            window_days: options.window_days,
            scheme: options.classes,
            delay_days: options.delay_days,
            limit: options.limit,
        }
    }

    /// Business days whose closes make up the window for `event_date`.
    ///
    /// `None` when the window or delay exceeds the `Options` bounds, or the
    /// window runs off the calendar.
    #[must_use]
    pub fn window(&self, event_date: NaiveDate) -> Option<Vec<NaiveDate>> {
        if self.window_days > MAX_WINDOW_DAYS
            || self.delay_days.unsigned_abs() > MAX_DELAY_DAYS.unsigned_abs()
        {
            return None;
        }
        let adjusted = shift_business_days(event_date, self.delay_days)?;
        business_days_from(adjusted, self.window_days)
    }

    /// Bucket a cumulative return.
    ///
    /// The 2-class boundary is one-sided: anything below `limit`, including
    /// small gains, is negative.
    #[must_use]
    pub fn label_for(&self, cumulative: f64) -> ClassLabel {
        match self.scheme {
            ClassScheme::Ternary if cumulative < -self.limit => ClassLabel::Negative,
            ClassScheme::Ternary if cumulative > self.limit => ClassLabel::Positive,
            ClassScheme::Ternary => ClassLabel::Neutral,
            ClassScheme::Binary if cumulative < self.limit => ClassLabel::Negative,
            ClassScheme::Binary => ClassLabel::Positive,
        }
    }

    /// Compounded return over the window for `event_date`.
    pub fn window_return<S: PriceSource>(
        &self,
        cache: &mut EquityCache<S>,
        symbol: &str,
        event_date: NaiveDate,
    ) -> Result<f64> {
        let window = self.window(event_date).ok_or_else(|| Error::DataUnavailable {
            symbol: symbol.to_string(),
            date: event_date,
        })?;
        let series = cache.series(symbol)?;
        let closes = window
            .into_iter()
            .map(|date| {
                series.close(date).ok_or_else(|| Error::DataUnavailable {
                    symbol: symbol.to_string(),
                    date,
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(cumulative_return(&closes))
    }

    pub fn classify<S: PriceSource>(
        &self,
        cache: &mut EquityCache<S>,
        symbol: &str,
        event_date: NaiveDate,
    ) -> Result<ClassLabel> {
        let cumulative = self.window_return(cache, symbol, event_date)?;
        let label = self.label_for(cumulative);
        log::debug!("{symbol} {event_date}: return {cumulative:.4} -> {label}");
        Ok(label)
    }
}

impl Default for ReturnClassifier {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::{PriceSeries, StaticPriceSource};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn classifier(scheme: ClassScheme) -> ReturnClassifier {
        ReturnClassifier {
            window_days: 2,
            scheme,
            delay_days: 0,
            limit: 0.05,
        }
    }

    #[test]
    fn test_ternary_boundaries() {
        let c = classifier(ClassScheme::Ternary);
        assert_eq!(c.label_for(0.10), ClassLabel::Positive);
        assert_eq!(c.label_for(-0.10), ClassLabel::Negative);
        assert_eq!(c.label_for(0.0), ClassLabel::Neutral);
        assert_eq!(c.label_for(0.05), ClassLabel::Neutral);
        assert_eq!(c.label_for(-0.05), ClassLabel::Neutral);
    }

    #[test]
    fn test_binary_boundary_is_one_sided() {
        let c = classifier(ClassScheme::Binary);
        assert_eq!(c.label_for(0.04), ClassLabel::Negative);
        assert_eq!(c.label_for(0.06), ClassLabel::Positive);
        assert_eq!(c.label_for(-0.20), ClassLabel::Negative);
    }

    #[test]
    fn test_cumulative_return_compounds() {
        let cum = cumulative_return(&[100.0, 110.0, 121.0]);
        assert!((cum - 0.21).abs() < 1e-12);
        assert!(cumulative_return(&[100.0]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scheme_from_class_count() {
        assert_eq!(ClassScheme::try_from(2).unwrap(), ClassScheme::Binary);
        assert_eq!(ClassScheme::try_from(3).unwrap(), ClassScheme::Ternary);
        assert!(ClassScheme::try_from(4).is_err());
        assert_eq!(ClassScheme::Ternary.labels().len(), 3);
    }

    #[test]
    fn test_label_dir_names() {
        assert_eq!(ClassLabel::Negative.dir_name(), "neg");
        assert_eq!(ClassLabel::Neutral.to_string(), "neut");
        assert_eq!(ClassLabel::Positive.dir_name(), "pos");
    }

    #[test]
    fn test_window_applies_delay() {
        let c = ReturnClassifier {
            window_days: 3,
            delay_days: -4,
            ..classifier(ClassScheme::Ternary)
        };
        // Tuesday 2013-01-15 - 4 business days = Wednesday 2013-01-09
        assert_eq!(
            c.window(d(2013, 1, 15)),
            Some(vec![d(2013, 1, 9), d(2013, 1, 10), d(2013, 1, 11)])
        );
    }

    #[test]
    fn test_out_of_range_delay_is_data_unavailable() {
        let series: PriceSeries = [(d(2013, 1, 14), 100.0), (d(2013, 1, 15), 110.0)]
            .into_iter()
            .collect();
        let source = StaticPriceSource::new().with_series("ABC", series);
        let mut cache = EquityCache::new(&source);

        let c = ReturnClassifier {
            delay_days: 200_000_000,
            ..classifier(ClassScheme::Ternary)
        };
        assert_eq!(c.window(d(2013, 1, 14)), None);
        let err = c.classify(&mut cache, "ABC", d(2013, 1, 14)).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { date, .. } if date == d(2013, 1, 14)));

        let wide = ReturnClassifier {
            window_days: usize::MAX,
            ..classifier(ClassScheme::Ternary)
        };
        assert_eq!(wide.window(d(2013, 1, 14)), None);
    }

    #[test]
    fn test_classify_from_prices() {
        let series: PriceSeries = [(d(2013, 1, 14), 100.0), (d(2013, 1, 15), 110.0)]
            .into_iter()
            .collect();
        let source = StaticPriceSource::new().with_series("ABC", series);
        let mut cache = EquityCache::new(&source);

        let c = classifier(ClassScheme::Ternary);
        let first = c.classify(&mut cache, "ABC", d(2013, 1, 14)).unwrap();
        let second = c.classify(&mut cache, "ABC", d(2013, 1, 14)).unwrap();
        assert_eq!(first, ClassLabel::Positive);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_close_is_data_unavailable() {
        let series: PriceSeries = [(d(2013, 1, 14), 100.0)].into_iter().collect();
        let source = StaticPriceSource::new().with_series("ABC", series);
        let mut cache = EquityCache::new(&source);

        let err = classifier(ClassScheme::Ternary)
            .classify(&mut cache, "ABC", d(2013, 1, 14))
            .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { date, .. } if date == d(2013, 1, 15)));
    }

    #[test]
    fn test_unknown_symbol_is_data_unavailable() {
        let source = StaticPriceSource::new();
        let mut cache = EquityCache::new(&source);
        let err = classifier(ClassScheme::Binary)
            .classify(&mut cache, "ZZZ", d(2013, 1, 14))
            .unwrap_err();
        assert!(err.is_data_unavailable());
    }
}
