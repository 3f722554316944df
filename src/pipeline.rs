//! Per-filing orchestration and the parallel run over symbols.
//!
//! One filing goes through: idempotence check, exhibit location,
//! markup normalization, relevance check, gremlin repair, noise filtering,
//! return classification, and finally the corpus write. Every way this can
//! end, good or bad, is a [`FilingOutcome`]; nothing that goes wrong with one
//! filing stops its siblings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::{ClassLabel, ReturnClassifier};
use crate::corpus::Corpus;
use crate::encoding::repair_gremlins;
use crate::error::{Error, Result};
use crate::exhibit::locate_exhibit;
use crate::filing::FilingReference;
use crate::noise::NoiseFilter;
use crate::normalize::extract_text;
use crate::options::Options;
use crate::prices::{EquityCache, PriceSource};

/// Word an earnings release is expected to contain. Case-sensitive.
const RELEVANCE_WORD: &str = "quarter";

/// What happened to one filing.
#[derive(Debug, Clone, PartialEq)]
pub enum FilingOutcome {
    /// A corpus entry was written.
    Written { label: ClassLabel, path: PathBuf },
    /// An entry for this symbol and date already exists.
    AlreadyClassified,
    /// No exhibit text could be extracted.
    NoExhibit,
    /// The exhibit does not read like a quarterly release.
    NotRelevant,
    /// Nothing was left to write after cleaning.
    EmptyAfterCleaning,
    /// Prices for the return window are missing.
    DataUnavailable,
    /// Anything else; the message is the error.
    Failed(String),
}

/// Per-outcome counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub written: usize,
    pub already_classified: usize,
    pub no_exhibit: usize,
    pub not_relevant: usize,
    pub empty_after_cleaning: usize,
    pub data_unavailable: usize,
    pub failed: usize,
    /// Written entries per label directory.
    pub labels: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FilingOutcome) {
        match outcome {
            FilingOutcome::Written { label, .. } => {
                self.written += 1;
                *self.labels.entry(label.dir_name().to_string()).or_default() += 1;
            }
            FilingOutcome::AlreadyClassified => self.already_classified += 1,
            FilingOutcome::NoExhibit => self.no_exhibit += 1,
            FilingOutcome::NotRelevant => self.not_relevant += 1,
            FilingOutcome::EmptyAfterCleaning => self.empty_after_cleaning += 1,
            FilingOutcome::DataUnavailable => self.data_unavailable += 1,
            FilingOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.written += other.written;
        self.already_classified += other.already_classified;
        self.no_exhibit += other.no_exhibit;
        self.not_relevant += other.not_relevant;
        self.empty_after_cleaning += other.empty_after_cleaning;
        self.data_unavailable += other.data_unavailable;
        self.failed += other.failed;
        for (label, count) in other.labels {
            *self.labels.entry(label).or_default() += count;
        }
    }

    /// Number of filings seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written
            + self.already_classified
            + self.no_exhibit
            + self.not_relevant
            + self.empty_after_cleaning
            + self.data_unavailable
            + self.failed
    }
}

/// The corpus builder.
pub struct Pipeline<S> {
    options: Options,
    corpus: Corpus,
    filter: NoiseFilter,
    classifier: ReturnClassifier,
    source: S,
}

impl<S: PriceSource> Pipeline<S> {
    /// Build a pipeline writing to `corpus`. `options` are validated here,
    /// and their class scheme must be the corpus's.
    pub fn new(options: Options, corpus: Corpus, source: S) -> Result<Self> {
        options.validate()?;
        if options.classes != corpus.scheme() {
            return Err(Error::Config(format!(
                "options use {:?} classes but the corpus is {:?}",
                options.classes,
                corpus.scheme()
            )));
        }
        Ok(Self {
            filter: NoiseFilter::new(options.trim_limit),
            classifier: ReturnClassifier::from_options(&options),
            options,
            corpus,
            source,
        })
    }

    /// Replace the default noise battery.
    #[must_use]
    pub fn with_noise_filter(mut self, filter: NoiseFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Process one filing. Never fails; errors become outcomes.
    pub fn process_filing<C: PriceSource>(
        &self,
        cache: &mut EquityCache<C>,
        filing: &FilingReference,
    ) -> FilingOutcome {
        match self.try_process(cache, filing) {
            Ok(outcome) => outcome,
            Err(e) if e.is_data_unavailable() => {
                log::warn!("{} {}: {e}", filing.symbol, filing.event_date);
                FilingOutcome::DataUnavailable
            }
            Err(e) => {
                log::error!("{}: {e}", filing.source_path.display());
                FilingOutcome::Failed(e.to_string())
            }
        }
    }

    fn try_process<C: PriceSource>(
        &self,
        cache: &mut EquityCache<C>,
        filing: &FilingReference,
    ) -> Result<FilingOutcome> {
        let symbol = filing.symbol.as_str();
        let date = filing.event_date;

        if self.corpus.is_classified(symbol, date) {
            log::debug!("{symbol} {date}: already classified");
            return Ok(FilingOutcome::AlreadyClassified);
        }

        let mut lines = filing.open_lines()?;
        let fragment = locate_exhibit(lines.by_ref());
        lines.check()?;
        let text = extract_text(&fragment);
        if text.is_empty() {
            log::debug!("{symbol} {date}: no exhibit text in {}", filing.source_path.display());
            return Ok(FilingOutcome::NoExhibit);
        }
        if !text.contains(RELEVANCE_WORD) {
            log::debug!("{symbol} {date}: not a quarterly release");
            return Ok(FilingOutcome::NotRelevant);
        }

        let text = repair_gremlins(&text);
        let cleaned = self.filter.filter(&text);
        let label = self.classifier.classify(cache, symbol, date)?;

        match self.corpus.write(label, symbol, date, &cleaned)? {
            Some(path) => {
                log::info!("{symbol} {date}: {label} -> {}", path.display());
                Ok(FilingOutcome::Written { label, path })
            }
            None => {
                log::debug!("{symbol} {date}: nothing left after cleaning");
                Ok(FilingOutcome::EmptyAfterCleaning)
            }
        }
    }

    /// Process one symbol's filings in order with a fresh price cache.
    pub fn process_symbol(&self, filings: &[FilingReference]) -> RunSummary {
        let mut cache = EquityCache::new(&self.source);
        let mut summary = RunSummary::default();
        for filing in filings {
            summary.record(&self.process_filing(&mut cache, filing));
        }
        summary
    }

    /// Process every symbol group on a pool of `workers` threads.
    pub fn run(&self, groups: &BTreeMap<String, Vec<FilingReference>>) -> Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .build()?;

        let summary = pool.install(|| {
            groups
                .par_iter()
                .map(|(_, filings)| self.process_symbol(filings))
                .reduce(RunSummary::default, |mut acc, part| {
                    acc.merge(part);
                    acc
                })
        });

        log::info!(
            "processed {} filings: {} written, {} skipped as classified, {} without data",
            summary.total(),
            summary.written,
            summary.already_classified,
            summary.data_unavailable
        );
        Ok(summary)
    }
}
