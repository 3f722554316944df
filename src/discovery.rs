//! Finding filings on disk.
//!
//! Filings are stored as `<symbol>-<date>-8-K.txt` anywhere under the form
//! directory. The symbol is everything before the first dash; the date is
//! whatever sits between it and the `-8-K.txt` suffix.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::filing::FilingReference;
use crate::patterns::FILING_NAME;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%m-%d-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Split a filing file name into `(symbol, date string)`.
#[must_use]
pub fn parse_filing_name(name: &str) -> Option<(&str, &str)> {
    let caps = FILING_NAME.captures(name)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Parse the date part of a filing name. Time components are dropped.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Build a [`FilingReference`] from a path, if its name is a filing name with
/// a parseable date.
#[must_use]
pub fn filing_from_path(path: &Path) -> Option<FilingReference> {
    let name = path.file_name()?.to_str()?;
    let (symbol, raw_date) = parse_filing_name(name)?;
    match parse_event_date(raw_date) {
        Some(date) => Some(FilingReference::new(symbol, date, path)),
        None => {
            log::debug!("skipping {}: unparseable date {raw_date:?}", path.display());
            None
        }
    }
}

/// Walk `form_dir` and group filings by symbol. Each group is sorted by date,
/// then path.
///
/// Unreadable entries below the root (dangling links, locked directories)
/// are logged and skipped; only an unreadable `form_dir` is an error.
pub fn discover(form_dir: &Path) -> Result<BTreeMap<String, Vec<FilingReference>>> {
    let mut groups: BTreeMap<String, Vec<FilingReference>> = BTreeMap::new();

    for entry in WalkDir::new(form_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself is unusable: nothing can be discovered.
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                return Err(Error::io(form_dir, source));
            }
            Err(e) => {
                log::warn!("skipping entry under {}: {e}", form_dir.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(filing) = filing_from_path(entry.path()) {
            groups.entry(filing.symbol.clone()).or_default().push(filing);
        }
    }

    for filings in groups.values_mut() {
        filings.sort();
    }
    log::info!(
        "discovered {} filings for {} symbols under {}",
        groups.values().map(Vec::len).sum::<usize>(),
        groups.len(),
        form_dir.display()
    );
    Ok(groups)
}
