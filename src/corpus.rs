//! On-disk labeled corpus.
//!
//! Layout: `<root>/<label dir>/<SYMBOL>-<YYYY-MM-DD>.txt`, one file per
//! classified filing. The existence of an entry under any label of the active
//! scheme is what makes a re-run skip that filing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::classify::{ClassLabel, ClassScheme};
use crate::error::{Error, Result};

/// Directory under the base that holds one corpus per window length.
const CORPUS_DIR: &str = "corpra";

#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    scheme: ClassScheme,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>, scheme: ClassScheme) -> Self {
        Self {
            root: root.into(),
            scheme,
        }
    }

    /// Corpus root for a window length: `<base>/corpra/<window_days>`.
    #[must_use]
    pub fn root_for(base: &Path, window_days: usize) -> PathBuf {
        base.join(CORPUS_DIR).join(window_days.to_string())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn scheme(&self) -> ClassScheme {
        self.scheme
    }

    #[must_use]
    pub fn entry_name(symbol: &str, date: NaiveDate) -> String {
        format!("{symbol}-{}.txt", date.format("%Y-%m-%d"))
    }

    #[must_use]
    pub fn entry_path(&self, label: ClassLabel, symbol: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(label.dir_name())
            .join(Self::entry_name(symbol, date))
    }

    /// Label under which the entry already exists, if any.
    #[must_use]
    pub fn existing_label(&self, symbol: &str, date: NaiveDate) -> Option<ClassLabel> {
        self.scheme
            .labels()
            .iter()
            .copied()
            .find(|label| self.entry_path(*label, symbol, date).is_file())
    }

    #[must_use]
    pub fn is_classified(&self, symbol: &str, date: NaiveDate) -> bool {
        self.existing_label(symbol, date).is_some()
    }

    /// Write an entry. Returns `None` without touching the disk when `text`
    /// is empty.
    pub fn write(
        &self,
        label: ClassLabel,
        symbol: &str,
        date: NaiveDate,
        text: &str,
    ) -> Result<Option<PathBuf>> {
        if text.is_empty() {
            return Ok(None);
        }

        let dir = self.root.join(label.dir_name());
        ensure_dir(&dir)?;

        let path = dir.join(Self::entry_name(symbol, date));
        fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        Ok(Some(path))
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}
