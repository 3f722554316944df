//! Raw filings and their line streams.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::encoding::decode_line;
use crate::error::{Error, Result};

/// One raw 8-K filing on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FilingReference {
    pub symbol: String,
    pub event_date: NaiveDate,
    pub source_path: PathBuf,
}

impl FilingReference {
    #[must_use]
    pub fn new(symbol: impl Into<String>, event_date: NaiveDate, source_path: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            event_date,
            source_path: source_path.into(),
        }
    }

    /// Open a fresh line stream over the filing. Each call starts from the top.
    pub fn open_lines(&self) -> Result<FilingLines<BufReader<File>>> {
        FilingLines::open(&self.source_path)
    }
}

/// Lazy line iterator over a filing.
///
/// Lines come out without their `\n` / `\r\n` terminator, decoded per line
/// (see [`decode_line`]). A read error ends the stream and is kept; callers
/// must [`check`](Self::check) before trusting what they collected.
pub struct FilingLines<R> {
    reader: R,
    buf: Vec<u8>,
    path: PathBuf,
    finished: bool,
    error: Option<std::io::Error>,
}

impl FilingLines<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> FilingLines<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            path: path.into(),
            finished: false,
            error: None,
        }
    }

    /// `Err` if the stream ended on a read error rather than end of file.
    /// The error is handed out once.
    pub fn check(&mut self) -> Result<()> {
        match self.error.take() {
            Some(source) => Err(Error::io(&self.path, source)),
            None => Ok(()),
        }
    }
}

impl<'a> FilingLines<&'a [u8]> {
    /// Line stream over an in-memory filing.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes, "<memory>")
    }
}

impl<R: BufRead> Iterator for FilingLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(decode_line(&self.buf))
            }
            Err(e) => {
                self.finished = true;
                self.error = Some(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_terminators() {
        let lines: Vec<String> = FilingLines::from_bytes(b"one\r\ntwo\nthree").collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn keeps_blank_lines() {
        let lines: Vec<String> = FilingLines::from_bytes(b"a\n\nb\n").collect();
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn decodes_legacy_lines_independently() {
        let lines: Vec<String> = FilingLines::from_bytes(b"caf\xE9\nna\xC3\xAFve\n").collect();
        assert_eq!(lines, vec!["café", "naïve"]);
    }

    #[test]
    fn reopening_restarts_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ABC-2013-01-15-8-K.txt");
        std::fs::write(&path, "first\nsecond\n").unwrap();
        let filing = FilingReference::new("ABC", NaiveDate::from_ymd_opt(2013, 1, 15).unwrap(), &path);

        let first_pass: Vec<String> = filing.open_lines().unwrap().take(1).collect();
        let second_pass: Vec<String> = filing.open_lines().unwrap().collect();
        assert_eq!(first_pass, vec!["first"]);
        assert_eq!(second_pass, vec!["first", "second"]);
    }

    /// Serves its bytes, then fails every read.
    struct FailAfter<'a>(&'a [u8]);

    impl std::io::Read for FailAfter<'_> {
        fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Err(std::io::Error::other("device gone"));
            }
            let n = out.len().min(self.0.len());
            out[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_error_is_reported_by_check() {
        let reader = BufReader::new(FailAfter(b"one\ntwo\nSales"));
        let mut lines = FilingLines::new(reader, "flaky.txt");

        let read: Vec<String> = lines.by_ref().collect();
        assert_eq!(read, vec!["one", "two"]);
        assert!(matches!(lines.check(), Err(Error::Io { .. })));
        assert!(lines.check().is_ok());
    }

    #[test]
    fn clean_stream_checks_ok() {
        let mut lines = FilingLines::from_bytes(b"one\n");
        assert_eq!(lines.by_ref().count(), 1);
        assert!(lines.check().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let filing = FilingReference::new(
            "ABC",
            NaiveDate::from_ymd_opt(2013, 1, 15).unwrap(),
            "/nonexistent/ABC-2013-01-15-8-K.txt",
        );
        assert!(matches!(filing.open_lines(), Err(Error::Io { .. })));
    }
}
