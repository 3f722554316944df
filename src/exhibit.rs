//! Exhibit location inside a multi-document filing.
//!
//! An 8-K submission is an SGML container of several documents, each opened
//! by a `<TYPE>` line and carrying its content between `<TEXT>` and `</TEXT>`.
//! Earnings releases ride along as exhibit 99.1. [`ExhibitLocator`] wraps a
//! line iterator and yields only the lines of the first EX-99 text body,
//! without reading past its closing marker.
//!
//! Only the first qualifying exhibit is taken; EX-99.2 and later are never
//! looked at.

use crate::patterns::{ANNOUNCEMENT_LINE, EXHIBIT_MARKER, TEXT_CLOSE_MARKER, TEXT_OPEN_MARKER};

/// Where the locator is in the filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorState {
    /// No exhibit marker seen and nothing emitted yet.
    Searching,
    /// Emitting because a line read like an inline earnings announcement.
    /// No exhibit marker has been seen, so `</TEXT>` does not stop emission.
    InlineBody,
    /// Exhibit marker seen; waiting for its `<TEXT>` line.
    ExhibitFound,
    /// Inside the exhibit body.
    Emitting,
    /// Closing marker consumed.
    Done,
}

impl LocatorState {
    fn exhibit_seen(self) -> bool {
        matches!(self, Self::ExhibitFound | Self::Emitting)
    }

    fn emitting(self) -> bool {
        matches!(self, Self::InlineBody | Self::Emitting)
    }

    /// Advance over one line. Returns the next state and whether the line
    /// belongs to the fragment.
    #[must_use]
    pub fn step(self, line: &str) -> (Self, bool) {
        if self == Self::Done {
            return (Self::Done, false);
        }

        let mut state = self;
        if !state.exhibit_seen() {
            if line.contains(EXHIBIT_MARKER) {
                state = if state.emitting() {
                    Self::Emitting
                } else {
                    Self::ExhibitFound
                };
            } else if ANNOUNCEMENT_LINE.is_match(line) {
                state = Self::InlineBody;
            }
        }
        if state == Self::ExhibitFound && line.contains(TEXT_OPEN_MARKER) {
            state = Self::Emitting;
        }

        let emit = state.emitting();
        if state.exhibit_seen() && line.contains(TEXT_CLOSE_MARKER) {
            state = Self::Done;
        }
        (state, emit)
    }
}

/// Iterator adapter yielding the lines of the first earnings exhibit.
pub struct ExhibitLocator<I> {
    lines: I,
    state: LocatorState,
}

impl<I> ExhibitLocator<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            state: LocatorState::Searching,
        }
    }

    #[must_use]
    pub fn state(&self) -> LocatorState {
        self.state
    }
}

impl<I> Iterator for ExhibitLocator<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.state != LocatorState::Done {
            let line = self.lines.next()?;
            let (state, emit) = self.state.step(&line);
            self.state = state;
            if emit {
                return Some(line);
            }
        }
        None
    }
}

/// Collect the exhibit fragment as one newline-joined string.
pub fn locate_exhibit<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    ExhibitLocator::new(lines.into_iter())
        .collect::<Vec<_>>()
        .join("\n")
}
