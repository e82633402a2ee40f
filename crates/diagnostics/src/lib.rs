//! Recoverable diagnostics shared by the markup and stylesheet parsers.
//!
//! Parsers in this workspace never fail on malformed input. Instead they return a
//! best-effort result and record what they had to recover from in a
//! [`Diagnostics`] side list, which callers may inspect or ignore.

use core::fmt;
use log::{debug, warn};
use serde::Serialize;

/// Category of a recoverable diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A missing delimiter, unmatched tag or malformed attribute in HTML input.
    MalformedMarkup,
    /// A missing brace or malformed declaration in CSS input.
    MalformedStylesheet,
    /// The input was blank. Not an error; the result is a degenerate tree or sheet.
    EmptyInput,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedMarkup => "malformed markup",
            Self::MalformedStylesheet => "malformed stylesheet",
            Self::EmptyInput => "empty input",
        };
        formatter.write_str(name)
    }
}

/// A single recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte offset into the parsed source where recovery happened.
    pub offset: usize,
    pub message: String,
}

impl Diagnostic {
    /// Resolve the 1-based (line, column) of this diagnostic within `source`.
    ///
    /// Computed on demand so that recording stays constant time while parsing.
    pub fn line_column(&self, source: &str) -> (usize, usize) {
        let end = self.offset.min(source.len());
        let before = source.get(..end).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
        let column = before
            .get(line_start..)
            .map_or(1, |tail| tail.chars().count() + 1);
        (line, column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} at byte {}: {}", self.kind, self.offset, self.message)
    }
}

/// Ordered collection of diagnostics, in the order they were recorded.
/// Serializes as a plain list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and mirror it to the log.
    pub fn record(&mut self, kind: DiagnosticKind, offset: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            offset,
            message: message.into(),
        };
        match kind {
            DiagnosticKind::EmptyInput => debug!("{diagnostic}"),
            DiagnosticKind::MalformedMarkup | DiagnosticKind::MalformedStylesheet => {
                warn!("{diagnostic}");
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|entry| entry.kind == kind)
    }

    /// Append every diagnostic from `other`, keeping order.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'diag> IntoIterator for &'diag Diagnostics {
    type Item = &'diag Diagnostic;
    type IntoIter = core::slice::Iter<'diag, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
