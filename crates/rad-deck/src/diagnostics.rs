//! Injected sink for parser diagnostics.
//!
//! The reader never logs directly. [`TracingDiagnostics`] forwards to `tracing`;
//! [`CollectedDiagnostics`] keeps everything in memory for tests and UI panes.

use crate::error::LineError;
use crate::section::Section;

/// A single recoverable event seen while reading a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A data line was malformed and skipped.
    RejectedLine {
        line: usize,
        section: Section,
        text: String,
        reason: LineError,
    },
    /// A marker did not match the keyword table; its data is ignored.
    UnknownSection { line: usize, marker: String },
    /// Informational note (e.g. extra title lines).
    Note { line: usize, message: String },
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::RejectedLine { line, .. }
            | Diagnostic::UnknownSection { line, .. }
            | Diagnostic::Note { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::RejectedLine {
                line,
                section,
                text,
                reason,
            } => write!(
                f,
                "line {line}: skipped {} line '{text}': {reason}",
                section.name()
            ),
            Diagnostic::UnknownSection { line, marker } => {
                write!(f, "line {line}: unknown section '{marker}' ignored")
            }
            Diagnostic::Note { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber installed by the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::RejectedLine { line, reason, .. } => {
                tracing::warn!(line = *line, %reason, "{diagnostic}");
            }
            Diagnostic::UnknownSection { line, marker } => {
                tracing::debug!(line = *line, %marker, "unknown section");
            }
            Diagnostic::Note { line, message } => {
                tracing::debug!(line = *line, "{message}");
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CollectedDiagnostics {
    pub entries: Vec<Diagnostic>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| matches!(d, Diagnostic::RejectedLine { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
