//! Reader for Radioss-style line-oriented engineering decks.
//!
//! A deck is a sequence of sections opened by `/KEYWORD` marker lines. Each
//! section has its own whitespace-delimited data grammar. This crate provides:
//! - the entity vocabulary ([`Node`], [`Element`], [`Material`], ...)
//! - the marker keyword table and parser [`Section`] state
//! - per-section grammars in [`grammar`]
//! - [`DeckReader`], which pushes accepted entities into any [`RecordSink`]
//!   and reports skipped lines to an injected [`Diagnostics`] sink

pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod grammar;
pub mod line;
pub mod reader;
pub mod section;

pub use diagnostics::{CollectedDiagnostics, Diagnostic, Diagnostics, TracingDiagnostics};
pub use entity::{
    BoundaryCondition, Element, ElementType, LoadCase, Material, Node, Property,
    UnknownElementType, Vec3,
};
pub use error::{LineError, ParseError};
pub use reader::{DeckReader, DeckRecords, ReadSummary, ReaderOptions, RecordSink};
pub use section::{Marker, Section, classify_marker};
