//! Section-aware deck reader.
//!
//! The reader walks the source line by line, switching [`Section`] on marker
//! lines and feeding every data line to the grammar of the active section.
//! Parsed entities are pushed into a [`RecordSink`] as soon as their line is
//! accepted. A malformed line is reported to the [`Diagnostics`] sink and
//! skipped; only failing to read the source aborts a read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics};
use crate::entity::{BoundaryCondition, Element, LoadCase, Material, Node, Property};
use crate::error::{LineError, ParseError};
use crate::grammar;
use crate::line::{DEFAULT_COMMENT_MARKERS, LineKind, SECTION_MARKER, classify_line, tokenize};
use crate::section::{Section, classify_marker};

/// Receives entities as the reader accepts them.
pub trait RecordSink {
    fn node(&mut self, node: Node);
    fn element(&mut self, element: Element);
    fn material(&mut self, material: Material);
    fn property(&mut self, property: Property);
    fn load_case(&mut self, load_case: LoadCase);
    fn boundary_condition(&mut self, condition: BoundaryCondition);
    fn title(&mut self, _title: &str) {}
    fn version(&mut self, _version: &str) {}
}

/// Plain collection of everything a read produced, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckRecords {
    pub title: Option<String>,
    pub version: Option<String>,
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    pub materials: Vec<Material>,
    pub properties: Vec<Property>,
    pub load_cases: Vec<LoadCase>,
    pub boundary_conditions: Vec<BoundaryCondition>,
}

impl DeckRecords {
    pub fn parse_str(raw: &str) -> Self {
        let mut records = DeckRecords::default();
        // Reading from memory cannot fail.
        let _ = DeckReader::new().read_str(raw, &mut records);
        records
    }
}

impl RecordSink for DeckRecords {
    fn node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn element(&mut self, element: Element) {
        self.elements.push(element);
    }

    fn material(&mut self, material: Material) {
        self.materials.push(material);
    }

    fn property(&mut self, property: Property) {
        self.properties.push(property);
    }

    fn load_case(&mut self, load_case: LoadCase) {
        self.load_cases.push(load_case);
    }

    fn boundary_condition(&mut self, condition: BoundaryCondition) {
        self.boundary_conditions.push(condition);
    }

    fn title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn version(&mut self, version: &str) {
        self.version = Some(version.to_string());
    }
}

/// Reader configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// First characters that mark a line as a comment
    pub comment_markers: Vec<char>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            comment_markers: DEFAULT_COMMENT_MARKERS.to_vec(),
        }
    }
}

/// Outcome of a completed read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Physical lines consumed
    pub lines: usize,
    /// Entities handed to the sink
    pub records: usize,
    /// Data lines rejected by a grammar
    pub rejected: usize,
    /// Markers routed to the unknown sink
    pub unknown_sections: usize,
    pub title: Option<String>,
    pub version: Option<String>,
}

impl ReadSummary {
    /// True when no line was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected == 0
    }
}

pub struct DeckReader<D = TracingDiagnostics> {
    options: ReaderOptions,
    diagnostics: D,
}

impl DeckReader<TracingDiagnostics> {
    pub fn new() -> Self {
        Self::with_diagnostics(TracingDiagnostics)
    }
}

impl Default for DeckReader<TracingDiagnostics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Diagnostics> DeckReader<D> {
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self {
            options: ReaderOptions::default(),
            diagnostics,
        }
    }

    pub fn options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> D {
        self.diagnostics
    }

    pub fn read_file<S: RecordSink>(
        &mut self,
        path: impl AsRef<Path>,
        sink: &mut S,
    ) -> Result<ReadSummary, ParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ParseError::from_io(e, Some(path.to_path_buf())))?;
        self.read(BufReader::new(file), sink).map_err(|err| match err {
            ParseError::Io { source, .. } => ParseError::from_io(source, Some(path.to_path_buf())),
        })
    }

    pub fn read_str<S: RecordSink>(
        &mut self,
        raw: &str,
        sink: &mut S,
    ) -> Result<ReadSummary, ParseError> {
        self.read(raw.as_bytes(), sink)
    }

    pub fn read<R: BufRead, S: RecordSink>(
        &mut self,
        mut source: R,
        sink: &mut S,
    ) -> Result<ReadSummary, ParseError> {
        let mut state = ReadState::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = source
                .read_until(b'\n', &mut buf)
                .map_err(|e| ParseError::from_io(e, None))?;
            if read == 0 {
                break;
            }
            state.summary.lines += 1;
            let line = String::from_utf8_lossy(&buf);
            self.process_line(&line, &mut state, sink);
        }

        Ok(state.summary)
    }

    fn process_line<S: RecordSink>(&mut self, line: &str, state: &mut ReadState, sink: &mut S) {
        let line_number = state.summary.lines;

        if state.section == Section::Title
            && !state.title_taken
            && let Some(title) = title_candidate(line, &self.options.comment_markers)
        {
            sink.title(title);
            state.summary.title = Some(title.to_string());
            state.title_taken = true;
            return;
        }

        match classify_line(line, &self.options.comment_markers) {
            LineKind::Blank => {}
            LineKind::Comment(text) => {
                if text.starts_with('#') && text.to_ascii_uppercase().contains("RADIOSS") {
                    if let Some(version) = grammar::parse_version(text) {
                        sink.version(&version);
                        state.summary.version = Some(version);
                    }
                }
            }
            LineKind::Marker(text) => {
                let marker = classify_marker(text);
                if marker.section == Section::Unknown {
                    state.summary.unknown_sections += 1;
                    self.diagnostics.report(Diagnostic::UnknownSection {
                        line: line_number,
                        marker: text.to_string(),
                    });
                }
                state.section = marker.section;
                state.marker_tag = marker.tail;
                state.title_taken = false;
            }
            LineKind::Data(text) => self.process_data(text, line_number, state, sink),
        }
    }

    fn process_data<S: RecordSink>(
        &mut self,
        text: &str,
        line_number: usize,
        state: &mut ReadState,
        sink: &mut S,
    ) {
        let tokens = tokenize(text);
        let tag = state.marker_tag.as_deref();

        let outcome: Result<(), LineError> = match state.section {
            Section::Header | Section::Unknown => return,
            Section::Title => {
                self.diagnostics.report(Diagnostic::Note {
                    line: line_number,
                    message: format!("extra title line ignored: '{text}'"),
                });
                return;
            }
            Section::Nodes => grammar::parse_node(&tokens).map(|n| sink.node(n)),
            Section::Elements(topology) => {
                grammar::parse_element(&tokens, topology).map(|e| sink.element(e))
            }
            Section::Materials => grammar::parse_material(&tokens, tag).map(|m| sink.material(m)),
            Section::Properties => grammar::parse_property(&tokens, tag).map(|p| sink.property(p)),
            Section::Loads => grammar::parse_load_case(&tokens).map(|l| sink.load_case(l)),
            Section::BoundaryConditions => {
                grammar::parse_boundary_condition(&tokens).map(|b| sink.boundary_condition(b))
            }
        };

        match outcome {
            Ok(()) => state.summary.records += 1,
            Err(reason) => {
                state.summary.rejected += 1;
                self.diagnostics.report(Diagnostic::RejectedLine {
                    line: line_number,
                    section: state.section,
                    text: text.to_string(),
                    reason,
                });
            }
        }
    }
}

/// The first line after `/TITLE` is the title, taken verbatim even when it
/// starts like a comment (`Crash box`) or a slash. Blank lines, symbol comment
/// lines (`#`, `$`) and known section markers are not titles.
fn title_candidate<'a>(line: &'a str, comment_markers: &[char]) -> Option<&'a str> {
    let trimmed = line.trim();
    let first = trimmed.chars().next()?;
    if comment_markers.contains(&first) && !first.is_alphabetic() {
        return None;
    }
    if first == SECTION_MARKER && classify_marker(trimmed).section != Section::Unknown {
        return None;
    }
    Some(trimmed)
}

struct ReadState {
    section: Section,
    marker_tag: Option<String>,
    title_taken: bool,
    summary: ReadSummary,
}

impl Default for ReadState {
    fn default() -> Self {
        Self {
            section: Section::Header,
            marker_tag: None,
            title_taken: false,
            summary: ReadSummary::default(),
        }
    }
}
