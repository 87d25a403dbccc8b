//! Section markers and the keyword table that classifies them.

use crate::entity::ElementType;

/// Parser state. Switched only by marker lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Title,
    Nodes,
    /// Element section; `None` means a generic section where topology is
    /// inferred from the node count of each line.
    Elements(Option<ElementType>),
    Materials,
    Properties,
    Loads,
    BoundaryConditions,
    /// Sink for unrecognized markers; data lines are ignored.
    Unknown,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Title => "title",
            Section::Nodes => "nodes",
            Section::Elements(_) => "elements",
            Section::Materials => "materials",
            Section::Properties => "properties",
            Section::Loads => "loads",
            Section::BoundaryConditions => "boundary conditions",
            Section::Unknown => "unknown",
        }
    }
}

/// Keyword table, checked in order; first hit wins.
const KEYWORDS: &[(&str, Section)] = &[
    ("/TITLE", Section::Title),
    ("/CNODE", Section::Nodes),
    ("/NODE", Section::Nodes),
    ("/SH3N", Section::Elements(Some(ElementType::Shell3))),
    ("/TRIA", Section::Elements(Some(ElementType::Shell3))),
    ("/SHELL", Section::Elements(Some(ElementType::Shell4))),
    ("/QUAD", Section::Elements(Some(ElementType::Shell4))),
    // 10-node tetrahedra have no fixed topology here; stored as Unknown
    ("/TETRA10", Section::Elements(Some(ElementType::Unknown))),
    ("/TETRA", Section::Elements(Some(ElementType::Tetra4))),
    ("/BRICK", Section::Elements(Some(ElementType::Hexa8))),
    ("/HEXA", Section::Elements(Some(ElementType::Hexa8))),
    ("/PENTA", Section::Elements(Some(ElementType::Penta6))),
    ("/PYRAM", Section::Elements(Some(ElementType::Pyram5))),
    ("/BEAM", Section::Elements(Some(ElementType::Beam2))),
    ("/SPRING", Section::Elements(Some(ElementType::Spring1))),
    ("/ELEM", Section::Elements(None)),
    ("/MAT", Section::Materials),
    ("/PROP", Section::Properties),
    ("/PART", Section::Properties),
    ("/CLOAD", Section::Loads),
    ("/PLOAD", Section::Loads),
    ("/LOAD", Section::Loads),
    ("/BCS", Section::BoundaryConditions),
    ("/SPC", Section::BoundaryConditions),
    ("/IMPVEL", Section::BoundaryConditions),
    ("/BEGIN", Section::Header),
];

/// A classified marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub section: Section,
    /// Leading keyword segment as written, upper-cased (e.g. `/MAT`).
    pub keyword: String,
    /// First segment after the keyword (e.g. `ELASTIC` in `/MAT/ELASTIC/1`).
    pub tail: Option<String>,
}

/// Classifies a trimmed marker line.
///
/// Only the leading segment (up to the second `/`) is matched, so
/// `/PROP/SHELL/1` is a property marker and not a shell element marker.
pub fn classify_marker(line: &str) -> Marker {
    let trimmed = line.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let mut segments = body.split('/');
    let head = segments.next().unwrap_or_default().trim();
    let keyword = format!("/{}", head.to_ascii_uppercase());
    let tail = segments
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut section = KEYWORDS
        .iter()
        .find(|(kw, _)| keyword.contains(kw))
        .map(|(_, section)| *section)
        .unwrap_or(Section::Unknown);

    // `/ELEM/<topology>` pins the topology of a generic element section
    if section == Section::Elements(None)
        && let Some(topology) = tail.as_deref().and_then(|t| t.parse::<ElementType>().ok())
    {
        section = Section::Elements(Some(topology));
    }

    Marker {
        section,
        keyword,
        tail,
    }
}
