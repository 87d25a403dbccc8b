//! Entity records produced by the deck grammars.
//!
//! Entities reference each other by integer identifier only. Storage and lookup
//! belong to the model store; this module only defines the vocabulary.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 3-component position or direction.
pub type Vec3 = [f64; 3];

/// A node in the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID (unique within a model)
    pub id: i32,
    /// Position
    pub position: Vec3,
    /// Per-axis fixed-displacement flags (x, y, z)
    #[serde(default)]
    pub fixed: [bool; 3],
}

impl Node {
    pub fn new(id: i32, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            position: [x, y, z],
            fixed: [false; 3],
        }
    }
}

/// Element topology tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    /// 3-node shell (triangle)
    Shell3,
    /// 4-node shell (quad)
    Shell4,
    /// 4-node tetrahedron
    Tetra4,
    /// 8-node hexahedron (brick)
    Hexa8,
    /// 6-node pentahedron (wedge)
    Penta6,
    /// 5-node pyramid
    Pyram5,
    /// 2-node beam
    Beam2,
    /// 1-node spring
    Spring1,
    /// Unrecognized topology; node count is unconstrained
    Unknown,
}

impl ElementType {
    /// Every topology in the order the writer emits them.
    pub const ALL: [ElementType; 9] = [
        ElementType::Shell3,
        ElementType::Shell4,
        ElementType::Tetra4,
        ElementType::Hexa8,
        ElementType::Penta6,
        ElementType::Pyram5,
        ElementType::Beam2,
        ElementType::Spring1,
        ElementType::Unknown,
    ];

    /// Canonical node count, 0 for [`ElementType::Unknown`].
    pub fn node_count(self) -> usize {
        match self {
            ElementType::Shell3 => 3,
            ElementType::Shell4 => 4,
            ElementType::Tetra4 => 4,
            ElementType::Hexa8 => 8,
            ElementType::Penta6 => 6,
            ElementType::Pyram5 => 5,
            ElementType::Beam2 => 2,
            ElementType::Spring1 => 1,
            ElementType::Unknown => 0,
        }
    }

    /// Section keyword written in front of elements of this topology.
    pub fn keyword(self) -> &'static str {
        match self {
            ElementType::Shell3 => "SH3N",
            ElementType::Shell4 => "SHELL",
            ElementType::Tetra4 => "TETRA4",
            ElementType::Hexa8 => "BRICK",
            ElementType::Penta6 => "PENTA6",
            ElementType::Pyram5 => "PYRAM5",
            ElementType::Beam2 => "BEAM",
            ElementType::Spring1 => "SPRING",
            ElementType::Unknown => "ELEM/UNKNOWN",
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Shell3 => "TRIA3",
            ElementType::Shell4 => "QUAD4",
            ElementType::Tetra4 => "TETRA4",
            ElementType::Hexa8 => "HEXA8",
            ElementType::Penta6 => "PENTA6",
            ElementType::Pyram5 => "PYRAM5",
            ElementType::Beam2 => "BEAM2",
            ElementType::Spring1 => "SPRING1",
            ElementType::Unknown => "UNKNOWN",
        }
    }

    /// Fallback inference from the number of node tokens on a data line.
    ///
    /// Lossy: four nodes always map to [`ElementType::Shell4`], never to
    /// [`ElementType::Tetra4`]. Only used inside generic element sections.
    pub fn from_node_count(count: usize) -> Self {
        match count {
            1 => ElementType::Spring1,
            2 => ElementType::Beam2,
            3 => ElementType::Shell3,
            4 => ElementType::Shell4,
            5 => ElementType::Pyram5,
            6 => ElementType::Penta6,
            8 => ElementType::Hexa8,
            _ => ElementType::Unknown,
        }
    }

    pub fn is_shell(self) -> bool {
        matches!(self, ElementType::Shell3 | ElementType::Shell4)
    }

    pub fn is_solid(self) -> bool {
        matches!(
            self,
            ElementType::Tetra4 | ElementType::Hexa8 | ElementType::Penta6 | ElementType::Pyram5
        )
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownElementType(pub String);

impl Display for UnknownElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown element type '{}'", self.0)
    }
}

impl std::error::Error for UnknownElementType {}

impl FromStr for ElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRIA3" | "TRI3" | "SH3N" => Ok(ElementType::Shell3),
            "QUAD4" | "QUAD" | "SHELL" => Ok(ElementType::Shell4),
            "TETRA4" | "TET4" => Ok(ElementType::Tetra4),
            "HEXA8" | "HEX8" | "BRICK" => Ok(ElementType::Hexa8),
            "PENTA6" | "PENT6" => Ok(ElementType::Penta6),
            "PYRAM5" | "PYR5" => Ok(ElementType::Pyram5),
            "BEAM2" | "BEAM" => Ok(ElementType::Beam2),
            "SPRING1" | "SPRING" => Ok(ElementType::Spring1),
            "UNKNOWN" => Ok(ElementType::Unknown),
            other => Err(UnknownElementType(other.to_string())),
        }
    }
}

/// An element in the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element ID (unique within a model)
    pub id: i32,
    /// Topology tag
    pub element_type: ElementType,
    /// Ordered node connectivity (node IDs)
    pub node_ids: Vec<i32>,
    pub material_id: Option<i32>,
    pub property_id: Option<i32>,
}

impl Element {
    pub fn new(id: i32, element_type: ElementType, node_ids: Vec<i32>) -> Self {
        Self {
            id,
            element_type,
            node_ids,
            material_id: None,
            property_id: None,
        }
    }

    pub fn with_material(mut self, material_id: i32) -> Self {
        self.material_id = Some(material_id);
        self
    }

    pub fn with_property(mut self, property_id: i32) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// True when the node sequence length matches the topology (or the topology is unknown).
    pub fn has_expected_node_count(&self) -> bool {
        let expected = self.element_type.node_count();
        expected == 0 || self.node_ids.len() == expected
    }
}

/// A material: law name plus an open bag of named scalar parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    pub id: i32,
    /// Material law (e.g. ELASTIC, PLAS_JOHNS)
    pub law: String,
    pub properties: BTreeMap<String, f64>,
}

impl Material {
    pub fn new(id: i32, law: impl Into<String>) -> Self {
        Self {
            id,
            law: law.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }
}

/// Section/thickness data referenced by elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub kind: String,
    pub values: BTreeMap<String, f64>,
}

impl Property {
    pub fn new(id: i32, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

/// A load applied to a set of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub id: i32,
    pub kind: String,
    pub magnitude: f64,
    pub direction: Vec3,
    pub node_ids: Vec<i32>,
}

impl LoadCase {
    pub fn new(id: i32, kind: impl Into<String>, magnitude: f64, direction: Vec3) -> Self {
        Self {
            id,
            kind: kind.into(),
            magnitude,
            direction,
            node_ids: Vec::new(),
        }
    }

    pub fn on_nodes(mut self, node_ids: impl IntoIterator<Item = i32>) -> Self {
        self.node_ids.extend(node_ids);
        self
    }
}

/// Constrained degrees of freedom on a set of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    pub id: i32,
    pub kind: String,
    /// Constrained DOFs, each in 1..=6 (1-3 translations, 4-6 rotations)
    pub dofs: Vec<u8>,
    pub node_ids: Vec<i32>,
}

impl BoundaryCondition {
    pub fn new(id: i32, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            dofs: Vec::new(),
            node_ids: Vec::new(),
        }
    }

    pub fn with_dofs(mut self, dofs: impl IntoIterator<Item = u8>) -> Self {
        self.dofs.extend(dofs);
        self
    }

    pub fn on_nodes(mut self, node_ids: impl IntoIterator<Item = i32>) -> Self {
        self.node_ids.extend(node_ids);
        self
    }

    /// True when every translational DOF (1, 2, 3) is constrained.
    pub fn fixes_translations(&self) -> bool {
        (1..=3).all(|dof| self.dofs.contains(&dof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_node_counts() {
        assert_eq!(ElementType::Shell3.node_count(), 3);
        assert_eq!(ElementType::Tetra4.node_count(), 4);
        assert_eq!(ElementType::Hexa8.node_count(), 8);
        assert_eq!(ElementType::Spring1.node_count(), 1);
        assert_eq!(ElementType::Unknown.node_count(), 0);
    }

    #[test]
    fn element_type_parsing() {
        assert_eq!("tria3".parse::<ElementType>(), Ok(ElementType::Shell3));
        assert_eq!("HEX8".parse::<ElementType>(), Ok(ElementType::Hexa8));
        assert_eq!("Pyr5".parse::<ElementType>(), Ok(ElementType::Pyram5));
        assert!("C3D20".parse::<ElementType>().is_err());
    }

    #[test]
    fn count_inference_cannot_produce_tetra() {
        assert_eq!(ElementType::from_node_count(4), ElementType::Shell4);
        assert_eq!(ElementType::from_node_count(7), ElementType::Unknown);
        assert!(
            ElementType::ALL
                .iter()
                .filter(|t| **t != ElementType::Unknown)
                .all(|t| t.node_count() > 0)
        );
    }

    #[test]
    fn unknown_topology_skips_count_check() {
        let elem = Element::new(1, ElementType::Unknown, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(elem.has_expected_node_count());

        let bad = Element::new(2, ElementType::Hexa8, vec![1, 2, 3]);
        assert!(!bad.has_expected_node_count());
    }

    #[test]
    fn boundary_condition_translation_check() {
        let bc = BoundaryCondition::new(1, "FIX").with_dofs([1, 2, 3]);
        assert!(bc.fixes_translations());
        let partial = BoundaryCondition::new(2, "FIX").with_dofs([1, 3]);
        assert!(!partial.fixes_translations());
    }
}
