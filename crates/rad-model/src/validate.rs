//! Referential-integrity checks run after a full parse.

use thiserror::Error;

use rad_deck::ElementType;

use crate::store::Model;

/// First invariant violation found. Validation stops at the first problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("model has no nodes")]
    EmptyModel,

    #[error("duplicate node id {0}")]
    DuplicateNode(i32),

    #[error("duplicate element id {0}")]
    DuplicateElement(i32),

    #[error("element {element} of type {topology} has {actual} nodes but expected {expected}")]
    NodeCountMismatch {
        element: i32,
        topology: ElementType,
        expected: usize,
        actual: usize,
    },

    #[error("element {element} references non-existent node {node}")]
    DanglingNode { element: i32, node: i32 },

    #[error("load case {load} references non-existent node {node}")]
    DanglingLoadNode { load: i32, node: i32 },

    #[error("boundary condition {condition} references non-existent node {node}")]
    DanglingBoundaryNode { condition: i32, node: i32 },

    #[error("boundary condition {condition} constrains DOF {dof}, expected 1-6")]
    InvalidDof { condition: i32, dof: u8 },
}

impl Model {
    /// Checks, in order: non-empty node set, unique node ids, unique element ids
    /// and per-topology node counts, element node references, load node
    /// references, then per boundary condition its DOF range and node references.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.nodes().is_empty() {
            return Err(ValidationError::EmptyModel);
        }

        if let Some(id) = self.node_collection().first_duplicate() {
            return Err(ValidationError::DuplicateNode(id));
        }

        let mut element_ids = std::collections::HashSet::with_capacity(self.elements().len());
        for element in self.elements() {
            if !element_ids.insert(element.id) {
                return Err(ValidationError::DuplicateElement(element.id));
            }
            if !element.has_expected_node_count() {
                return Err(ValidationError::NodeCountMismatch {
                    element: element.id,
                    topology: element.element_type,
                    expected: element.element_type.node_count(),
                    actual: element.node_ids.len(),
                });
            }
        }

        for element in self.elements() {
            if let Some(&node) = element.node_ids.iter().find(|n| self.find_node(**n).is_none()) {
                return Err(ValidationError::DanglingNode {
                    element: element.id,
                    node,
                });
            }
        }

        for load in self.load_cases() {
            if let Some(&node) = load.node_ids.iter().find(|n| self.find_node(**n).is_none()) {
                return Err(ValidationError::DanglingLoadNode {
                    load: load.id,
                    node,
                });
            }
        }

        for condition in self.boundary_conditions() {
            if let Some(&dof) = condition.dofs.iter().find(|d| !(1..=6).contains(*d)) {
                return Err(ValidationError::InvalidDof {
                    condition: condition.id,
                    dof,
                });
            }
            if let Some(&node) = condition
                .node_ids
                .iter()
                .find(|n| self.find_node(**n).is_none())
            {
                return Err(ValidationError::DanglingBoundaryNode {
                    condition: condition.id,
                    node,
                });
            }
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
