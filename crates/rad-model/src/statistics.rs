//! Model summary for reporting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::Aabb;
use crate::store::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatistics {
    pub title: String,
    pub version: Option<String>,
    pub nodes: usize,
    pub elements: usize,
    pub materials: usize,
    pub properties: usize,
    pub load_cases: usize,
    pub boundary_conditions: usize,
    /// Element count per topology name
    pub element_types: BTreeMap<String, usize>,
    pub degenerate_elements: usize,
    pub bounds: Aabb,
    pub bounding_radius: f64,
}

impl ModelStatistics {
    pub fn from_model(model: &Model) -> Self {
        let mut element_types = BTreeMap::new();
        for element in model.elements() {
            *element_types
                .entry(element.element_type.name().to_string())
                .or_insert(0) += 1;
        }

        Self {
            title: model.title().to_string(),
            version: model.version().map(str::to_string),
            nodes: model.node_count(),
            elements: model.element_count(),
            materials: model.material_count(),
            properties: model.property_count(),
            load_cases: model.load_case_count(),
            boundary_conditions: model.boundary_condition_count(),
            element_types,
            degenerate_elements: model.degenerate_elements().count(),
            bounds: model.bounds(),
            bounding_radius: model.bounding_radius(),
        }
    }

    /// Format as a human-readable string
    pub fn format(&self) -> String {
        let mut lines = Vec::new();
        if !self.title.is_empty() {
            lines.push(format!("Title: {}", self.title));
        }
        lines.extend([
            format!("Nodes: {}", self.nodes),
            format!("Elements: {}", self.elements),
            format!("Materials: {}", self.materials),
            format!("Properties: {}", self.properties),
            format!("Load cases: {}", self.load_cases),
            format!("Boundary conditions: {}", self.boundary_conditions),
        ]);

        if !self.element_types.is_empty() {
            lines.push("Element types:".to_string());
            for (name, count) in &self.element_types {
                lines.push(format!("  {name}: {count}"));
            }
        }
        if self.degenerate_elements > 0 {
            lines.push(format!("Degenerate elements: {}", self.degenerate_elements));
        }

        let [x0, y0, z0] = self.bounds.min;
        let [x1, y1, z1] = self.bounds.max;
        lines.push(format!("Bounds: ({x0}, {y0}, {z0}) - ({x1}, {y1}, {z1})"));
        lines.push(format!("Bounding radius: {}", self.bounding_radius));
        lines.join("\n")
    }
}

impl Model {
    pub fn statistics(&self) -> ModelStatistics {
        ModelStatistics::from_model(self)
    }
}
