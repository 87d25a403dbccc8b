//! Indexed in-memory model populated from a deck.
//!
//! [`Model`] owns every entity collection, keeps an id→position index per
//! collection, and derives geometry (bounds, element quality, render
//! triangulation) from the stored nodes.

mod collection;
pub mod geometry;
pub mod mesh;
pub mod statistics;
mod store;
pub mod transform;
mod validate;

pub use collection::{Collection, Identified};
pub use geometry::{Aabb, DEGENERATE_THRESHOLD};
pub use mesh::TriangleMesh;
pub use statistics::ModelStatistics;
pub use store::Model;
pub use transform::{AxisConvention, LengthUnit, length_scale};
pub use validate::ValidationError;

pub use rad_deck::{
    BoundaryCondition, Element, ElementType, LoadCase, Material, Node, Property, Vec3,
};
