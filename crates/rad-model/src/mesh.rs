//! Topology-specific triangulation for rendering.
//!
//! Renderers consume a [`TriangleMesh`] read-only and build their own GPU
//! buffers from it; nothing here knows about graphics APIs.

use std::collections::HashSet;

use rad_deck::{ElementType, Vec3};

use crate::geometry::triangle_normal;

/// Triangles, as local node indices, covering the faces of each topology.
pub fn face_triangles(element_type: ElementType) -> &'static [[usize; 3]] {
    match element_type {
        ElementType::Shell3 => &[[0, 1, 2]],
        ElementType::Shell4 => &[[0, 1, 2], [0, 2, 3]],
        ElementType::Tetra4 => &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        ElementType::Hexa8 => &[
            [0, 3, 2],
            [0, 2, 1],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ],
        ElementType::Penta6 => &[
            [0, 2, 1],
            [3, 4, 5],
            [0, 1, 4],
            [0, 4, 3],
            [1, 2, 5],
            [1, 5, 4],
            [2, 0, 3],
            [2, 3, 5],
        ],
        ElementType::Pyram5 => &[
            [0, 3, 2],
            [0, 2, 1],
            [0, 1, 4],
            [1, 2, 4],
            [2, 3, 4],
            [3, 0, 4],
        ],
        ElementType::Beam2 | ElementType::Spring1 | ElementType::Unknown => &[],
    }
}

/// Wireframe edges, as local node indices.
pub fn element_edges(element_type: ElementType) -> &'static [[usize; 2]] {
    match element_type {
        ElementType::Shell3 => &[[0, 1], [1, 2], [2, 0]],
        ElementType::Shell4 => &[[0, 1], [1, 2], [2, 3], [3, 0]],
        ElementType::Tetra4 => &[[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]],
        ElementType::Hexa8 => &[
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            [4, 5],
            [5, 6],
            [6, 7],
            [7, 4],
            [0, 4],
            [1, 5],
            [2, 6],
            [3, 7],
        ],
        ElementType::Penta6 => &[
            [0, 1],
            [1, 2],
            [2, 0],
            [3, 4],
            [4, 5],
            [5, 3],
            [0, 3],
            [1, 4],
            [2, 5],
        ],
        ElementType::Pyram5 => &[
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            [0, 4],
            [1, 4],
            [2, 4],
            [3, 4],
        ],
        ElementType::Beam2 => &[[0, 1]],
        ElementType::Spring1 | ElementType::Unknown => &[],
    }
}

/// Render-ready surface derived from a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// One position per model node, in storage order
    pub positions: Vec<Vec3>,
    /// Triangles indexing `positions`
    pub triangles: Vec<[u32; 3]>,
    /// Deduplicated wireframe edges indexing `positions`, smaller index first
    pub edges: Vec<[u32; 2]>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal per triangle; zero for triangles without area.
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| self.positions[i as usize]);
                triangle_normal(a, b, c).unwrap_or([0.0; 3])
            })
            .collect()
    }
}

/// Accumulates triangles and unique edges for elements whose nodes are resolved
/// to vertex indices.
#[derive(Debug, Default)]
pub(crate) struct MeshBuilder {
    mesh: TriangleMesh,
    seen_edges: HashSet<[u32; 2]>,
}

impl MeshBuilder {
    pub(crate) fn new(positions: Vec<Vec3>) -> Self {
        Self {
            mesh: TriangleMesh {
                positions,
                ..TriangleMesh::default()
            },
            seen_edges: HashSet::new(),
        }
    }

    pub(crate) fn add_element(&mut self, element_type: ElementType, vertices: &[u32]) {
        if vertices.len() != element_type.node_count() {
            return;
        }
        for tri in face_triangles(element_type) {
            self.mesh.triangles.push(tri.map(|i| vertices[i]));
        }
        for edge in element_edges(element_type) {
            let (a, b) = (vertices[edge[0]], vertices[edge[1]]);
            let key = if a <= b { [a, b] } else { [b, a] };
            if a != b && self.seen_edges.insert(key) {
                self.mesh.edges.push(key);
            }
        }
    }

    pub(crate) fn finish(self) -> TriangleMesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_counts_per_topology() {
        let expected = [
            (ElementType::Shell3, 1),
            (ElementType::Shell4, 2),
            (ElementType::Tetra4, 4),
            (ElementType::Hexa8, 12),
            (ElementType::Penta6, 8),
            (ElementType::Pyram5, 6),
            (ElementType::Beam2, 0),
            (ElementType::Spring1, 0),
            (ElementType::Unknown, 0),
        ];
        for (topology, count) in expected {
            assert_eq!(face_triangles(topology).len(), count, "{topology}");
        }
    }

    #[test]
    fn local_indices_stay_within_topology() {
        for topology in ElementType::ALL {
            let n = topology.node_count();
            assert!(face_triangles(topology).iter().flatten().all(|i| *i < n));
            assert!(element_edges(topology).iter().flatten().all(|i| *i < n));
        }
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        let mut builder = MeshBuilder::new(vec![[0.0; 3]; 4]);
        builder.add_element(ElementType::Shell3, &[0, 1, 2]);
        builder.add_element(ElementType::Shell3, &[0, 2, 3]);
        let mesh = builder.finish();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.edges.len(), 5);
    }

    #[test]
    fn wrong_vertex_count_is_skipped() {
        let mut builder = MeshBuilder::new(vec![[0.0; 3]; 4]);
        builder.add_element(ElementType::Shell4, &[0, 1, 2]);
        assert!(builder.finish().triangles.is_empty());
    }

    #[test]
    fn hexa_faces_point_outward() {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        let mut builder = MeshBuilder::new(positions);
        builder.add_element(ElementType::Hexa8, &[0, 1, 2, 3, 4, 5, 6, 7]);
        let mesh = builder.finish();
        let center = [0.5, 0.5, 0.5];
        for (tri, normal) in mesh.triangles.iter().zip(mesh.face_normals()) {
            let p = mesh.positions[tri[0] as usize];
            let outward: f64 = (0..3).map(|k| (p[k] - center[k]) * normal[k]).sum();
            assert!(outward > 0.0, "triangle {tri:?} faces inward");
        }
    }
}
