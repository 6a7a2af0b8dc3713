//! Catmull-Clark subdivision.
//!
//! One refinement step turns every n-gon into n quads:
//!
//! ```text
//! v_i ── e(i,i+1)
//!  │        │
//! e(i-1,i) ─ face point
//! ```
//!
//! New vertices are laid out as `[vertex points | edge points | face points]`.
//! Edges are numbered in the order they are first met while walking the faces,
//! so the layout depends only on the topology. Two position sets sharing the
//! same cells therefore stay vertex-aligned after refinement, which is what the
//! morph target relies on.
//!
//! Boundary handling:
//! - a boundary edge (one adjacent face) uses its midpoint;
//! - a vertex on exactly two boundary edges uses the 1-6-1 rule;
//! - any other boundary vertex (non-manifold fans) stays in place.

use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Cell {cell} has {corners} corners, at least 3 are required")]
    DegenerateCell { cell: usize, corners: usize },

    #[error("Cell {cell} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange { cell: usize, index: u32, count: usize },

    #[error("Morph shape has {actual} vertices, the base mesh has {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Checks that every cell is a polygon over existing vertices.
pub fn validate_cells<C: AsRef<[u32]>>(
    cells: &[C],
    vertex_count: usize,
) -> Result<(), TopologyError> {
    for (cell, corners) in cells.iter().enumerate() {
        let corners = corners.as_ref();
        if corners.len() < 3 {
            return Err(TopologyError::DegenerateCell {
                cell,
                corners: corners.len(),
            });
        }
        if let Some(&index) = corners.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(TopologyError::IndexOutOfRange {
                cell,
                index,
                count: vertex_count,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Edge {
    a: u32,
    b: u32,
    faces: SmallVec<[u32; 2]>,
}

impl Edge {
    #[inline]
    fn is_boundary(&self) -> bool {
        self.faces.len() < 2
    }
}

/// Topology of one Catmull-Clark step, computed once and applied to any number
/// of position sets over the same cells.
#[derive(Debug, Clone)]
pub struct Refinement {
    vertex_count: usize,
    faces: Vec<SmallVec<[u32; 4]>>,
    edges: Vec<Edge>,
    quads: Vec<[u32; 4]>,
}

impl Refinement {
    /// Builds the refinement topology. `faces` must already be validated.
    #[must_use]
    pub fn new<C: AsRef<[u32]>>(faces: &[C], vertex_count: usize) -> Self {
        let faces: Vec<SmallVec<[u32; 4]>> = faces
            .iter()
            .map(|face| SmallVec::from_slice(face.as_ref()))
            .collect();

        let mut lookup: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut edges: Vec<Edge> = Vec::new();
        let mut face_edges: Vec<SmallVec<[u32; 4]>> = Vec::with_capacity(faces.len());

        for (f, face) in faces.iter().enumerate() {
            let n = face.len();
            let mut ids = SmallVec::with_capacity(n);
            for i in 0..n {
                let (a, b) = (face[i], face[(i + 1) % n]);
                let key = if a < b { (a, b) } else { (b, a) };
                let id = *lookup.entry(key).or_insert_with(|| {
                    edges.push(Edge {
                        a: key.0,
                        b: key.1,
                        faces: SmallVec::new(),
                    });
                    (edges.len() - 1) as u32
                });
                edges[id as usize].faces.push(f as u32);
                ids.push(id);
            }
            face_edges.push(ids);
        }

        let edge_base = vertex_count as u32;
        let face_base = edge_base + edges.len() as u32;

        let mut quads = Vec::with_capacity(face_edges.iter().map(SmallVec::len).sum());
        for (f, (face, ids)) in faces.iter().zip(&face_edges).enumerate() {
            let n = face.len();
            let face_point = face_base + f as u32;
            for i in 0..n {
                // ids[i] is the edge (i, i+1)
                let next = edge_base + ids[i];
                let prev = edge_base + ids[(i + n - 1) % n];
                quads.push([face[i], next, face_point, prev]);
            }
        }

        Self {
            vertex_count,
            faces,
            edges,
            quads,
        }
    }

    /// Vertex count after the step.
    #[must_use]
    pub fn refined_vertex_count(&self) -> usize {
        self.vertex_count + self.edges.len() + self.faces.len()
    }

    /// Quads produced by the step, indexing the refined vertex layout.
    #[must_use]
    pub fn quads(&self) -> &[[u32; 4]] {
        &self.quads
    }

    #[must_use]
    pub fn into_quads(self) -> Vec<[u32; 4]> {
        self.quads
    }

    /// Computes refined positions for one position set.
    #[must_use]
    pub fn apply(&self, positions: &[Vec3]) -> Vec<Vec3> {
        debug_assert_eq!(positions.len(), self.vertex_count);
        let n = self.vertex_count;

        let face_points: Vec<Vec3> = self
            .faces
            .iter()
            .map(|face| {
                face.iter().map(|&i| positions[i as usize]).sum::<Vec3>() / face.len() as f32
            })
            .collect();

        let edge_points: Vec<Vec3> = self
            .edges
            .iter()
            .map(|edge| {
                let ends = positions[edge.a as usize] + positions[edge.b as usize];
                if edge.is_boundary() {
                    ends * 0.5
                } else {
                    let faces: Vec3 = edge.faces.iter().map(|&f| face_points[f as usize]).sum();
                    (ends + faces) / (2 + edge.faces.len()) as f32
                }
            })
            .collect();

        let mut face_sum = vec![Vec3::ZERO; n];
        let mut face_count = vec![0u32; n];
        for (face, point) in self.faces.iter().zip(&face_points) {
            for &i in face {
                face_sum[i as usize] += *point;
                face_count[i as usize] += 1;
            }
        }

        let mut midpoint_sum = vec![Vec3::ZERO; n];
        let mut valence = vec![0u32; n];
        let mut boundary_sum = vec![Vec3::ZERO; n];
        let mut boundary_count = vec![0u32; n];
        for edge in &self.edges {
            let (a, b) = (edge.a as usize, edge.b as usize);
            let midpoint = (positions[a] + positions[b]) * 0.5;
            for v in [a, b] {
                midpoint_sum[v] += midpoint;
                valence[v] += 1;
            }
            if edge.is_boundary() {
                boundary_sum[a] += positions[b];
                boundary_sum[b] += positions[a];
                boundary_count[a] += 1;
                boundary_count[b] += 1;
            }
        }

        let vertex_points = (0..n).map(|v| {
            let p = positions[v];
            if boundary_count[v] == 2 {
                (p * 6.0 + boundary_sum[v]) / 8.0
            } else if boundary_count[v] > 0 || face_count[v] == 0 {
                p
            } else {
                let k = valence[v] as f32;
                let f = face_sum[v] / face_count[v] as f32;
                let r = midpoint_sum[v] / k;
                (f + r * 2.0 + p * (k - 3.0)) / k
            }
        });

        let mut refined = Vec::with_capacity(self.refined_vertex_count());
        refined.extend(vertex_points);
        refined.extend(edge_points);
        refined.extend(face_points);
        refined
    }
}

/// Result of [`catmull_clark`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubdividedMesh {
    pub positions: Vec<Vec3>,
    pub morph_positions: Option<Vec<Vec3>>,
    pub quads: Vec<[u32; 4]>,
}

/// Runs `levels` Catmull-Clark steps over the base positions and, with the same
/// topology, over the morph positions.
///
/// `cells` must be validated against `positions` and `morph` must have the same
/// length as `positions`. `levels == 0` is treated as one step.
#[must_use]
pub fn catmull_clark<C: AsRef<[u32]>>(
    positions: &[Vec3],
    morph: Option<&[Vec3]>,
    cells: &[C],
    levels: u32,
) -> SubdividedMesh {
    let step = Refinement::new(cells, positions.len());
    let mut positions = step.apply(positions);
    let mut morph = morph.map(|shape| step.apply(shape));
    let mut quads = step.into_quads();

    for _ in 1..levels {
        let step = Refinement::new(&quads, positions.len());
        positions = step.apply(&positions);
        morph = morph.map(|shape| step.apply(&shape));
        quads = step.into_quads();
    }

    SubdividedMesh {
        positions,
        morph_positions: morph,
        quads,
    }
}

/// Splits quads `[a, b, c, d]` into `[a, b, c]` and `[a, c, d]`.
#[must_use]
pub fn triangulate_quads(quads: &[[u32; 4]]) -> Vec<u32> {
    quads
        .iter()
        .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
        .collect()
}

/// Fan-triangulates arbitrary polygons around their first corner.
#[must_use]
pub fn triangulate_polygons<C: AsRef<[u32]>>(cells: &[C]) -> Vec<u32> {
    let mut indices = Vec::with_capacity(cells.len() * 3);
    for cell in cells {
        let cell = cell.as_ref();
        for i in 1..cell.len().saturating_sub(1) {
            indices.extend_from_slice(&[cell[0], cell[i], cell[i + 1]]);
        }
    }
    indices
}
