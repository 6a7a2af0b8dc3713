use glam::Vec3;

use crate::errors::{Result, TimepieceError};
use crate::geometry::subdivision::{
    TopologyError, catmull_clark, triangulate_polygons, triangulate_quads, validate_cells,
};
use crate::scene::MeshData;

/// CPU-side triangle geometry of one mesh node, ready for upload.
///
/// When present, `morph_positions` is vertex-aligned with `positions`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub morph_positions: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
    pub color: [f32; 3],
}

impl MeshGeometry {
    /// Refines a mesh node's geometry: validation, optional subdivision of the
    /// base and morph positions, then triangulation.
    pub fn build(id: &str, mesh: &MeshData) -> Result<Self> {
        let topology_error = |error: TopologyError| TimepieceError::InvalidTopology {
            mesh: id.to_string(),
            reason: error.to_string(),
        };

        validate_cells(&mesh.cells, mesh.positions.len()).map_err(topology_error)?;

        let shape = mesh.active_morph_shape();
        if let Some(shape) = shape
            && shape.len() != mesh.positions.len()
        {
            return Err(topology_error(TopologyError::ShapeMismatch {
                expected: mesh.positions.len(),
                actual: shape.len(),
            }));
        }

        let geometry = match mesh.subdivision_level {
            Some(levels) if levels > 0 => {
                let base: Vec<Vec3> = mesh.positions.iter().copied().map(Vec3::from).collect();
                let morph: Option<Vec<Vec3>> =
                    shape.map(|shape| shape.iter().copied().map(Vec3::from).collect());

                let refined = catmull_clark(&base, morph.as_deref(), &mesh.cells, levels);
                log::debug!(
                    "Mesh '{id}': subdivided {levels}x, {} -> {} vertices, {} quads",
                    mesh.positions.len(),
                    refined.positions.len(),
                    refined.quads.len()
                );

                Self {
                    positions: refined.positions.iter().map(Vec3::to_array).collect(),
                    morph_positions: refined
                        .morph_positions
                        .map(|shape| shape.iter().map(Vec3::to_array).collect()),
                    indices: triangulate_quads(&refined.quads),
                    color: mesh.color,
                }
            }
            _ => Self {
                positions: mesh.positions.clone(),
                morph_positions: shape.map(<[[f32; 3]]>::to_vec),
                indices: triangulate_polygons(&mesh.cells),
                color: mesh.color,
            },
        };

        Ok(geometry)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn is_deformable(&self) -> bool {
        self.morph_positions.is_some()
    }
}
