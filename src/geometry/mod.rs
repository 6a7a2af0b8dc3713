//! Mesh refinement
//!
//! Turns a mesh node's exported polygons into triangle lists:
//! - `subdivision`: Catmull-Clark refinement and triangulation
//! - `mesh_geometry`: per-node geometry (base + morph stream) for upload

pub mod mesh_geometry;
pub mod subdivision;

pub use mesh_geometry::MeshGeometry;
pub use subdivision::{
    Refinement, SubdividedMesh, TopologyError, catmull_clark, triangulate_polygons,
    triangulate_quads, validate_cells,
};
