use glam::Mat4;

use crate::animation::NodeAnimation;

/// Base color used when a mesh carries no material.
pub const DEFAULT_MESH_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Geometry payload of a mesh node, as exported (before refinement).
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    /// Polygons as corner indices. Triangles unless the mesh is subdivided.
    pub cells: Vec<Vec<u32>>,
    pub color: [f32; 3],
    /// Catmull-Clark level; `None` (or 0) leaves the mesh as is.
    pub subdivision_level: Option<u32>,
    /// Alternate position sets. Only the first one is blended.
    pub morph_shapes: Vec<Vec<[f32; 3]>>,
}

impl MeshData {
    /// The morph target blended against the base positions, if any.
    #[must_use]
    pub fn active_morph_shape(&self) -> Option<&[[f32; 3]]> {
        self.morph_shapes.first().map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_deformable(&self) -> bool {
        !self.morph_shapes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    /// Perspective projection in the exporter's (GL clip space) convention.
    pub perspective: Mat4,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A transform-only node, typically a camera pivot.
    Empty,
    Camera(CameraData),
    Mesh(MeshData),
}

/// One entry of the scene hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) parent: Option<usize>,
    pub(crate) kind: NodeKind,
    pub(crate) animation: NodeAnimation,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scene index of the parent node.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> &NodeAnimation {
        &self.animation
    }

    #[must_use]
    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    #[must_use]
    pub fn camera(&self) -> Option<&CameraData> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}
