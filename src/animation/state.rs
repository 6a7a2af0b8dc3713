use glam::{Affine3A, Mat4, Quat, Vec3};
use smallvec::SmallVec;

use crate::scene::Scene;

/// Evaluated animation values of one node.
///
/// `world_matrix` is what the renderer consumes; the TRS fields and
/// `local_matrix` are kept so the next evaluation can overwrite them in place.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub morph_weights: SmallVec<[f32; 4]>,

    pub local_matrix: Affine3A,
    pub world_matrix: Affine3A,
}

impl NodeState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            morph_weights: SmallVec::new(),
            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
        }
    }

    /// World matrix as `Mat4`, for GPU upload.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// Weight of the active (first) morph target, 0 when none is animated.
    #[inline]
    #[must_use]
    pub fn active_morph_weight(&self) -> f32 {
        self.morph_weights.first().copied().unwrap_or(0.0)
    }

    fn reset(&mut self) {
        self.location = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
        self.scale = Vec3::ONE;
        self.morph_weights.clear();
        self.local_matrix = Affine3A::IDENTITY;
        self.world_matrix = Affine3A::IDENTITY;
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-session animation results, one [`NodeState`] per scene node in scene order.
///
/// Created once per renderer and overwritten in place every frame. The only
/// writer is the transform evaluator.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    nodes: Vec<NodeState>,
}

impl AnimationState {
    #[must_use]
    pub fn new(scene: &Scene) -> Self {
        Self::with_len(scene.nodes().len())
    }

    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            nodes: vec![NodeState::new(); len],
        }
    }

    /// Restores every entry to identity without reallocating.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NodeState> {
        self.nodes.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut NodeState> {
        self.nodes.get_mut(index)
    }

    /// Looks a node up by its scene id.
    #[must_use]
    pub fn by_id(&self, scene: &Scene, id: &str) -> Option<&NodeState> {
        scene.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeState> {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [NodeState] {
        &mut self.nodes
    }
}
