//! Transform evaluation.
//!
//! Resolves every node's animated properties for a frame and composes world
//! matrices down the hierarchy.
//!
//! # Ordering
//!
//! Scenes keep parents ahead of their children (checked at load time), so a
//! single pass in scene order is enough: when a node is reached its parent's
//! world matrix for this frame is already final.
//!
//! # Composition
//!
//! ```text
//! local = T(location) · R(rotation) · S(scale)
//! world = parent_world · local · external      (ExternalOrder::AfterLocal)
//! world = parent_world · external · local      (ExternalOrder::BeforeLocal)
//! ```
//!
//! `external` is a matrix injected by the caller (the live camera pivot).

use glam::{Affine3A, Quat, Vec3, Vec4};
use smallvec::SmallVec;

use crate::animation::property::{AnimatedProperty, NodeAnimation};
use crate::animation::state::{AnimationState, NodeState};
use crate::scene::Scene;

/// Which side of the local matrix an external transform is applied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalOrder {
    /// `parent_world · local · external`: rotates around the node's own origin.
    #[default]
    AfterLocal,
    /// `parent_world · external · local`: rotates the node around its parent's origin.
    BeforeLocal,
}

/// A caller-injected matrix and the side it is applied on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct External {
    pub matrix: Affine3A,
    pub order: ExternalOrder,
}

impl External {
    /// Composes `local` with this transform.
    #[inline]
    #[must_use]
    pub fn apply(&self, local: Affine3A) -> Affine3A {
        match self.order {
            ExternalOrder::AfterLocal => local * self.matrix,
            ExternalOrder::BeforeLocal => self.matrix * local,
        }
    }
}

/// Matrices injected into specific nodes, keyed by scene index.
///
/// Entries are updated in place so that setting the pivot every frame does not
/// allocate.
#[derive(Debug, Clone, Default)]
pub struct ExternalTransforms {
    entries: SmallVec<[(usize, External); 2]>,
}

impl ExternalTransforms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a transform applied after the node's local matrix.
    pub fn set(&mut self, index: usize, matrix: Affine3A) {
        self.set_ordered(index, matrix, ExternalOrder::AfterLocal);
    }

    pub fn set_ordered(&mut self, index: usize, matrix: Affine3A, order: ExternalOrder) {
        let external = External { matrix, order };
        if let Some(entry) = self.entries.iter_mut().find(|(i, _)| *i == index) {
            entry.1 = external;
        } else {
            self.entries.push((index, external));
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&External> {
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, external)| external)
    }

    pub fn remove(&mut self, index: usize) {
        self.entries.retain(|(i, _)| *i != index);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn resolve_vec3(property: &AnimatedProperty, frame: f32) -> Vec3 {
    let mut out = [0.0f32; 3];
    property.resolve_into(frame, &mut out);
    Vec3::from_array(out)
}

fn resolve_quat(property: &AnimatedProperty, frame: f32) -> Quat {
    // Components are stored x, y, z, w
    let mut out = [0.0f32; 4];
    property.resolve_into(frame, &mut out);
    Quat::from_xyzw(out[0], out[1], out[2], out[3])
}

/// Rescales a quaternion to unit length.
///
/// Sampled components are interpolated independently, so the result is rarely
/// unit length; left as is it would scale the geometry. A zero quaternion has no
/// direction to keep and becomes the identity.
#[must_use]
pub fn normalize_rotation(rotation: Quat) -> Quat {
    let length = rotation.length();
    if length > 0.0 && length.is_finite() {
        Quat::from_vec4(Vec4::from(rotation) / length)
    } else {
        log::debug!("Degenerate rotation quaternion {rotation:?}, using identity");
        Quat::IDENTITY
    }
}

/// Resolves a node's properties at `frame` and rebuilds its local matrix.
///
/// Properties the node does not declare keep their previous values. A node that
/// declares none of location / rotation / scale keeps its previous local matrix.
pub fn evaluate_local(entry: &mut NodeState, animation: &NodeAnimation, frame: f32) {
    if let Some(location) = &animation.location {
        entry.location = resolve_vec3(location, frame);
    }
    if let Some(rotation) = &animation.rotation {
        entry.rotation = resolve_quat(rotation, frame);
    }
    if let Some(scale) = &animation.scale {
        entry.scale = resolve_vec3(scale, frame);
    }
    if let Some(weights) = &animation.morph_weights {
        entry.morph_weights.resize(weights.len(), 0.0);
        weights.resolve_into(frame, &mut entry.morph_weights);
    }

    if animation.has_transform() {
        entry.rotation = normalize_rotation(entry.rotation);
        entry.local_matrix =
            Affine3A::from_scale_rotation_translation(entry.scale, entry.rotation, entry.location);
    }
}

/// Evaluates the node at `index` and writes its world matrix.
///
/// The parent's entry must already hold this frame's world matrix.
pub fn evaluate(
    state: &mut AnimationState,
    scene: &Scene,
    index: usize,
    external: Option<&External>,
    frame: f32,
) {
    let node = &scene.nodes()[index];
    let parent_world = node
        .parent()
        .and_then(|parent| state.get(parent))
        .map(|parent| parent.world_matrix);

    let Some(entry) = state.get_mut(index) else {
        return;
    };

    evaluate_local(entry, node.animation(), frame);

    let mut world = entry.local_matrix;
    if let Some(external) = external {
        world = external.apply(world);
    }
    if let Some(parent_world) = parent_world {
        world = parent_world * world;
    }
    entry.world_matrix = world;
}

/// Evaluates every node of the scene at `frame`, in scene order.
pub fn evaluate_scene(
    state: &mut AnimationState,
    scene: &Scene,
    externals: &ExternalTransforms,
    frame: f32,
) {
    debug_assert_eq!(state.len(), scene.nodes().len());
    for index in 0..scene.nodes().len() {
        evaluate(state, scene, index, externals.get(index), frame);
    }
}
