use std::f32::consts::PI;

use glam::{Affine3A, Mat4};

use crate::animation::{
    AnimationState, ExternalOrder, ExternalTransforms, NodeState, evaluate_scene,
};
use crate::scene::Scene;

/// Maximum pivot tilt per axis, reached at the edges of the input range.
const PIVOT_TILT: f32 = 0.05 * PI;

/// CPU half of a frame: projection, pivot injection, scene evaluation and view
/// matrix. Holds no GPU state.
#[derive(Debug, Clone)]
pub struct ViewState {
    animation: AnimationState,
    externals: ExternalTransforms,
    projection: Mat4,
    view: Mat4,
    frame: f32,
}

impl ViewState {
    #[must_use]
    pub fn new(scene: &Scene) -> Self {
        Self {
            animation: AnimationState::new(scene),
            externals: ExternalTransforms::new(),
            projection: scene.camera().perspective,
            view: Mat4::IDENTITY,
            frame: scene.start(),
        }
    }

    /// Evaluates the scene for input position `(x, y)` and viewport `aspect`.
    ///
    /// `y` selects the frame, `x` and `y` together tilt the camera pivot.
    /// Returns the evaluated frame.
    pub fn update(&mut self, scene: &Scene, x: f32, y: f32, aspect: f32) -> f32 {
        self.projection = correct_projection(scene.camera().perspective, aspect);

        if let Some(pivot) = scene.pivot_index() {
            let order = if scene.is_legacy_layout() {
                ExternalOrder::BeforeLocal
            } else {
                ExternalOrder::AfterLocal
            };
            self.externals.set_ordered(pivot, pivot_transform(x, y), order);
        }

        self.frame = scene.frame_at(y);
        evaluate_scene(&mut self.animation, scene, &self.externals, self.frame);

        let camera_world = self
            .animation
            .get(scene.camera_index())
            .map_or(Mat4::IDENTITY, NodeState::world_matrix_as_mat4);
        self.view = camera_world.inverse();

        self.frame
    }

    /// Aspect-corrected projection, GL clip-space convention.
    #[inline]
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> f32 {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }
}

/// Fits the camera's base projection to the viewport.
///
/// The base focal scale `f = perspective[5]` is kept on the longer viewport
/// axis and multiplied by the aspect ratio on the shorter one.
#[must_use]
pub fn correct_projection(base: Mat4, aspect: f32) -> Mat4 {
    let mut m = base.to_cols_array();
    let f = m[5];
    if aspect >= 1.0 {
        m[0] = f;
        m[5] = f * aspect;
    } else {
        m[0] = f / aspect;
        m[5] = f;
    }
    Mat4::from_cols_array(&m)
}

/// Pivot tilt for input position `(x, y)`: identity at the center.
#[must_use]
pub fn pivot_transform(x: f32, y: f32) -> Affine3A {
    Affine3A::from_rotation_x(PIVOT_TILT * (0.5 - y)) * Affine3A::from_rotation_z(PIVOT_TILT * (0.5 - x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_input_leaves_pivot_untouched() {
        let m = pivot_transform(0.5, 0.5);
        assert!(m.abs_diff_eq(Affine3A::IDENTITY, 1e-6));
    }
}
