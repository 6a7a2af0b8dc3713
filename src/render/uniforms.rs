use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Maps GL clip depth (`-1..1`) onto wgpu clip depth (`0..1`).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Per-frame uniforms, shared by every draw (group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameUniforms {
    /// `projection` is in GL clip space and converted here.
    #[must_use]
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection: OPENGL_TO_WGPU_MATRIX * projection,
        }
    }
}

/// Per-draw uniforms (group 1, dynamic offset).
///
/// Layout matches the WGSL struct: `color` is a `vec3<f32>` at offset 64 and
/// `morph_weight` fills its padding slot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: Mat4,
    pub color: [f32; 3],
    pub morph_weight: f32,
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            color: [1.0; 3],
            morph_weight: 0.0,
        }
    }
}

const _: () = assert!(std::mem::size_of::<FrameUniforms>() == 128);
const _: () = assert!(std::mem::size_of::<ObjectUniforms>() == 80);

/// Rounds `size` up to the next multiple of `alignment` (a power of two).
#[inline]
#[must_use]
pub fn align_to(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn depth_range_conversion() {
        let near = OPENGL_TO_WGPU_MATRIX * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);
    }

    #[test]
    fn uniform_stride_alignment() {
        assert_eq!(align_to(80, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
    }
}
