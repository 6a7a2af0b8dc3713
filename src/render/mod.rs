//! Rendering
//!
//! - `context`: device, queue and color/depth targets (window or offscreen)
//! - `pipeline`: the static and morph mesh pipelines
//! - `mesh`: per-node GPU buffers and draw recording
//! - `view`: per-frame projection, pivot and view matrix (CPU only)
//! - `renderer`: [`FrameRenderer`], one call per frame
//! - `capture`: offscreen readback

pub mod capture;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod uniforms;
pub mod view;

pub use capture::{FramePixels, Readback};
pub use context::{FrameTarget, GpuContext, OFFSCREEN_FORMAT, RenderTarget};
pub use mesh::{DrawContext, MeshDraw, MorphMesh, StaticMesh, build_mesh};
pub use pipeline::MeshPipelines;
pub use renderer::FrameRenderer;
pub use uniforms::{FrameUniforms, OPENGL_TO_WGPU_MATRIX, ObjectUniforms};
pub use view::{ViewState, correct_projection, pivot_transform};
