#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Timepiece renders keyframed 3D scenes exported from a modeling tool.
//!
//! A scene is a tree of empties, one camera and meshes, each carrying
//! keyframed transform curves. The only input is a point `(x, y)` in the unit
//! square: `y` scrubs the timeline, `x` and `y` together tilt the camera pivot.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use timepiece::{FrameRenderer, GpuContext, RenderSettings, Scene};
//!
//! let scene = Arc::new(Scene::load("clock.json")?);
//! let ctx = pollster::block_on(GpuContext::new_headless(512, 512, &RenderSettings::default()))?;
//! let mut renderer = FrameRenderer::new(scene, ctx)?;
//! renderer.render_frame(0.5, 0.25);
//! let pixels = renderer.capture()?;
//! ```

pub mod animation;
pub mod config;
pub mod driver;
pub mod errors;
pub mod geometry;
pub mod render;
pub mod scene;

pub use animation::{AnimationState, Curve, ExternalTransforms, Interpolation, Keyframe};
pub use config::{ExportSettings, RenderSettings, ViewerSettings};
#[cfg(feature = "winit")]
pub use driver::Viewer;
pub use driver::{InputState, Orientation, export_gif, export_gif_file, ping_pong_schedule};
pub use errors::{Result, TimepieceError};
pub use geometry::MeshGeometry;
pub use render::{FramePixels, FrameRenderer, GpuContext, ViewState};
pub use scene::{Node, NodeKind, Scene};
