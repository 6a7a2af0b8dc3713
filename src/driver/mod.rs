//! Render drivers
//!
//! Wire input to [`FrameRenderer::render_frame`](crate::render::FrameRenderer::render_frame):
//! - `interactive`: winit window driven by pointer, resize and redraw events
//! - `input`: pointer / orientation to normalized position
//! - `schedule`: deterministic ping-pong scrub for offline use
//! - `export`: offline sequence rendering and GIF encoding

pub mod export;
pub mod input;
#[cfg(feature = "winit")]
pub mod interactive;
pub mod schedule;

pub use export::{OFFLINE_X, export_gif, export_gif_file, render_sequence};
pub use input::{InputState, Orientation};
#[cfg(feature = "winit")]
pub use interactive::Viewer;
pub use schedule::{PingPong, ping_pong_schedule};
