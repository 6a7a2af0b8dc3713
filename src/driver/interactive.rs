//! Interactive viewer
//!
//! A winit window showing the scene. Nothing animates on its own: the frame is
//! a function of the last input position, so the viewer renders only when
//! something changes.
//!
//! | Event            | Action                                   |
//! |------------------|------------------------------------------|
//! | window created   | render at `(0.5, 0.5)`                   |
//! | cursor moved     | render at the normalized cursor position |
//! | resized          | resize targets, render at last position  |
//! | redraw requested | render at last position                  |
//!
//! ```rust,ignore
//! let scene = Arc::new(Scene::load("scene.json")?);
//! Viewer::new(scene).with_title("Clock").run()?;
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{RenderSettings, ViewerSettings};
use crate::driver::input::InputState;
use crate::errors::{Result, TimepieceError};
use crate::render::{FrameRenderer, GpuContext};
use crate::scene::Scene;

/// Builder for the interactive viewer.
pub struct Viewer {
    scene: Arc<Scene>,
    settings: ViewerSettings,
    render_settings: RenderSettings,
}

impl Viewer {
    #[must_use]
    pub fn new(scene: Arc<Scene>) -> Self {
        Self {
            scene,
            settings: ViewerSettings::default(),
            render_settings: RenderSettings::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ViewerSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_render_settings(mut self, settings: RenderSettings) -> Self {
        self.render_settings = settings;
        self
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Errors during window or renderer creation end the loop and are returned.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = ViewerRunner {
            scene: self.scene,
            settings: self.settings,
            render_settings: self.render_settings,
            window: None,
            renderer: None,
            input: InputState::new(),
            error: None,
        };
        event_loop.run_app(&mut runner)?;

        match runner.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

struct ViewerRunner {
    scene: Arc<Scene>,
    settings: ViewerSettings,
    render_settings: RenderSettings,

    window: Option<Arc<Window>>,
    renderer: Option<FrameRenderer>,
    input: InputState,
    error: Option<TimepieceError>,
}

impl ViewerRunner {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let title = self.scene.title().unwrap_or(self.settings.title.as_str()).to_string();
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.width,
                self.settings.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);

        log::info!("Initializing renderer...");
        let size = window.inner_size();
        let ctx = pollster::block_on(GpuContext::new_windowed(
            window.clone(),
            &self.render_settings,
            size.width,
            size.height,
        ))?;
        let mut renderer = FrameRenderer::new(self.scene.clone(), ctx)?;

        let (x, y) = self.input.position();
        renderer.render_frame(x, y);

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for ViewerRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Fatal renderer error: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                renderer.resize(size.width, size.height);
                renderer.rerender();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (width, height) = renderer.context().size();
                let (x, y) = self.input.on_pointer_move(
                    position.x as f32,
                    position.y as f32,
                    width as f32,
                    height as f32,
                );
                renderer.render_frame(x, y);
            }
            WindowEvent::RedrawRequested => {
                renderer.rerender();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SCENE: &str = r#"{
        "start": 1, "end": 2,
        "bg": { "color": [0, 0, 0] },
        "camera": "cam",
        "objs": [
            { "id": "cam", "type": "camera",
              "perspective": [1,0,0,0, 0,1,0,0, 0,0,-1.002002,-1, 0,0,-0.2002002,0] }
        ]
    }"#;

    #[test]
    fn builder_keeps_settings() {
        let scene = Arc::new(Scene::from_json(EMPTY_SCENE).unwrap());
        let settings = ViewerSettings {
            title: "Clock".to_string(),
            width: 320,
            height: 240,
        };
        let viewer = Viewer::new(scene)
            .with_settings(settings.clone())
            .with_render_settings(RenderSettings::default().with_vsync(false));

        assert_eq!(viewer.settings, settings);
        assert!(!viewer.render_settings.vsync);

        let viewer = viewer.with_title("Watch");
        assert_eq!(viewer.settings.title, "Watch");
        assert_eq!((viewer.settings.width, viewer.settings.height), (320, 240));
    }
}
