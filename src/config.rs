//! Renderer, export and viewer configuration.
//!
//! Plain structs with sensible defaults; override fields with struct update
//! syntax or the `with_*` setters:
//!
//! ```rust,ignore
//! use timepiece::config::ExportSettings;
//!
//! let settings = ExportSettings::default().with_size(512, 512).with_supersample(2);
//! assert_eq!(settings.render_size(), (1024, 1024));
//! ```

// ---------------------------------------------------------------------------
// RenderSettings
// ---------------------------------------------------------------------------

/// GPU context configuration, consumed once when the context is created.
///
/// | Field              | Default           |
/// |--------------------|-------------------|
/// | `power_preference` | `HighPerformance` |
/// | `depth_format`     | `Depth32Float`    |
/// | `vsync`            | `true`            |
/// | `required_limits`  | downlevel WebGL2  |
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// GPU adapter selection preference.
    pub power_preference: wgpu::PowerPreference,

    /// Depth buffer texture format.
    pub depth_format: wgpu::TextureFormat,

    /// Present with `AutoVsync` when `true`, `AutoNoVsync` otherwise.
    /// Ignored by offscreen targets.
    pub vsync: bool,

    /// Required wgpu limits.
    pub required_limits: wgpu::Limits,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            depth_format: wgpu::TextureFormat::Depth32Float,
            vsync: true,
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

impl RenderSettings {
    #[must_use]
    pub fn with_power_preference(mut self, power_preference: wgpu::PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    #[inline]
    #[must_use]
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

// ---------------------------------------------------------------------------
// ExportSettings
// ---------------------------------------------------------------------------

/// Offline GIF export configuration.
///
/// The forward sweep has `fps · duration` frames; the schedule plays it forward
/// and back, and the first frame is held for `pause_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Render at `supersample ×` the output size, then downscale.
    pub supersample: u32,
    pub fps: u32,
    /// Length of the forward sweep.
    pub duration_ms: u32,
    /// Delay of the first frame.
    pub pause_ms: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            supersample: 4,
            fps: 30,
            duration_ms: 2500,
            pause_ms: 500,
        }
    }
}

impl ExportSettings {
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_supersample(mut self, supersample: u32) -> Self {
        self.supersample = supersample;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, fps: u32, duration_ms: u32, pause_ms: u32) -> Self {
        self.fps = fps;
        self.duration_ms = duration_ms;
        self.pause_ms = pause_ms;
        self
    }

    /// Frames in the forward sweep (at least 1).
    #[must_use]
    pub fn frames(&self) -> usize {
        let frames = (u64::from(self.fps) * u64::from(self.duration_ms)).div_ceil(1000);
        (frames as usize).max(1)
    }

    /// Delay between consecutive frames.
    #[must_use]
    pub fn frame_delay_ms(&self) -> u32 {
        self.duration_ms / self.frames() as u32
    }

    /// Size of the offscreen render target.
    #[must_use]
    pub fn render_size(&self) -> (u32, u32) {
        let factor = self.supersample.max(1);
        (self.width * factor, self.height * factor)
    }
}

// ---------------------------------------------------------------------------
// ViewerSettings
// ---------------------------------------------------------------------------

/// Interactive window configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSettings {
    /// Window title. The scene's own title wins when it has one.
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "Timepiece".to_string(),
            width: 1024,
            height: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_export_timing() {
        let settings = ExportSettings::default();
        assert_eq!(settings.frames(), 75);
        assert_eq!(settings.frame_delay_ms(), 33);
        assert_eq!(settings.render_size(), (4096, 4096));
    }

    #[test]
    fn render_settings_builders() {
        let settings = RenderSettings::default()
            .with_power_preference(wgpu::PowerPreference::LowPower)
            .with_vsync(false);
        assert_eq!(settings.power_preference, wgpu::PowerPreference::LowPower);
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(RenderSettings::default().present_mode(), wgpu::PresentMode::AutoVsync);
    }
}
