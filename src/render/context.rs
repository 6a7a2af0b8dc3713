//! wgpu Context
//!
//! [`GpuContext`] holds the device, the queue and the color target frames are
//! drawn into. The target is either a window surface (interactive viewer) or an
//! offscreen texture that can be read back (offline export, tests). A depth
//! texture of matching size lives next to it and is recreated on resize.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::config::RenderSettings;
use crate::errors::{Result, TimepieceError};

/// Color format of offscreen targets. Linear, like WebGL's default framebuffer.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

/// A color attachment acquired for one frame.
pub struct FrameTarget {
    pub view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl FrameTarget {
    #[inline]
    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        self.surface_texture.is_none()
    }

    /// Presents surface frames; no-op for offscreen targets.
    pub fn present(self) {
        if let Some(output) = self.surface_texture {
            output.present();
        }
    }
}

pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    target: RenderTarget,

    width: u32,
    height: u32,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    depth_texture_view: wgpu::TextureView,
}

impl GpuContext {
    /// Creates a context presenting to a window.
    pub async fn new_windowed<W>(
        window: W,
        settings: &RenderSettings,
        width: u32,
        height: u32,
    ) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| TimepieceError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = Self::request_device(&adapter, settings).await?;

        let (width, height) = (width.max(1), height.max(1));
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or_else(|| {
                TimepieceError::AdapterRequestFailed("Surface not supported by adapter".to_string())
            })?;

        // Keep output linear, the way the exported colors are authored
        let capabilities = surface.get_capabilities(&adapter);
        if let Some(format) = capabilities.formats.iter().copied().find(|f| !f.is_srgb()) {
            config.format = format;
        }
        config.present_mode = settings.present_mode();
        surface.configure(&device, &config);

        let depth_texture_view =
            Self::create_depth_texture(&device, width, height, settings.depth_format);

        log::info!(
            "GPU context ready: {} ({:?}), surface {width}x{height} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format
        );

        Ok(Self {
            device,
            queue,
            color_format: config.format,
            target: RenderTarget::Surface { surface, config },
            width,
            height,
            depth_format: settings.depth_format,
            depth_texture_view,
        })
    }

    /// Creates a context rendering into an offscreen texture.
    pub async fn new_headless(width: u32, height: u32, settings: &RenderSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| TimepieceError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = Self::request_device(&adapter, settings).await?;

        let (width, height) = (width.max(1), height.max(1));
        let texture = Self::create_offscreen_texture(&device, width, height);
        let depth_texture_view =
            Self::create_depth_texture(&device, width, height, settings.depth_format);

        log::info!(
            "GPU context ready: {} ({:?}), offscreen {width}x{height}",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self {
            device,
            queue,
            target: RenderTarget::Offscreen { texture },
            width,
            height,
            color_format: OFFSCREEN_FORMAT,
            depth_format: settings.depth_format,
            depth_texture_view,
        })
    }

    async fn request_device(
        adapter: &wgpu::Adapter,
        settings: &RenderSettings,
    ) -> Result<(wgpu::Device, wgpu::Queue)> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Timepiece Device"),
                required_features: wgpu::Features::empty(),
                required_limits: settings
                    .required_limits
                    .clone()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;
        Ok((device, queue))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        match &mut self.target {
            RenderTarget::Surface { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            RenderTarget::Offscreen { texture } => {
                *texture = Self::create_offscreen_texture(&self.device, width, height);
            }
        }
        self.depth_texture_view =
            Self::create_depth_texture(&self.device, width, height, self.depth_format);
    }

    /// Acquires the color attachment for the next frame.
    ///
    /// Returns `None` when the surface had to be reconfigured and the frame
    /// should be skipped.
    pub fn acquire_frame(&self) -> Option<FrameTarget> {
        match &self.target {
            RenderTarget::Offscreen { texture } => Some(FrameTarget {
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
                surface_texture: None,
            }),
            RenderTarget::Surface { surface, config } => match surface.get_current_texture() {
                wgpu::CurrentSurfaceTexture::Success(output)
                | wgpu::CurrentSurfaceTexture::Suboptimal(output) => Some(FrameTarget {
                    view: output
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default()),
                    surface_texture: Some(output),
                }),
                wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                    log::warn!("Surface lost or outdated, reconfiguring");
                    surface.configure(&self.device, config);
                    None
                }
                e => {
                    log::error!("Render error: {e:?}");
                    None
                }
            },
        }
    }

    pub fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_offscreen_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Color Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// The offscreen color texture, if this context renders offscreen.
    #[must_use]
    pub fn offscreen_texture(&self) -> Option<&wgpu::Texture> {
        match &self.target {
            RenderTarget::Offscreen { texture, .. } => Some(texture),
            RenderTarget::Surface { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    #[inline]
    #[must_use]
    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    #[inline]
    #[must_use]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture_view
    }

    /// Current target dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
