//! Offscreen frame readback.

use crate::errors::{Result, TimepieceError};
use crate::render::context::GpuContext;
use crate::render::uniforms::align_to;

const BYTES_PER_PIXEL: u32 = 4;

/// Tightly packed RGBA8 pixels, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FramePixels {
    #[must_use]
    pub fn into_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

/// Copies the offscreen color target into CPU memory.
///
/// The staging buffer is kept between captures and only reallocated when the
/// target size changes.
#[derive(Default)]
pub struct Readback {
    staging: Option<StagingBuffer>,
}

struct StagingBuffer {
    buffer: wgpu::Buffer,
    padded_row: u32,
    width: u32,
    height: u32,
}

impl Readback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn staging(&mut self, device: &wgpu::Device, width: u32, height: u32) -> &StagingBuffer {
        if self
            .staging
            .as_ref()
            .is_some_and(|s| s.width != width || s.height != height)
        {
            self.staging = None;
        }
        self.staging.get_or_insert_with(|| {
            let padded_row = align_to(
                u64::from(width * BYTES_PER_PIXEL),
                u64::from(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
            ) as u32;
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Capture Staging Buffer"),
                size: u64::from(padded_row) * u64::from(height),
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            });
            StagingBuffer {
                buffer,
                padded_row,
                width,
                height,
            }
        })
    }

    /// Reads the last rendered frame back. Blocks until the GPU is done.
    pub fn read(&mut self, ctx: &GpuContext) -> Result<FramePixels> {
        let texture = ctx
            .offscreen_texture()
            .ok_or(TimepieceError::CaptureUnsupported)?;
        let (width, height) = ctx.size();
        let staging = self.staging(&ctx.device, width, height);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(staging.padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.buffer.slice(..);
        let (sender, receiver) = flume::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        ctx.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| TimepieceError::CaptureFailed(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| TimepieceError::CaptureFailed(e.to_string()))??;

        let row_bytes = (width * BYTES_PER_PIXEL) as usize;
        let mut data = Vec::with_capacity(row_bytes * height as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(staging.padded_row as usize) {
                data.extend_from_slice(&row[..row_bytes]);
            }
        }
        staging.buffer.unmap();

        Ok(FramePixels {
            width,
            height,
            data,
        })
    }
}
