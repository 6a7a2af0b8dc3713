//! Frame Renderer
//!
//! Ties scene evaluation to the GPU: one `render_frame(x, y)` call evaluates
//! the scene for that input position, uploads frame and object uniforms, clears
//! to the scene background and issues one draw per mesh.
//!
//! ```text
//! ViewState::update ─► FrameUniforms (view, projection)
//!                   └► ObjectUniforms per mesh (model, color, morph weight)
//!                        │
//!                        ▼
//!            clear ─► draw × meshes ─► submit / present
//! ```

use std::num::NonZeroU64;
use std::sync::Arc;

use crate::errors::Result;
use crate::render::capture::{FramePixels, Readback};
use crate::render::context::GpuContext;
use crate::render::mesh::{DrawContext, MeshDraw, build_mesh};
use crate::render::pipeline::MeshPipelines;
use crate::render::uniforms::{FrameUniforms, ObjectUniforms, align_to};
use crate::render::view::ViewState;
use crate::scene::Scene;

const OBJECT_UNIFORM_SIZE: u64 = std::mem::size_of::<ObjectUniforms>() as u64;

pub struct FrameRenderer {
    scene: Arc<Scene>,
    ctx: GpuContext,
    pipelines: MeshPipelines,
    meshes: Vec<Box<dyn MeshDraw>>,
    view_state: ViewState,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    /// Object uniform bytes, rebuilt in place every frame.
    object_staging: Vec<u8>,

    readback: Readback,
    last_input: (f32, f32),
}

impl FrameRenderer {
    /// Builds pipelines and uploads every mesh of the scene.
    ///
    /// Fails if any mesh has invalid topology.
    pub fn new(scene: Arc<Scene>, ctx: GpuContext) -> Result<Self> {
        let device = &ctx.device;
        let pipelines = MeshPipelines::new(device, ctx.color_format(), ctx.depth_format());

        let mut meshes = Vec::new();
        for (index, node, mesh) in scene.meshes() {
            meshes.push(build_mesh(device, index, node.id(), mesh)?);
        }

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let object_stride = align_to(OBJECT_UNIFORM_SIZE, alignment);
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: object_stride * meshes.len().max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &pipelines.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buffer,
                    offset: 0,
                    size: NonZeroU64::new(OBJECT_UNIFORM_SIZE),
                }),
            }],
        });

        log::info!(
            "Renderer ready: {} meshes, frames {}..{}",
            meshes.len(),
            scene.start(),
            scene.end()
        );

        let view_state = ViewState::new(&scene);
        let object_staging = vec![0; (object_stride as usize) * meshes.len()];

        Ok(Self {
            scene,
            ctx,
            pipelines,
            meshes,
            view_state,
            frame_buffer,
            frame_bind_group,
            object_buffer,
            object_bind_group,
            object_stride,
            object_staging,
            readback: Readback::new(),
            last_input: (0.5, 0.5),
        })
    }

    /// Renders the scene for input position `(x, y) ∈ [0, 1]²` and returns the
    /// evaluated frame.
    ///
    /// Surface frames are submitted and presented before this returns.
    /// Offscreen frames are finished on the GPU before this returns.
    pub fn render_frame(&mut self, x: f32, y: f32) -> f32 {
        self.last_input = (x, y);
        let frame = self
            .view_state
            .update(&self.scene, x, y, self.ctx.aspect());

        let frame_uniforms = FrameUniforms::new(self.view_state.view(), self.view_state.projection());
        self.ctx
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniforms));

        let stride = self.object_stride as usize;
        for (i, mesh) in self.meshes.iter().enumerate() {
            let uniforms = mesh.uniforms(self.view_state.animation());
            let offset = i * stride;
            self.object_staging[offset..offset + OBJECT_UNIFORM_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        if !self.object_staging.is_empty() {
            self.ctx
                .queue
                .write_buffer(&self.object_buffer, 0, &self.object_staging);
        }

        let Some(target) = self.ctx.acquire_frame() else {
            return frame;
        };

        let [r, g, b] = self.scene.background();
        let clear_color = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: 1.0,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.ctx.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (i, mesh) in self.meshes.iter().enumerate() {
                let ctx = DrawContext {
                    pipelines: &self.pipelines,
                    object_bind_group: &self.object_bind_group,
                    dynamic_offset: (i as u64 * self.object_stride) as u32,
                };
                mesh.draw(&mut pass, &ctx);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        if target.is_offscreen()
            && let Err(e) = self.ctx.device.poll(wgpu::PollType::wait_indefinitely())
        {
            log::error!("Device poll failed: {e}");
        }
        target.present();

        frame
    }

    /// Renders again at the last input position.
    pub fn rerender(&mut self) -> f32 {
        let (x, y) = self.last_input;
        self.render_frame(x, y)
    }

    /// Resizes the color and depth targets. Does not render.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Reads back the last rendered frame (offscreen contexts only).
    pub fn capture(&mut self) -> Result<FramePixels> {
        self.readback.read(&self.ctx)
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn last_input(&self) -> (f32, f32) {
        self.last_input
    }
}
