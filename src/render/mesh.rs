//! GPU mesh resources.
//!
//! One struct per mesh kind, each owning its buffers and knowing how to draw
//! itself. Buffers are created once and never written again; everything that
//! changes per frame goes through [`ObjectUniforms`].

use wgpu::util::DeviceExt;

use crate::animation::AnimationState;
use crate::errors::Result;
use crate::geometry::MeshGeometry;
use crate::render::pipeline::MeshPipelines;
use crate::render::uniforms::ObjectUniforms;
use crate::scene::MeshData;

/// Shared state a mesh needs to record its draw.
pub struct DrawContext<'a> {
    pub pipelines: &'a MeshPipelines,
    pub object_bind_group: &'a wgpu::BindGroup,
    /// Offset of this mesh's [`ObjectUniforms`] slot.
    pub dynamic_offset: u32,
}

pub trait MeshDraw {
    /// Scene index of the node this mesh belongs to.
    fn node_index(&self) -> usize;

    fn color(&self) -> [f32; 3];

    /// Morph weight for the current frame. Static meshes always return 0.
    fn morph_weight(&self, state: &AnimationState) -> f32;

    fn uniforms(&self, state: &AnimationState) -> ObjectUniforms {
        let model = state
            .get(self.node_index())
            .map_or(glam::Mat4::IDENTITY, |node| node.world_matrix_as_mat4());
        ObjectUniforms {
            model,
            color: self.color(),
            morph_weight: self.morph_weight(state),
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, ctx: &DrawContext<'_>);
}

fn create_vertex_buffer(device: &wgpu::Device, label: &str, data: &[[f32; 3]]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

fn create_index_buffer(device: &wgpu::Device, label: &str, data: &[u32]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::INDEX,
    })
}

// ============================================================================
//  Static mesh
// ============================================================================

pub struct StaticMesh {
    node_index: usize,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    color: [f32; 3],
}

impl StaticMesh {
    #[must_use]
    pub fn new(device: &wgpu::Device, node_index: usize, geometry: &MeshGeometry) -> Self {
        Self {
            node_index,
            vertex_buffer: create_vertex_buffer(device, "Mesh Positions", &geometry.positions),
            index_buffer: create_index_buffer(device, "Mesh Indices", &geometry.indices),
            index_count: geometry.indices.len() as u32,
            color: geometry.color,
        }
    }
}

impl MeshDraw for StaticMesh {
    fn node_index(&self) -> usize {
        self.node_index
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }

    fn morph_weight(&self, _state: &AnimationState) -> f32 {
        0.0
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, ctx: &DrawContext<'_>) {
        pass.set_pipeline(&ctx.pipelines.static_pipeline);
        pass.set_bind_group(1, ctx.object_bind_group, &[ctx.dynamic_offset]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// ============================================================================
//  Morph mesh
// ============================================================================

/// A mesh with one morph target, blended on the GPU.
pub struct MorphMesh {
    node_index: usize,
    vertex_buffer: wgpu::Buffer,
    morph_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    color: [f32; 3],
}

impl MorphMesh {
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        node_index: usize,
        geometry: &MeshGeometry,
        morph_positions: &[[f32; 3]],
    ) -> Self {
        Self {
            node_index,
            vertex_buffer: create_vertex_buffer(device, "Mesh Positions", &geometry.positions),
            morph_buffer: create_vertex_buffer(device, "Morph Positions", morph_positions),
            index_buffer: create_index_buffer(device, "Mesh Indices", &geometry.indices),
            index_count: geometry.indices.len() as u32,
            color: geometry.color,
        }
    }
}

impl MeshDraw for MorphMesh {
    fn node_index(&self) -> usize {
        self.node_index
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }

    fn morph_weight(&self, state: &AnimationState) -> f32 {
        state
            .get(self.node_index)
            .map_or(0.0, |node| node.active_morph_weight())
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, ctx: &DrawContext<'_>) {
        pass.set_pipeline(&ctx.pipelines.morph_pipeline);
        pass.set_bind_group(1, ctx.object_bind_group, &[ctx.dynamic_offset]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.morph_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Refines a mesh node's geometry and uploads it.
pub fn build_mesh(
    device: &wgpu::Device,
    node_index: usize,
    id: &str,
    mesh: &MeshData,
) -> Result<Box<dyn MeshDraw>> {
    let geometry = MeshGeometry::build(id, mesh)?;
    log::debug!(
        "Uploading mesh '{id}': {} vertices, {} triangles{}",
        geometry.vertex_count(),
        geometry.triangle_count(),
        if geometry.is_deformable() { ", morph target" } else { "" }
    );

    Ok(match &geometry.morph_positions {
        Some(morph) => Box::new(MorphMesh::new(device, node_index, &geometry, morph)),
        None => Box::new(StaticMesh::new(device, node_index, &geometry)),
    })
}
