/// Model: GPU-resident mesh shared between game objects

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::engine_error;
use crate::geometry::Vertex;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferUsage, CommandList, GraphicsDevice, IndexType,
};

/// Immutable vertex (and optional index) buffers
///
/// Models are shared through `Arc<Model>`; buffers are released when the
/// last game object holding the model is dropped.
pub struct Model {
    vertex_buffer: Arc<dyn Buffer>,
    vertex_count: u32,
    index_buffer: Option<Arc<dyn Buffer>>,
    index_count: u32,
}

impl Model {
    /// Upload a non-indexed triangle list
    ///
    /// # Errors
    ///
    /// `InvalidResource` when fewer than 3 vertices are given.
    pub fn new<V: Vertex>(device: &dyn GraphicsDevice, vertices: &[V]) -> Result<Self> {
        let (vertex_buffer, vertex_count) = Self::create_vertex_buffer(device, vertices)?;
        Ok(Self {
            vertex_buffer,
            vertex_count,
            index_buffer: None,
            index_count: 0,
        })
    }

    /// Upload an indexed triangle list (32-bit indices)
    pub fn new_indexed<V: Vertex>(
        device: &dyn GraphicsDevice,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<Self> {
        let (vertex_buffer, vertex_count) = Self::create_vertex_buffer(device, vertices)?;
        let index_count = draw_count(indices.len(), "Index")?;

        if indices.is_empty() {
            return Ok(Self {
                vertex_buffer,
                vertex_count,
                index_buffer: None,
                index_count: 0,
            });
        }
        if let Some(bad) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(Error::InvalidResource(format!(
                "Index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        let bytes: &[u8] = bytemuck::cast_slice(indices);
        let index_buffer = device.create_buffer(BufferDesc {
            size: bytes.len() as u64,
            usage: BufferUsage::Index,
        })?;
        index_buffer.update(0, bytes)?;

        Ok(Self {
            vertex_buffer,
            vertex_count,
            index_buffer: Some(index_buffer),
            index_count,
        })
    }

    fn create_vertex_buffer<V: Vertex>(
        device: &dyn GraphicsDevice,
        vertices: &[V],
    ) -> Result<(Arc<dyn Buffer>, u32)> {
        if vertices.len() < 3 {
            engine_error!("lve::Model", "Vertex count must be at least 3, got {}", vertices.len());
            return Err(Error::InvalidResource(format!(
                "Vertex count must be at least 3, got {}",
                vertices.len()
            )));
        }

        let vertex_count = draw_count(vertices.len(), "Vertex")?;

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = device.create_buffer(BufferDesc {
            size: bytes.len() as u64,
            usage: BufferUsage::Vertex,
        })?;
        buffer.update(0, bytes)?;
        Ok((buffer, vertex_count))
    }

    /// Bind the vertex buffer (and the index buffer, if any) at binding 0
    pub fn bind(&self, cmd: &mut dyn CommandList) -> Result<()> {
        cmd.bind_vertex_buffer(&self.vertex_buffer, 0)?;
        if let Some(index_buffer) = &self.index_buffer {
            cmd.bind_index_buffer(index_buffer, 0, IndexType::U32)?;
        }
        Ok(())
    }

    /// Draw every vertex, or every index when indexed
    pub fn draw(&self, cmd: &mut dyn CommandList) -> Result<()> {
        if self.index_buffer.is_some() {
            cmd.draw_indexed(self.index_count, 0, 0)
        } else {
            cmd.draw(self.vertex_count, 0)
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }
}

/// Draw calls take 32-bit counts
pub(crate) fn draw_count(len: usize, kind: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        engine_error!("lve::Model", "{} count {} does not fit in 32 bits", kind, len);
        Error::InvalidResource(format!("{} count {} does not fit in 32 bits", kind, len))
    })
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
