/// Vertex formats and their pipeline input layouts

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use crate::graphics_device::{
    VertexLayout, VertexBinding, VertexAttribute, VertexInputRate, BufferFormat,
};

/// A vertex type that can describe its own pipeline input layout
pub trait Vertex: Pod + Send + Sync {
    /// Binding 0, per-vertex; one attribute per field in declaration order
    fn layout() -> VertexLayout;
}

/// 2D vertex: position (location 0) and color (location 1)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2d {
    pub position: Vec2,
    pub color: Vec3,
}

impl Vertex2d {
    pub fn new(position: Vec2, color: Vec3) -> Self {
        Self { position, color }
    }

    /// Position and color both averaged
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            position: 0.5 * (self.position + other.position),
            color: 0.5 * (self.color + other.color),
        }
    }
}

impl Vertex for Vertex2d {
    fn layout() -> VertexLayout {
        VertexLayout {
            bindings: vec![VertexBinding {
                binding: 0,
                stride: std::mem::size_of::<Vertex2d>() as u32,
                input_rate: VertexInputRate::Vertex,
            }],
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    binding: 0,
                    format: BufferFormat::R32G32_SFLOAT,
                    offset: std::mem::offset_of!(Vertex2d, position) as u32,
                },
                VertexAttribute {
                    location: 1,
                    binding: 0,
                    format: BufferFormat::R32G32B32_SFLOAT,
                    offset: std::mem::offset_of!(Vertex2d, color) as u32,
                },
            ],
        }
    }
}

/// 3D vertex: position (location 0) and color (location 1)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex3d {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex3d {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

impl Vertex for Vertex3d {
    fn layout() -> VertexLayout {
        VertexLayout {
            bindings: vec![VertexBinding {
                binding: 0,
                stride: std::mem::size_of::<Vertex3d>() as u32,
                input_rate: VertexInputRate::Vertex,
            }],
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    binding: 0,
                    format: BufferFormat::R32G32B32_SFLOAT,
                    offset: std::mem::offset_of!(Vertex3d, position) as u32,
                },
                VertexAttribute {
                    location: 1,
                    binding: 0,
                    format: BufferFormat::R32G32B32_SFLOAT,
                    offset: std::mem::offset_of!(Vertex3d, color) as u32,
                },
            ],
        }
    }
}
