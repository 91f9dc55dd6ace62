/// Object transforms and the push constant blocks they produce
///
/// Each transform flavor is tied to one vertex format and one push constant
/// layout through `ObjectTransform`, so a single `SimpleRenderSystem<T>`
/// serves both the 2D and the 3D scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Mat4, Vec2, Vec3};
use crate::geometry::{Vertex, Vertex2d, Vertex3d};

/// Per-object transform that knows how to fill its shader's push constants
pub trait ObjectTransform: Default + Send + Sync {
    /// Vertex format of the models drawn with this transform
    type Vertex: Vertex;
    /// GLSL-compatible push constant block
    type PushConstants: Pod;

    /// Whether pipelines for this transform test and write depth
    const DEPTH_TEST: bool;

    fn push_constants(&self, color: Vec3) -> Self::PushConstants;
}

// ===== 2D =====

/// 2D transform: rotate (radians), then scale, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2d {
    pub translation: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Default for Transform2d {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform2d {
    /// `rotation * scale`
    pub fn mat2(&self) -> Mat2 {
        let (s, c) = self.rotation.sin_cos();
        let rotation = Mat2::from_cols(Vec2::new(c, s), Vec2::new(-s, c));
        let scale = Mat2::from_diagonal(self.scale);
        rotation * scale
    }
}

/// `layout(push_constant) uniform Push { mat2 transform; vec2 offset; vec3 color; }`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PushConstantData2d {
    pub transform: Mat2,
    pub offset: Vec2,
    pub _pad0: [f32; 2],
    pub color: Vec3,
    pub _pad1: f32,
}

impl ObjectTransform for Transform2d {
    type Vertex = Vertex2d;
    type PushConstants = PushConstantData2d;

    const DEPTH_TEST: bool = false;

    fn push_constants(&self, color: Vec3) -> PushConstantData2d {
        PushConstantData2d {
            transform: self.mat2(),
            offset: self.translation,
            _pad0: [0.0; 2],
            color,
            _pad1: 0.0,
        }
    }
}

// ===== 3D =====

/// 3D transform with Tait-Bryan rotation angles (radians, applied Y, X, Z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3d {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform3d {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform3d {
    /// `translate * Ry * Rx * Rz * scale`
    pub fn mat4(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale)
    }
}

/// `layout(push_constant) uniform Push { mat4 transform; vec3 color; }`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PushConstantData3d {
    pub transform: Mat4,
    pub color: Vec3,
    pub _pad0: f32,
}

impl ObjectTransform for Transform3d {
    type Vertex = Vertex3d;
    type PushConstants = PushConstantData3d;

    const DEPTH_TEST: bool = true;

    fn push_constants(&self, color: Vec3) -> PushConstantData3d {
        PushConstantData3d {
            transform: self.mat4(),
            color,
            _pad0: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
