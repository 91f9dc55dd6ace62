/// Unit cube mesh with one flat color per face

use glam::Vec3;
use crate::geometry::Vertex3d;

/// Face colors, in emission order
pub const CUBE_FACE_COLORS: [Vec3; 6] = [
    Vec3::new(0.9, 0.9, 0.9), // left (x = -0.5)
    Vec3::new(0.8, 0.8, 0.1), // right (x = +0.5)
    Vec3::new(0.9, 0.6, 0.1), // top (y = -0.5, Vulkan y points down)
    Vec3::new(0.8, 0.1, 0.1), // bottom (y = +0.5)
    Vec3::new(0.1, 0.1, 0.8), // nose (z = +0.5)
    Vec3::new(0.1, 0.8, 0.1), // tail (z = -0.5)
];

/// Number of vertices `cube_vertices` returns (6 faces, 2 triangles each)
pub const CUBE_VERTEX_COUNT: usize = 36;

/// 36 non-indexed vertices of a unit cube centered at `offset`
pub fn cube_vertices(offset: Vec3) -> Vec<Vertex3d> {
    #[rustfmt::skip]
    const FACES: [[[f32; 3]; 6]; 6] = [
        // left
        [[-0.5, -0.5, -0.5], [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5],
         [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5]],
        // right
        [[0.5, -0.5, -0.5], [0.5, 0.5, 0.5], [0.5, -0.5, 0.5],
         [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
        // top
        [[-0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5],
         [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5]],
        // bottom
        [[-0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5],
         [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
        // nose
        [[-0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5],
         [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5]],
        // tail
        [[-0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
         [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5]],
    ];

    FACES
        .iter()
        .zip(CUBE_FACE_COLORS.iter())
        .flat_map(|(face, color)| {
            face.iter()
                .map(move |p| Vertex3d::new(Vec3::from_array(*p) + offset, *color))
        })
        .collect()
}

#[cfg(test)]
#[path = "cube_tests.rs"]
mod tests;
