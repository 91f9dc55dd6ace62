/// Sierpinski triangle generator

use glam::Vec2;
use crate::geometry::Vertex2d;

/// Upfront reservation cap; deeper subdivisions grow the vector as they go
const MAX_RESERVED_VERTICES: usize = 3 * 3usize.pow(12);

/// Append the triangles of a Sierpinski subdivision to `vertices`
///
/// At depth ≤ 0 the triangle itself is emitted as `top, right, left`.
/// Otherwise the edge midpoints (position and color averaged) split it into
/// three corner triangles, each subdivided at `depth - 1`. Depth `d` emits
/// `3^d` triangles.
pub fn sierpinski(vertices: &mut Vec<Vertex2d>, depth: i32, left: Vertex2d, right: Vertex2d, top: Vertex2d) {
    if depth <= 0 {
        vertices.push(top);
        vertices.push(right);
        vertices.push(left);
        return;
    }

    let left_top = left.midpoint(&top);
    let right_top = right.midpoint(&top);
    let left_right = left.midpoint(&right);

    sierpinski(vertices, depth - 1, left, left_right, left_top);
    sierpinski(vertices, depth - 1, left_right, right, right_top);
    sierpinski(vertices, depth - 1, left_top, right_top, top);
}

/// Convenience wrapper returning a fresh vertex list
pub fn sierpinski_vertices(depth: i32, left: Vertex2d, right: Vertex2d, top: Vertex2d) -> Vec<Vertex2d> {
    let capacity = triangle_count(depth).saturating_mul(3).min(MAX_RESERVED_VERTICES);
    let mut vertices = Vec::with_capacity(capacity);
    sierpinski(&mut vertices, depth, left, right, top);
    vertices
}

/// Number of triangles emitted at `depth` (3^depth, 1 for depth ≤ 0)
///
/// Saturates at `usize::MAX` for depths whose count does not fit.
pub fn triangle_count(depth: i32) -> usize {
    3usize.checked_pow(depth.max(0) as u32).unwrap_or(usize::MAX)
}

/// Fraction of the root area covered at `depth`: (3/4)^depth
pub fn sierpinski_area_ratio(depth: i32) -> f32 {
    0.75f32.powi(depth.max(0))
}

/// Unsigned area of the triangle (a, b, c)
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    0.5 * (b - a).perp_dot(c - a).abs()
}

#[cfg(test)]
#[path = "sierpinski_tests.rs"]
mod tests;
