//! Unit tests for the Sierpinski generator

use glam::{Vec2, Vec3};
use crate::geometry::{
    Vertex2d, sierpinski, sierpinski_vertices, triangle_count, sierpinski_area_ratio, triangle_area,
};

fn corners() -> (Vertex2d, Vertex2d, Vertex2d) {
    (
        Vertex2d::new(Vec2::new(-0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)),
        Vertex2d::new(Vec2::new(0.5, 0.5), Vec3::new(0.0, 1.0, 0.0)),
        Vertex2d::new(Vec2::new(0.0, -0.5), Vec3::new(0.0, 0.0, 1.0)),
    )
}

#[test]
fn test_depth_zero_emits_top_right_left() {
    let (left, right, top) = corners();
    let vertices = sierpinski_vertices(0, left, right, top);
    assert_eq!(vertices, vec![top, right, left]);
}

#[test]
fn test_negative_depth_behaves_like_zero() {
    let (left, right, top) = corners();
    assert_eq!(sierpinski_vertices(-3, left, right, top).len(), 3);
    assert_eq!(triangle_count(-3), 1);
}

#[test]
fn test_triangle_count_is_power_of_three() {
    let (left, right, top) = corners();
    for depth in 0..=5 {
        let vertices = sierpinski_vertices(depth, left, right, top);
        assert_eq!(vertices.len(), 3 * 3usize.pow(depth as u32), "depth {}", depth);
        assert_eq!(vertices.len(), 3 * triangle_count(depth));
    }
}

#[test]
fn test_area_ratio_matches_three_quarters_power() {
    let (left, right, top) = corners();
    let root_area = triangle_area(left.position, right.position, top.position);
    for depth in 0..=6 {
        let vertices = sierpinski_vertices(depth, left, right, top);
        let total: f32 = vertices
            .chunks_exact(3)
            .map(|t| triangle_area(t[0].position, t[1].position, t[2].position))
            .sum();
        let expected = root_area * sierpinski_area_ratio(depth);
        assert!((total - expected).abs() < 1e-5, "depth {}: {} vs {}", depth, total, expected);
    }
}

#[test]
fn test_depth_one_colors_are_half_blends() {
    let (left, right, top) = corners();
    let vertices = sierpinski_vertices(1, left, right, top);

    let left_right = Vec3::new(0.5, 0.5, 0.0);
    let left_top = Vec3::new(0.5, 0.0, 0.5);
    let right_top = Vec3::new(0.0, 0.5, 0.5);

    // Sub-triangles: (left, left_right, left_top), (left_right, right, right_top),
    // (left_top, right_top, top), each emitted as top, right, left
    let colors: Vec<Vec3> = vertices.iter().map(|v| v.color).collect();
    assert_eq!(
        colors,
        vec![
            left_top, left_right, left.color,
            right_top, right.color, left_right,
            top.color, right_top, left_top,
        ]
    );
}

#[test]
fn test_depth_one_positions_are_midpoints() {
    let (left, right, top) = corners();
    let vertices = sierpinski_vertices(1, left, right, top);
    assert_eq!(vertices[1].position, Vec2::new(0.0, 0.5)); // left_right
    assert_eq!(vertices[0].position, Vec2::new(-0.25, 0.0)); // left_top
    assert_eq!(vertices[3].position, Vec2::new(0.25, 0.0)); // right_top
}

#[test]
fn test_sierpinski_appends() {
    let (left, right, top) = corners();
    let mut vertices = vec![left];
    sierpinski(&mut vertices, 1, left, right, top);
    assert_eq!(vertices.len(), 10);
    assert_eq!(vertices[0], left);
}

#[test]
fn test_triangle_area() {
    let area = triangle_area(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, 3.0));
    assert_eq!(area, 3.0);
    // Orientation does not matter
    assert_eq!(triangle_area(Vec2::ZERO, Vec2::new(0.0, 3.0), Vec2::new(2.0, 0.0)), 3.0);
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_triangle_count_saturates_for_huge_depths() {
    assert_eq!(triangle_count(40), 3usize.pow(40));
    assert_eq!(triangle_count(41), usize::MAX);
    assert_eq!(triangle_count(i32::MAX), usize::MAX);
}
