//! Unit tests for transforms and push constant layouts

use std::f32::consts::FRAC_PI_2;
use glam::{Mat2, Mat4, Vec2, Vec3};
use crate::scene::{
    ObjectTransform, Transform2d, Transform3d, PushConstantData2d, PushConstantData3d,
};

fn approx_vec2(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < 1e-6
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-6
}

#[test]
fn test_push_constant_sizes_match_glsl() {
    assert_eq!(std::mem::size_of::<PushConstantData2d>(), 48);
    assert_eq!(std::mem::size_of::<PushConstantData3d>(), 80);
    assert_eq!(std::mem::offset_of!(PushConstantData2d, offset), 16);
    assert_eq!(std::mem::offset_of!(PushConstantData2d, color), 32);
    assert_eq!(std::mem::offset_of!(PushConstantData3d, color), 64);
}

#[test]
fn test_transform2d_default_is_identity() {
    assert_eq!(Transform2d::default().mat2(), Mat2::IDENTITY);
}

#[test]
fn test_transform2d_scales_before_rotating() {
    let transform = Transform2d {
        translation: Vec2::ZERO,
        scale: Vec2::new(2.0, 1.0),
        rotation: FRAC_PI_2,
    };
    // x is doubled, then rotated a quarter turn onto +y
    let p = transform.mat2() * Vec2::X;
    assert!(approx_vec2(p, Vec2::new(0.0, 2.0)), "{:?}", p);
    let q = transform.mat2() * Vec2::Y;
    assert!(approx_vec2(q, Vec2::new(-1.0, 0.0)), "{:?}", q);
}

#[test]
fn test_transform2d_push_constants() {
    let transform = Transform2d {
        translation: Vec2::new(0.25, -0.5),
        scale: Vec2::splat(0.5),
        rotation: 0.0,
    };
    let color = Vec3::new(1.0, 0.5, 0.25);
    let push = transform.push_constants(color);
    assert_eq!(push.transform, Mat2::from_diagonal(Vec2::splat(0.5)));
    assert_eq!(push.offset, Vec2::new(0.25, -0.5));
    assert_eq!(push.color, color);

    let bytes = bytemuck::bytes_of(&push);
    let color_bytes: &[f32] = bytemuck::cast_slice(&bytes[32..44]);
    assert_eq!(color_bytes, &[1.0, 0.5, 0.25]);
}

#[test]
fn test_transform3d_default_is_identity() {
    assert_eq!(Transform3d::default().mat4(), Mat4::IDENTITY);
}

#[test]
fn test_transform3d_order_is_translate_ry_rx_rz_scale() {
    let transform = Transform3d {
        translation: Vec3::new(1.0, 2.0, 3.0),
        scale: Vec3::new(2.0, 3.0, 4.0),
        rotation: Vec3::new(0.3, 0.7, -1.1),
    };
    let expected = Mat4::from_translation(transform.translation)
        * Mat4::from_rotation_y(0.7)
        * Mat4::from_rotation_x(0.3)
        * Mat4::from_rotation_z(-1.1)
        * Mat4::from_scale(transform.scale);
    assert!(transform.mat4().abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_transform3d_applies_z_rotation_first() {
    let transform = Transform3d {
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
        rotation: Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2),
    };
    // Rz takes x to y, then Rx takes y to z
    let p = transform.mat4().transform_point3(Vec3::X);
    assert!(approx_vec3(p, Vec3::Z), "{:?}", p);
}

#[test]
fn test_transform3d_push_constants() {
    let transform = Transform3d {
        translation: Vec3::new(0.0, 0.0, 0.5),
        scale: Vec3::splat(0.5),
        rotation: Vec3::ZERO,
    };
    let push = transform.push_constants(Vec3::ONE);
    let origin = push.transform.transform_point3(Vec3::ZERO);
    assert_eq!(origin, Vec3::new(0.0, 0.0, 0.5));
    assert_eq!(push.color, Vec3::ONE);
    assert!(Transform3d::DEPTH_TEST);
    assert!(!Transform2d::DEPTH_TEST);
}
