//! Unit tests for SimpleRenderSystem

use std::sync::Arc;
use glam::{Vec2, Vec3};
use crate::geometry::{cube_vertices, sierpinski_vertices, Vertex2d};
use crate::graphics_device::{CommandList, RenderPass, TextureFormat};
use crate::graphics_device::mock_graphics_device::{
    MockCommandList, MockGraphicsDevice, MockPipeline, MockRenderPass,
};
use crate::scene::{
    GameObject2d, GameObject3d, GameObjectFactory, Model, ObjectTransform,
    SimpleRenderSystem, Transform2d, Transform3d,
};

fn render_pass() -> Arc<dyn RenderPass> {
    Arc::new(MockRenderPass {
        color_format: TextureFormat::B8G8R8A8_SRGB,
        depth_format: TextureFormat::D32_FLOAT,
    })
}

fn sierpinski_model(device: &MockGraphicsDevice) -> Arc<Model> {
    let vertices = sierpinski_vertices(
        1,
        Vertex2d::new(Vec2::new(-0.5, 0.5), Vec3::X),
        Vertex2d::new(Vec2::new(0.5, 0.5), Vec3::Y),
        Vertex2d::new(Vec2::new(0.0, -0.5), Vec3::Z),
    );
    Arc::new(Model::new(device, &vertices).unwrap())
}

fn recording() -> MockCommandList {
    let mut cmd = MockCommandList::new(1);
    cmd.begin().unwrap();
    cmd
}

#[test]
fn test_2d_pipeline_has_48_byte_push_range_and_no_depth() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform2d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let ranges = system.pipeline().push_constant_ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].size, 48);
    assert_eq!(ranges[0].offset, 0);
    let mock = system.pipeline().as_any().downcast_ref::<MockPipeline>().unwrap();
    assert!(!mock.depth_test);
}

#[test]
fn test_3d_pipeline_has_80_byte_push_range_and_depth() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform3d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    assert_eq!(system.pipeline().push_constant_ranges()[0].size, 80);
    let mock = system.pipeline().as_any().downcast_ref::<MockPipeline>().unwrap();
    assert!(mock.depth_test);
}

#[test]
fn test_render_binds_pipeline_once_and_draws_each_object() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform2d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let model = sierpinski_model(&device);
    let mut factory = GameObjectFactory::new();
    let objects: Vec<GameObject2d> = (0..3)
        .map(|_| {
            let mut object: GameObject2d = factory.create();
            object.model = Some(model.clone());
            object
        })
        .collect();

    let mut cmd = recording();
    system.render_game_objects(&mut cmd, &objects).unwrap();

    let per_object = ["push_constants 0 48", "bind_vertex_buffer", "draw 9 0"];
    let mut expected = vec!["begin", "bind_pipeline"];
    for _ in 0..3 {
        expected.extend_from_slice(&per_object);
    }
    assert_eq!(cmd.commands, expected);
}

#[test]
fn test_render_skips_objects_without_model() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform2d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let model = sierpinski_model(&device);
    let mut factory = GameObjectFactory::new();

    let mut with_model: GameObject2d = factory.create();
    with_model.model = Some(model);
    let without_model: GameObject2d = factory.create();

    let mut cmd = recording();
    system.render_game_objects(&mut cmd, &[without_model, with_model]).unwrap();
    assert_eq!(cmd.pushed.len(), 1);
    assert_eq!(cmd.commands.iter().filter(|c| c.starts_with("draw")).count(), 1);
}

#[test]
fn test_render_pushes_each_object_transform_in_order() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform2d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let model = sierpinski_model(&device);
    let mut factory = GameObjectFactory::new();

    let objects: Vec<GameObject2d> = (0..2)
        .map(|i| {
            let mut object: GameObject2d = factory.create();
            object.model = Some(model.clone());
            object.color = Vec3::splat(i as f32);
            object.transform.rotation = i as f32;
            object
        })
        .collect();

    let mut cmd = recording();
    system.render_game_objects(&mut cmd, &objects).unwrap();
    for (pushed, object) in cmd.pushed.iter().zip(objects.iter()) {
        let expected = object.transform.push_constants(object.color);
        assert_eq!(pushed.as_slice(), bytemuck::bytes_of(&expected));
    }
}

#[test]
fn test_render_cube() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform3d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let mut factory = GameObjectFactory::new();
    let mut cube: GameObject3d = factory.create();
    cube.model = Some(Arc::new(Model::new(&device, &cube_vertices(Vec3::ZERO)).unwrap()));
    cube.transform.translation = Vec3::new(0.0, 0.0, 0.5);
    cube.transform.scale = Vec3::splat(0.5);

    let mut cmd = recording();
    system.render_game_objects(&mut cmd, &[cube]).unwrap();
    assert_eq!(
        cmd.commands,
        vec!["begin", "bind_pipeline", "push_constants 0 80", "bind_vertex_buffer", "draw 36 0"]
    );
}

#[test]
fn test_render_empty_scene_still_binds_pipeline() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform3d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let mut cmd = recording();
    system.render_game_objects(&mut cmd, &[]).unwrap();
    assert_eq!(cmd.commands, vec!["begin", "bind_pipeline"]);
}

#[test]
fn test_render_outside_recording_fails() {
    let device = MockGraphicsDevice::new();
    let system = SimpleRenderSystem::<Transform2d>::new(&device, render_pass(), &[0], &[0]).unwrap();
    let mut cmd = MockCommandList::new(1);
    assert!(system.render_game_objects(&mut cmd, &[]).is_err());
}
