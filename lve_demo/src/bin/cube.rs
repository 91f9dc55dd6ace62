//! 3D demo: a colored cube tumbling in front of the camera

use std::f32::consts::TAU;
use std::sync::Arc;
use glam::Vec3;
use lve_engine::lve::{Engine, Result};
use lve_engine::lve::device::CommandList;
use lve_engine::lve::geometry::cube_vertices;
use lve_engine::lve::scene::{GameObject3d, GameObjectFactory, Model, SimpleRenderSystem, Transform3d};
use lve_engine::engine_info;
use lve_demo::{AppContext, Scene, config_from_env, exit_on_error, load_shader};

/// Rotation speeds around y and x, in rad/s
const SPIN_Y: f32 = 0.6;
const SPIN_X: f32 = 0.3;

struct CubeScene {
    render_system: SimpleRenderSystem<Transform3d>,
    objects: Vec<GameObject3d>,
}

impl CubeScene {
    fn new(app: &AppContext) -> Result<Self> {
        let model = Arc::new(Model::new(app.device.as_ref(), &cube_vertices(Vec3::ZERO))?);

        let mut factory = GameObjectFactory::new();
        let mut cube = factory.create::<Transform3d>();
        cube.model = Some(model);
        cube.transform.translation = Vec3::new(0.0, 0.0, 0.5);
        cube.transform.scale = Vec3::splat(0.5);

        let render_system = SimpleRenderSystem::new(
            app.device.as_ref(),
            app.renderer.swap_chain_render_pass()?,
            &load_shader("simple_shader_3d.vert.spv")?,
            &load_shader("simple_shader_3d.frag.spv")?,
        )?;

        Ok(Self { render_system, objects: vec![cube] })
    }
}

impl Scene for CubeScene {
    fn update(&mut self, frame_time: f32, _aspect_ratio: f32) {
        for object in &mut self.objects {
            let rotation = &mut object.transform.rotation;
            rotation.y = (rotation.y + SPIN_Y * frame_time).rem_euclid(TAU);
            rotation.x = (rotation.x + SPIN_X * frame_time).rem_euclid(TAU);
        }
    }

    fn render(&self, cmd: &mut dyn CommandList) -> Result<()> {
        self.render_system.render_game_objects(cmd, &self.objects)
    }
}

fn main() {
    Engine::install_log_bridge();

    let config = exit_on_error(config_from_env("Cube"));
    let mut app = exit_on_error(AppContext::new("Cube", config));
    let mut scene = exit_on_error(CubeScene::new(&app));

    engine_info!("lve::App", "Rendering cube on {}", app.device.device_name());
    exit_on_error(app.run(&mut scene));
}
