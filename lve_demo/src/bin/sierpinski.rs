//! 2D demo: 40 Sierpinski triangles spinning at different speeds

use std::f32::consts::{PI, TAU};
use std::sync::Arc;
use glam::{Vec2, Vec3};
use lve_engine::lve::{Engine, Result};
use lve_engine::lve::device::CommandList;
use lve_engine::lve::geometry::{Vertex2d, sierpinski_vertices};
use lve_engine::lve::scene::{GameObject2d, GameObjectFactory, Model, SimpleRenderSystem, Transform2d};
use lve_engine::engine_info;
use lve_demo::{AppContext, Scene, config_from_env, exit_on_error, load_shader};

const TRIANGLE_COUNT: usize = 40;
const SIERPINSKI_DEPTH: i32 = 1;
/// Angular speed step between consecutive triangles, in rad/s
const SPIN_STEP: f32 = 0.06;

/// Pastel palette, gamma-corrected for an sRGB swapchain
fn palette() -> [Vec3; 5] {
    [
        Vec3::new(1.0, 0.7, 0.73),
        Vec3::new(1.0, 0.87, 0.73),
        Vec3::new(1.0, 1.0, 0.73),
        Vec3::new(0.73, 1.0, 0.8),
        Vec3::new(0.73, 0.88, 1.0),
    ]
    .map(|color| color.powf(2.2))
}

struct SierpinskiScene {
    render_system: SimpleRenderSystem<Transform2d>,
    objects: Vec<GameObject2d>,
}

impl SierpinskiScene {
    fn new(app: &AppContext) -> Result<Self> {
        let vertices = sierpinski_vertices(
            SIERPINSKI_DEPTH,
            Vertex2d::new(Vec2::new(-0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)),
            Vertex2d::new(Vec2::new(0.5, 0.5), Vec3::new(0.0, 1.0, 0.0)),
            Vertex2d::new(Vec2::new(0.0, -0.5), Vec3::new(0.0, 0.0, 1.0)),
        );
        let model = Arc::new(Model::new(app.device.as_ref(), &vertices)?);

        let colors = palette();
        let mut factory = GameObjectFactory::new();
        let objects = (0..TRIANGLE_COUNT)
            .map(|i| {
                let mut triangle = factory.create::<Transform2d>();
                triangle.model = Some(Arc::clone(&model));
                triangle.transform.scale = Vec2::splat(0.5 + i as f32 * 0.025);
                triangle.transform.rotation = i as f32 * 0.025 * PI;
                triangle.color = colors[i % colors.len()];
                triangle
            })
            .collect();

        let render_system = SimpleRenderSystem::new(
            app.device.as_ref(),
            app.renderer.swap_chain_render_pass()?,
            &load_shader("simple_shader_2d.vert.spv")?,
            &load_shader("simple_shader_2d.frag.spv")?,
        )?;

        Ok(Self { render_system, objects })
    }
}

impl Scene for SierpinskiScene {
    fn update(&mut self, frame_time: f32, _aspect_ratio: f32) {
        for (i, object) in self.objects.iter_mut().enumerate() {
            let speed = SPIN_STEP * (i + 1) as f32;
            object.transform.rotation = (object.transform.rotation + speed * frame_time).rem_euclid(TAU);
        }
    }

    fn render(&self, cmd: &mut dyn CommandList) -> Result<()> {
        self.render_system.render_game_objects(cmd, &self.objects)
    }
}

fn main() {
    Engine::install_log_bridge();

    let config = exit_on_error(config_from_env("Sierpinski"));
    let mut app = exit_on_error(AppContext::new("Sierpinski", config));
    let mut scene = exit_on_error(SierpinskiScene::new(&app));

    engine_info!("lve::App", "Rendering {} triangles on {}", TRIANGLE_COUNT, app.device.device_name());
    exit_on_error(app.run(&mut scene));
}
