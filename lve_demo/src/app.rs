/// Application loop shared by the demo binaries

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use lve_engine::lve::{Error, Renderer, Result};
use lve_engine::lve::device::{CommandList, GraphicsDevice, load_spirv_file};
use lve_engine::lve::render::{Config, Surface};
use lve_engine::{engine_info, engine_trace};
use lve_engine_renderer_vulkan::{VulkanGraphicsDevice, print_validation_stats_report};

use crate::window::LveWindow;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

/// Longest simulated step, in seconds (after a stall or a drag of the window)
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Scene driven by `run`
pub trait Scene {
    /// Advance the simulation by `frame_time` seconds
    fn update(&mut self, frame_time: f32, aspect_ratio: f32);

    /// Record draw commands inside the swapchain render pass
    fn render(&self, cmd: &mut dyn CommandList) -> Result<()>;
}

/// Elapsed time clamped to `MAX_FRAME_TIME`
pub fn clamp_frame_time(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_TIME)
}

/// Parse a boolean override (`0`/`1`/`true`/`false`/`on`/`off`)
fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(Error::InvalidConfig(format!("{} must be 0 or 1, got {:?}", name, other))),
    }
}

/// Apply `LVE_VALIDATION` / `LVE_FRAMES_IN_FLIGHT` style overrides to a config
pub fn apply_overrides(mut config: Config, validation: Option<&str>, frames_in_flight: Option<&str>) -> Result<Config> {
    if let Some(value) = validation {
        config.enable_validation = parse_flag("LVE_VALIDATION", value)?;
    }
    if let Some(value) = frames_in_flight {
        config.max_frames_in_flight = value.trim().parse().map_err(|_| {
            Error::InvalidConfig(format!("LVE_FRAMES_IN_FLIGHT must be a number, got {:?}", value))
        })?;
    }
    config.validate()?;
    Ok(config)
}

/// Default config for a demo, with environment overrides applied
pub fn config_from_env(app_name: &str) -> Result<Config> {
    let config = Config {
        app_name: app_name.to_string(),
        ..Config::default()
    };
    let validation = std::env::var("LVE_VALIDATION").ok();
    let frames = std::env::var("LVE_FRAMES_IN_FLIGHT").ok();
    apply_overrides(config, validation.as_deref(), frames.as_deref())
}

/// Load a compiled shader from `lve_demo/shaders/`
///
/// The `.spv` files are not checked in; a missing one is reported with the
/// command that builds it.
pub fn load_shader(file_name: &str) -> Result<Vec<u32>> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "shaders", file_name].iter().collect();
    if !path.is_file() {
        lve_engine::engine_error!("lve::App", "Shader {} not found", path.display());
        return Err(Error::InitializationFailed(format!(
            "Shader {} not found, compile the GLSL sources with lve_demo/shaders/compile.sh (requires glslc)",
            path.display()
        )));
    }
    load_spirv_file(path)
}

/// Window, device and renderer of a demo
pub struct AppContext {
    // Drop order: renderer, device handle, then the window
    pub renderer: Renderer,
    pub device: Arc<dyn GraphicsDevice>,
    pub window: LveWindow,
}

impl AppContext {
    pub fn new(title: &str, config: Config) -> Result<Self> {
        let mut window = LveWindow::new(WIDTH, HEIGHT, title)?;
        let device: Arc<dyn GraphicsDevice> = Arc::new(VulkanGraphicsDevice::new(window.window(), &config)?);
        let renderer = Renderer::new(Arc::clone(&device), &mut window, config)?;
        Ok(Self { renderer, device, window })
    }

    /// Run the frame loop until the window closes
    pub fn run<S: Scene>(&mut self, scene: &mut S) -> Result<()> {
        let mut current_time = Instant::now();

        while !self.window.should_close() {
            self.window.poll_events();

            let new_time = Instant::now();
            let frame_time = clamp_frame_time(new_time - current_time);
            current_time = new_time;

            scene.update(frame_time, self.renderer.aspect_ratio());

            if let Some(handle) = self.renderer.begin_frame(&mut self.window)? {
                self.renderer.begin_swap_chain_render_pass(handle)?;
                scene.render(self.renderer.command_list(handle)?)?;
                self.renderer.end_swap_chain_render_pass(handle)?;
                self.renderer.end_frame(&mut self.window)?;
            } else {
                engine_trace!("lve::App", "Frame skipped");
            }
        }

        let stats = self.renderer.stats();
        engine_info!(
            "lve::App",
            "Closing: {} frames presented, {} skipped, {} swap chain recreations",
            stats.frames_presented, stats.frames_skipped, stats.swapchain_recreations
        );
        self.device.wait_idle()?;
        report_validation_stats(self.renderer.config());
        Ok(())
    }
}

/// Print the validation message report if the config collects stats
///
/// Returns whether a report was printed.
pub fn report_validation_stats(config: &Config) -> bool {
    if !(config.enable_validation && config.enable_validation_stats) {
        return false;
    }
    print_validation_stats_report();
    true
}

/// Log a fatal error and exit with status 1
pub fn exit_on_error<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            lve_engine::engine_error!("lve::App", "Fatal: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
