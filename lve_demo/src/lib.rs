//! # LVE Demo
//!
//! The winit window, the frame loop and the two demo scenes:
//!
//! - `sierpinski`: 40 rotating Sierpinski triangles (2D push constants)
//! - `cube`: a rotating colored cube (3D push constants, depth test)
//!
//! Shaders are read from the `.spv` files in `lve_demo/shaders/`. They are not
//! checked in; build them from the GLSL sources in the same directory before
//! running a demo (requires `glslc` from the Vulkan SDK):
//!
//! ```text
//! lve_demo/shaders/compile.sh
//! ```

mod window;
mod app;

pub use window::{LveWindow, WindowState};
pub use app::{
    AppContext, Scene, WIDTH, HEIGHT, MAX_FRAME_TIME,
    clamp_frame_time, apply_overrides, config_from_env, load_shader, report_validation_stats,
    exit_on_error,
};
