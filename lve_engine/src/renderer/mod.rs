/// Renderer module - frame lifecycle, configuration and the window abstraction

pub mod config;
pub mod surface;
pub mod frame;
pub mod renderer;

pub use config::*;
pub use surface::*;
pub use frame::*;
pub use renderer::*;
