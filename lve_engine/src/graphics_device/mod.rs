/// Graphics device module - backend-agnostic GPU traits and descriptors

// Module declarations
pub mod graphics_device;
pub mod format;
pub mod buffer;
pub mod shader;
pub mod pipeline;
pub mod command_list;
pub mod render_pass;
pub mod swapchain;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use format::*;
pub use buffer::*;
pub use shader::*;
pub use pipeline::*;
pub use command_list::*;
pub use render_pass::*;
pub use swapchain::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
