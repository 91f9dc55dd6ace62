/*!
# LVE Engine

Core traits and types for the Little Vulkan Engine.

This crate is backend-agnostic: the GPU is reached through trait objects
(`GraphicsDevice`, `Swapchain`, `CommandList`, ...) implemented by a backend
crate such as `lve_engine_renderer_vulkan`.

## Architecture

- **GraphicsDevice**: Factory for swapchains, command lists, buffers, shaders and pipelines
- **Swapchain**: Presentable images, framebuffers and per-frame synchronization
- **Renderer**: Frame and swapchain lifecycle state machine
- **SimpleRenderSystem**: One pipeline drawing a list of game objects
- **Geometry**: Vertex formats, the Sierpinski generator and the cube mesh
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod renderer;
pub mod geometry;
pub mod scene;

// Main lve namespace module
pub mod lve {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Frame lifecycle state machine
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module: renderer, config and the window abstraction
    pub mod render {
        pub use crate::renderer::*;
    }

    // Device sub-module: backend traits and descriptors
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
