/*!
# LVE Engine - Vulkan Backend

Vulkan implementation of the `lve_engine` device traits, built on `ash` for
the bindings and `gpu-allocator` for memory management.

```no_run
use lve_engine::lve::render::Config;
use lve_engine_renderer_vulkan::VulkanGraphicsDevice;
# fn demo(window: &winit::window::Window) -> lve_engine::lve::Result<()> {
let device = VulkanGraphicsDevice::new(window, &Config::default())?;
# Ok(())
# }
```
*/

mod vulkan;
mod vulkan_context;
mod vulkan_format;
mod vulkan_buffer;
mod vulkan_shader;
mod vulkan_pipeline;
mod vulkan_render_pass;
mod vulkan_command_list;
mod vulkan_swapchain;
mod debug;

pub use vulkan::VulkanGraphicsDevice;
pub use vulkan_swapchain::Swapchain as VulkanSwapchain;
pub use vulkan_command_list::CommandList as VulkanCommandList;

// Re-export debug utilities
pub use debug::{get_validation_stats, print_validation_stats_report};
