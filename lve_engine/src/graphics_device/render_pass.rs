/// RenderPass and Framebuffer traits
///
/// Both are created and owned by the swapchain: one render pass shared by
/// every swapchain image, one framebuffer per image (color view + depth view).

use std::any::Any;
use crate::graphics_device::TextureFormat;

/// Render pass - describes attachments, load/store ops and subpass dependencies
pub trait RenderPass: Send + Sync {
    /// Format of color attachment 0
    fn color_format(&self) -> TextureFormat;

    /// Format of the depth attachment
    fn depth_format(&self) -> TextureFormat;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Framebuffer - groups the color and depth attachments of one swapchain image
pub trait Framebuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}
