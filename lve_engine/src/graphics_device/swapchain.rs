/// Swapchain trait - presentable images plus everything needed to render into them

use std::any::Any;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{CommandList, RenderPass, Framebuffer, TextureFormat};

/// Size of a surface or swapchain in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero width or height (minimized window): no swapchain can be built
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// width / height, 0.0 for a degenerate extent
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Presentation mode preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// V-sync, always supported
    Fifo,
    /// Triple buffering, falls back to Fifo when unsupported
    Mailbox,
    /// No v-sync, falls back to Fifo when unsupported
    Immediate,
}

/// Descriptor for creating a swapchain
#[derive(Debug, Clone, Copy)]
pub struct SwapchainDesc {
    /// Requested extent (the surface may impose its own)
    pub extent: Extent2D,
    /// Preferred presentation mode
    pub present_mode: PresentMode,
    /// Upper bound for the frames-in-flight ring
    pub max_frames_in_flight: usize,
}

/// Result of acquiring the next presentable image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// An image is ready to be rendered into
    Acquired { image_index: u32, suboptimal: bool },
    /// The surface changed: the swapchain must be recreated before rendering
    OutOfDate,
}

/// Result of submitting a frame and presenting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Presented normally
    Presented,
    /// Presented, but the swapchain no longer matches the surface exactly
    Suboptimal,
    /// Not presented: the swapchain must be recreated
    OutOfDate,
}

/// Swapchain for presenting rendered images to a window
///
/// Owns the presentable images, one depth buffer per image, the shared
/// render pass, one framebuffer per image and the per-frame synchronization
/// objects. `frames_in_flight()` is fixed at creation and sizes every
/// per-frame array, including the renderer's command list pool.
pub trait Swapchain: Send + Sync {
    /// Wait for the frame slot to be free, then acquire the next image
    ///
    /// Surface staleness is reported as `AcquireOutcome::OutOfDate`, never as an error.
    fn acquire_next_image(&mut self, frame_index: usize) -> Result<AcquireOutcome>;

    /// Submit the recorded command list for `image_index`, then present it
    ///
    /// # Arguments
    ///
    /// * `cmd` - Command list recorded for this frame (ended)
    /// * `image_index` - Index returned by `acquire_next_image`
    /// * `frame_index` - Frame-in-flight slot used for the acquire
    fn submit_and_present(
        &mut self,
        cmd: &dyn CommandList,
        image_index: u32,
        frame_index: usize,
    ) -> Result<PresentOutcome>;

    /// Render pass shared by all framebuffers of this swapchain
    fn render_pass(&self) -> Arc<dyn RenderPass>;

    /// Framebuffer of one swapchain image
    fn framebuffer(&self, image_index: u32) -> Result<Arc<dyn Framebuffer>>;

    /// Get the number of images in the swapchain
    fn image_count(&self) -> usize;

    /// Size of the frames-in-flight ring: `min(max_frames_in_flight, image_count)`
    fn frames_in_flight(&self) -> usize;

    /// Extent of the swapchain images
    fn extent(&self) -> Extent2D;

    /// Pixel format of the swapchain images
    fn color_format(&self) -> TextureFormat;

    /// Pixel format of the depth buffers
    fn depth_format(&self) -> TextureFormat;

    /// True when both swapchains use the same image and depth formats
    fn compare_formats(&self, other: &dyn Swapchain) -> bool {
        self.color_format() == other.color_format() && self.depth_format() == other.depth_format()
    }

    /// width / height of the swapchain extent
    fn aspect_ratio(&self) -> f32 {
        self.extent().aspect_ratio()
    }

    /// Downcasting hook for backends (previous-swapchain hand-off)
    fn as_any(&self) -> &dyn Any;
}
