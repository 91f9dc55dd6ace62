/// Surface trait - the renderer's view of the window

use crate::graphics_device::Extent2D;

/// Window-side collaborator of the renderer
///
/// Tracks the framebuffer extent, resize events and close requests. The
/// renderer never owns the window; it borrows it for the calls that may
/// have to block or recreate the swapchain.
pub trait Surface {
    /// Current framebuffer extent in pixels (zero while minimized)
    fn extent(&self) -> Extent2D;

    /// True if a resize happened since the last `reset_resized_flag()`
    fn was_resized(&self) -> bool;

    /// Clear the resize flag
    fn reset_resized_flag(&mut self);

    /// Block until at least one window event arrives, then process events
    fn wait_events(&mut self);

    /// True once the user asked to close the window
    fn should_close(&self) -> bool;
}
