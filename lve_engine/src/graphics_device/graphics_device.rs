/// GraphicsDevice trait - factory for every GPU object

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Swapchain, SwapchainDesc, CommandList, Buffer, BufferDesc,
    Shader, ShaderDesc, Pipeline, PipelineDesc,
};

/// Graphics device
///
/// Owns the instance, the physical and logical device, the queues, the
/// presentation surface and the memory allocator. Shared as
/// `Arc<dyn GraphicsDevice>` by the renderer, the render systems and models.
///
/// Implemented by backend-specific devices (e.g., `VulkanGraphicsDevice`).
pub trait GraphicsDevice: Send + Sync {
    /// Create a swapchain for the device's surface
    ///
    /// # Arguments
    ///
    /// * `desc` - Extent, present mode and frames-in-flight bound
    /// * `previous` - Swapchain being replaced, passed to the driver as a reuse hint.
    ///   The caller keeps ownership and drops it after the new one exists.
    fn create_swapchain(
        &self,
        desc: &SwapchainDesc,
        previous: Option<&dyn Swapchain>,
    ) -> Result<Box<dyn Swapchain>>;

    /// Allocate one primary command list
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Create a host-visible buffer
    fn create_buffer(&self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a shader module
    fn create_shader(&self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a graphics pipeline
    fn create_pipeline(&self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;

    /// Human-readable adapter name
    fn device_name(&self) -> String;
}
