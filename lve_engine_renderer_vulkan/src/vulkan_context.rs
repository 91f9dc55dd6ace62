/// GpuContext - Shared Vulkan state for every GPU object
///
/// Contains everything needed for GPU operations:
/// - Instance, physical and logical device
/// - Graphics and present queues
/// - Presentation surface and the swapchain loader
/// - Allocator for memory management

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use lve_engine::lve::{Error, Result};
use std::any::Any;
use std::mem::ManuallyDrop;
use std::sync::Mutex;

/// Shared GPU context for all Vulkan resources.
///
/// Shared (via `Arc`) by the device and every resource it creates, so the
/// logical device and the instance are destroyed only after the last buffer,
/// pipeline, swapchain or command list is gone.
pub struct GpuContext {
    /// Vulkan entry (keeps the loader alive)
    _entry: ash::Entry,
    pub(crate) instance: ash::Instance,
    pub(crate) physical_device: vk::PhysicalDevice,
    pub(crate) device: ash::Device,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is dropped BEFORE the device is destroyed
    pub(crate) allocator: ManuallyDrop<Mutex<Allocator>>,

    pub(crate) graphics_queue: vk::Queue,
    pub(crate) graphics_queue_family: u32,
    /// Present queue (may be the graphics queue)
    pub(crate) present_queue: vk::Queue,
    pub(crate) present_queue_family: u32,

    /// Window surface, lives as long as the device
    pub(crate) surface: vk::SurfaceKHR,
    pub(crate) surface_loader: ash::khr::surface::Instance,
    pub(crate) swapchain_loader: ash::khr::swapchain::Device,

    /// Debug utils loader (validation layers only)
    pub(crate) debug_utils_loader: Option<ash::ext::debug_utils::Instance>,
    /// Debug messenger handle (validation layers only)
    pub(crate) debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

/// Queue selection made during device creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl GpuContext {
    /// Assemble the context from already-created Vulkan objects
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        entry: ash::Entry,
        instance: ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        allocator: Allocator,
        families: QueueFamilies,
        surface: vk::SurfaceKHR,
        surface_loader: ash::khr::surface::Instance,
        debug_utils_loader: Option<ash::ext::debug_utils::Instance>,
        debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
    ) -> Self {
        let graphics_queue = unsafe { device.get_device_queue(families.graphics, 0) };
        let present_queue = unsafe { device.get_device_queue(families.present, 0) };
        let swapchain_loader = ash::khr::swapchain::Device::new(&instance, &device);

        Self {
            _entry: entry,
            instance,
            physical_device,
            device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            graphics_queue,
            graphics_queue_family: families.graphics,
            present_queue,
            present_queue_family: families.present,
            surface,
            surface_loader,
            swapchain_loader,
            debug_utils_loader,
            debug_messenger,
        }
    }

    /// Format properties of the physical device
    pub(crate) fn format_properties(&self, format: vk::Format) -> vk::FormatProperties {
        unsafe {
            self.instance
                .get_physical_device_format_properties(self.physical_device, format)
        }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            // Allocator first: it frees its memory blocks through the device
            ManuallyDrop::drop(&mut self.allocator);

            self.device.destroy_device(None);
            self.surface_loader.destroy_surface(self.surface, None);

            crate::debug::cleanup_debug_config();
            if let (Some(debug_utils), Some(messenger)) =
                (&self.debug_utils_loader, self.debug_messenger)
            {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
    }
}

/// Downcast an engine trait object to this backend's concrete type
///
/// Fails when an object created by another device implementation is passed in.
pub(crate) fn downcast<'a, T: 'static>(object: &'a dyn Any, kind: &str) -> Result<&'a T> {
    object.downcast_ref::<T>().ok_or_else(|| {
        Error::InvalidResource(format!("{} was not created by the Vulkan backend", kind))
    })
}
