/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait

use lve_engine::lve::{Result, Error};
use lve_engine::lve::render::Config;
use lve_engine::lve::device::{
    GraphicsDevice,
    Swapchain as LveSwapchain, SwapchainDesc,
    CommandList as LveCommandList,
    Buffer as LveBuffer, BufferDesc, BufferUsage,
    Shader as LveShader, ShaderDesc,
    Pipeline as LvePipeline, PipelineDesc,
};
use lve_engine::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_warn};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::{CStr, CString};
use std::sync::Arc;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::CommandList;
use crate::vulkan_context::{GpuContext, QueueFamilies, downcast};
use crate::vulkan_format::{
    buffer_format_to_vk, input_rate_to_vk, topology_to_vk, cull_mode_to_vk, front_face_to_vk,
    polygon_mode_to_vk, compare_op_to_vk, blend_factor_to_vk, blend_op_to_vk,
    shader_stage_to_vk, shader_stages_to_vk, find_queue_families,
};
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_shader::Shader;
use crate::vulkan_swapchain::Swapchain;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Vulkan graphics device
///
/// Owns (through the shared `GpuContext`) the instance, the optional debug
/// messenger, the window surface, the logical device, its queues and the
/// memory allocator. Every resource it creates holds the context too.
pub struct VulkanGraphicsDevice {
    ctx: Arc<GpuContext>,
    device_name: String,
}

/// Instance-level objects created before the logical device exists
///
/// Destroys whatever was created if device setup fails half way.
struct PartialInit {
    entry: ash::Entry,
    instance: ash::Instance,
    debug_utils_loader: Option<ash::ext::debug_utils::Instance>,
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
    surface_loader: ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    device: Option<ash::Device>,
    armed: bool,
}

impl Drop for PartialInit {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        unsafe {
            if let Some(device) = &self.device {
                device.destroy_device(None);
            }
            if self.surface != vk::SurfaceKHR::null() {
                self.surface_loader.destroy_surface(self.surface, None);
            }
            if let (Some(loader), Some(messenger)) = (&self.debug_utils_loader, self.debug_messenger) {
                crate::debug::cleanup_debug_config();
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

/// Whether validation layers are used for this device
///
/// The `vulkan-validation` feature compiles the support in; the config turns it on.
fn validation_enabled(config: &Config) -> bool {
    if config.enable_validation && !cfg!(feature = "vulkan-validation") {
        engine_warn!(
            "lve::vulkan",
            "Validation requested but the vulkan-validation feature is disabled, continuing without it"
        );
        return false;
    }
    config.enable_validation
}

impl VulkanGraphicsDevice {
    /// Create the device for a window
    ///
    /// # Arguments
    ///
    /// * `window` - Any window exposing raw display and window handles
    /// * `config` - Application name/version and validation settings
    pub fn new<W: HasDisplayHandle + HasWindowHandle>(window: &W, config: &Config) -> Result<Self> {
        config.validate()?;
        let enable_validation = validation_enabled(config);

        let display_handle = window.display_handle().map_err(|e| {
            engine_error!("lve::vulkan", "Failed to get display handle: {}", e);
            Error::InitializationFailed(format!("Failed to get display handle: {}", e))
        })?;
        let window_handle = window.window_handle().map_err(|e| {
            engine_error!("lve::vulkan", "Failed to get window handle: {}", e);
            Error::InitializationFailed(format!("Failed to get window handle: {}", e))
        })?;

        unsafe {
            let entry = ash::Entry::load().map_err(|e| {
                engine_error!("lve::vulkan", "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

            if enable_validation && !Self::validation_layer_available(&entry) {
                engine_error!("lve::vulkan", "Validation layers requested, but not available");
                return Err(Error::InitializationFailed(
                    "Validation layers requested, but not available".to_string(),
                ));
            }

            let app_name = CString::new(config.app_name.as_str()).map_err(|_| {
                Error::InvalidConfig(format!("Application name contains a NUL byte: {:?}", config.app_name))
            })?;
            let (major, minor, patch) = config.app_version;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, major, minor, patch))
                .engine_name(c"Little Vulkan Engine")
                .engine_version(vk::make_api_version(0, 1, 0, 0))
                .api_version(vk::API_VERSION_1_0);

            let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
                .map_err(|e| {
                    engine_error!("lve::vulkan", "Failed to get required extensions: {}", e);
                    Error::InitializationFailed(format!("Failed to get required extensions: {}", e))
                })?
                .to_vec();
            if enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            }
            Self::log_available_extensions(&entry);

            let layer_names = if enable_validation {
                vec![VALIDATION_LAYER.as_ptr()]
            } else {
                vec![]
            };

            // Also chained into instance creation so create/destroy are covered
            let mut instance_debug_info = crate::debug::messenger_create_info(config.debug_severity);
            let mut create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);
            if enable_validation {
                crate::debug::init_debug_config(crate::debug::Config::from(config));
                create_info = create_info.push_next(&mut instance_debug_info);
            }

            let instance = entry.create_instance(&create_info, None).map_err(|e| {
                engine_error!("lve::vulkan", "Failed to create instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;

            let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);
            let mut init = PartialInit {
                entry,
                instance,
                debug_utils_loader: None,
                debug_messenger: None,
                surface_loader,
                surface: vk::SurfaceKHR::null(),
                device: None,
                armed: true,
            };

            if enable_validation {
                let debug_utils = ash::ext::debug_utils::Instance::new(&init.entry, &init.instance);
                let debug_info = crate::debug::messenger_create_info(config.debug_severity);
                let messenger = debug_utils
                    .create_debug_utils_messenger(&debug_info, None)
                    .map_err(|e| {
                        engine_error!("lve::vulkan", "Failed to set up debug messenger: {:?}", e);
                        Error::InitializationFailed(format!("Failed to set up debug messenger: {:?}", e))
                    })?;
                init.debug_utils_loader = Some(debug_utils);
                init.debug_messenger = Some(messenger);
            }

            init.surface = ash_window::create_surface(
                &init.entry,
                &init.instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )
            .map_err(|e| {
                engine_error!("lve::vulkan", "Failed to create window surface: {:?}", e);
                Error::InitializationFailed(format!("Failed to create window surface: {:?}", e))
            })?;

            let (physical_device, families) = Self::pick_physical_device(&init)?;

            let properties = init.instance.get_physical_device_properties(physical_device);
            let device_name = properties
                .device_name_as_c_str()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "Unknown device".to_string());
            engine_info!("lve::vulkan", "Physical device: {}", device_name);

            let device = Self::create_logical_device(&init, physical_device, families, enable_validation)?;
            init.device = Some(device.clone());

            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: init.instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                engine_error!("lve::vulkan", "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            // Ownership moves to the context from here
            init.armed = false;
            let ctx = GpuContext::new(
                init.entry.clone(),
                init.instance.clone(),
                physical_device,
                device,
                allocator,
                families,
                init.surface,
                init.surface_loader.clone(),
                init.debug_utils_loader.take(),
                init.debug_messenger.take(),
            );

            Ok(Self {
                ctx: Arc::new(ctx),
                device_name,
            })
        }
    }

    unsafe fn validation_layer_available(entry: &ash::Entry) -> bool {
        entry
            .enumerate_instance_layer_properties()
            .map(|layers| {
                layers
                    .iter()
                    .any(|layer| layer.layer_name_as_c_str().is_ok_and(|name| name == VALIDATION_LAYER))
            })
            .unwrap_or(false)
    }

    unsafe fn log_available_extensions(entry: &ash::Entry) {
        if let Ok(extensions) = entry.enumerate_instance_extension_properties(None) {
            engine_debug!("lve::vulkan", "{} instance extensions available", extensions.len());
            for extension in &extensions {
                if let Ok(name) = extension.extension_name_as_c_str() {
                    lve_engine::engine_trace!("lve::vulkan", "  {}", name.to_string_lossy());
                }
            }
        }
    }

    /// First device with graphics + present queues, swapchain support and
    /// at least one surface format and present mode
    unsafe fn pick_physical_device(init: &PartialInit) -> Result<(vk::PhysicalDevice, QueueFamilies)> {
        let physical_devices = init.instance.enumerate_physical_devices().map_err(|e| {
            engine_error!("lve::vulkan", "Failed to enumerate physical devices: {:?}", e);
            Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
        })?;

        if physical_devices.is_empty() {
            engine_error!("lve::vulkan", "Failed to find GPUs with Vulkan support");
            return Err(Error::InitializationFailed("Failed to find GPUs with Vulkan support".to_string()));
        }
        engine_debug!("lve::vulkan", "Device count: {}", physical_devices.len());

        for physical_device in physical_devices {
            let queue_families = init.instance.get_physical_device_queue_family_properties(physical_device);
            let Some(families) = find_queue_families(&queue_families, |index| {
                init.surface_loader
                    .get_physical_device_surface_support(physical_device, index, init.surface)
                    .unwrap_or(false)
            }) else {
                continue;
            };

            let has_swapchain = init.instance
                .enumerate_device_extension_properties(physical_device)
                .map(|extensions| {
                    extensions
                        .iter()
                        .any(|ext| ext.extension_name_as_c_str().is_ok_and(|name| name == ash::khr::swapchain::NAME))
                })
                .unwrap_or(false);
            if !has_swapchain {
                continue;
            }

            let formats = init.surface_loader
                .get_physical_device_surface_formats(physical_device, init.surface)
                .unwrap_or_default();
            let present_modes = init.surface_loader
                .get_physical_device_surface_present_modes(physical_device, init.surface)
                .unwrap_or_default();
            if formats.is_empty() || present_modes.is_empty() {
                continue;
            }

            return Ok((physical_device, families));
        }

        engine_error!("lve::vulkan", "Failed to find a suitable GPU");
        Err(Error::InitializationFailed("Failed to find a suitable GPU".to_string()))
    }

    unsafe fn create_logical_device(
        init: &PartialInit,
        physical_device: vk::PhysicalDevice,
        families: QueueFamilies,
        enable_validation: bool,
    ) -> Result<ash::Device> {
        let queue_priorities = [1.0];
        let mut queue_create_infos = vec![
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(families.graphics)
                .queue_priorities(&queue_priorities),
        ];
        if families.present != families.graphics {
            queue_create_infos.push(
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(families.present)
                    .queue_priorities(&queue_priorities),
            );
        }

        let device_extension_names = [ash::khr::swapchain::NAME.as_ptr()];
        let device_features = vk::PhysicalDeviceFeatures::default();

        // Device layers are deprecated but older implementations still read them
        let layer_names = if enable_validation {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            vec![]
        };

        #[allow(deprecated)]
        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&device_extension_names)
            .enabled_layer_names(&layer_names)
            .enabled_features(&device_features);

        init.instance
            .create_device(physical_device, &device_create_info, None)
            .map_err(|e| {
                engine_error!("lve::vulkan", "Failed to create logical device: {:?}", e);
                Error::InitializationFailed(format!("Failed to create logical device: {:?}", e))
            })
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_swapchain(
        &self,
        desc: &SwapchainDesc,
        previous: Option<&dyn LveSwapchain>,
    ) -> Result<Box<dyn LveSwapchain>> {
        let previous = match previous {
            Some(swapchain) => Some(downcast::<Swapchain>(swapchain.as_any(), "Previous swap chain")?),
            None => None,
        };
        Ok(Box::new(Swapchain::new(Arc::clone(&self.ctx), desc, previous)?))
    }

    fn create_command_list(&self) -> Result<Box<dyn LveCommandList>> {
        Ok(Box::new(CommandList::new(Arc::clone(&self.ctx))?))
    }

    fn create_buffer(&self, desc: BufferDesc) -> Result<Arc<dyn LveBuffer>> {
        if desc.size == 0 {
            return Err(Error::InvalidResource("Buffer size must be greater than zero".to_string()));
        }

        let usage = match desc.usage {
            BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER,
            BufferUsage::Index => vk::BufferUsageFlags::INDEX_BUFFER,
            BufferUsage::Uniform => vk::BufferUsageFlags::UNIFORM_BUFFER,
        };
        let device = &self.ctx.device;

        unsafe {
            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(usage)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = device.create_buffer(&buffer_create_info, None)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create buffer of size {} bytes: {:?}", desc.size, e))?;

            let requirements = device.get_buffer_memory_requirements(buffer);

            let allocation = {
                let mut allocator = match self.ctx.allocator.lock() {
                    Ok(allocator) => allocator,
                    Err(_) => {
                        device.destroy_buffer(buffer, None);
                        engine_bail!("lve::vulkan", "GPU allocator lock poisoned");
                    }
                };
                allocator.allocate(&AllocationCreateDesc {
                    name: "buffer",
                    requirements,
                    location: MemoryLocation::CpuToGpu,
                    linear: true,
                    allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                })
            };
            let allocation = match allocation {
                Ok(allocation) => allocation,
                Err(_) => {
                    device.destroy_buffer(buffer, None);
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    engine_error!("lve::vulkan", "Out of GPU memory for buffer (required: {:.2} MB)", size_mb);
                    return Err(Error::OutOfMemory);
                }
            };

            // Owned from here: Drop frees the allocation and the buffer
            let lve_buffer = Buffer::new(Arc::clone(&self.ctx), buffer, allocation, desc.size);
            if let Some(allocation) = &lve_buffer.allocation {
                device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
                    .map_err(|e| engine_err!("lve::vulkan", "Failed to bind buffer memory: {:?}", e))?;
            }

            Ok(Arc::new(lve_buffer))
        }
    }

    fn create_shader(&self, desc: ShaderDesc) -> Result<Arc<dyn LveShader>> {
        if desc.code.is_empty() {
            return Err(Error::InvalidResource("Shader code is empty".to_string()));
        }
        let entry_point = CString::new(desc.entry_point.as_str()).map_err(|_| {
            Error::InvalidResource(format!("Shader entry point contains a NUL byte: {:?}", desc.entry_point))
        })?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(desc.code);
        let module = unsafe {
            self.ctx.device
                .create_shader_module(&create_info, None)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create shader module: {:?}", e))?
        };

        Ok(Arc::new(Shader::new(Arc::clone(&self.ctx), module, desc.stage, entry_point)))
    }

    fn create_pipeline(&self, desc: PipelineDesc) -> Result<Arc<dyn LvePipeline>> {
        let vertex_shader = downcast::<Shader>(desc.vertex_shader.as_any(), "Vertex shader")?;
        let fragment_shader = downcast::<Shader>(desc.fragment_shader.as_any(), "Fragment shader")?;
        let render_pass = downcast::<RenderPass>(desc.render_pass.as_any(), "Render pass")?;

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(shader_stage_to_vk(vertex_shader.stage))
                .module(vertex_shader.module)
                .name(&vertex_shader.entry_point),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(shader_stage_to_vk(fragment_shader.stage))
                .module(fragment_shader.module)
                .name(&fragment_shader.entry_point),
        ];

        let vertex_bindings: Vec<vk::VertexInputBindingDescription> = desc.vertex_layout.bindings
            .iter()
            .map(|binding| vk::VertexInputBindingDescription {
                binding: binding.binding,
                stride: binding.stride,
                input_rate: input_rate_to_vk(binding.input_rate),
            })
            .collect();

        let vertex_attributes: Vec<vk::VertexInputAttributeDescription> = desc.vertex_layout.attributes
            .iter()
            .map(|attribute| vk::VertexInputAttributeDescription {
                location: attribute.location,
                binding: attribute.binding,
                format: buffer_format_to_vk(attribute.format),
                offset: attribute.offset,
            })
            .collect();

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_bindings)
            .vertex_attribute_descriptions(&vertex_attributes);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(topology_to_vk(desc.topology))
            .primitive_restart_enable(false);

        // Viewport and scissor are dynamic, only the counts matter here
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(1)
            .scissor_count(1);

        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(polygon_mode_to_vk(desc.rasterization.polygon_mode))
            .line_width(desc.rasterization.line_width)
            .cull_mode(cull_mode_to_vk(desc.rasterization.cull_mode))
            .front_face(front_face_to_vk(desc.rasterization.front_face))
            .depth_bias_enable(false);

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1)
            .min_sample_shading(1.0);

        let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::default()
            .depth_test_enable(desc.depth_stencil.depth_test_enable)
            .depth_write_enable(desc.depth_stencil.depth_write_enable)
            .depth_compare_op(compare_op_to_vk(desc.depth_stencil.depth_compare_op))
            .depth_bounds_test_enable(false)
            .min_depth_bounds(0.0)
            .max_depth_bounds(1.0)
            .stencil_test_enable(false);

        let blend = &desc.color_blend;
        let color_blend_attachment = vk::PipelineColorBlendAttachmentState::default()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(blend.blend_enable)
            .src_color_blend_factor(blend_factor_to_vk(blend.src_color_factor))
            .dst_color_blend_factor(blend_factor_to_vk(blend.dst_color_factor))
            .color_blend_op(blend_op_to_vk(blend.color_blend_op))
            .src_alpha_blend_factor(blend_factor_to_vk(blend.src_alpha_factor))
            .dst_alpha_blend_factor(blend_factor_to_vk(blend.dst_alpha_factor))
            .alpha_blend_op(blend_op_to_vk(blend.alpha_blend_op));

        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(std::slice::from_ref(&color_blend_attachment));

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
            .dynamic_states(&dynamic_states);

        let push_constant_ranges: Vec<vk::PushConstantRange> = desc.push_constant_ranges
            .iter()
            .map(|range| vk::PushConstantRange {
                stage_flags: shader_stages_to_vk(&range.stages),
                offset: range.offset,
                size: range.size,
            })
            .collect();

        let layout_create_info = vk::PipelineLayoutCreateInfo::default()
            .push_constant_ranges(&push_constant_ranges);

        let device = &self.ctx.device;
        unsafe {
            let layout = device.create_pipeline_layout(&layout_create_info, None)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create pipeline layout: {:?}", e))?;

            let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
                .stages(&shader_stages)
                .vertex_input_state(&vertex_input_state)
                .input_assembly_state(&input_assembly_state)
                .viewport_state(&viewport_state)
                .rasterization_state(&rasterization_state)
                .multisample_state(&multisample_state)
                .depth_stencil_state(&depth_stencil_state)
                .color_blend_state(&color_blend_state)
                .dynamic_state(&dynamic_state)
                .layout(layout)
                .render_pass(render_pass.render_pass)
                .subpass(0);

            let pipeline = match device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_create_info],
                None,
            ) {
                Ok(pipelines) => pipelines[0],
                Err((_, e)) => {
                    device.destroy_pipeline_layout(layout, None);
                    engine_bail!("lve::vulkan", "Failed to create graphics pipeline: {:?}", e);
                }
            };

            Ok(Arc::new(Pipeline::new(
                Arc::clone(&self.ctx),
                pipeline,
                layout,
                desc.push_constant_ranges.clone(),
            )))
        }
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.ctx.device
                .device_wait_idle()
                .map_err(|e| engine_err!("lve::vulkan", "Failed to wait idle: {:?}", e))
        }
    }

    fn device_name(&self) -> String {
        self.device_name.clone()
    }
}

impl Drop for VulkanGraphicsDevice {
    fn drop(&mut self) {
        // The context outlives this handle while resources still reference it
        let others = Arc::strong_count(&self.ctx) - 1;
        if others > 0 {
            engine_debug!(
                "lve::vulkan",
                "Device handle dropped with {} resource(s) still alive",
                others
            );
        }
    }
}
