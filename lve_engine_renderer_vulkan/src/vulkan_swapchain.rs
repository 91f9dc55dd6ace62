/// Swapchain - Vulkan implementation of the Swapchain trait
///
/// Owns the presentable images and their views, one depth buffer per image,
/// the render pass, one framebuffer per image and the synchronization objects:
/// - one image-available semaphore and one in-flight fence per frame slot
/// - one render-finished semaphore per image
/// - the fence of the frame that last used each image

use lve_engine::lve::{Result, Error};
use lve_engine::lve::device::{
    Swapchain as LveSwapchain,
    SwapchainDesc,
    CommandList as LveCommandList,
    RenderPass as LveRenderPass,
    Framebuffer as LveFramebuffer,
    AcquireOutcome, PresentOutcome, Extent2D, TextureFormat,
};
use lve_engine::{engine_bail, engine_debug, engine_err};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::any::Any;
use std::sync::Arc;

use crate::vulkan_command_list::CommandList;
use crate::vulkan_context::{GpuContext, downcast};
use crate::vulkan_format::{
    DEPTH_FORMAT_CANDIDATES, choose_surface_format, choose_present_mode, choose_extent,
    choose_image_count, find_supported_format, frames_in_flight, vk_to_texture_format,
};
use crate::vulkan_render_pass::{RenderPass, Framebuffer};

/// Depth buffer of one swapchain image
struct DepthImage {
    image: vk::Image,
    view: vk::ImageView,
    allocation: Option<Allocation>,
}

/// Vulkan swapchain implementation
pub struct Swapchain {
    ctx: Arc<GpuContext>,

    pub(crate) swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    color_format: vk::Format,
    extent: vk::Extent2D,

    depth_format: vk::Format,
    depth_images: Vec<DepthImage>,

    render_pass: Arc<RenderPass>,
    framebuffers: Vec<Arc<Framebuffer>>,

    /// Per frame slot: signaled when the acquired image is ready
    image_available_semaphores: Vec<vk::Semaphore>,
    /// Per image: signaled when rendering into it is finished
    render_finished_semaphores: Vec<vk::Semaphore>,
    /// Per frame slot: signaled when the slot's last submission completed
    in_flight_fences: Vec<vk::Fence>,
    /// Per image: fence of the submission that last rendered into it
    images_in_flight: Vec<vk::Fence>,

    frames_in_flight: usize,
}

impl Swapchain {
    /// Create a swapchain for the context's surface
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared GPU context
    /// * `desc` - Requested extent, present mode and frames-in-flight bound
    /// * `old` - Swapchain being replaced (driver reuse hint)
    pub(crate) fn new(ctx: Arc<GpuContext>, desc: &SwapchainDesc, old: Option<&Swapchain>) -> Result<Self> {
        let (capabilities, formats, present_modes) = unsafe {
            let loader = &ctx.surface_loader;
            let capabilities = loader
                .get_physical_device_surface_capabilities(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to get surface capabilities: {:?}", e))?;
            let formats = loader
                .get_physical_device_surface_formats(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to get surface formats: {:?}", e))?;
            let present_modes = loader
                .get_physical_device_surface_present_modes(ctx.physical_device, ctx.surface)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to get surface present modes: {:?}", e))?;
            (capabilities, formats, present_modes)
        };

        let surface_format = match choose_surface_format(&formats) {
            Some(format) => format,
            None => engine_bail!("lve::vulkan", "Surface advertises no formats"),
        };
        let present_mode = choose_present_mode(desc.present_mode, &present_modes);
        let extent = choose_extent(&capabilities, desc.extent);
        let image_count = choose_image_count(&capabilities);

        let depth_format = match find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            |format| ctx.format_properties(format),
        ) {
            Some(format) => format,
            None => engine_bail!("lve::vulkan", "Failed to find supported depth format"),
        };

        let render_pass = Arc::new(
            RenderPass::new(Arc::clone(&ctx), surface_format.format, depth_format)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create render pass: {:?}", e))?,
        );

        let queue_family_indices = [ctx.graphics_queue_family, ctx.present_queue_family];
        let mut create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(ctx.surface)
            .min_image_count(image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .pre_transform(capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old.map_or(vk::SwapchainKHR::null(), |o| o.swapchain));

        create_info = if ctx.graphics_queue_family != ctx.present_queue_family {
            create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&queue_family_indices)
        } else {
            create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        };

        let swapchain = unsafe {
            ctx.swapchain_loader
                .create_swapchain(&create_info, None)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create swap chain: {:?}", e))?
        };

        // From here on, Drop releases whatever was created if a later step fails
        let mut this = Self {
            ctx,
            swapchain,
            images: Vec::new(),
            image_views: Vec::new(),
            color_format: surface_format.format,
            extent,
            depth_format,
            depth_images: Vec::new(),
            render_pass,
            framebuffers: Vec::new(),
            image_available_semaphores: Vec::new(),
            render_finished_semaphores: Vec::new(),
            in_flight_fences: Vec::new(),
            images_in_flight: Vec::new(),
            frames_in_flight: 0,
        };

        this.images = unsafe {
            this.ctx.swapchain_loader
                .get_swapchain_images(swapchain)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to get swap chain images: {:?}", e))?
        };
        this.frames_in_flight = frames_in_flight(desc.max_frames_in_flight, this.images.len());

        this.create_image_views()?;
        this.create_depth_resources()?;
        this.create_framebuffers()?;
        this.create_sync_objects()?;

        engine_debug!(
            "lve::vulkan",
            "Swap chain created: {}x{}, {} images, {:?}/{:?}, {:?}, {} frames in flight",
            extent.width, extent.height, this.images.len(),
            surface_format.format, depth_format, present_mode, this.frames_in_flight
        );

        Ok(this)
    }

    fn create_image_views(&mut self) -> Result<()> {
        for &image in &self.images {
            let view = create_image_view(&self.ctx.device, image, self.color_format, vk::ImageAspectFlags::COLOR)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to create texture image view: {:?}", e))?;
            self.image_views.push(view);
        }
        Ok(())
    }

    fn create_depth_resources(&mut self) -> Result<()> {
        for _ in 0..self.images.len() {
            let image_info = vk::ImageCreateInfo::default()
                .image_type(vk::ImageType::TYPE_2D)
                .format(self.depth_format)
                .extent(vk::Extent3D {
                    width: self.extent.width,
                    height: self.extent.height,
                    depth: 1,
                })
                .mip_levels(1)
                .array_layers(1)
                .samples(vk::SampleCountFlags::TYPE_1)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = unsafe {
                self.ctx.device
                    .create_image(&image_info, None)
                    .map_err(|e| engine_err!("lve::vulkan", "Failed to create depth image: {:?}", e))?
            };
            // Tracked immediately so Drop destroys it on any later failure
            self.depth_images.push(DepthImage {
                image,
                view: vk::ImageView::null(),
                allocation: None,
            });

            let requirements = unsafe { self.ctx.device.get_image_memory_requirements(image) };
            let allocation = {
                let mut allocator = self.ctx.allocator
                    .lock()
                    .map_err(|_| engine_err!("lve::vulkan", "GPU allocator lock poisoned"))?;
                allocator
                    .allocate(&AllocationCreateDesc {
                        name: "swapchain depth",
                        requirements,
                        location: MemoryLocation::GpuOnly,
                        linear: false,
                        allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                    })
                    .map_err(|e| {
                        lve_engine::engine_error!(
                            "lve::vulkan",
                            "Failed to allocate depth image memory ({} bytes): {:?}",
                            requirements.size, e
                        );
                        Error::OutOfMemory
                    })?
            };

            let bind_result = unsafe {
                self.ctx.device.bind_image_memory(image, allocation.memory(), allocation.offset())
            };
            let view_result = bind_result.and_then(|_| {
                create_image_view(&self.ctx.device, image, self.depth_format, vk::ImageAspectFlags::DEPTH)
            });

            if let Some(depth) = self.depth_images.last_mut() {
                depth.allocation = Some(allocation);
                match view_result {
                    Ok(view) => depth.view = view,
                    Err(e) => engine_bail!("lve::vulkan", "Failed to set up depth image: {:?}", e),
                }
            }
        }
        Ok(())
    }

    fn create_framebuffers(&mut self) -> Result<()> {
        for (color_view, depth) in self.image_views.iter().zip(&self.depth_images) {
            let framebuffer = Framebuffer::new(
                Arc::clone(&self.ctx),
                self.render_pass.render_pass,
                &[*color_view, depth.view],
                self.extent,
            )
            .map_err(|e| engine_err!("lve::vulkan", "Failed to create framebuffer: {:?}", e))?;
            self.framebuffers.push(Arc::new(framebuffer));
        }
        Ok(())
    }

    fn create_sync_objects(&mut self) -> Result<()> {
        let semaphore_info = vk::SemaphoreCreateInfo::default();
        let fence_info = vk::FenceCreateInfo::default().flags(vk::FenceCreateFlags::SIGNALED);
        let device = &self.ctx.device;

        unsafe {
            for _ in 0..self.frames_in_flight {
                self.image_available_semaphores.push(
                    device.create_semaphore(&semaphore_info, None)
                        .map_err(|e| engine_err!("lve::vulkan", "Failed to create synchronization objects for a frame: {:?}", e))?,
                );
                self.in_flight_fences.push(
                    device.create_fence(&fence_info, None)
                        .map_err(|e| engine_err!("lve::vulkan", "Failed to create synchronization objects for a frame: {:?}", e))?,
                );
            }
            for _ in 0..self.images.len() {
                self.render_finished_semaphores.push(
                    device.create_semaphore(&semaphore_info, None)
                        .map_err(|e| engine_err!("lve::vulkan", "Failed to create synchronization objects for an image: {:?}", e))?,
                );
            }
        }

        self.images_in_flight = vec![vk::Fence::null(); self.images.len()];
        Ok(())
    }

    fn check_frame_index(&self, frame_index: usize) -> Result<()> {
        if frame_index >= self.frames_in_flight {
            return Err(Error::IllegalState(format!(
                "Frame index {} out of range (frames in flight: {})",
                frame_index, self.frames_in_flight
            )));
        }
        Ok(())
    }
}

fn create_image_view(
    device: &ash::Device,
    image: vk::Image,
    format: vk::Format,
    aspect_mask: vk::ImageAspectFlags,
) -> std::result::Result<vk::ImageView, vk::Result> {
    let create_info = vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        });
    unsafe { device.create_image_view(&create_info, None) }
}

impl LveSwapchain for Swapchain {
    fn acquire_next_image(&mut self, frame_index: usize) -> Result<AcquireOutcome> {
        self.check_frame_index(frame_index)?;

        unsafe {
            self.ctx.device
                .wait_for_fences(&[self.in_flight_fences[frame_index]], true, u64::MAX)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to wait for frame fence: {:?}", e))?;

            match self.ctx.swapchain_loader.acquire_next_image(
                self.swapchain,
                u64::MAX,
                self.image_available_semaphores[frame_index],
                vk::Fence::null(),
            ) {
                Ok((image_index, suboptimal)) => Ok(AcquireOutcome::Acquired { image_index, suboptimal }),
                Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquireOutcome::OutOfDate),
                Err(e) => Err(engine_err!("lve::vulkan", "Failed to acquire swap chain image: {:?}", e)),
            }
        }
    }

    fn submit_and_present(
        &mut self,
        cmd: &dyn LveCommandList,
        image_index: u32,
        frame_index: usize,
    ) -> Result<PresentOutcome> {
        self.check_frame_index(frame_index)?;
        let image = image_index as usize;
        if image >= self.images.len() {
            engine_bail!(
                "lve::vulkan",
                "Image index {} out of range (count: {})",
                image_index, self.images.len()
            );
        }
        if cmd.is_recording() {
            return Err(Error::IllegalState("Command list submitted while still recording".to_string()));
        }
        let vk_cmd = downcast::<CommandList>(cmd.as_any(), "Command list")?;
        let device = &self.ctx.device;

        unsafe {
            // An earlier frame slot may still be rendering into this image
            let previous = self.images_in_flight[image];
            if previous != vk::Fence::null() {
                device
                    .wait_for_fences(&[previous], true, u64::MAX)
                    .map_err(|e| engine_err!("lve::vulkan", "Failed to wait for image fence: {:?}", e))?;
            }
            let fence = self.in_flight_fences[frame_index];
            self.images_in_flight[image] = fence;

            let wait_semaphores = [self.image_available_semaphores[frame_index]];
            let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
            let command_buffers = [vk_cmd.command_buffer()];
            let signal_semaphores = [self.render_finished_semaphores[image]];

            let submit_info = vk::SubmitInfo::default()
                .wait_semaphores(&wait_semaphores)
                .wait_dst_stage_mask(&wait_stages)
                .command_buffers(&command_buffers)
                .signal_semaphores(&signal_semaphores);

            // Reset only right before the submit that signals it again
            device
                .reset_fences(&[fence])
                .map_err(|e| engine_err!("lve::vulkan", "Failed to reset frame fence: {:?}", e))?;

            device
                .queue_submit(self.ctx.graphics_queue, &[submit_info], fence)
                .map_err(|e| engine_err!("lve::vulkan", "Failed to submit draw command buffer: {:?}", e))?;

            let swapchains = [self.swapchain];
            let image_indices = [image_index];
            let present_info = vk::PresentInfoKHR::default()
                .wait_semaphores(&signal_semaphores)
                .swapchains(&swapchains)
                .image_indices(&image_indices);

            match self.ctx.swapchain_loader.queue_present(self.ctx.present_queue, &present_info) {
                Ok(false) => Ok(PresentOutcome::Presented),
                Ok(true) => Ok(PresentOutcome::Suboptimal),
                Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentOutcome::OutOfDate),
                Err(e) => Err(engine_err!("lve::vulkan", "Failed to present swap chain image: {:?}", e)),
            }
        }
    }

    fn render_pass(&self) -> Arc<dyn LveRenderPass> {
        self.render_pass.clone()
    }

    fn framebuffer(&self, image_index: u32) -> Result<Arc<dyn LveFramebuffer>> {
        match self.framebuffers.get(image_index as usize) {
            Some(framebuffer) => Ok(framebuffer.clone()),
            None => Err(Error::InvalidResource(format!(
                "No framebuffer for image {} (count: {})",
                image_index, self.framebuffers.len()
            ))),
        }
    }

    fn image_count(&self) -> usize {
        self.images.len()
    }

    fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    fn extent(&self) -> Extent2D {
        Extent2D::new(self.extent.width, self.extent.height)
    }

    fn color_format(&self) -> TextureFormat {
        vk_to_texture_format(self.color_format)
    }

    fn depth_format(&self) -> TextureFormat {
        vk_to_texture_format(self.depth_format)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        let device = &self.ctx.device;
        unsafe {
            device.device_wait_idle().ok();

            // Framebuffers reference the views
            self.framebuffers.clear();

            for view in self.image_views.drain(..) {
                device.destroy_image_view(view, None);
            }

            for depth in self.depth_images.drain(..) {
                if depth.view != vk::ImageView::null() {
                    device.destroy_image_view(depth.view, None);
                }
                device.destroy_image(depth.image, None);
                if let Some(allocation) = depth.allocation {
                    if let Ok(mut allocator) = self.ctx.allocator.lock() {
                        allocator.free(allocation).ok();
                    }
                }
            }

            for semaphore in self.image_available_semaphores.drain(..) {
                device.destroy_semaphore(semaphore, None);
            }
            for semaphore in self.render_finished_semaphores.drain(..) {
                device.destroy_semaphore(semaphore, None);
            }
            for fence in self.in_flight_fences.drain(..) {
                device.destroy_fence(fence, None);
            }

            self.ctx.swapchain_loader.destroy_swapchain(self.swapchain, None);
        }
    }
}
