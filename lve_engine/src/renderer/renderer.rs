/// Renderer - frame and swapchain lifecycle state machine
///
/// Owns the swapchain and one command list per frame in flight, and drives
/// every frame through `begin_frame` → `begin_swap_chain_render_pass` →
/// `end_swap_chain_render_pass` → `end_frame`. Out-of-order calls are
/// rejected with `Error::IllegalState`. A stale surface (resize, out of date,
/// minimized window) is absorbed here and never reaches the caller as an error.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Swapchain, SwapchainDesc, CommandList, RenderPass,
    AcquireOutcome, PresentOutcome, ClearValue, Viewport, Rect2D, Extent2D,
};
use crate::renderer::{
    Config, Surface, FrameState, FrameContext, CommandListHandle, RendererStats,
};
use crate::{engine_debug, engine_error, engine_info, engine_trace, engine_warn};

/// Depth the swapchain depth buffer is cleared to
pub const CLEAR_DEPTH: f32 = 1.0;

fn missing_swapchain() -> Error {
    Error::IllegalState("No swap chain (initial creation did not complete)".to_string())
}

/// Frame and swapchain lifecycle driver
pub struct Renderer {
    config: Config,
    /// Command lists, one per frame-in-flight slot
    command_lists: Vec<Box<dyn CommandList>>,
    /// Incremented each time `command_lists` is reallocated
    pool_generation: u64,
    swapchain: Option<Box<dyn Swapchain>>,
    /// Set when the surface no longer matches the swapchain
    swapchain_stale: bool,
    frame_index: usize,
    image_index: u32,
    state: FrameState,
    stats: RendererStats,
    device: Arc<dyn GraphicsDevice>,
}

impl Renderer {
    /// Create a renderer and its first swapchain
    ///
    /// # Errors
    ///
    /// * `Error::InvalidConfig` - `config` rejected by `Config::validate()`
    /// * `Error::InitializationFailed` - the window was closed before it ever had a usable size
    /// * any error from swapchain or command list creation
    pub fn new(device: Arc<dyn GraphicsDevice>, surface: &mut dyn Surface, config: Config) -> Result<Self> {
        config.validate()?;

        let mut renderer = Self {
            config,
            command_lists: Vec::new(),
            pool_generation: 0,
            swapchain: None,
            swapchain_stale: true,
            frame_index: 0,
            image_index: 0,
            state: FrameState::Idle,
            stats: RendererStats::default(),
            device,
        };

        if !renderer.recreate_swap_chain(surface)? {
            return Err(Error::InitializationFailed(
                "Window closed before a swap chain could be created".to_string(),
            ));
        }

        engine_info!(
            "lve::Renderer",
            "Renderer ready on {} ({} frames in flight)",
            renderer.device.device_name(),
            renderer.frames_in_flight()
        );
        Ok(renderer)
    }

    // ===== FRAME LIFECYCLE =====

    /// Acquire the next swapchain image and start recording
    ///
    /// Returns `Ok(None)` when no frame can be rendered this tick: the
    /// swapchain was out of date (it has been recreated) or the window was
    /// closed while minimized. The caller simply skips drawing.
    pub fn begin_frame(&mut self, surface: &mut dyn Surface) -> Result<Option<CommandListHandle>> {
        if self.state != FrameState::Idle {
            return Err(Error::IllegalState(
                "Can't call begin_frame while already in progress".to_string(),
            ));
        }

        if self.swapchain_stale && !self.recreate_swap_chain(surface)? {
            self.stats.frames_skipped += 1;
            return Ok(None);
        }

        let outcome = self
            .swapchain
            .as_mut()
            .ok_or_else(missing_swapchain)?
            .acquire_next_image(self.frame_index)?;

        match outcome {
            AcquireOutcome::OutOfDate => {
                engine_debug!("lve::Renderer", "Swap chain out of date on acquire, recreating");
                self.swapchain_stale = true;
                self.recreate_swap_chain(surface)?;
                self.stats.frames_skipped += 1;
                return Ok(None);
            }
            AcquireOutcome::Acquired { image_index, suboptimal } => {
                if suboptimal {
                    engine_trace!("lve::Renderer", "Acquired suboptimal image {}", image_index);
                }
                self.image_index = image_index;
            }
        }

        let handle = self.current_handle();
        self.command_lists[handle.slot].begin()?;
        self.state = FrameState::FrameAcquired;
        self.stats.frames_started += 1;
        Ok(Some(handle))
    }

    /// Begin the swapchain render pass on the acquired image
    ///
    /// Clears color to `Config::clear_color` and depth to 1.0, then sets the
    /// viewport (depth 0..1) and the scissor to the full swapchain extent.
    pub fn begin_swap_chain_render_pass(&mut self, handle: CommandListHandle) -> Result<()> {
        match self.state {
            FrameState::FrameAcquired => {}
            FrameState::Idle => {
                return Err(Error::IllegalState(
                    "Can't call begin_swap_chain_render_pass if frame is not in progress".to_string(),
                ))
            }
            FrameState::RenderPassActive => {
                return Err(Error::IllegalState(
                    "Swap chain render pass already active".to_string(),
                ))
            }
        }
        self.check_handle(handle, "begin_swap_chain_render_pass")?;

        let (render_pass, framebuffer, extent) = {
            let swapchain = self.swapchain.as_deref().ok_or_else(missing_swapchain)?;
            (
                swapchain.render_pass(),
                swapchain.framebuffer(self.image_index)?,
                swapchain.extent(),
            )
        };

        let clear_values = [
            ClearValue::Color(self.config.clear_color),
            ClearValue::DepthStencil { depth: CLEAR_DEPTH, stencil: 0 },
        ];

        let cmd = &mut self.command_lists[handle.slot];
        cmd.begin_render_pass(&render_pass, &framebuffer, &clear_values)?;
        cmd.set_viewport(Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        })?;
        cmd.set_scissor(Rect2D {
            x: 0,
            y: 0,
            width: extent.width,
            height: extent.height,
        })?;

        self.state = FrameState::RenderPassActive;
        Ok(())
    }

    /// End the swapchain render pass
    pub fn end_swap_chain_render_pass(&mut self, handle: CommandListHandle) -> Result<()> {
        if self.state != FrameState::RenderPassActive {
            return Err(Error::IllegalState(
                "Can't call end_swap_chain_render_pass without an active render pass".to_string(),
            ));
        }
        self.check_handle(handle, "end_swap_chain_render_pass")?;

        self.command_lists[handle.slot].end_render_pass()?;
        self.state = FrameState::FrameAcquired;
        Ok(())
    }

    /// Finish recording, submit and present
    ///
    /// An out-of-date or suboptimal present, or a pending window resize,
    /// recreates the swapchain. The frame index then advances to
    /// `(i + 1) % frames_in_flight`, or restarts at 0 when the command list
    /// pool was reallocated.
    pub fn end_frame(&mut self, surface: &mut dyn Surface) -> Result<()> {
        match self.state {
            FrameState::FrameAcquired => {}
            FrameState::Idle => {
                return Err(Error::IllegalState(
                    "Can't call end_frame while frame is not in progress".to_string(),
                ))
            }
            FrameState::RenderPassActive => {
                return Err(Error::IllegalState(
                    "Can't call end_frame while the swap chain render pass is active".to_string(),
                ))
            }
        }

        let frame_index = self.frame_index;
        let recorded = self.command_lists[frame_index].end();
        if let Err(e) = recorded {
            self.state = FrameState::Idle;
            engine_error!("lve::Renderer", "Failed to record command buffer: {}", e);
            return Err(e);
        }

        let submitted = {
            let cmd = self.command_lists[frame_index].as_ref();
            let swapchain = self.swapchain.as_mut().ok_or_else(missing_swapchain)?;
            swapchain.submit_and_present(cmd, self.image_index, frame_index)
        };
        self.state = FrameState::Idle;

        let outcome = submitted.map_err(|e| {
            engine_error!("lve::Renderer", "Failed to present swap chain image: {}", e);
            e
        })?;

        if outcome != PresentOutcome::OutOfDate {
            self.stats.frames_presented += 1;
        }

        let generation = self.pool_generation;
        if outcome != PresentOutcome::Presented || surface.was_resized() {
            engine_debug!("lve::Renderer", "Recreating swap chain after present ({:?})", outcome);
            surface.reset_resized_flag();
            self.swapchain_stale = true;
            self.recreate_swap_chain(surface)?;
        }

        if self.pool_generation == generation {
            self.frame_index = (self.frame_index + 1) % self.command_lists.len();
        }
        Ok(())
    }

    // ===== SWAPCHAIN =====

    /// Rebuild the swapchain for the current surface extent
    ///
    /// Blocks on `Surface::wait_events()` while the extent is degenerate.
    /// Returns `Ok(false)` if the surface asked to close during that wait:
    /// the swapchain stays stale and the next `begin_frame` retries.
    ///
    /// # Errors
    ///
    /// * `Error::IllegalState` - called while a frame is in progress
    /// * `Error::SwapchainFormatMismatch` - image or depth format changed
    /// * any backend error from device idle or swapchain creation; the
    ///   previous swapchain is kept in that case
    pub fn recreate_swap_chain(&mut self, surface: &mut dyn Surface) -> Result<bool> {
        if self.state != FrameState::Idle {
            return Err(Error::IllegalState(
                "Can't recreate the swap chain while a frame is in progress".to_string(),
            ));
        }

        let mut extent = surface.extent();
        while extent.is_degenerate() {
            if surface.should_close() {
                engine_debug!("lve::Renderer", "Surface closed while minimized, swap chain left stale");
                self.swapchain_stale = true;
                return Ok(false);
            }
            surface.wait_events();
            extent = surface.extent();
        }

        self.device.wait_idle()?;

        let desc = SwapchainDesc {
            extent,
            present_mode: self.config.present_mode,
            max_frames_in_flight: self.config.max_frames_in_flight,
        };
        let new_swapchain = self.device.create_swapchain(&desc, self.swapchain.as_deref())?;

        if let Some(old) = self.swapchain.as_deref() {
            if !old.compare_formats(new_swapchain.as_ref()) {
                engine_error!(
                    "lve::Renderer",
                    "Swap chain image (or depth) format has changed: {:?}/{:?} -> {:?}/{:?}",
                    old.color_format(),
                    old.depth_format(),
                    new_swapchain.color_format(),
                    new_swapchain.depth_format()
                );
                return Err(Error::SwapchainFormatMismatch {
                    old_color: old.color_format(),
                    new_color: new_swapchain.color_format(),
                    old_depth: old.depth_format(),
                    new_depth: new_swapchain.depth_format(),
                });
            }
        }

        let frames_in_flight = new_swapchain.frames_in_flight();
        if frames_in_flight == 0 {
            return Err(Error::BackendError(
                "Swap chain reported zero frames in flight".to_string(),
            ));
        }

        let new_extent = new_swapchain.extent();
        let image_count = new_swapchain.image_count();
        // The previous swapchain is released only after its replacement exists
        self.swapchain = Some(new_swapchain);

        if frames_in_flight != self.command_lists.len() {
            self.allocate_command_lists(frames_in_flight)?;
        }

        self.swapchain_stale = false;
        self.stats.swapchain_recreations += 1;
        engine_info!(
            "lve::Renderer",
            "Swap chain ready: {}x{}, {} images, {} frames in flight",
            new_extent.width,
            new_extent.height,
            image_count,
            frames_in_flight
        );
        Ok(true)
    }

    fn allocate_command_lists(&mut self, count: usize) -> Result<()> {
        if !self.command_lists.is_empty() {
            engine_warn!(
                "lve::Renderer",
                "Frames in flight changed ({} -> {}), reallocating command lists",
                self.command_lists.len(),
                count
            );
        }
        self.command_lists.clear();

        let command_lists = (0..count)
            .map(|_| self.device.create_command_list())
            .collect::<Result<Vec<_>>>()?;

        self.command_lists = command_lists;
        self.pool_generation += 1;
        self.frame_index = 0;
        self.stats.command_pool_allocations += 1;
        Ok(())
    }

    // ===== HANDLES =====

    fn current_handle(&self) -> CommandListHandle {
        CommandListHandle {
            slot: self.frame_index,
            generation: self.pool_generation,
        }
    }

    fn check_handle(&self, handle: CommandListHandle, operation: &str) -> Result<()> {
        if handle.generation != self.pool_generation {
            return Err(Error::IllegalState(format!(
                "{}: stale command list handle (generation {}, current {})",
                operation, handle.generation, self.pool_generation
            )));
        }
        if handle.slot != self.frame_index {
            return Err(Error::IllegalState(format!(
                "{}: can't use a command list from a different frame (slot {}, current {})",
                operation, handle.slot, self.frame_index
            )));
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    /// Command list of the open frame
    pub fn command_list(&mut self, handle: CommandListHandle) -> Result<&mut dyn CommandList> {
        if self.state == FrameState::Idle {
            return Err(Error::IllegalState(
                "Cannot get command list when frame not in progress".to_string(),
            ));
        }
        self.check_handle(handle, "command_list")?;
        Ok(self.command_lists[handle.slot].as_mut())
    }

    /// Command list of the open frame, without a handle
    pub fn current_command_list(&mut self) -> Result<&mut dyn CommandList> {
        let handle = self.current_handle();
        self.command_list(handle)
    }

    /// Index of the current frame-in-flight slot
    pub fn frame_index(&self) -> Result<usize> {
        if self.state == FrameState::Idle {
            return Err(Error::IllegalState(
                "Cannot get frame index when frame not in progress".to_string(),
            ));
        }
        Ok(self.frame_index)
    }

    /// Snapshot of the open frame, if any
    pub fn frame_context(&self) -> Option<FrameContext> {
        if self.state == FrameState::Idle {
            return None;
        }
        Some(FrameContext {
            command_list: self.current_handle(),
            frame_index: self.frame_index,
            image_index: self.image_index,
            state: self.state,
        })
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_frame_in_progress(&self) -> bool {
        self.state != FrameState::Idle
    }

    /// True until a recreation succeeds after the surface was found invalid
    pub fn is_swapchain_stale(&self) -> bool {
        self.swapchain_stale
    }

    /// Render pass compatible with every swapchain framebuffer (for pipeline creation)
    pub fn swap_chain_render_pass(&self) -> Result<Arc<dyn RenderPass>> {
        Ok(self.swapchain.as_deref().ok_or_else(missing_swapchain)?.render_pass())
    }

    /// Swapchain width / height
    pub fn aspect_ratio(&self) -> f32 {
        self.swapchain.as_deref().map_or(0.0, |s| s.aspect_ratio())
    }

    pub fn extent(&self) -> Extent2D {
        self.swapchain.as_deref().map_or(Extent2D::default(), |s| s.extent())
    }

    /// Size of the frames-in-flight ring
    pub fn frames_in_flight(&self) -> usize {
        self.command_lists.len()
    }

    pub fn image_count(&self) -> usize {
        self.swapchain.as_deref().map_or(0, |s| s.image_count())
    }

    pub fn stats(&self) -> RendererStats {
        self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(e) = self.device.wait_idle() {
            engine_error!("lve::Renderer", "wait_idle failed during shutdown: {}", e);
        }
        // Command lists before the swapchain, device last
        self.command_lists.clear();
        self.swapchain = None;
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
