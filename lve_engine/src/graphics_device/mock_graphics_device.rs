/// Mock graphics device for unit tests (no GPU required)
///
/// Every mock object shares one `MockState` so a test can script acquire and
/// present outcomes, change what the next swapchain looks like, and inspect
/// what the renderer asked the device to do.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Swapchain, SwapchainDesc, CommandList, Buffer, BufferDesc,
    Shader, ShaderDesc, ShaderStage, Pipeline, PipelineDesc, PushConstantRange,
    RenderPass, Framebuffer, TextureFormat, Extent2D, AcquireOutcome, PresentOutcome,
    ClearValue, Viewport, Rect2D, IndexType,
};
use crate::renderer::Surface;

// ============================================================================
// Shared state
// ============================================================================

/// What the mock device has done, and what it will do next
pub struct MockState {
    /// Device-level events in call order ("wait_idle", "create_swapchain", "present 1 0", ...)
    pub events: Vec<String>,
    /// Outcomes returned by the next `acquire_next_image` calls (default: next image)
    pub acquire_script: VecDeque<Result<AcquireOutcome>>,
    /// Outcomes returned by the next `submit_and_present` calls (default: Presented)
    pub present_script: VecDeque<Result<PresentOutcome>>,
    /// Image count of the next swapchain
    pub next_image_count: usize,
    /// Formats of the next swapchain
    pub next_color_format: TextureFormat,
    pub next_depth_format: TextureFormat,
    /// Error returned by the next `create_swapchain`
    pub fail_next_swapchain: Option<Error>,
    /// Whether each `create_swapchain` call received a previous swapchain
    pub previous_hints: Vec<bool>,
    pub swapchains_created: usize,
    pub swapchains_alive: usize,
    pub command_lists_created: usize,
    pub wait_idle_calls: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            acquire_script: VecDeque::new(),
            present_script: VecDeque::new(),
            next_image_count: 3,
            next_color_format: TextureFormat::B8G8R8A8_SRGB,
            next_depth_format: TextureFormat::D32_FLOAT,
            fail_next_swapchain: None,
            previous_hints: Vec::new(),
            swapchains_created: 0,
            swapchains_alive: 0,
            command_lists_created: 0,
            wait_idle_calls: 0,
        }
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    state: Arc<Mutex<MockState>>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn script_acquire(&self, outcome: Result<AcquireOutcome>) {
        self.state().acquire_script.push_back(outcome);
    }

    pub fn script_present(&self, outcome: Result<PresentOutcome>) {
        self.state().present_script.push_back(outcome);
    }

    /// Events recorded since the last call (drains the log)
    pub fn take_events(&self) -> Vec<String> {
        std::mem::take(&mut self.state().events)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_swapchain(
        &self,
        desc: &SwapchainDesc,
        previous: Option<&dyn Swapchain>,
    ) -> Result<Box<dyn Swapchain>> {
        let mut state = self.state();
        state.previous_hints.push(previous.is_some());
        if let Some(error) = state.fail_next_swapchain.take() {
            state.events.push("create_swapchain failed".to_string());
            return Err(error);
        }
        if let Some(previous) = previous {
            // Mirror the driver contract: the hint must be one of ours
            if previous.as_any().downcast_ref::<MockSwapchain>().is_none() {
                return Err(Error::BackendError("foreign previous swapchain".to_string()));
            }
        }

        state.swapchains_created += 1;
        state.swapchains_alive += 1;
        state.events.push(format!(
            "create_swapchain {}x{}",
            desc.extent.width, desc.extent.height
        ));

        let image_count = state.next_image_count;
        let color_format = state.next_color_format;
        let depth_format = state.next_depth_format;
        let render_pass: Arc<dyn RenderPass> = Arc::new(MockRenderPass { color_format, depth_format });
        let framebuffers = (0..image_count)
            .map(|_| {
                Arc::new(MockFramebuffer {
                    width: desc.extent.width,
                    height: desc.extent.height,
                }) as Arc<dyn Framebuffer>
            })
            .collect();

        Ok(Box::new(MockSwapchain {
            id: state.swapchains_created,
            state: self.state.clone(),
            extent: desc.extent,
            image_count,
            frames_in_flight: desc.max_frames_in_flight.min(image_count),
            color_format,
            depth_format,
            next_image: 0,
            render_pass,
            framebuffers,
        }))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        let mut state = self.state();
        state.command_lists_created += 1;
        Ok(Box::new(MockCommandList::new(state.command_lists_created)))
    }

    fn create_buffer(&self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        if desc.size == 0 {
            return Err(Error::InvalidResource("Buffer size must be > 0".to_string()));
        }
        Ok(Arc::new(MockBuffer::new(desc.size)))
    }

    fn create_shader(&self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        Ok(Arc::new(MockShader { stage: desc.stage }))
    }

    fn create_pipeline(&self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        Ok(Arc::new(MockPipeline {
            push_constant_ranges: desc.push_constant_ranges,
            depth_test: desc.depth_stencil.depth_test_enable,
        }))
    }

    fn wait_idle(&self) -> Result<()> {
        let mut state = self.state();
        state.wait_idle_calls += 1;
        state.events.push("wait_idle".to_string());
        Ok(())
    }

    fn device_name(&self) -> String {
        "Mock GPU".to_string()
    }
}

// ============================================================================
// Mock Swapchain
// ============================================================================

pub struct MockSwapchain {
    pub id: usize,
    state: Arc<Mutex<MockState>>,
    extent: Extent2D,
    image_count: usize,
    frames_in_flight: usize,
    color_format: TextureFormat,
    depth_format: TextureFormat,
    next_image: u32,
    render_pass: Arc<dyn RenderPass>,
    framebuffers: Vec<Arc<dyn Framebuffer>>,
}

impl Swapchain for MockSwapchain {
    fn acquire_next_image(&mut self, frame_index: usize) -> Result<AcquireOutcome> {
        if frame_index >= self.frames_in_flight {
            return Err(Error::BackendError(format!(
                "frame index {} out of range ({} frames in flight)",
                frame_index, self.frames_in_flight
            )));
        }
        let mut state = self.state.lock().unwrap();
        state.events.push(format!("acquire {}", frame_index));
        match state.acquire_script.pop_front() {
            Some(outcome) => outcome,
            None => {
                let image_index = self.next_image;
                self.next_image = (self.next_image + 1) % self.image_count as u32;
                Ok(AcquireOutcome::Acquired { image_index, suboptimal: false })
            }
        }
    }

    fn submit_and_present(
        &mut self,
        cmd: &dyn CommandList,
        image_index: u32,
        frame_index: usize,
    ) -> Result<PresentOutcome> {
        let mock_cmd = cmd
            .as_any()
            .downcast_ref::<MockCommandList>()
            .ok_or_else(|| Error::BackendError("not a mock command list".to_string()))?;
        if mock_cmd.recording {
            return Err(Error::BackendError("command list still recording".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.events.push(format!("present {} {}", image_index, frame_index));
        state.present_script.pop_front().unwrap_or(Ok(PresentOutcome::Presented))
    }

    fn render_pass(&self) -> Arc<dyn RenderPass> {
        self.render_pass.clone()
    }

    fn framebuffer(&self, image_index: u32) -> Result<Arc<dyn Framebuffer>> {
        self.framebuffers
            .get(image_index as usize)
            .cloned()
            .ok_or_else(|| Error::InvalidResource(format!("no framebuffer {}", image_index)))
    }

    fn image_count(&self) -> usize {
        self.image_count
    }

    fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    fn extent(&self) -> Extent2D {
        self.extent
    }

    fn color_format(&self) -> TextureFormat {
        self.color_format
    }

    fn depth_format(&self) -> TextureFormat {
        self.depth_format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockSwapchain {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.swapchains_alive -= 1;
            state.events.push(format!("drop_swapchain {}", self.id));
        }
    }
}

// ============================================================================
// Mock RenderPass / Framebuffer
// ============================================================================

pub struct MockRenderPass {
    pub color_format: TextureFormat,
    pub depth_format: TextureFormat,
}

impl RenderPass for MockRenderPass {
    fn color_format(&self) -> TextureFormat {
        self.color_format
    }

    fn depth_format(&self) -> TextureFormat {
        self.depth_format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug)]
pub struct MockCommandList {
    pub id: usize,
    pub commands: Vec<String>,
    pub recording: bool,
    pub clear_values: Vec<ClearValue>,
    pub viewport: Option<Viewport>,
    pub scissor: Option<Rect2D>,
    /// Raw bytes of every push_constants call
    pub pushed: Vec<Vec<u8>>,
}

impl MockCommandList {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            commands: Vec::new(),
            recording: false,
            clear_values: Vec::new(),
            viewport: None,
            scissor: None,
            pushed: Vec::new(),
        }
    }

    fn require_recording(&self, command: &str) -> Result<()> {
        if self.recording {
            Ok(())
        } else {
            Err(Error::BackendError(format!("{}: command list not recording", command)))
        }
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        if self.recording {
            return Err(Error::BackendError("Command list already recording".to_string()));
        }
        self.commands.clear();
        self.pushed.clear();
        self.recording = true;
        self.commands.push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.require_recording("end")?;
        self.recording = false;
        self.commands.push("end".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        _render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.require_recording("begin_render_pass")?;
        self.clear_values = clear_values.to_vec();
        self.commands.push(format!(
            "begin_render_pass {}x{}",
            framebuffer.width(),
            framebuffer.height()
        ));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.require_recording("end_render_pass")?;
        self.commands.push("end_render_pass".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.require_recording("set_viewport")?;
        self.viewport = Some(viewport);
        self.commands.push("set_viewport".to_string());
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.require_recording("set_scissor")?;
        self.scissor = Some(scissor);
        self.commands.push("set_scissor".to_string());
        Ok(())
    }

    fn bind_pipeline(&mut self, _pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.require_recording("bind_pipeline")?;
        self.commands.push("bind_pipeline".to_string());
        Ok(())
    }

    fn push_constants(&mut self, _stages: &[ShaderStage], offset: u32, data: &[u8]) -> Result<()> {
        self.require_recording("push_constants")?;
        self.pushed.push(data.to_vec());
        self.commands.push(format!("push_constants {} {}", offset, data.len()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.require_recording("bind_vertex_buffer")?;
        self.commands.push("bind_vertex_buffer".to_string());
        Ok(())
    }

    fn bind_index_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64, index_type: IndexType) -> Result<()> {
        self.require_recording("bind_index_buffer")?;
        self.commands.push(format!("bind_index_buffer {:?}", index_type));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.require_recording("draw")?;
        self.commands.push(format!("draw {} {}", vertex_count, first_vertex));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.require_recording("draw_indexed")?;
        self.commands.push(format!("draw_indexed {} {} {}", index_count, first_index, vertex_offset));
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Buffer / Shader / Pipeline
// ============================================================================

pub struct MockBuffer {
    pub data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn new(size: u64) -> Self {
        Self {
            data: Mutex::new(vec![0; size as usize]),
        }
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock().unwrap();
        let end = offset as usize + data.len();
        if end > contents.len() {
            return Err(Error::InvalidResource(format!(
                "Buffer update out of bounds: {} > {}",
                end,
                contents.len()
            )));
        }
        contents[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockShader {
    pub stage: ShaderStage,
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockPipeline {
    pub push_constant_ranges: Vec<PushConstantRange>,
    pub depth_test: bool,
}

impl Pipeline for MockPipeline {
    fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Surface
// ============================================================================

/// Scripted window
pub struct MockSurface {
    pub extent: Extent2D,
    pub resized: bool,
    pub closed: bool,
    /// Extents applied one per `wait_events` call
    pub pending_extents: VecDeque<Extent2D>,
    /// Close the window on this `wait_events` call (1-based)
    pub close_on_wait: Option<usize>,
    pub wait_calls: usize,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: Extent2D::new(width, height),
            resized: false,
            closed: false,
            pending_extents: VecDeque::new(),
            close_on_wait: None,
            wait_calls: 0,
        }
    }

    /// Simulate a user resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.extent = Extent2D::new(width, height);
        self.resized = true;
    }
}

impl Surface for MockSurface {
    fn extent(&self) -> Extent2D {
        self.extent
    }

    fn was_resized(&self) -> bool {
        self.resized
    }

    fn reset_resized_flag(&mut self) {
        self.resized = false;
    }

    fn wait_events(&mut self) {
        self.wait_calls += 1;
        if self.close_on_wait == Some(self.wait_calls) {
            self.closed = true;
        }
        if let Some(extent) = self.pending_extents.pop_front() {
            self.extent = extent;
            self.resized = true;
        }
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
