/// Frame lifecycle types

/// Where the renderer is inside the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame open; `begin_frame` is the only legal lifecycle call
    Idle,
    /// Image acquired and command list recording, outside any render pass
    FrameAcquired,
    /// Inside the swapchain render pass
    RenderPassActive,
}

/// Opaque token for the command list returned by `begin_frame`
///
/// Identifies the frame-in-flight slot and the pool generation. A handle
/// from an earlier pool generation (before a reallocation) or from another
/// slot is rejected by every renderer call that takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandListHandle {
    pub(crate) slot: usize,
    pub(crate) generation: u64,
}

impl CommandListHandle {
    /// Frame-in-flight slot this command list belongs to
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// Snapshot of the frame currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub command_list: CommandListHandle,
    pub frame_index: usize,
    pub image_index: u32,
    pub state: FrameState,
}

/// Renderer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// `begin_frame` calls that produced a command list
    pub frames_started: u64,
    /// Frames submitted to the presentation engine
    pub frames_presented: u64,
    /// `begin_frame` calls that returned no frame (stale surface)
    pub frames_skipped: u64,
    /// Successful swapchain (re)creations, the initial one included
    pub swapchain_recreations: u64,
    /// Command list pool (re)allocations, the initial one included
    pub command_pool_allocations: u64,
}
