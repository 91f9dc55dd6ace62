/// Shader - Vulkan implementation of the Shader trait

use lve_engine::lve::device::{Shader as LveShader, ShaderStage};
use ash::vk;
use std::any::Any;
use std::ffi::CString;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan shader module
pub struct Shader {
    ctx: Arc<GpuContext>,
    pub(crate) module: vk::ShaderModule,
    pub(crate) stage: ShaderStage,
    /// Entry point, already NUL-terminated for pipeline creation
    pub(crate) entry_point: CString,
}

impl Shader {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        module: vk::ShaderModule,
        stage: ShaderStage,
        entry_point: CString,
    ) -> Self {
        Self { ctx, module, stage, entry_point }
    }
}

impl LveShader for Shader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_shader_module(self.module, None);
        }
    }
}
