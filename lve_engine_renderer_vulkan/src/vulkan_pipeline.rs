/// Pipeline - Vulkan implementation of the Pipeline trait

use lve_engine::lve::device::{Pipeline as LvePipeline, PushConstantRange};
use ash::vk;
use std::any::Any;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan graphics pipeline and its layout
pub struct Pipeline {
    ctx: Arc<GpuContext>,
    pub(crate) pipeline: vk::Pipeline,
    /// Needed by `vkCmdPushConstants`
    pub(crate) pipeline_layout: vk::PipelineLayout,
    push_constant_ranges: Vec<PushConstantRange>,
}

impl Pipeline {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        push_constant_ranges: Vec<PushConstantRange>,
    ) -> Self {
        Self { ctx, pipeline, pipeline_layout, push_constant_ranges }
    }
}

impl LvePipeline for Pipeline {
    fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_pipeline(self.pipeline, None);
            self.ctx.device.destroy_pipeline_layout(self.pipeline_layout, None);
        }
    }
}
