/// SimpleRenderSystem: one pipeline, one push constant block per object

use std::marker::PhantomData;
use std::sync::Arc;
use crate::error::Result;
use crate::engine_debug;
use crate::geometry::Vertex;
use crate::graphics_device::{
    CommandList, GraphicsDevice, Pipeline, PipelineDesc, PrimitiveTopology, PushConstantRange,
    RasterizationState, DepthStencilState, ColorBlendState, RenderPass, ShaderDesc, ShaderStage,
};
use crate::scene::{GameObject, ObjectTransform};

const PUSH_CONSTANT_STAGES: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

/// Draws game objects whose transform is `T`
///
/// The pipeline is built against the swapchain render pass. Its vertex input
/// comes from `T::Vertex` and its push constant range covers
/// `T::PushConstants` for both stages.
pub struct SimpleRenderSystem<T: ObjectTransform> {
    pipeline: Arc<dyn Pipeline>,
    _transform: PhantomData<fn() -> T>,
}

impl<T: ObjectTransform> SimpleRenderSystem<T> {
    /// Build the shader pair and the pipeline
    ///
    /// # Arguments
    ///
    /// * `render_pass` - Swapchain render pass (see `Renderer::swap_chain_render_pass`)
    /// * `vertex_spirv` / `fragment_spirv` - Decoded SPIR-V words (see `load_spirv`)
    pub fn new(
        device: &dyn GraphicsDevice,
        render_pass: Arc<dyn RenderPass>,
        vertex_spirv: &[u32],
        fragment_spirv: &[u32],
    ) -> Result<Self> {
        let vertex_shader = device.create_shader(ShaderDesc {
            code: vertex_spirv,
            stage: ShaderStage::Vertex,
            entry_point: "main".to_string(),
        })?;
        let fragment_shader = device.create_shader(ShaderDesc {
            code: fragment_spirv,
            stage: ShaderStage::Fragment,
            entry_point: "main".to_string(),
        })?;

        let depth_stencil = if T::DEPTH_TEST {
            DepthStencilState::default()
        } else {
            DepthStencilState::disabled()
        };

        let push_constant_size = std::mem::size_of::<T::PushConstants>() as u32;
        let pipeline = device.create_pipeline(PipelineDesc {
            vertex_shader,
            fragment_shader,
            render_pass,
            vertex_layout: T::Vertex::layout(),
            topology: PrimitiveTopology::TriangleList,
            push_constant_ranges: vec![PushConstantRange {
                stages: PUSH_CONSTANT_STAGES.to_vec(),
                offset: 0,
                size: push_constant_size,
            }],
            rasterization: RasterizationState::default(),
            depth_stencil,
            color_blend: ColorBlendState::default(),
        })?;

        engine_debug!(
            "lve::SimpleRenderSystem",
            "Pipeline created ({} push constant bytes, depth test {})",
            push_constant_size,
            T::DEPTH_TEST
        );

        Ok(Self {
            pipeline,
            _transform: PhantomData,
        })
    }

    pub fn pipeline(&self) -> &Arc<dyn Pipeline> {
        &self.pipeline
    }

    /// Record draws for `objects` in order
    ///
    /// Must be called inside the swapchain render pass. Objects without a
    /// model are skipped.
    pub fn render_game_objects(&self, cmd: &mut dyn CommandList, objects: &[GameObject<T>]) -> Result<()> {
        cmd.bind_pipeline(&self.pipeline)?;

        for object in objects {
            let Some(model) = &object.model else {
                continue;
            };

            let push = object.transform.push_constants(object.color);
            cmd.push_constants(&PUSH_CONSTANT_STAGES, 0, bytemuck::bytes_of(&push))?;
            model.bind(cmd)?;
            model.draw(cmd)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "render_system_tests.rs"]
mod tests;
