//! Frame composition: one render pass per draw call, submitted immediately.
//!
//! `Queue::write_buffer` calls are applied at the next submission, so
//! submitting after every draw lets each draw see exactly the uniform
//! writes issued before it. Rewriting a shared uniform buffer between two
//! draws of the same frame therefore behaves like a sequence of
//! `sub_data` + draw pairs on an immediate-mode API.

use std::ops::Range;

use super::render_pass::{Capability, RenderPass};
use super::targets::RenderTargets;
use super::GpuContext;
use crate::error::RenderError;
use crate::gfx::geometry::Submesh;
use crate::gfx::resources::{Buffer, PipelineKey, Program, Texture, VertexArray};

/// Everything one indexed draw reads.
pub struct DrawCall<'d> {
    pub vertex_array: &'d VertexArray,
    pub submesh: Submesh,
    /// Uniform buffers for group 0, bound at their `bind_at_location` slot.
    pub uniforms: &'d [&'d Buffer],
    /// Group 1 texture, if the program samples one.
    pub texture: Option<&'d mut Texture>,
    pub instances: Range<u32>,
}

impl<'d> DrawCall<'d> {
    pub fn new(vertex_array: &'d VertexArray, submesh: Submesh, uniforms: &'d [&'d Buffer]) -> Self {
        Self {
            vertex_array,
            submesh,
            uniforms,
            texture: None,
            instances: 0..1,
        }
    }

    pub fn with_texture(mut self, texture: &'d mut Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_instances(mut self, instances: Range<u32>) -> Self {
        self.instances = instances;
        self
    }
}

/// One frame's colour target plus the shared attachments.
pub struct Frame<'a> {
    gpu: &'a GpuContext,
    view: &'a wgpu::TextureView,
    targets: &'a RenderTargets,
    pass: RenderPass,
    draws: u32,
}

impl<'a> Frame<'a> {
    /// `targets` must already be prepared for the frame's size and sample count.
    pub fn new(
        gpu: &'a GpuContext,
        view: &'a wgpu::TextureView,
        targets: &'a RenderTargets,
        pass: &RenderPass,
    ) -> Self {
        Self {
            gpu,
            view,
            targets,
            pass: pass.clone(),
            draws: 0,
        }
    }

    pub fn gpu(&self) -> &'a GpuContext {
        self.gpu
    }

    pub fn size(&self) -> (u32, u32) {
        self.targets.size()
    }

    pub fn draw_count(&self) -> u32 {
        self.draws
    }

    pub fn render_pass(&self) -> &RenderPass {
        &self.pass
    }

    fn depth_test(&self) -> bool {
        self.pass.is_enabled(Capability::DepthTest) && self.targets.depth_view().is_some()
    }

    fn begin<'e>(
        &'e self,
        encoder: &'e mut wgpu::CommandEncoder,
        label: &str,
        color_load: wgpu::LoadOp<wgpu::Color>,
        depth_load: Option<wgpu::LoadOp<f32>>,
    ) -> wgpu::RenderPass<'e> {
        let (view, resolve_target) = match self.targets.msaa_view() {
            Some(msaa) => (msaa, Some(self.view)),
            None => (self.view, None),
        };
        let depth_stencil_attachment = depth_load
            .zip(self.targets.depth_view())
            .map(|(load, view)| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment,
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }

    fn encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Adopts `pass` as the frame's state and clears its masked attachments.
    pub fn clear(&mut self, pass: &RenderPass) {
        self.pass = pass.clone();

        let mut encoder = self.encoder("Clear Encoder");
        {
            let _clear = self.begin(
                &mut encoder,
                "Clear Pass",
                self.pass.color_load_op(),
                Some(self.pass.depth_load_op()),
            );
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }

    /// Encodes and submits one indexed draw of `call.submesh`.
    pub fn draw(&mut self, program: &mut Program, call: DrawCall<'_>) -> Result<(), RenderError> {
        let Some(layout) = call.vertex_array.layout() else {
            log::warn!(
                "skipping draw of '{}': attributes not initialised",
                call.vertex_array.label()
            );
            return Ok(());
        };

        let depth_test = self.depth_test();
        let key = PipelineKey {
            vertex_layout: layout.clone(),
            color_format: self.targets.format(),
            depth_test,
            sample_count: self.targets.sample_count(),
            cull_mode: self.pass.cull_mode(),
        };
        let (uniforms, texture) = {
            let pipeline = program.pipeline(self.gpu, &key)?;
            let uniforms = self.uniform_bind_group(pipeline, call.uniforms);
            let texture = call.texture.and_then(|texture| {
                texture.bind_group(self.gpu, &pipeline.get_bind_group_layout(1))
            });
            (uniforms, texture)
        };

        let mut encoder = self.encoder("Draw Encoder");
        {
            let mut pass = self.begin(
                &mut encoder,
                call.vertex_array.label(),
                wgpu::LoadOp::Load,
                depth_test.then_some(wgpu::LoadOp::Load),
            );
            program.bind(self.gpu, &key, &mut pass)?;

            let (width, height) = self.targets.size();
            let viewport = self.pass.current_viewport().fit(width, height);
            pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );

            if let Some(group) = &uniforms {
                pass.set_bind_group(0, group, &[]);
            }
            if let Some(group) = &texture {
                pass.set_bind_group(1, group, &[]);
            }
            if call.vertex_array.bind(&mut pass) {
                pass.draw_indexed(call.submesh.index_range(), 0, call.instances.clone());
            }
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.draws += 1;
        Ok(())
    }

    fn uniform_bind_group(
        &self,
        pipeline: &wgpu::RenderPipeline,
        uniforms: &[&Buffer],
    ) -> Option<wgpu::BindGroup> {
        let entries: Vec<_> = uniforms
            .iter()
            .filter_map(|buffer| match (buffer.location(), buffer.raw()) {
                (Some(binding), Some(raw)) => Some(wgpu::BindGroupEntry {
                    binding,
                    resource: raw.as_entire_binding(),
                }),
                _ => {
                    log::warn!("uniform buffer '{}' is not bound or allocated", buffer.label());
                    None
                }
            })
            .collect();
        if entries.is_empty() {
            return None;
        }

        Some(self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniforms Bind Group"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &entries,
        }))
    }

    /// Records extra work (e.g. a UI overlay) onto the resolved colour view.
    pub fn overlay<F>(&mut self, f: F)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let mut encoder = self.encoder("Overlay Encoder");
        f(self.gpu.device(), self.gpu.queue(), &mut encoder, self.view);
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }
}
