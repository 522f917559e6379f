//! Implementation of RenderContext trait for GraphicsContext.
//!
//! This allows GraphicsContext to be used polymorphically with the
//! RenderContext trait, enabling testing with MockRenderContext.

use sprig_core::profiling::profile_function;
use sprig_test_utils::{
    GpuBuffer, GpuShader, GpuTexture, GpuVertexArray, RenderContext, ShaderDescriptor,
    ShaderProgram, UniformValue,
};
use wgpu::{BufferDescriptor, TextureDescriptor};

use crate::MAX_TEXTURES;
use crate::context::GraphicsContext;
use crate::shader::uniforms;

impl RenderContext for GraphicsContext {
    fn max_buffer_size(&self) -> u64 {
        self.device.limits().max_buffer_size
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let buffer = self.device.create_buffer(desc);
        GpuBuffer::from_wgpu(buffer)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let wgpu_buffer = buffer.as_wgpu();
        self.queue.write_buffer(wgpu_buffer, offset, data);
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        buffer.as_wgpu().destroy();
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture = self.device.create_texture(desc);
        GpuTexture::from_wgpu(texture, desc.label)
    }

    fn bind_texture(&self, unit: u32, texture: &GpuTexture) {
        let mut state = self.state.lock();
        match state.units.get_mut(unit as usize) {
            Some(slot) => *slot = Some(texture.clone()),
            None => tracing::warn!(
                "Ignoring bind of {} to unit {} (only {} units)",
                texture.id(),
                unit,
                MAX_TEXTURES
            ),
        }
    }

    fn create_shader(&self, desc: &ShaderDescriptor) -> GpuShader {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label,
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sprite Uniform Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let texture_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..MAX_TEXTURES as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        let texture_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sprite Texture Layout"),
                entries: &texture_entries,
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&uniform_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: desc.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    buffers: &[desc.vertex_layout.clone()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let shader = GpuShader::from_program(ShaderProgram {
            pipeline,
            uniform_layout,
            texture_layout,
        });
        self.state.lock().uniforms.insert(shader.id(), Default::default());

        tracing::debug!("Created shader {:?} ({:?})", shader.id(), desc.label);
        shader
    }

    fn use_shader(&self, shader: &GpuShader) {
        self.state.lock().current_shader = Some(shader.id());
    }

    fn set_uniform(&self, shader: &GpuShader, name: &str, value: UniformValue) {
        let mut state = self.state.lock();
        let entry = state.uniforms.entry(shader.id()).or_default();

        match (name, value) {
            (uniforms::PROJECTION, UniformValue::Mat4(m)) => entry.block.projection = m,
            (uniforms::VIEW, UniformValue::Mat4(m)) => entry.block.view = m,
            (uniforms::MODEL, UniformValue::Mat4(m)) => entry.block.model = m,
            (uniforms::TEXTURES, UniformValue::IntArray(units)) => entry.textures = units,
            (name, value) => {
                tracing::warn!("Ignoring unknown uniform {:?} = {:?}", name, value);
            }
        }
    }

    fn create_vertex_array(
        &self,
        vertices: &GpuBuffer,
        indices: &GpuBuffer,
        stride: u64,
    ) -> GpuVertexArray {
        GpuVertexArray::from_wgpu(vertices.as_wgpu().clone(), indices.as_wgpu().clone(), stride)
    }

    fn destroy_vertex_array(&self, _array: &GpuVertexArray) {
        // wgpu has no vertex array object; the buffers are destroyed separately
    }

    fn draw_indexed(&self, shader: &GpuShader, array: &GpuVertexArray, index_count: u32) {
        profile_function!();

        let state = self.state.lock();
        let Some(target) = state.target.as_ref() else {
            tracing::warn!("Skipping draw of {} indices: no render target set", index_count);
            return;
        };
        if state.current_shader != Some(shader.id()) {
            tracing::trace!("Drawing with {:?}, which is not the current shader", shader.id());
        }

        let program = shader.program();
        let uniforms = state.uniforms.get(&shader.id()).cloned().unwrap_or_default();
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms.block));

        let uniform_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Uniform Bind Group"),
            layout: &program.uniform_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        // Units outside the active list sample the white fallback
        let texture_entries: Vec<wgpu::BindGroupEntry> = state
            .units
            .iter()
            .enumerate()
            .map(|(unit, bound)| {
                let view = match bound {
                    Some(texture) if uniforms.textures.contains(&(unit as i32)) => texture.view(),
                    _ => &self.fallback_view,
                };
                wgpu::BindGroupEntry {
                    binding: unit as u32,
                    resource: wgpu::BindingResource::TextureView(view),
                }
            })
            .collect();
        let texture_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Texture Bind Group"),
            layout: &program.texture_layout,
            entries: &texture_entries,
        });

        let (vertices, indices, _stride) = array.as_wgpu();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Batch Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if index_count > 0 {
                pass.set_pipeline(&program.pipeline);
                pass.set_bind_group(0, &uniform_group, &[]);
                pass.set_bind_group(1, &texture_group, &[]);
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
    }
}
