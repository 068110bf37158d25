//! A [`RenderBackend`] drawing with wgpu into an offscreen target.

use crate::color::Color;
use crate::context::Context;
use crate::renderer::{ChannelData, DrawCall, Primitive, RenderBackend};
use crate::resource::INDEX_FORMAT;
use crate::resource::{BufferType, Channel, GpuBuffer};
use bytemuck::{Pod, Zeroable};
use glamx::Mat4;
use std::collections::HashMap;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

struct RenderTarget {
    width: u32,
    height: u32,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

/// Renders the viewport channels with the wgpu device of the current
/// [`Context`].
///
/// Draw calls are recorded between [`RenderBackend::set_camera`] and
/// [`RenderBackend::present`], which encodes them in a single render pass
/// targeting an offscreen texture. Hosts that render to their own surface
/// can instead call [`WgpuBackend::encode`] inside their pass.
///
/// Point sizes and line widths are not supported by wgpu primitives: points
/// and lines are one pixel wide.
pub struct WgpuBackend {
    ctxt: Context,
    buffers: HashMap<Channel, GpuBuffer>,
    pipelines: HashMap<Primitive, wgpu::RenderPipeline>,
    view_uniform_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    target: Option<RenderTarget>,
    pending: Vec<DrawCall>,
    background: Color,
    frames: usize,
}

impl WgpuBackend {
    /// Creates the pipelines of the viewport on the current context.
    ///
    /// # Panics
    /// Panics if the context has not been initialized.
    pub fn new(background: Color) -> WgpuBackend {
        let ctxt = Context::get();

        let view_bind_group_layout =
            ctxt.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("viewport_view_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = ctxt
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("viewport_pipeline_layout"),
                bind_group_layouts: &[&view_bind_group_layout],
                push_constant_ranges: &[],
            });

        let shader = ctxt.create_shader_module(
            Some("viewport_shader"),
            include_str!("../builtin/viewport.wgsl"),
        );

        let pipelines = [Primitive::Points, Primitive::Lines, Primitive::Triangles]
            .into_iter()
            .map(|primitive| {
                let pipeline = create_pipeline(&ctxt, &pipeline_layout, &shader, primitive);
                (primitive, pipeline)
            })
            .collect();

        let view_uniform_buffer = ctxt.create_buffer(&wgpu::BufferDescriptor {
            label: Some("viewport_view_uniform_buffer"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_bind_group = ctxt.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("viewport_view_bind_group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_uniform_buffer.as_entire_binding(),
            }],
        });

        let buffers = Channel::ALL
            .into_iter()
            .map(|channel| {
                let buf_type = if channel.is_index() {
                    BufferType::ElementArray
                } else {
                    BufferType::Array
                };
                (channel, GpuBuffer::new(channel.name(), buf_type))
            })
            .collect();

        WgpuBackend {
            ctxt,
            buffers,
            pipelines,
            view_uniform_buffer,
            view_bind_group,
            target: None,
            pending: Vec::new(),
            background,
            frames: 0,
        }
    }

    /// Resizes the offscreen target. Nothing is presented before the first
    /// call.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);

        if matches!(self.target, Some(ref t) if t.width == width && t.height == height) {
            return;
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = self.ctxt.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewport_color_target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctxt.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let depth = self.ctxt.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewport_depth_target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Context::depth_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.target = Some(RenderTarget {
            width,
            height,
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            color,
        });
    }

    /// The offscreen color texture, once [`WgpuBackend::resize`] was called.
    pub fn color_texture(&self) -> Option<&wgpu::Texture> {
        self.target.as_ref().map(|t| &t.color)
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Records the pending draw calls into a render pass.
    pub fn encode(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &self.view_bind_group, &[]);

        for call in &self.pending {
            let (Some(positions), Some(colors)) = (
                self.buffers.get(&call.positions).and_then(GpuBuffer::buffer),
                self.buffers.get(&call.colors).and_then(GpuBuffer::buffer),
            ) else {
                continue;
            };
            let Some(pipeline) = self.pipelines.get(&call.primitive) else {
                continue;
            };

            let range = call.first..call.first + call.count;
            render_pass.set_pipeline(pipeline);
            render_pass.set_vertex_buffer(0, positions.slice(..));
            render_pass.set_vertex_buffer(1, colors.slice(..));

            match call.indices {
                Some(indices) => {
                    if let Some(indices) = self.buffers.get(&indices).and_then(GpuBuffer::buffer) {
                        render_pass.set_index_buffer(indices.slice(..), INDEX_FORMAT);
                        render_pass.draw_indexed(range, 0, 0..1);
                    }
                }
                None => render_pass.draw(range, 0..1),
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn upload(&mut self, channel: Channel, data: ChannelData<'_>) {
        if let Some(buffer) = self.buffers.get_mut(&channel) {
            buffer.write(&self.ctxt, data.as_bytes());
        }
    }

    fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        let uniforms = ViewUniforms {
            view: view.to_cols_array_2d(),
            proj: projection.to_cols_array_2d(),
        };
        self.ctxt
            .write_buffer(&self.view_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.pending.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.pending.push(*call);
    }

    fn present(&mut self) {
        let Some(target) = &self.target else {
            log::warn!("no render target: call `WgpuBackend::resize` before presenting");
            self.pending.clear();
            return;
        };

        let mut encoder = self.ctxt.create_command_encoder(Some("viewport_encoder"));
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("viewport_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.background.r as f64,
                            g: self.background.g as f64,
                            b: self.background.b as f64,
                            a: self.background.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.encode(&mut render_pass);
        }

        self.ctxt.submit(Some(encoder.finish()));
        self.pending.clear();
        self.frames += 1;
    }
}

fn create_pipeline(
    ctxt: &Context,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    primitive: Primitive,
) -> wgpu::RenderPipeline {
    let buffers = [
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        },
        wgpu::VertexBufferLayout {
            array_stride: 16,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            }],
        },
    ];

    let (topology, cull_mode) = match primitive {
        Primitive::Points => (wgpu::PrimitiveTopology::PointList, None),
        Primitive::Lines => (wgpu::PrimitiveTopology::LineList, None),
        // Back faces are uploaded with reversed winding and their own color.
        Primitive::Triangles => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
    };

    ctxt.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("viewport_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctxt.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Context::depth_format(),
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
}
