// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use contour_union::geometry::collection_bounds;
use contour_union::{Polygon, Ring, UnionResult};

use super::vertex::OutlineVertex;
use super::viewport::{PanelViewport, PixelRect};

const INITIAL_VERTEX_CAPACITY: usize = 4096;
const INITIAL_INDEX_CAPACITY: usize = 8192;
const PANEL_PADDING: f32 = 40.0;

pub const SHAPE_COLOR: [f32; 4] = [0.25, 0.45, 1.0, 1.0];
pub const CONTOUR_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
pub const HOLE_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
const DIVIDER_COLOR: [f32; 4] = [0.35, 0.35, 0.4, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    width: f32,
    height: f32,
    _padding1: f32,
    _padding2: f32,
}

/// What one frame shows: the input collection on the left, the union on the right.
pub struct FrameContent<'a> {
    pub shapes: &'a [Polygon],
    pub union: Option<&'a UnionResult>,
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Outline Vertex Buffer"),
        size: (capacity * std::mem::size_of::<OutlineVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Outline Index Buffer"),
        size: (capacity * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// CPU-side line list for one frame.
#[derive(Debug, Default)]
pub struct OutlineBatch {
    pub vertices: Vec<OutlineVertex>,
    pub indices: Vec<u32>,
}

impl OutlineBatch {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    fn add_segment(&mut self, a: [f32; 2], b: [f32; 2], color: [f32; 4]) {
        let start = self.vertices.len() as u32;
        self.vertices.push(OutlineVertex::new(a, color));
        self.vertices.push(OutlineVertex::new(b, color));
        self.indices.extend_from_slice(&[start, start + 1]);
    }

    fn add_ring(&mut self, ring: &Ring, viewport: &PanelViewport, color: [f32; 4]) {
        if ring.len() < 2 {
            return;
        }
        let start = self.vertices.len() as u32;
        for point in ring.vertices() {
            self.vertices
                .push(OutlineVertex::new(viewport.world_to_pixel(point), color));
        }
        let n = ring.len() as u32;
        for i in 0..n {
            self.indices.push(start + i);
            self.indices.push(start + (i + 1) % n);
        }
    }

    /// Input outlines in the left panel, union contours in the right one.
    pub fn fill(&mut self, content: &FrameContent, width: f32, height: f32) {
        self.clear();

        let (left, right) = PixelRect::new(0.0, 0.0, width, height).split_horizontal();
        self.add_segment([right.x, 0.0], [right.x, height], DIVIDER_COLOR);

        let Some(world) = collection_bounds(content.shapes) else {
            return;
        };
        let left_view = PanelViewport::fit(&world, left, PANEL_PADDING);
        let right_view = PanelViewport::fit(&world, right, PANEL_PADDING);

        for shape in content.shapes {
            for ring in shape.rings() {
                self.add_ring(ring, &left_view, SHAPE_COLOR);
            }
        }
        if let Some(union) = content.union {
            for polygon in union.polygons() {
                self.add_ring(polygon.exterior(), &right_view, CONTOUR_COLOR);
                for hole in polygon.interiors() {
                    self.add_ring(hole, &right_view, HOLE_COLOR);
                }
            }
        }
    }
}

pub struct OutlineRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,

    frame: OutlineBatch,

    viewport_uniform_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
}

impl OutlineRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        initial_width: f32,
        initial_height: f32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Outline Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let uniform = ViewportUniform {
            width: initial_width,
            height: initial_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        let viewport_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("viewport_bind_group_layout"),
        });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &viewport_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_uniform_buffer.as_entire_binding(),
            }],
            label: Some("viewport_bind_group"),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Outline Pipeline Layout"),
            bind_group_layouts: &[&viewport_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Outline Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[OutlineVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            render_pipeline,
            vertex_buffer: create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY),
            index_buffer: create_index_buffer(device, INITIAL_INDEX_CAPACITY),
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_capacity: INITIAL_INDEX_CAPACITY,
            frame: OutlineBatch {
                vertices: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
                indices: Vec::with_capacity(INITIAL_INDEX_CAPACITY),
            },
            viewport_uniform_buffer,
            viewport_bind_group,
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device) {
        if self.frame.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = self.frame.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
            log::debug!("grew outline vertex buffer to {}", self.vertex_capacity);
        }
        if self.frame.indices.len() > self.index_capacity {
            self.index_capacity = self.frame.indices.len().next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
            log::debug!("grew outline index buffer to {}", self.index_capacity);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        content: &FrameContent,
        screen_width: f32,
        screen_height: f32,
        clear_color: wgpu::Color,
    ) {
        let uniform = ViewportUniform {
            width: screen_width,
            height: screen_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        queue.write_buffer(&self.viewport_uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        self.frame.fill(content, screen_width, screen_height);
        self.ensure_capacity(device);
        if !self.frame.indices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.frame.vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.frame.indices));
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Outline Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if !self.frame.indices.is_empty() {
            let vertex_bytes = (self.frame.vertices.len() * std::mem::size_of::<OutlineVertex>()) as u64;
            let index_bytes = (self.frame.indices.len() * std::mem::size_of::<u32>()) as u64;
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_bytes));
            render_pass.set_index_buffer(self.index_buffer.slice(..index_bytes), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.frame.indices.len() as u32, 0, 0..1);
        }
    }
}
