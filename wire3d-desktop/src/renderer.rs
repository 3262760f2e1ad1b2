//! WGPU line renderer: geometry upload and per-face draws.
//!
//! Faces are drawn as closed line strips, one draw per face, with the
//! composed transform written to that face's slot in a dynamic-offset
//! uniform buffer before the pass is recorded.

use std::ops::Range;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use wire3d_core::{face_draws, BufferId, Scene};

use crate::shader::ShaderProgram;
use crate::Error;

/// Size of one mat4x4<f32> uniform slot payload, in bytes.
const TRANSFORM_SIZE: u64 = 64;

/// Renders a scene as white outlines over a black clear.
pub struct LineRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    transform_layout: wgpu::BindGroupLayout,
    program: Option<ShaderProgram>,
    vertex_buffers: Vec<wgpu::Buffer>,
    face_slots: Option<FaceSlots>,
}

/// Per-face draw resources, one entry per face in draw-stream order:
/// a closed outline range in the shared index buffer and a uniform slot.
struct FaceSlots {
    index_buffer: wgpu::Buffer,
    ranges: Vec<Range<u32>>,
    uniform_buffer: wgpu::Buffer,
    uniform_stride: u64,
    bind_group: wgpu::BindGroup,
}

impl LineRenderer {
    /// Bring up a device and swapchain for the given window.
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(Error::NoAdapter)?;
        log::info!("rendering on {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("wire3d device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))?;

        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(Error::SurfaceUnsupported)?;
        surface.configure(&device, &config);

        let transform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("transformation layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(TRANSFORM_SIZE),
                },
                count: None,
            }],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            transform_layout,
            program: None,
            vertex_buffers: Vec::new(),
            face_slots: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Layout of the per-face transform uniform, for building programs.
    pub fn transform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.transform_layout
    }

    /// Make a loaded program the active pipeline.
    pub fn install(&mut self, program: ShaderProgram) {
        self.program = Some(program);
    }

    /// Upload scene geometry: one vertex buffer per primitive with points,
    /// a closed outline per face, and a uniform slot per face draw.
    ///
    /// Face topology is fixed from here on; only transforms animate.
    pub fn upload(&mut self, scene: &mut Scene<'_>) -> Result<(), Error> {
        self.vertex_buffers.clear();
        self.face_slots = None;

        for index in 0..scene.len() {
            let points = scene.primitive(index)?.points();
            if points.is_empty() {
                continue;
            }
            let buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("primitive points"),
                    contents: bytemuck::cast_slice(points),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            scene.attach_buffer(index, BufferId(self.vertex_buffers.len() as u32))?;
            self.vertex_buffers.push(buffer);
        }

        let draws = face_draws(scene);
        if draws.is_empty() {
            return Ok(());
        }

        let mut indices = Vec::new();
        let mut ranges = Vec::with_capacity(draws.len());
        for draw in &draws {
            let start = indices.len() as u32;
            indices.extend(close_line_loop(draw.indices));
            ranges.push(start..indices.len() as u32);
        }
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("face outlines"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let uniform_stride = uniform_stride(&self.device.limits());
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("face transformations"),
            size: uniform_stride * draws.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transformation bind group"),
            layout: &self.transform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(TRANSFORM_SIZE),
                }),
            }],
        });

        self.face_slots = Some(FaceSlots {
            index_buffer,
            ranges,
            uniform_buffer,
            uniform_stride,
            bind_group,
        });
        log::debug!(
            "uploaded {} primitives, {} face outlines ({} indices)",
            self.vertex_buffers.len(),
            draws.len(),
            indices.len()
        );
        Ok(())
    }

    /// Draw one frame: clear to black, then outline every face with its
    /// composed transform written to the matching uniform slot.
    pub fn render(&self, scene: &Scene<'_>) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        let draws = face_draws(scene);
        if let Some(slots) = &self.face_slots {
            debug_assert_eq!(draws.len(), slots.ranges.len());
            for (slot, draw) in draws.iter().enumerate() {
                self.queue.write_buffer(
                    &slots.uniform_buffer,
                    slot as u64 * slots.uniform_stride,
                    bytemuck::cast_slice(draw.transform.as_slice()),
                );
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wireframe pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(program), Some(slots)) = (&self.program, &self.face_slots) {
                pass.set_pipeline(&program.pipeline);
                pass.set_index_buffer(slots.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                for ((slot, draw), range) in draws.iter().enumerate().zip(&slots.ranges) {
                    let vertices = &self.vertex_buffers[draw.buffer.0 as usize];
                    pass.set_vertex_buffer(0, vertices.slice(..));
                    pass.set_bind_group(
                        0,
                        &slots.bind_group,
                        &[(slot as u64 * slots.uniform_stride) as u32],
                    );
                    pass.draw_indexed(range.clone(), 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Reconfigure the surface at a new size. Zero-sized frames are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Rebuild the swapchain after a lost or outdated surface.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// Close an outline by returning to its first index, so a line strip also
/// draws the edge from the last vertex back to the start.
fn close_line_loop(indices: &[u32]) -> Vec<u32> {
    let mut closed = Vec::with_capacity(indices.len() + 1);
    closed.extend_from_slice(indices);
    if let Some(&first) = indices.first() {
        closed.push(first);
    }
    closed
}

/// Stride between uniform slots: one transform rounded up to the device's
/// uniform offset alignment.
fn uniform_stride(limits: &wgpu::Limits) -> u64 {
    let align = limits.min_uniform_buffer_offset_alignment as u64;
    (TRANSFORM_SIZE + align - 1) / align * align
}
