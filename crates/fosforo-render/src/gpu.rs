//! wgpu offscreen backend.
//!
//! Draw calls tessellate on the CPU into colored triangles (segment quads
//! plus disc fans for caps, joins, and dots) and accumulate in a vertex
//! batch; `finish_frame` replays the batch in a single alpha-blended render
//! pass onto a persistent `Rgba8Unorm` target texture, then reads the
//! texture back into the shared [`Framebuffer`].
//!
//! The target texture is never cleared between frames (LoadOp::Load), which
//! is what carries the phosphor persistence on the GPU side; the fade quad
//! from `clear_with_persistence` decays it exactly like the software path.
//!
//! Join discs overlap their neighboring segment quads, so a stroke that
//! doubles back can deposit slightly more energy at the joint than the
//! software rasterizer does; the deviation is confined to the joint disc
//! and sits within the backend-parity tolerance.

use std::sync::mpsc;

use fosforo_core::Point;
use tracing::{debug, error};
use wgpu::util::DeviceExt;

use crate::RenderError;
use crate::color::{BACKGROUND, Color};
use crate::framebuffer::Framebuffer;
use crate::renderer::{Renderer, RendererKind};

/// Triangle count of each cap/join/dot disc fan.
const DISC_SEGMENTS: u32 = 16;

const SHADER_SRC: &str = r#"
struct VsIn {
    @location(0) pos:   vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VsOut {
    @builtin(position) pos:   vec4<f32>,
    @location(0)       color: vec4<f32>,
}

@vertex
fn vs(in: VsIn) -> VsOut {
    var out: VsOut;
    out.pos   = vec4(in.pos, 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs(in: VsOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    pos: [f32; 2],
    color: [f32; 4],
}

/// GPU renderer drawing into an offscreen texture.
pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    padded_bytes_per_row: u32,
    fb: Framebuffer,
    /// Batched triangles for the current frame, replayed at finish.
    vertices: Vec<Vertex>,
    /// Clear the target at the next pass instead of loading it.
    load_clear: bool,
    width: u32,
    height: u32,
}

impl GpuRenderer {
    /// Acquire an adapter and device, build the pipeline and readback
    /// plumbing. Fails cleanly when no GPU is available; the caller falls
    /// back to the software backend.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| RenderError::AdapterUnavailable(e.to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("fosforo device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
        }))
        .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scope target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&Default::default());

        // Rows must align to COPY_BYTES_PER_ROW_ALIGNMENT for the readback.
        let unpadded = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded.div_ceil(align) * align;

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scope readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scope shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scope layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scope pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                strip_index_format: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        debug!(width, height, "GPU renderer ready");

        let mut fb = Framebuffer::new(width, height);
        fb.fill(BACKGROUND);

        Ok(Self {
            device,
            queue,
            pipeline,
            target,
            target_view,
            readback,
            padded_bytes_per_row,
            fb,
            vertices: Vec::new(),
            load_clear: true,
            width,
            height,
        })
    }

    #[inline]
    fn to_ndc(&self, p: Point) -> [f32; 2] {
        [
            p.x / self.width as f32 * 2.0 - 1.0,
            1.0 - p.y / self.height as f32 * 2.0,
        ]
    }

    fn push_triangle(&mut self, a: Point, b: Point, c: Point, color: [f32; 4]) {
        let (pa, pb, pc) = (self.to_ndc(a), self.to_ndc(b), self.to_ndc(c));
        self.vertices.push(Vertex { pos: pa, color });
        self.vertices.push(Vertex { pos: pb, color });
        self.vertices.push(Vertex { pos: pc, color });
    }

    fn push_quad(&mut self, corners: [Point; 4], color: [f32; 4]) {
        self.push_triangle(corners[0], corners[1], corners[2], color);
        self.push_triangle(corners[0], corners[2], corners[3], color);
    }

    fn push_disc(&mut self, center: Point, radius: f32, color: [f32; 4]) {
        let step = std::f32::consts::TAU / DISC_SEGMENTS as f32;
        for i in 0..DISC_SEGMENTS {
            let a0 = i as f32 * step;
            let a1 = a0 + step;
            self.push_triangle(
                center,
                Point::new(center.x + radius * a0.cos(), center.y + radius * a0.sin()),
                Point::new(center.x + radius * a1.cos(), center.y + radius * a1.sin()),
                color,
            );
        }
    }

    fn flush_pass(&mut self) -> Result<(), RenderError> {
        let vertex_buffer = (!self.vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("scope vertices"),
                    contents: bytemuck::cast_slice(&self.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scope encoder"),
            });

        {
            let load = if self.load_clear {
                let [r, g, b] = BACKGROUND.to_f32();
                wgpu::LoadOp::Clear(wgpu::Color {
                    r: f64::from(r),
                    g: f64::from(g),
                    b: f64::from(b),
                    a: 1.0,
                })
            } else {
                wgpu::LoadOp::Load
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scope pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(ref vb) = vertex_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, vb.slice(..));
                pass.draw(0..self.vertices.len() as u32, 0..1);
            }
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        self.vertices.clear();
        self.load_clear = false;

        // Map the readback buffer and copy rows into the CPU framebuffer.
        let slice = self.readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::Readback("map callback dropped".into()))?
            .map_err(|e| RenderError::Readback(format!("{e:?}")))?;

        {
            let data = slice.get_mapped_range();
            let row_bytes = (self.width * 4) as usize;
            let padded = self.padded_bytes_per_row as usize;
            let out = self.fb.bytes_mut();
            for row in 0..self.height as usize {
                let src = &data[row * padded..row * padded + row_bytes];
                out[row * row_bytes..(row + 1) * row_bytes].copy_from_slice(src);
            }
        }
        self.readback.unmap();
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Gpu
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.load_clear = true;
        self.fb.fill(BACKGROUND);
    }

    fn clear_with_persistence(&mut self, alpha: f32) {
        let [r, g, b] = BACKGROUND.to_f32();
        let color = [r, g, b, alpha.clamp(0.0, 1.0)];
        let w = self.width as f32;
        let h = self.height as f32;
        self.push_quad(
            [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ],
            color,
        );
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, opacity: f32, width: f32) {
        if points.len() < 2 || opacity <= 0.0 || width <= 0.0 {
            return;
        }
        if points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let [r, g, b] = color.to_f32();
        let rgba = [r, g, b, opacity.clamp(0.0, 1.0)];
        let half = width * 0.5;

        for pair in points.windows(2) {
            let (a, b2) = (pair[0], pair[1]);
            let dx = b2.x - a.x;
            let dy = b2.y - a.y;
            let len = (dx * dx + dy * dy).sqrt();
            if len > 1e-6 {
                // Perpendicular offset by half width on each side.
                let nx = -dy / len * half;
                let ny = dx / len * half;
                self.push_quad(
                    [
                        Point::new(a.x + nx, a.y + ny),
                        Point::new(b2.x + nx, b2.y + ny),
                        Point::new(b2.x - nx, b2.y - ny),
                        Point::new(a.x - nx, a.y - ny),
                    ],
                    rgba,
                );
            }
        }
        // Round caps and joins: one disc per point.
        for &p in points {
            self.push_disc(p, half, rgba);
        }
    }

    fn fill_dot(&mut self, center: Point, radius: f32, color: Color, opacity: f32) {
        if opacity <= 0.0 || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let [r, g, b] = color.to_f32();
        self.push_disc(center, radius, [r, g, b, opacity.clamp(0.0, 1.0)]);
    }

    fn draw_fps(&mut self, fps: u32) {
        let [r, g, b] = crate::color::P31_GREEN.to_f32();
        let rgba = [r, g, b, 1.0];
        let scale = crate::glyphs::GLYPH_SCALE as f32;
        let mut cells = Vec::new();
        crate::glyphs::lit_cells(fps.min(999), |x, y| cells.push((x, y)));
        for (x, y) in cells {
            let x = x as f32;
            let y = y as f32;
            self.push_quad(
                [
                    Point::new(x, y),
                    Point::new(x + scale, y),
                    Point::new(x + scale, y + scale),
                    Point::new(x, y + scale),
                ],
                rgba,
            );
        }
    }

    fn finish_frame(&mut self) -> &Framebuffer {
        if let Err(err) = self.flush_pass() {
            // Best effort: the previous frame's pixels stay visible.
            error!(error = %err, "GPU frame flush failed");
        }
        &self.fb
    }
}
