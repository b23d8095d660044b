use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use glam::Mat4;
use smart_leds::RGB8;
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use cube_core::{
    model_matrix, BridgeError, Camera, ChannelOrder, DisplayMode, FramePacer, HardwareBridge,
    ModeSwitch, MotionGenerator, MotionParams, PacerDecision, PixelFrame, PixelGrid,
    GRID_HEIGHT, GRID_WIDTH, TARGET_FPS, WINDOW_SCALE,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
}

// ---------------- Cube mesh ----------------

const BLUE: [f32; 3] = [0.0 / 255.0, 112.0 / 255.0, 175.0 / 255.0];
const GREEN: [f32; 3] = [29.0 / 255.0, 122.0 / 255.0, 51.0 / 255.0];
const PURPLE: [f32; 3] = [133.0 / 255.0, 95.0 / 255.0, 167.0 / 255.0];

/// One face as two counter-clockwise triangles.
fn quad(corners: [[f32; 3]; 4], normal: [f32; 3], color: [f32; 3]) -> [Vertex; 6] {
    let v = |position: [f32; 3]| Vertex {
        position,
        normal,
        color,
    };
    [
        v(corners[0]),
        v(corners[1]),
        v(corners[2]),
        v(corners[2]),
        v(corners[3]),
        v(corners[0]),
    ]
}

/// Unit cube, 12 triangles, per-face normals and colors.
fn cube_vertices() -> Vec<Vertex> {
    const H: f32 = 0.5;
    let mut verts = Vec::with_capacity(36);
    // top / bottom
    verts.extend(quad(
        [[H, H, H], [H, H, -H], [-H, H, -H], [-H, H, H]],
        [0.0, 1.0, 0.0],
        PURPLE,
    ));
    verts.extend(quad(
        [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
        [0.0, -1.0, 0.0],
        PURPLE,
    ));
    // left / right
    verts.extend(quad(
        [[-H, H, H], [-H, H, -H], [-H, -H, -H], [-H, -H, H]],
        [-1.0, 0.0, 0.0],
        GREEN,
    ));
    verts.extend(quad(
        [[H, -H, -H], [H, H, -H], [H, H, H], [H, -H, H]],
        [1.0, 0.0, 0.0],
        GREEN,
    ));
    // front / back
    verts.extend(quad(
        [[H, -H, H], [H, H, H], [-H, H, H], [-H, -H, H]],
        [0.0, 0.0, 1.0],
        BLUE,
    ));
    verts.extend(quad(
        [[-H, -H, -H], [-H, H, -H], [H, H, -H], [H, -H, -H]],
        [0.0, 0.0, -1.0],
        BLUE,
    ));
    verts
}

// ---------------- GPU state ----------------

struct CaptureState {
    buffer: wgpu::Buffer,
    padded_bytes_per_row: u32,
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    // Fixed camera: derived once (and on resize), never per frame.
    view: Mat4,
    projection: Mat4,
    capture: Option<CaptureState>,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, capture: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if capture {
            if !surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC) {
                anyhow::bail!("surface does not support readback, cannot drive the LED grid");
            }
            usage |= wgpu::TextureUsages::COPY_SRC;
        }
        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::info!("surface {}x{} format {:?}", size.width, size.height, format);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube shader"),
            source: wgpu::ShaderSource::Wgsl(cube_core::CUBE_WGSL.into()),
        });

        let vertices = cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vb"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // The cube is convex, so back-face culling stands in for a depth
            // buffer.
            primitive: wgpu::PrimitiveState {
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let capture = if capture {
            // bytes_per_row must be 256-aligned for copy_texture_to_buffer
            let padded_bytes_per_row = (size.width * 4).div_ceil(256) * 256;
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("readback"),
                size: u64::from(padded_bytes_per_row) * u64::from(size.height),
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            });
            Some(CaptureState {
                buffer,
                padded_bytes_per_row,
            })
        } else {
            None
        };

        let camera = Camera::fixed(size.width as f32 / size.height as f32);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
            width: size.width,
            height: size.height,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            capture,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if self.capture.is_some()
            && (new_size.width != self.width || new_size.height != self.height)
        {
            // The LED grid mapping is 1:1 with the surface; the window is
            // created non-resizable, so anything else is spurious.
            log::warn!(
                "ignoring resize to {}x{}; LED capture is fixed at {}x{}",
                new_size.width,
                new_size.height,
                self.width,
                self.height
            );
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        let camera = Camera::fixed(self.width as f32 / self.height as f32);
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
    }

    /// Render one frame and present it. Returns the captured pixels when the
    /// readback path is active.
    fn render(
        &mut self,
        model: Mat4,
        mode: DisplayMode,
    ) -> Result<Option<PixelFrame>, wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                model: model.to_cols_array_2d(),
                view: self.view.to_cols_array_2d(),
                projection: self.projection.to_cols_array_2d(),
            }),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
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
            // A blank frame is still cleared, presented, and bridged; only
            // the draw call is skipped.
            if mode == DisplayMode::EmissiveCube {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                rpass.draw(0..self.vertex_count, 0..1);
            }
        }
        if let Some(cap) = &self.capture {
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture: &frame.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &cap.buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(cap.padded_bytes_per_row),
                        rows_per_image: Some(self.height),
                    },
                },
                wgpu::Extent3d {
                    width: self.width,
                    height: self.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();

        // Resolve the readback only after present, so the bridged pixels are
        // exactly the frame just shown.
        Ok(self.read_back_frame())
    }

    fn read_back_frame(&self) -> Option<PixelFrame> {
        let cap = self.capture.as_ref()?;
        let slice = cap.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device.poll(wgpu::Maintain::Wait);
        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("readback map failed: {e:?}");
                return None;
            }
            Err(_) => {
                log::warn!("readback callback dropped");
                return None;
            }
        }

        let padded = cap.padded_bytes_per_row as usize;
        let unpadded = self.width as usize * 4;
        let mut out = vec![0u8; unpadded * self.height as usize];
        {
            let data = slice.get_mapped_range();
            for row in 0..self.height as usize {
                let src = row * padded;
                let dst = row * unpadded;
                out[dst..dst + unpadded].copy_from_slice(&data[src..src + unpadded]);
            }
        }
        cap.buffer.unmap();

        match PixelFrame::new(self.width, self.height, out) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("readback produced invalid frame: {e}");
                None
            }
        }
    }
}

/// Source byte layout of the captured surface, fixed at startup.
fn channel_order_for(format: wgpu::TextureFormat) -> ChannelOrder {
    match format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => ChannelOrder::Bgra,
        _ => ChannelOrder::Rgba,
    }
}

// ---------------- Terminal LED grid ----------------

/// Truecolor terminal rendition of the physical panel, two pixels per
/// character cell via the upper-half-block glyph. Real panels plug in through
/// `cube_core::StripGrid` and any `smart-leds` driver instead.
struct AnsiGrid {
    width: u32,
    height: u32,
    pixels: Vec<RGB8>,
}

impl AnsiGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![RGB8::default(); width as usize * height as usize],
        }
    }
}

impl PixelGrid for AnsiGrid {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, col: u32, row: u32, color: RGB8) {
        if col >= self.width || row >= self.height {
            log::warn!("dropping out-of-bounds pixel ({col},{row})");
            return;
        }
        self.pixels[(row * self.width + col) as usize] = color;
    }

    fn commit(&mut self) -> Result<(), BridgeError> {
        use std::fmt::Write as _;
        use std::io::Write as _;

        let w = self.width as usize;
        let mut out = String::with_capacity(self.pixels.len() * 20);
        out.push_str("\x1b[H");
        for row in (0..self.height as usize).step_by(2) {
            for col in 0..w {
                let top = self.pixels[row * w + col];
                let bottom = if row + 1 < self.height as usize {
                    self.pixels[(row + 1) * w + col]
                } else {
                    RGB8::default()
                };
                let _ = write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            out.push_str("\x1b[0m\n");
        }
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(out.as_bytes())
            .and_then(|()| lock.flush())
            .map_err(|e| BridgeError::Device(e.to_string()))
    }
}

// ---------------- Entry point ----------------

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let led_output = std::env::args().skip(1).any(|a| a == "--led");
    let (width, height) = if led_output {
        // 1:1 with the panel so the bridge mapping is valid.
        (GRID_WIDTH, GRID_HEIGHT)
    } else {
        (GRID_WIDTH * WINDOW_SCALE, GRID_HEIGHT * WINDOW_SCALE)
    };

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title("picube")
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .context("window")?;

    let mut gpu =
        pollster::block_on(GpuState::new(&window, led_output)).context("gpu init")?;

    let mut bridge = if led_output {
        let order = channel_order_for(gpu.config.format);
        let grid = AnsiGrid::new(GRID_WIDTH, GRID_HEIGHT);
        Some(HardwareBridge::new(grid, gpu.width, gpu.height, order).context("grid init")?)
    } else {
        None
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("motion seed: {seed}");
    let mut motion = MotionGenerator::new(MotionParams::default(), seed);
    let mut pacer = FramePacer::new(TARGET_FPS)?;
    let mut modes = ModeSwitch::new(KeyCode::Space, DisplayMode::EmissiveCube);
    let start = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => gpu.resize(size),
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if let PhysicalKey::Code(code) = key_event.physical_key {
                        match key_event.state {
                            ElementState::Pressed => {
                                if code == KeyCode::Escape {
                                    elwt.exit();
                                } else if modes.key_down(code) {
                                    log::info!("display mode: {:?}", modes.mode());
                                }
                            }
                            ElementState::Released => modes.key_up(code),
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = start.elapsed().as_secs_f64();
                match pacer.poll(now) {
                    PacerDecision::Wait { hint } => thread::sleep(hint),
                    PacerDecision::Ready { delta_ticks } => {
                        motion.advance(delta_ticks);
                        let model = model_matrix(&motion.pose(), motion.wander_offset());
                        match gpu.render(model, modes.mode()) {
                            Ok(Some(frame)) => {
                                if let Some(b) = &mut bridge {
                                    // A failed grid write drops this frame;
                                    // the next one supersedes it.
                                    if let Err(e) = b.present(&frame) {
                                        log::warn!("bridge write failed: {e}");
                                    }
                                }
                            }
                            Ok(None) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                gpu.resize(gpu.window.inner_size())
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => log::warn!("surface error: {e:?}"),
                        }
                        if let Some(fps) = pacer.take_fps_sample(now) {
                            log::info!("achieved fps: {fps:.1}");
                        }
                    }
                }
            }
            _ => {}
        }
    })?;
    Ok(())
}
