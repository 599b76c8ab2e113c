use anyhow::{Context, Result};
use clap::Parser;
use cubefield_common::Rgb;
use cubefield_controls::ControlAction;
use cubefield_controls::params::{MIN_EXPAND, ROTATION_SPEED_RANGE, WAVE_FREQUENCY_RANGE};
use cubefield_kernel::{ActionOutcome, CubeField, FieldConfig};
use cubefield_render_wgpu::WgpuRenderer;
use cubefield_tools::{FrameTimer, SceneInspector};
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Zoom factor per scroll-wheel line.
const ZOOM_STEP: f32 = 0.95;
/// Pixels treated as one wheel line for touchpads.
const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Parser)]
#[command(name = "cubefield-desktop", about = "Animated cube field with a control panel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML field configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial window width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Application state.
struct AppState {
    field: CubeField,
    timer: FrameTimer,
    last_frame: Instant,
    // Pointer state
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl AppState {
    fn new(config: FieldConfig) -> Self {
        Self {
            field: CubeField::new(config),
            timer: FrameTimer::default(),
            last_frame: Instant::now(),
            dragging: false,
            last_cursor: None,
        }
    }

    fn apply(&mut self, action: ControlAction) {
        match self.field.apply(action) {
            Ok(ActionOutcome::ObjectsRequested) => {
                let objects = SceneInspector::list_objects(&self.field.scene);
                tracing::info!(count = objects.len(), "scene objects");
                for object in &objects {
                    tracing::info!("{object}");
                }
            }
            Ok(outcome) => tracing::debug!(?action, ?outcome, "action applied"),
            Err(e) => tracing::warn!("rejected {action:?}: {e}"),
        }
    }

    /// Apply panel actions, then run one frame.
    fn update(&mut self, actions: Vec<ControlAction>) {
        let now = Instant::now();
        self.timer.record(now - self.last_frame);
        self.last_frame = now;

        for action in actions {
            self.apply(action);
        }
        let report = self.field.tick();
        if report.spawned > 0 {
            tracing::debug!(spawned = report.spawned, total = report.box_count, "boxes spawned");
        }
        for event in self.field.scene.drain_events() {
            tracing::debug!(?event, "scene event");
        }
    }

    fn left_button(&mut self, state: ElementState) {
        self.dragging = state == ElementState::Pressed;
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        if let (true, Some((px, py))) = (self.dragging, self.last_cursor) {
            self.field.camera.orbit((x - px) as f32, (y - py) as f32);
        }
        self.last_cursor = Some((x, y));
    }

    fn scrolled(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
        };
        self.field.camera.zoom(ZOOM_STEP.powf(lines));
    }

    /// Draw the control panel. Continuous parameters are edited in place;
    /// one-shot actions are returned for the caller to apply.
    fn draw_ui(&mut self, ctx: &EguiContext) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let c = &mut self.field.controls;

        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.collapsing("Cubes", |ui| {
                    if ui.button("Add Cubes").clicked() {
                        actions.push(ControlAction::AddCubes);
                    }
                    ui.label(format!("Particles: {}", self.field.scene.box_count()));
                    ui.add(
                        egui::Slider::new(&mut c.rotation_speed, ROTATION_SPEED_RANGE)
                            .text("Rotation Speed"),
                    );
                    ui.add(
                        egui::Slider::new(&mut c.wave_frequency, WAVE_FREQUENCY_RANGE)
                            .text("Wave Frequency"),
                    );

                    let mut width = c.expand_width;
                    let mut height = c.expand_height;
                    ui.horizontal(|ui| {
                        ui.label("Expand Width");
                        if ui
                            .add(egui::DragValue::new(&mut width).range(MIN_EXPAND..=f32::MAX).speed(0.01))
                            .changed()
                        {
                            actions.push(ControlAction::SetExpandWidth(width));
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("Expand Height");
                        if ui
                            .add(egui::DragValue::new(&mut height).range(MIN_EXPAND..=f32::MAX).speed(0.01))
                            .changed()
                        {
                            actions.push(ControlAction::SetExpandHeight(height));
                        }
                    });
                    ui.checkbox(&mut c.exploding, "Explode");
                });

                ui.collapsing("Lights", |ui| {
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut c.ambient_light_on, "Ambient Light");
                        let mut rgb = c.ambient_color.to_rgb8();
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            actions.push(ControlAction::SetAmbientColor(Rgb::from_rgb8(rgb)));
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut c.spot_light_on, "Spot Light");
                        let mut rgb = c.spot_light_color.to_rgb8();
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            actions.push(ControlAction::SetSpotLightColor(Rgb::from_rgb8(rgb)));
                        }
                    });
                });

                ui.collapsing("Helpers", |ui| {
                    ui.checkbox(&mut c.show_axes, "Show Axes");
                    ui.checkbox(&mut c.show_plane, "Show Plane");
                    ui.checkbox(&mut c.show_spot_light_helper, "Show Spot Light Helper");
                });

                ui.separator();
                ui.checkbox(&mut c.rotate_camera, "Rotate Camera");
                ui.horizontal(|ui| {
                    if ui.button("Output Objects").clicked() {
                        actions.push(ControlAction::OutputObjects);
                    }
                    if ui.button("Reset Camera").clicked() {
                        actions.push(ControlAction::ResetCamera);
                    }
                    if ui.button("Reset All").clicked() {
                        actions.push(ControlAction::ResetAll);
                    }
                });

                ui.separator();
                ui.small(self.timer.stats_line());
                ui.small("Drag: orbit | Scroll: zoom");
            });

        actions
    }
}

/// GPU resources, created once the window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: FieldConfig, width: u32, height: u32) -> Self {
        Self {
            state: AppState::new(config),
            initial_size: PhysicalSize::new(width, height),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Cube Field")
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubefield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.field.resize(config.width, config.height);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.gpu = Some(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let mut actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        self.state.update(actions);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.field.camera,
            &self.state.field.scene,
        );

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // A release over the panel still ends an orbit drag.
        if let WindowEvent::MouseInput {
            button: MouseButton::Left,
            state: ElementState::Released,
            ..
        } = event
        {
            self.state.left_button(ElementState::Released);
        }
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                }
                self.state.field.resize(new_size.width, new_size.height);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.left_button(btn_state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.scrolled(delta);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FieldConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing::info!(
        ceiling = config.spawn.ceiling,
        seed = ?config.seed,
        "cubefield-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, cli.width, cli.height);
    event_loop.run_app(&mut app)?;

    Ok(())
}
