// src/app.rs

use winit::{event::WindowEvent, window::Window};

use contour_union::{Scenario, ScenarioConfig, UnionResult};

use crate::rendering_lib::renderer::{FrameContent, OutlineRenderer};
use crate::rendering_lib::shader::WGSL_SHADER_SOURCE;
use crate::ui::{build_ui, ControlsState, UnionStats};

/// Names a JSON file holding the startup `ScenarioConfig`.
pub const CONFIG_ENV_VAR: &str = "CONTOUR_UNION_CONFIG";

const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.05, g: 0.05, b: 0.08, a: 1.0 };

fn initial_config() -> ScenarioConfig {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return ScenarioConfig::default();
    };
    match ScenarioConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded scenario config from {path}");
            config
        }
        Err(e) => {
            log::warn!("ignoring scenario config {path}: {e}");
            ScenarioConfig::default()
        }
    }
}

pub struct ContourApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: OutlineRenderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    controls: ControlsState,
    scenario: Option<Scenario>,
    union: Option<UnionResult>,
    stats: UnionStats,
    is_focused: bool,
}

impl ContourApp {
    pub async fn new(window: std::sync::Arc<Window>) -> Self {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .expect("window should provide a drawable surface");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("no graphics adapter matches the window surface");
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    label: None,
                },
                None,
            )
            .await
            .expect("graphics device request failed");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = OutlineRenderer::new(
            &device,
            config.format,
            WGSL_SHADER_SOURCE,
            config.width as f32,
            config.height as f32,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let mut app = Self {
            surface,
            device,
            queue,
            config,
            size,
            renderer,
            egui_ctx,
            egui_state,
            egui_renderer,
            controls: ControlsState::new(initial_config()),
            scenario: None,
            union: None,
            stats: UnionStats::default(),
            is_focused: window.has_focus(),
        };
        app.regenerate();
        app
    }

    /// Builds a fresh scenario from the controls and unions it. A failed
    /// union keeps the input panel and reports the error instead.
    pub fn regenerate(&mut self) {
        let scenario = match Scenario::build(&self.controls.scenario_config()) {
            Ok(scenario) => scenario,
            Err(e) => {
                log::warn!("scenario rejected: {e}");
                self.stats = UnionStats::from_error(0, e.to_string());
                self.scenario = None;
                self.union = None;
                return;
            }
        };

        let shape_count = scenario.shapes().len();
        match scenario.union() {
            Ok(result) => {
                log::info!(
                    "union of {} shapes: {} polygons, {} holes, area {:.3}",
                    shape_count,
                    result.len(),
                    result.hole_count(),
                    result.area()
                );
                self.stats = UnionStats::from_result(shape_count, &result);
                self.union = Some(result);
            }
            Err(e) => {
                log::warn!("union failed for {shape_count} shapes: {e}");
                self.stats = UnionStats::from_error(shape_count, e.to_string());
                self.union = None;
            }
        }
        self.scenario = Some(scenario);
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Command Encoder"),
            });

        let content = FrameContent {
            shapes: self.scenario.as_ref().map(Scenario::shapes).unwrap_or(&[]),
            union: self.union.as_ref(),
        };
        self.renderer.render_frame(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &content,
            self.config.width as f32,
            self.config.height as f32,
            CLEAR_COLOR,
        );

        let raw_input = self.egui_state.take_egui_input(window);
        let mut regenerate = false;
        let controls = &mut self.controls;
        let stats = &self.stats;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            regenerate = build_ui(ctx, controls, stats);
        });
        self.egui_state
            .handle_platform_output(window, full_output.platform_output);
        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.egui_renderer
                .render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(tex_id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();

        if regenerate {
            self.regenerate();
        }
        Ok(())
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.egui_state.on_window_event(window, event).consumed {
            return true;
        }
        match event {
            WindowEvent::Focused(focused) => {
                self.is_focused = *focused;
                false
            }
            _ => false,
        }
    }
}
