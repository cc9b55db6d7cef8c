// src/ui.rs

use contour_union::{ScenarioConfig, UnionResult};

/// Viewer-side editing state for the next scenario.
pub struct ControlsState {
    pub config: ScenarioConfig,
    pub use_seed: bool,
    pub seed: u64,
}

impl ControlsState {
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            use_seed: config.seed.is_some(),
            seed: config.seed.unwrap_or(0),
            config,
        }
    }

    pub fn scenario_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            seed: self.use_seed.then_some(self.seed),
            ..self.config.clone()
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct UnionStats {
    pub shape_count: usize,
    pub polygon_count: usize,
    pub hole_count: usize,
    pub area: f64,
    pub error: Option<String>,
}

impl UnionStats {
    pub fn from_result(shape_count: usize, result: &UnionResult) -> Self {
        Self {
            shape_count,
            polygon_count: result.len(),
            hole_count: result.hole_count(),
            area: result.area(),
            error: None,
        }
    }

    pub fn from_error(shape_count: usize, message: String) -> Self {
        Self {
            shape_count,
            error: Some(message),
            ..Self::default()
        }
    }
}

fn panel_title(ctx: &egui::Context, id: &str, text: &str, x_fraction: f32) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(egui::pos2(screen.width() * x_fraction - 70.0, 8.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(text).strong().size(16.0));
        });
}

/// Returns true when the user asked for a new scenario.
pub fn build_ui(ctx: &egui::Context, controls: &mut ControlsState, stats: &UnionStats) -> bool {
    panel_title(ctx, "left_panel_title", "Separate Rectangles", 0.25);
    panel_title(ctx, "right_panel_title", "Combined Contour", 0.75);

    let mut regenerate = false;
    egui::Window::new("Controls")
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.checkbox(&mut controls.config.randomize, "Random rectangles");
                ui.add_enabled_ui(controls.config.randomize, |ui| {
                    ui.add(
                        egui::Slider::new(&mut controls.config.generator.num_rects, 1..=200)
                            .text("count"),
                    );
                    ui.checkbox(&mut controls.config.generator.allow_rotation, "Rotate");
                    ui.horizontal(|ui| {
                        ui.checkbox(&mut controls.use_seed, "Seed");
                        ui.add_enabled(controls.use_seed, egui::DragValue::new(&mut controls.seed));
                    });
                });
                ui.checkbox(&mut controls.config.include_covering, "Add covering rectangle");
                if ui.button("Regenerate").clicked() {
                    regenerate = true;
                }

                ui.separator();
                ui.label(format!("Input shapes: {}", stats.shape_count));
                match &stats.error {
                    Some(message) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, format!("Union failed: {message}"));
                    }
                    None => {
                        ui.label(format!("Polygons: {}", stats.polygon_count));
                        ui.label(format!("Holes: {}", stats.hole_count));
                        ui.label(format!("Area: {:.2}", stats.area));
                    }
                }
            });
        });
    regenerate
}
