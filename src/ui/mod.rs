pub mod graphs;
pub mod settings;
pub mod toolbar;

use emberfx::{ParticleSystem, Surface};

/// Tracks which UI panels are open plus values edited across frames.
pub struct UiState {
    pub show_graphs: bool,
    pub show_settings: bool,
    /// Multiplier sent as the `intensity` option by the toolbar's trigger button.
    pub intensity: f32,
    /// Hex text being edited in the settings panel.
    pub background_input: String,
    /// Last rejected settings change, shown until the next successful one.
    pub settings_error: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_graphs: false,
            show_settings: false,
            intensity: 1.0,
            background_input: "#101418".to_string(),
            settings_error: None,
        }
    }
}

/// Whether egui owns the pointer this frame; such clicks are not forwarded
/// to the engine.
pub fn wants_pointer() -> bool {
    let mut wants = false;
    egui_macroquad::cfg(|ctx| {
        wants = ctx.wants_pointer_input();
    });
    wants
}

/// Draw all egui UI panels.
pub fn draw_ui<S: Surface>(system: &mut ParticleSystem<S>, ui_state: &mut UiState) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, system, ui_state);

        if ui_state.show_settings {
            settings::draw_settings(ctx, system, ui_state);
        }

        if ui_state.show_graphs {
            graphs::draw_graphs(ctx, system.frame_stats());
        }
    });

    egui_macroquad::draw();
}
