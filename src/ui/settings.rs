use egui;

use emberfx::{Background, ConfigPatch, EngineError, ParticleSystem, Surface};

use super::UiState;

/// Runtime settings panel; every change goes through `update_config`.
pub fn draw_settings<S: Surface>(
    ctx: &egui::Context,
    system: &mut ParticleSystem<S>,
    ui_state: &mut UiState,
) {
    egui::Window::new("Settings")
        .default_pos(egui::pos2(300.0, 60.0))
        .default_size(egui::vec2(280.0, 260.0))
        .resizable(true)
        .show(ctx, |ui| {
            let mut patch = ConfigPatch::default();

            ui.heading("Simulation");
            let mut time_scale = system.config().time_scale;
            if ui
                .add(egui::Slider::new(&mut time_scale, 0.5..=10.0).text("Time scale"))
                .on_hover_text("Frames per unit of particle progress")
                .changed()
            {
                patch.time_scale = Some(time_scale);
            }
            ui.label(format!("Progress per frame: {:.3}", system.config().frame_delta()));

            ui.separator();
            ui.heading("Background");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut ui_state.background_input);
                if ui.button("Apply").clicked() {
                    match Background::parse(&ui_state.background_input) {
                        Ok(background) => patch.background_color = Some(background),
                        Err(e) => ui_state.settings_error = Some(e.to_string()),
                    }
                }
                if ui.button("Transparent").clicked() {
                    patch.background_color = Some(Background::Transparent);
                }
            });

            ui.separator();
            ui.heading("Overlay");
            let mut show_fps = system.config().show_fps;
            if ui.checkbox(&mut show_fps, "Show FPS").changed() {
                patch.show_fps = Some(show_fps);
            }
            let mut show_count = system.config().show_particle_count;
            if ui.checkbox(&mut show_count, "Show particle count").changed() {
                patch.show_particle_count = Some(show_count);
            }

            if patch != ConfigPatch::default() {
                apply(system, &patch, ui_state);
            }
            if let Some(message) = &ui_state.settings_error {
                ui.colored_label(egui::Color32::from_rgb(255, 110, 110), message);
            }
        });
}

fn apply<S: Surface>(system: &mut ParticleSystem<S>, patch: &ConfigPatch, ui_state: &mut UiState) {
    match system.update_config(patch) {
        Ok(()) => ui_state.settings_error = None,
        Err(EngineError::InvalidConfig(message)) => ui_state.settings_error = Some(message),
        Err(e) => ui_state.settings_error = Some(e.to_string()),
    }
}
