use egui;

use emberfx::{EffectOptions, ParticleSystem, Surface};

use super::UiState;

/// Slim status strip + compact controls.
pub fn draw_toolbar<S: Surface>(
    ctx: &egui::Context,
    system: &mut ParticleSystem<S>,
    ui_state: &mut UiState,
) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "EMBERFX");

            ui.separator();
            compact_group(ui, "Loop", |ui| {
                let label = if system.is_running() { "Stop" } else { "Start" };
                if ui.button(label).clicked() {
                    if system.is_running() {
                        system.stop();
                    } else {
                        system.start();
                    }
                }
                if ui.button("Step").clicked() {
                    system.step();
                }
                if ui.button("Clear").clicked() {
                    system.clear();
                }
            });

            compact_group(ui, "Effect", |ui| effect_picker(ui, system));

            compact_group(ui, "Trigger", |ui| {
                ui.add(
                    egui::DragValue::new(&mut ui_state.intensity)
                        .range(0.1..=5.0)
                        .speed(0.05)
                        .prefix("x"),
                );
                if ui.button("Center").clicked() {
                    let (x, y) = (system.config().width / 2.0, system.config().height / 2.0);
                    let options = EffectOptions::new().with("intensity", ui_state.intensity as f64);
                    system.trigger_current(x, y, &options);
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
                ui.toggle_value(&mut ui_state.show_settings, "Settings");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            metric_chip(ui, "Particles", format!("{}", system.particle_count()));
            metric_chip(ui, "FPS", format!("{}", system.fps()));
            metric_chip(ui, "Frames", format!("{}", system.frame_count()));
            if let Some(ms) = system.frame_stats().frame_ms.last() {
                metric_chip(ui, "Frame", format!("{ms:.2}ms"));
            }
            metric_chip(ui, "Time scale", format!("{:.2}", system.config().time_scale));
            if !system.is_running() {
                status_chip(ui, "STOPPED", egui::Color32::from_rgb(220, 140, 90));
            }
        });
        ui.add_space(3.0);
    });
}

fn effect_picker<S: Surface>(ui: &mut egui::Ui, system: &mut ParticleSystem<S>) {
    let names: Vec<String> = system.effect_names().into_iter().map(str::to_string).collect();
    let current = system.current_effect_name().unwrap_or("none").to_string();
    let mut picked = None;
    egui::ComboBox::from_id_salt("effect_picker")
        .selected_text(current.as_str())
        .show_ui(ui, |ui| {
            for name in &names {
                let description = system
                    .effect(name)
                    .map(|e| e.config().description.clone())
                    .unwrap_or_default();
                if ui
                    .selectable_label(*name == current, name.as_str())
                    .on_hover_text(description)
                    .clicked()
                {
                    picked = Some(name.clone());
                }
            }
        });
    if let Some(name) = picked {
        system.set_current_effect(&name);
    }
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(255, 200, 150));
    ui.label(text);
}

fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(heading)
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            add_contents(ui);
        });
    });
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 215, 225));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(label).small().strong().color(color));
    });
}
