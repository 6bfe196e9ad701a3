use egui;

use emberfx::stats::{FrameStats, RingBuffer};

/// Draw frame-time, particle-count and spawn-rate graphs.
pub fn draw_graphs(ctx: &egui::Context, stats: &FrameStats) {
    egui::Window::new("Statistics")
        .default_pos(egui::pos2(300.0, 340.0))
        .default_size(egui::vec2(400.0, 300.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.collapsing("Frame Time (ms)", |ui| {
                draw_line_graph(ui, &stats.frame_ms, egui::Color32::from_rgb(200, 200, 100), 2);
            });

            ui.collapsing("Particles", |ui| {
                draw_line_graph(ui, &stats.particle_count, egui::Color32::from_rgb(100, 200, 100), 0);
            });

            ui.collapsing("Spawned", |ui| {
                draw_line_graph(ui, &stats.spawned, egui::Color32::from_rgb(255, 150, 90), 0);
            });
        });
}

fn draw_line_graph(ui: &mut egui::Ui, buffer: &RingBuffer, color: egui::Color32, decimals: usize) {
    let size = egui::vec2(ui.available_width(), 80.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

    draw_line_in_rect(&painter, buffer, rect, color);

    if let Some(val) = buffer.last() {
        painter.text(
            egui::pos2(rect.right() - 4.0, rect.top() + 2.0),
            egui::Align2::RIGHT_TOP,
            format!("{val:.decimals$}"),
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(200),
        );
    }
}

fn draw_line_in_rect(
    painter: &egui::Painter,
    buffer: &RingBuffer,
    rect: egui::Rect,
    color: egui::Color32,
) {
    let len = buffer.len();
    if len < 2 {
        return;
    }

    // Zero-based so an idle engine sits on the floor of the graph.
    let max_val = buffer.max().unwrap_or(0.0).max(1.0);

    let points: Vec<egui::Pos2> = buffer
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
            let y = rect.bottom() - (v / max_val) * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(1.5, color));
    }
}
