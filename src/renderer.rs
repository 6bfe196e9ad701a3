use macroquad::prelude::*;

use crate::color;
use crate::config::Background;
use crate::error::EngineError;
use crate::input::PointerEvent;
use crate::surface::Surface;

const GRADIENT_STEPS: usize = 12;
const ELLIPSE_SEGMENTS: usize = 32;

/// Draws straight to the macroquad window.
///
/// Must be created inside the macroquad main loop; the window is the 2D
/// context, so `acquire` fails when it has no drawable area.
pub struct MacroquadSurface {
    width: f32,
    height: f32,
}

impl MacroquadSurface {
    pub fn new() -> Self {
        Self {
            width: screen_width(),
            height: screen_height(),
        }
    }

    /// Track window resizes made by the user rather than through `resize`.
    pub fn sync_window_size(&mut self) -> Option<(f32, f32)> {
        let (w, h) = (screen_width(), screen_height());
        if (w - self.width).abs() > 0.5 || (h - self.height).abs() > 0.5 {
            self.width = w;
            self.height = h;
            return Some((w, h));
        }
        None
    }
}

impl Default for MacroquadSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MacroquadSurface {
    fn acquire(&mut self) -> Result<(), EngineError> {
        let (w, h) = (screen_width(), screen_height());
        if w > 0.0 && h > 0.0 {
            Ok(())
        } else {
            Err(EngineError::SurfaceUnavailable(format!(
                "window has no drawable area ({w}x{h})"
            )))
        }
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        request_new_screen_size(width, height);
    }

    fn clear(&mut self, background: Background) {
        match background {
            Background::Solid(c) => clear_background(c),
            Background::Transparent => clear_background(BLANK),
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, color);
    }

    fn ring(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        draw_circle_lines(center.x, center.y, radius, thickness, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }

    fn star(&mut self, center: Vec2, points: u8, outer: f32, inner: f32, rotation: f32, color: Color) {
        let tips = points.max(2) as usize * 2;
        let vertex = |i: usize| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = rotation - std::f32::consts::FRAC_PI_2
                + i as f32 * std::f32::consts::TAU / tips as f32;
            center + Vec2::from_angle(angle) * radius
        };
        for i in 0..tips {
            draw_triangle(center, vertex(i), vertex((i + 1) % tips), color);
        }
    }

    fn rect(&mut self, center: Vec2, size: Vec2, rotation: f32, color: Color) {
        draw_rectangle_ex(
            center.x,
            center.y,
            size.x,
            size.y,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation,
                color,
            },
        );
    }

    fn text(&mut self, text: &str, pos: Vec2, font_size: f32, color: Color) {
        draw_text(text, pos.x, pos.y, font_size, color);
    }

    fn gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        // Concentric discs, outermost first, approximate the radial falloff.
        for step in 0..GRADIENT_STEPS {
            let t = step as f32 / (GRADIENT_STEPS - 1) as f32;
            let r = radius * (1.0 - t);
            if r <= 0.0 {
                break;
            }
            draw_circle(center.x, center.y, r, color::lerp(outer, inner, t));
        }
    }

    fn hexagon(&mut self, center: Vec2, radius: f32, rotation: f32, stroke: Option<f32>, color: Color) {
        let degrees = rotation.to_degrees();
        match stroke {
            Some(thickness) => draw_poly_lines(center.x, center.y, 6, radius, degrees, thickness, color),
            None => draw_poly(center.x, center.y, 6, radius, degrees, color),
        }
    }

    fn ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        let (sin, cos) = rotation.sin_cos();
        let point = |i: usize| {
            let a = i as f32 * std::f32::consts::TAU / ELLIPSE_SEGMENTS as f32;
            let local = vec2(a.cos() * radii.x, a.sin() * radii.y);
            center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
        };
        for i in 0..ELLIPSE_SEGMENTS {
            draw_triangle(center, point(i), point((i + 1) % ELLIPSE_SEGMENTS), color);
        }
    }
}

/// Left click in window coordinates, unless `captured` (an overlay UI owns
/// the pointer this frame).
pub fn poll_pointer(captured: bool) -> Option<PointerEvent> {
    if captured || !is_mouse_button_pressed(MouseButton::Left) {
        return None;
    }
    Some(PointerEvent::Click(Vec2::from(mouse_position())))
}
