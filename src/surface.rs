//! The immediate-mode 2D drawing surface effects render onto.
//!
//! `Surface` is the only thing an effect's `draw` sees. The engine itself
//! only clears it, resizes it and writes the diagnostics overlay.

use macroquad::prelude::{Color, Vec2};

use crate::config::Background;
use crate::error::EngineError;

pub trait Surface {
    /// Obtain a usable 2D context. Called once at engine construction.
    fn acquire(&mut self) -> Result<(), EngineError>;

    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn resize(&mut self, width: f32, height: f32);

    /// Screen-space position of the surface's top-left corner.
    fn origin(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn clear(&mut self, background: Background);

    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn ring(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);
    /// `points`-pointed star; `rotation` in radians.
    fn star(&mut self, center: Vec2, points: u8, outer: f32, inner: f32, rotation: f32, color: Color);
    /// Rectangle centered on `center`, rotated about it by `rotation` radians.
    fn rect(&mut self, center: Vec2, size: Vec2, rotation: f32, color: Color);
    /// `pos` is the text baseline origin.
    fn text(&mut self, text: &str, pos: Vec2, font_size: f32, color: Color);
    /// Radial gradient from `inner` at the center to `outer` at the rim.
    fn gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color);
    /// Filled when `stroke` is `None`, outlined with that thickness otherwise.
    fn hexagon(&mut self, center: Vec2, radius: f32, rotation: f32, stroke: Option<f32>, color: Color);
    fn ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color);
}

/// One recorded primitive call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Background),
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, radius: f32, thickness: f32, color: Color },
    Line { from: Vec2, to: Vec2, thickness: f32, color: Color },
    Star { center: Vec2, points: u8, outer: f32, inner: f32, rotation: f32, color: Color },
    Rect { center: Vec2, size: Vec2, rotation: f32, color: Color },
    Text { text: String, pos: Vec2, font_size: f32, color: Color },
    GradientCircle { center: Vec2, radius: f32, inner: Color, outer: Color },
    Hexagon { center: Vec2, radius: f32, rotation: f32, stroke: Option<f32>, color: Color },
    Ellipse { center: Vec2, radii: Vec2, rotation: f32, color: Color },
}

impl DrawCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Clear(_) => "clear",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Ring { .. } => "ring",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Star { .. } => "star",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Text { .. } => "text",
            DrawCommand::GradientCircle { .. } => "gradient_circle",
            DrawCommand::Hexagon { .. } => "hexagon",
            DrawCommand::Ellipse { .. } => "ellipse",
        }
    }
}

/// Headless surface that records every call since the last clear.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    origin: Vec2,
    available: bool,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            origin: Vec2::ZERO,
            available: true,
            commands: Vec::new(),
        }
    }

    /// A surface with no 2D context; `acquire` fails.
    pub fn detached() -> Self {
        Self {
            available: false,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Background of the most recent clear, if any.
    pub fn last_clear(&self) -> Option<Background> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(bg) => Some(*bg),
            _ => None,
        })
    }

    /// Recorded primitives, excluding clears.
    pub fn primitive_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Clear(_)))
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn acquire(&mut self) -> Result<(), EngineError> {
        if self.available {
            Ok(())
        } else {
            Err(EngineError::SurfaceUnavailable(
                "recording surface is detached".to_string(),
            ))
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
    }

    fn origin(&self) -> Vec2 {
        self.origin
    }

    fn clear(&mut self, background: Background) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(background));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn ring(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Ring { center, radius, thickness, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, thickness, color });
    }

    fn star(&mut self, center: Vec2, points: u8, outer: f32, inner: f32, rotation: f32, color: Color) {
        self.commands.push(DrawCommand::Star { center, points, outer, inner, rotation, color });
    }

    fn rect(&mut self, center: Vec2, size: Vec2, rotation: f32, color: Color) {
        self.commands.push(DrawCommand::Rect { center, size, rotation, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            font_size,
            color,
        });
    }

    fn gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        self.commands.push(DrawCommand::GradientCircle { center, radius, inner, outer });
    }

    fn hexagon(&mut self, center: Vec2, radius: f32, rotation: f32, stroke: Option<f32>, color: Color) {
        self.commands.push(DrawCommand::Hexagon { center, radius, rotation, stroke, color });
    }

    fn ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        self.commands.push(DrawCommand::Ellipse { center, radii, rotation, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::{vec2, WHITE};

    #[test]
    fn clear_discards_previous_frame() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.circle(vec2(1.0, 1.0), 2.0, WHITE);
        surface.line(Vec2::ZERO, vec2(3.0, 3.0), 1.0, WHITE);
        assert_eq!(surface.primitive_count(), 2);

        surface.clear(Background::Transparent);
        assert_eq!(surface.primitive_count(), 0);
        assert_eq!(surface.last_clear(), Some(Background::Transparent));
    }

    #[test]
    fn detached_surface_refuses_context() {
        let mut surface = RecordingSurface::detached();
        assert!(matches!(
            surface.acquire(),
            Err(EngineError::SurfaceUnavailable(_))
        ));
    }
}
