use macroquad::prelude::Vec2;

/// Pointer input forwarded by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Primary-button click at a screen-space position.
    Click(Vec2),
}

/// The single click listener attached to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickBinding {
    origin: Vec2,
    size: Vec2,
}

impl ClickBinding {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn update_bounds(&mut self, origin: Vec2, size: Vec2) {
        self.origin = origin;
        self.size = size;
    }

    /// Surface-relative position of a screen-space point, or `None` when
    /// the point falls outside the surface.
    pub fn translate(&self, screen: Vec2) -> Option<Vec2> {
        let local = screen - self.origin;
        let inside = local.x >= 0.0
            && local.y >= 0.0
            && local.x < self.size.x
            && local.y < self.size.y;
        inside.then_some(local)
    }
}
