//! Easing curves mapping normalized time in [0, 1] onto [0, 1].
//!
//! Inputs outside the unit range are clamped first, so every curve here is
//! safe to feed a raw `progress / max_progress` ratio.

use std::f32::consts::PI;

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -((PI * t).cos() - 1.0) / 2.0
}

/// Overshoots slightly past 1 before settling; the only curve here that
/// leaves the unit range mid-flight.
pub fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

/// Rises to 1 at the midpoint and falls back to 0.
pub fn pulse(t: f32) -> f32 {
    (PI * t.clamp(0.0, 1.0)).sin()
}
