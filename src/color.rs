use macroquad::prelude::Color;

use crate::error::EngineError;

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into a color.
pub fn parse_hex(value: &str) -> Result<Color, EngineError> {
    let invalid = || EngineError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b, a) = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (expand(0)?, expand(1)?, expand(2)?, 255)
        }
        6 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ),
        8 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::from_rgba(r, g, b, a))
}

/// Parse a palette, skipping entries that are not valid colors.
pub fn parse_palette<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Color> {
    values
        .into_iter()
        .filter_map(|v| match parse_hex(v) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("ignoring palette entry: {e}");
                None
            }
        })
        .collect()
}

/// Compile-time palette helper for built-in recipes.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

pub fn lerp(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

/// Sample a multi-stop gradient evenly spaced over [0, 1].
pub fn lerp_stops(stops: &[Color], t: f32) -> Color {
    match stops.len() {
        0 => Color::new(1.0, 1.0, 1.0, 1.0),
        1 => stops[0],
        n => {
            let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let idx = (scaled.floor() as usize).min(n - 2);
            lerp(stops[idx], stops[idx + 1], scaled - idx as f32)
        }
    }
}

/// Same color with its alpha multiplied by `alpha`.
pub fn faded(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * alpha.clamp(0.0, 1.0))
}
