//! The plugin contract every effect recipe implements.

use macroquad::prelude::Color;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::color;
use crate::config;
use crate::lifecycle;
use crate::particle::Particle;
use crate::random::EffectRng;
use crate::surface::Surface;

/// Static description of an effect.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    /// Registry key and the back-reference stored on every particle.
    pub name: String,
    pub description: String,
    /// Default palette.
    pub colors: Vec<Color>,
    /// Default multiplier for particle counts.
    pub intensity: f32,
    /// Default multiplier for particle lifetimes.
    pub duration_scale: f32,
}

impl EffectConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>, colors: &[Color]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            colors: colors.to_vec(),
            intensity: 1.0,
            duration_scale: 1.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_duration_scale(mut self, duration_scale: f32) -> Self {
        self.duration_scale = duration_scale;
        self
    }

    /// Palette, intensity and duration for one trigger, with per-trigger
    /// options (`colors`, `intensity`, `durationScale`) taking precedence.
    /// Non-finite or non-positive multipliers fall back to the defaults and
    /// large ones are capped.
    pub fn style(&self, options: &EffectOptions) -> EffectStyle {
        let colors = options
            .colors("colors")
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.colors.clone());
        let intensity = options
            .f32("intensity")
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(self.intensity);
        let duration_scale = options
            .f32("durationScale")
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(self.duration_scale);
        EffectStyle {
            colors,
            intensity: intensity.min(config::MAX_INTENSITY),
            duration_scale: duration_scale.min(config::MAX_DURATION_SCALE),
        }
    }
}

/// Resolved per-trigger styling.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectStyle {
    pub colors: Vec<Color>,
    pub intensity: f32,
    pub duration_scale: f32,
}

impl EffectStyle {
    /// `base` scaled by intensity, between one and `MAX_TRIGGER_PARTICLES`.
    pub fn count(&self, base: usize) -> usize {
        let scaled = (base as f32 * self.intensity).round() as usize;
        scaled.clamp(1, config::MAX_TRIGGER_PARTICLES)
    }

    pub fn lifetime(&self, base: f32) -> f32 {
        base * self.duration_scale
    }
}

/// Open option bag forwarded verbatim from `trigger` to `create`.
/// The engine interprets none of the keys.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct EffectOptions(Map<String, Value>);

impl EffectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn f32(&self, key: &str) -> Option<f32> {
        self.0.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn usize(&self, key: &str) -> Option<usize> {
        self.0.get(key).and_then(Value::as_u64).map(|v| v as usize)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A single color string or a list of them.
    pub fn colors(&self, key: &str) -> Option<Vec<Color>> {
        match self.0.get(key)? {
            Value::String(s) => Some(color::parse_palette([s.as_str()])),
            Value::Array(items) => Some(color::parse_palette(
                items.iter().filter_map(Value::as_str),
            )),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for EffectOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A named recipe that spawns, advances and draws its own particles.
///
/// The engine resolves the owner of every particle by name each frame and
/// dispatches to these methods; particles never hold a reference to their
/// effect.
pub trait Effect {
    fn config(&self) -> &EffectConfig;

    fn name(&self) -> &str {
        &self.config().name
    }

    /// Build the particles for one trigger at `(x, y)`. The engine stamps
    /// `id` and `owner` afterwards.
    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle>;

    /// Advance one particle by one frame; `None` removes it.
    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        lifecycle::fade_update(particle, frame_delta)
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;
    use serde_json::json;

    #[test]
    fn options_read_typed_values() {
        let options = EffectOptions::new()
            .with("count", 12)
            .with("speed", 2.5)
            .with("loop", true)
            .with("text", "+10");
        assert_eq!(options.usize("count"), Some(12));
        assert_eq!(options.f32("speed"), Some(2.5));
        assert_eq!(options.bool("loop"), Some(true));
        assert_eq!(options.str("text"), Some("+10"));
        assert_eq!(options.f32("text"), None);
        assert_eq!(options.f32("missing"), None);
    }

    #[test]
    fn options_deserialize_from_json_object() {
        let options: EffectOptions =
            serde_json::from_value(json!({"colors": ["#ff0000", "#00ff00"], "intensity": 2})).unwrap();
        assert_eq!(options.colors("colors").map(|c| c.len()), Some(2));
        assert_eq!(options.f32("intensity"), Some(2.0));
    }

    #[test]
    fn style_prefers_trigger_options_over_defaults() {
        let config = EffectConfig::new("sparks", "test", &[rgb(255, 255, 255)]).with_intensity(1.5);

        let defaults = config.style(&EffectOptions::new());
        assert_eq!(defaults.intensity, 1.5);
        assert_eq!(defaults.colors.len(), 1);
        assert_eq!(defaults.count(10), 15);

        let overridden = config.style(
            &EffectOptions::new()
                .with("colors", "#123456")
                .with("intensity", 0.01)
                .with("durationScale", 2.0),
        );
        assert_eq!(overridden.colors, vec![rgb(0x12, 0x34, 0x56)]);
        assert_eq!(overridden.count(10), 1);
        assert_eq!(overridden.lifetime(5.0), 10.0);
    }

    #[test]
    fn style_rejects_overflowing_multipliers() {
        let sparks = EffectConfig::new("sparks", "test", &[rgb(255, 255, 255)]);
        let style = sparks.style(
            &EffectOptions::new()
                .with("intensity", 1e300)
                .with("durationScale", 1e300),
        );
        assert_eq!(style.intensity, 1.0);
        assert_eq!(style.duration_scale, 1.0);

        let capped = sparks.style(&EffectOptions::new().with("intensity", 1e9).with("durationScale", 1e9));
        assert_eq!(capped.intensity, config::MAX_INTENSITY);
        assert_eq!(capped.duration_scale, config::MAX_DURATION_SCALE);
        assert_eq!(capped.count(usize::MAX), config::MAX_TRIGGER_PARTICLES);
        assert_eq!(capped.count(0), 1);
    }
}
