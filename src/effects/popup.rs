use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::EffectRng;
use crate::surface::Surface;

const DEFAULT_TEXT: &str = "+1";
const DEFAULT_FONT_SIZE: f32 = 28.0;
const LIFETIME: f32 = 20.0;
const RISE: f32 = 40.0;

struct Label {
    text: String,
    anchor: Vec2,
    pos: Vec2,
    font_size: f32,
    scale: f32,
    color: Color,
}

/// Floating score text that pops in and drifts upward.
pub struct Popup {
    config: EffectConfig,
}

impl Default for Popup {
    fn default() -> Self {
        Self {
            config: EffectConfig::new("popup", "Floating text label", &[rgb(255, 230, 90)]),
        }
    }
}

impl Effect for Popup {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, _rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let label = Label {
            text: options.str("text").unwrap_or(DEFAULT_TEXT).to_string(),
            anchor: vec2(x, y),
            pos: vec2(x, y),
            font_size: options.f32("fontSize").unwrap_or(DEFAULT_FONT_SIZE),
            scale: 0.0,
            color: style.colors.first().copied().unwrap_or(rgb(255, 255, 255)),
        };
        vec![Particle::new(x, y, style.lifetime(LIFETIME)).with_extra(label)]
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Label>(particle, frame_delta, |label, t, _| {
            label.pos = label.anchor - vec2(0.0, RISE * easing::ease_out_cubic(t));
            label.scale = easing::ease_out_back((t * 4.0).min(1.0));
            1.0 - easing::ease_in_quad(t)
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(label) = visible::<Label>(particle) else {
            return;
        };
        let size = (label.font_size * label.scale).max(1.0);
        // Roughly center the label on its anchor.
        let half_width = label.text.chars().count() as f32 * size * 0.25;
        let origin = label.pos - vec2(half_width, 0.0);
        surface.text(&label.text, origin + vec2(1.5, 1.5), size, Color::new(0.0, 0.0, 0.0, 0.5 * particle.alpha));
        surface.text(&label.text, origin, size, color::faded(label.color, particle.alpha));
    }
}
