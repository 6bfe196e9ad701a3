use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_RINGS: usize = 3;
const DEFAULT_RADIUS: f32 = 90.0;
const LIFETIME: f32 = 12.0;
/// Frames between consecutive rings.
const RING_STAGGER: f32 = 5.0;

struct Wave {
    center: Vec2,
    max_radius: f32,
    radius: f32,
    thickness: f32,
    color: Color,
}

/// Concentric rings expanding out of the impact point, one after another.
pub struct Shockwave {
    config: EffectConfig,
}

impl Default for Shockwave {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "shockwave",
                "Staggered expanding rings",
                &[rgb(130, 200, 255), rgb(230, 245, 255)],
            ),
        }
    }
}

impl Effect for Shockwave {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let rings = style.count(options.usize("rings").unwrap_or(DEFAULT_RINGS));
        let max_radius = options.f32("radius").unwrap_or(DEFAULT_RADIUS);

        (0..rings)
            .map(|i| {
                let wave = Wave {
                    center: vec2(x, y),
                    max_radius: max_radius * (1.0 - i as f32 * 0.12).max(0.3),
                    radius: 0.0,
                    thickness: 4.0,
                    // Inner rings take later palette entries.
                    color: match style.colors.get(i % style.colors.len().max(1)) {
                        Some(c) => *c,
                        None => random::pick(rng, &style.colors),
                    },
                };
                Particle::new(x, y, style.lifetime(LIFETIME))
                    .with_delay(i as f32 * RING_STAGGER)
                    .with_extra(wave)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Wave>(particle, frame_delta, |wave, t, _| {
            wave.radius = wave.max_radius * easing::ease_out_cubic(t);
            wave.thickness = 1.0 + 5.0 * (1.0 - t);
            1.0 - easing::ease_in_quad(t)
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(wave) = visible::<Wave>(particle) else {
            return;
        };
        let color = color::faded(wave.color, particle.alpha);
        surface.ring(wave.center, wave.radius.max(1.0), wave.thickness, color);
        surface.circle(wave.center, wave.radius * 0.15, color::faded(color, 0.35));
    }
}
