use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_COUNT: usize = 12;
const LIFETIME: f32 = 36.0;

struct Puff {
    pos: Vec2,
    velocity: Vec2,
    radii: Vec2,
    growth: f32,
    rotation: f32,
    color: Color,
}

/// Soft puffs that swell and drift upward while thinning out.
pub struct Smoke {
    config: EffectConfig,
}

impl Default for Smoke {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "smoke",
                "Drifting smoke puffs",
                &[rgb(90, 90, 100), rgb(140, 140, 150), rgb(60, 60, 66)],
            )
            .with_duration_scale(1.25),
        }
    }
}

impl Effect for Smoke {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let count = style.count(options.usize("count").unwrap_or(DEFAULT_COUNT));
        let wind = options.f32("wind").unwrap_or(0.3);

        (0..count)
            .map(|i| {
                let base = random::range(rng, 6.0, 12.0);
                let puff = Puff {
                    pos: vec2(x, y) + random::direction(rng, 0.0, 8.0),
                    velocity: vec2(wind + random::range(rng, -0.3, 0.3), random::range(rng, -1.6, -0.8)),
                    radii: vec2(base * 1.3, base),
                    growth: random::range(rng, 0.15, 0.35),
                    rotation: random::angle(rng),
                    color: random::pick(rng, &style.colors),
                };
                Particle::new(x, y, style.lifetime(LIFETIME) * random::range(rng, 0.85, 1.15))
                    .with_delay((i / 4) as f32 * 3.0)
                    .with_extra(puff)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Puff>(particle, frame_delta, |puff, t, dt| {
            puff.pos += puff.velocity * dt;
            puff.velocity *= 1.0 - 0.02 * dt;
            puff.radii += Vec2::splat(puff.growth * dt);
            puff.rotation += 0.01 * dt;
            0.6 * (1.0 - easing::ease_out_quad(t))
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(puff) = visible::<Puff>(particle) else {
            return;
        };
        surface.ellipse(puff.pos, puff.radii, puff.rotation, color::faded(puff.color, particle.alpha));
    }
}
