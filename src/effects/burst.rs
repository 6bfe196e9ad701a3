use macroquad::prelude::{Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_COUNT: usize = 14;
/// Pixels per progress unit.
const DEFAULT_SPEED: f32 = 3.0;
const LIFETIME: f32 = 16.0;
const DRAG: f32 = 0.08;

struct Spark {
    pos: Vec2,
    velocity: Vec2,
    color: Color,
    size: f32,
}

/// Radial spray of sparks that slow down, shrink and fade.
pub struct Burst {
    config: EffectConfig,
}

impl Default for Burst {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "burst",
                "Radial spark burst",
                &[rgb(204, 242, 255), rgb(255, 179, 26), rgb(255, 255, 255)],
            ),
        }
    }
}

impl Effect for Burst {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let count = style.count(options.usize("count").unwrap_or(DEFAULT_COUNT));
        let speed = options.f32("speed").unwrap_or(DEFAULT_SPEED);
        let origin = Vec2::new(x, y);

        (0..count)
            .map(|i| {
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU
                    + random::range(rng, -0.3, 0.3);
                let spark = Spark {
                    pos: origin,
                    velocity: Vec2::from_angle(angle) * speed * random::range(rng, 0.4, 1.0),
                    color: random::pick(rng, &style.colors),
                    size: random::range(rng, 1.5, 3.5),
                };
                let lifetime = style.lifetime(LIFETIME) * random::range(rng, 0.7, 1.0);
                Particle::new(x, y, lifetime).with_extra(spark)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Spark>(particle, frame_delta, |spark, t, dt| {
            spark.pos += spark.velocity * dt;
            spark.velocity *= 1.0 - DRAG * dt;
            1.0 - easing::linear(t)
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(spark) = visible::<Spark>(particle) else {
            return;
        };
        let size = spark.size * (0.3 + 0.7 * particle.alpha);
        surface.circle(spark.pos, size, color::faded(spark.color, particle.alpha));
    }
}
