use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_COUNT: usize = 10;
const LIFETIME: f32 = 28.0;
const GRAVITY: f32 = 0.08;
const TRAIL: f32 = 3.0;

struct Star {
    pos: Vec2,
    velocity: Vec2,
    rotation: f32,
    spin: f32,
    size: f32,
    points: u8,
    twinkle: f32,
    color: Color,
}

/// Stars popping out of the trigger point and falling with short trails.
pub struct Starfall {
    config: EffectConfig,
}

impl Default for Starfall {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "starfall",
                "Twinkling falling stars",
                &[rgb(255, 236, 130), rgb(255, 255, 255), rgb(255, 196, 90)],
            ),
        }
    }
}

impl Effect for Starfall {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let count = style.count(options.usize("count").unwrap_or(DEFAULT_COUNT));

        (0..count)
            .map(|i| {
                let star = Star {
                    pos: vec2(x, y),
                    velocity: vec2(random::range(rng, -2.5, 2.5), random::range(rng, -4.0, -1.5)),
                    rotation: random::angle(rng),
                    spin: random::range(rng, -0.2, 0.2),
                    size: random::range(rng, 5.0, 9.0),
                    points: if random::chance(rng, 0.25) { 4 } else { 5 },
                    twinkle: random::angle(rng),
                    color: random::pick(rng, &style.colors),
                };
                Particle::new(x, y, style.lifetime(LIFETIME) * random::range(rng, 0.8, 1.2))
                    .with_delay((i % 3) as f32)
                    .with_extra(star)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Star>(particle, frame_delta, |star, t, dt| {
            star.velocity.y += GRAVITY * dt;
            star.pos += star.velocity * dt;
            star.rotation += star.spin * dt;
            star.twinkle += 0.5 * dt;
            (1.0 - easing::ease_in_quad(t)) * (0.75 + 0.25 * star.twinkle.sin())
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(star) = visible::<Star>(particle) else {
            return;
        };
        let color = color::faded(star.color, particle.alpha);
        let tail = star.pos - star.velocity.normalize_or_zero() * star.size * TRAIL;
        surface.line(tail, star.pos, 1.5, color::faded(color, 0.4));
        surface.star(star.pos, star.points, star.size, star.size * 0.45, star.rotation, color);
    }
}
