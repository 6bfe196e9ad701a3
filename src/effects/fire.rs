use std::rc::Rc;

use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_COUNT: usize = 30;
const LIFETIME: f32 = 14.0;
/// Frames between successive ember waves.
const WAVE_SPACING: f32 = 2.0;
const EMBERS_PER_WAVE: usize = 3;

struct Ember {
    pos: Vec2,
    rise: f32,
    drift: f32,
    radius: f32,
    wobble: f32,
    heat: f32,
    age: f32,
    palette: Rc<[Color]>,
}

/// Column of rising embers that cool from yellow to deep red.
pub struct Fire {
    config: EffectConfig,
}

impl Default for Fire {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "fire",
                "Rising flame embers",
                &[rgb(255, 244, 163), rgb(255, 170, 40), rgb(235, 75, 20), rgb(120, 20, 10)],
            ),
        }
    }
}

impl Fire {
    fn ember_color(palette: &[Color], heat: f32, t: f32) -> Color {
        color::lerp_stops(palette, (t * heat).clamp(0.0, 1.0))
    }
}

impl Effect for Fire {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let count = style.count(options.usize("count").unwrap_or(DEFAULT_COUNT));
        let width = options.f32("width").unwrap_or(18.0);
        let palette: Rc<[Color]> = style.colors.clone().into();

        (0..count)
            .map(|i| {
                let ember = Ember {
                    pos: vec2(x + random::range(rng, -width, width) * 0.5, y),
                    rise: random::range(rng, 1.5, 3.0),
                    drift: random::range(rng, -0.4, 0.4),
                    radius: random::range(rng, 5.0, 11.0),
                    wobble: random::angle(rng),
                    heat: random::range(rng, 0.8, 1.2),
                    age: 0.0,
                    palette: Rc::clone(&palette),
                };
                let wave = (i / EMBERS_PER_WAVE) as f32;
                Particle::new(x, y, style.lifetime(LIFETIME) * random::range(rng, 0.8, 1.1))
                    .with_delay(wave * WAVE_SPACING)
                    .with_extra(ember)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Ember>(particle, frame_delta, |ember, t, dt| {
            ember.wobble += 0.6 * dt;
            ember.pos.y -= ember.rise * dt;
            ember.pos.x += (ember.drift + ember.wobble.sin() * 0.3) * dt;
            ember.radius *= 1.0 - 0.03 * dt;
            ember.age = t;
            // Flare in quickly, then burn out.
            if t < 0.15 {
                t / 0.15
            } else {
                1.0 - (t - 0.15) / 0.85
            }
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(ember) = visible::<Ember>(particle) else {
            return;
        };
        let core = Self::ember_color(&ember.palette, ember.heat, ember.age * 0.8);
        let rim = Self::ember_color(&ember.palette, ember.heat, ember.age + 0.3);
        surface.gradient_circle(
            ember.pos,
            ember.radius,
            color::faded(core, particle.alpha),
            color::faded(rim, 0.0),
        );
    }
}
