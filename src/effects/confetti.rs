use macroquad::prelude::{vec2, Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_COUNT: usize = 40;
const LIFETIME: f32 = 40.0;
const GRAVITY: f32 = 0.12;
const AIR_DRAG: f32 = 0.04;

struct Piece {
    pos: Vec2,
    velocity: Vec2,
    size: Vec2,
    rotation: f32,
    spin: f32,
    sway_phase: f32,
    color: Color,
}

/// Paper pieces thrown upward that tumble and flutter down.
pub struct Confetti {
    config: EffectConfig,
}

impl Default for Confetti {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "confetti",
                "Tumbling paper confetti",
                &[
                    rgb(255, 89, 94),
                    rgb(255, 202, 58),
                    rgb(138, 201, 38),
                    rgb(25, 130, 196),
                    rgb(106, 76, 147),
                ],
            ),
        }
    }
}

impl Effect for Confetti {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let count = style.count(options.usize("count").unwrap_or(DEFAULT_COUNT));
        let spread = options.f32("spread").unwrap_or(1.2);

        (0..count)
            .map(|_| {
                let angle = -std::f32::consts::FRAC_PI_2 + random::range(rng, -spread, spread) * 0.5;
                let piece = Piece {
                    pos: vec2(x, y),
                    velocity: Vec2::from_angle(angle) * random::range(rng, 3.0, 7.0),
                    size: vec2(random::range(rng, 5.0, 9.0), random::range(rng, 3.0, 5.0)),
                    rotation: random::angle(rng),
                    spin: random::range(rng, -0.3, 0.3),
                    sway_phase: random::angle(rng),
                    color: random::pick(rng, &style.colors),
                };
                Particle::new(x, y, style.lifetime(LIFETIME) * random::range(rng, 0.8, 1.2))
                    .with_extra(piece)
            })
            .collect()
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<Piece>(particle, frame_delta, |piece, t, dt| {
            piece.velocity.y += GRAVITY * dt;
            piece.velocity *= 1.0 - AIR_DRAG * dt;
            piece.sway_phase += 0.25 * dt;
            piece.pos += (piece.velocity + vec2(piece.sway_phase.sin() * 0.6, 0.0)) * dt;
            piece.rotation += piece.spin * dt;
            1.0 - easing::ease_in_quad(t)
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(piece) = visible::<Piece>(particle) else {
            return;
        };
        // Flip the visible height to fake a paper flutter.
        let flutter = piece.sway_phase.cos().abs().max(0.15);
        surface.rect(
            piece.pos,
            vec2(piece.size.x, piece.size.y * flutter),
            piece.rotation,
            color::faded(piece.color, particle.alpha),
        );
    }
}
