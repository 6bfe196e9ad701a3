use macroquad::prelude::{Color, Vec2};

use super::{step_active, visible};
use crate::color::{self, rgb};
use crate::easing;
use crate::effect::{Effect, EffectConfig, EffectOptions};
use crate::particle::Particle;
use crate::random::{self, EffectRng};
use crate::surface::Surface;

const DEFAULT_RADIUS: f32 = 48.0;
const DEFAULT_CELLS: usize = 6;
const LIFETIME: f32 = 30.0;

enum Part {
    /// Pulsing outline around the anchor.
    Dome { radius: f32, pulse: f32 },
    /// Small hex tile orbiting the dome.
    Cell { angle: f32, orbit: f32, size: f32, spin: f32 },
}

struct ShieldPiece {
    center: Vec2,
    part: Part,
    color: Color,
}

/// Hexagonal barrier: a pulsing dome ringed by orbiting cells.
pub struct Shield {
    config: EffectConfig,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            config: EffectConfig::new(
                "shield",
                "Hexagonal energy barrier",
                &[rgb(80, 220, 255), rgb(160, 120, 255)],
            ),
        }
    }
}

impl Effect for Shield {
    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn create(&self, x: f32, y: f32, options: &EffectOptions, rng: &mut EffectRng) -> Vec<Particle> {
        let style = self.config.style(options);
        let radius = options.f32("radius").unwrap_or(DEFAULT_RADIUS);
        let cells = style.count(options.usize("cells").unwrap_or(DEFAULT_CELLS));
        let lifetime = style.lifetime(LIFETIME);
        let center = Vec2::new(x, y);
        let tint = style.colors.first().copied().unwrap_or(rgb(255, 255, 255));

        let mut pieces = Vec::with_capacity(cells + 1);
        pieces.push(
            Particle::new(x, y, lifetime).with_extra(ShieldPiece {
                center,
                part: Part::Dome { radius, pulse: 0.0 },
                color: tint,
            }),
        );
        for i in 0..cells {
            let piece = ShieldPiece {
                center,
                part: Part::Cell {
                    angle: i as f32 / cells as f32 * std::f32::consts::TAU,
                    orbit: radius * random::range(rng, 0.55, 0.8),
                    size: radius * 0.18,
                    spin: random::range(rng, 0.04, 0.09),
                },
                color: random::pick(rng, &style.colors),
            };
            pieces.push(
                Particle::new(x, y, lifetime * 0.9)
                    .with_delay(i as f32)
                    .with_extra(piece),
            );
        }
        pieces
    }

    fn update(&self, particle: Particle, frame_delta: f32) -> Option<Particle> {
        step_active::<ShieldPiece>(particle, frame_delta, |piece, t, dt| {
            match &mut piece.part {
                Part::Dome { pulse, .. } => *pulse = easing::pulse((t * 4.0).fract()),
                Part::Cell { angle, spin, .. } => *angle += *spin * dt,
            }
            // Hold steady, fade over the last quarter.
            if t < 0.75 {
                1.0
            } else {
                1.0 - (t - 0.75) / 0.25
            }
        })
    }

    fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
        let Some(piece) = visible::<ShieldPiece>(particle) else {
            return;
        };
        let color = color::faded(piece.color, particle.alpha);
        match piece.part {
            Part::Dome { radius, pulse } => {
                surface.hexagon(piece.center, radius, 0.0, None, color::faded(color, 0.12));
                surface.hexagon(piece.center, radius * (1.0 + 0.05 * pulse), 0.0, Some(2.0 + pulse * 2.0), color);
            }
            Part::Cell { angle, orbit, size, .. } => {
                let pos = piece.center + Vec2::from_angle(angle) * orbit;
                surface.hexagon(pos, size, angle, Some(1.5), color);
            }
        }
    }
}
