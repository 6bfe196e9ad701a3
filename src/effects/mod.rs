//! Built-in effect recipes.
//!
//! Each recipe is an ordinary `Effect` plugin; the engine knows nothing
//! about their payloads. All of them follow the delay/progress convention
//! from `lifecycle`, and draw nothing while dormant.

mod burst;
mod confetti;
mod fire;
mod popup;
mod shield;
mod shockwave;
mod smoke;
mod starfall;

use std::any::Any;

pub use burst::Burst;
pub use confetti::Confetti;
pub use fire::Fire;
pub use popup::Popup;
pub use shield::Shield;
pub use shockwave::Shockwave;
pub use smoke::Smoke;
pub use starfall::Starfall;

use crate::easing;
use crate::effect::Effect;
use crate::lifecycle::{self, LifePhase};
use crate::particle::Particle;

/// Every built-in recipe, ready for `register_effects`.
pub fn builtin() -> Vec<Box<dyn Effect>> {
    vec![
        Box::new(Burst::default()),
        Box::new(Confetti::default()),
        Box::new(Fire::default()),
        Box::new(Popup::default()),
        Box::new(Shield::default()),
        Box::new(Shockwave::default()),
        Box::new(Smoke::default()),
        Box::new(Starfall::default()),
    ]
}

/// Advance `particle`; while active, `animate` moves its payload and
/// returns the new alpha. Dormant particles get alpha 0 so `draw` skips them.
/// A particle without a `T` payload falls back to the plain fade.
fn step_active<T: Any>(
    mut particle: Particle,
    frame_delta: f32,
    animate: impl FnOnce(&mut T, f32, f32) -> f32,
) -> Option<Particle> {
    match lifecycle::advance(&mut particle, frame_delta) {
        LifePhase::Dormant => {
            particle.alpha = 0.0;
            Some(particle)
        }
        LifePhase::Active(t) => {
            let alpha = match particle.extra_mut::<T>() {
                Some(state) => animate(state, t, frame_delta),
                None => 1.0 - easing::ease_out_cubic(t),
            };
            particle.alpha = alpha.clamp(0.0, 1.0);
            Some(particle)
        }
        LifePhase::Expired => None,
    }
}

/// Payload of a visible particle, `None` when dormant, faded out or foreign.
fn visible<T: Any>(particle: &Particle) -> Option<&T> {
    if particle.alpha <= 0.0 {
        return None;
    }
    particle.extra::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::effect::EffectOptions;
    use crate::random;
    use crate::surface::{DrawCommand, RecordingSurface, Surface};

    const FRAME_DELTA: f32 = 0.4;

    fn run_to_death(effect: &dyn Effect, particle: Particle) -> usize {
        let bound = ((particle.max_progress + particle.delay * FRAME_DELTA) / FRAME_DELTA).ceil()
            as usize
            + 2;
        let mut particle = particle;
        for calls in 1..=bound {
            match effect.update(particle, FRAME_DELTA) {
                Some(p) => particle = p,
                None => return calls,
            }
        }
        panic!("{} particle outlived {bound} updates", effect.name());
    }

    #[test]
    fn builtin_names_are_unique() {
        let effects = builtin();
        let mut names: Vec<&str> = effects.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), effects.len());
    }

    #[test]
    fn every_builtin_particle_dies() {
        let mut rng = random::seeded(Some(5));
        for effect in builtin() {
            let particles = effect.create(100.0, 100.0, &EffectOptions::new(), &mut rng);
            assert!(!particles.is_empty(), "{} spawned nothing", effect.name());
            for particle in particles {
                run_to_death(effect.as_ref(), particle);
            }
        }
    }

    #[test]
    fn every_builtin_draws_once_active() {
        let mut rng = random::seeded(Some(8));
        for effect in builtin() {
            let mut surface = RecordingSurface::new(400.0, 400.0);
            surface.clear(EngineConfig::default().background);
            let mut particles: Vec<Particle> = effect
                .create(200.0, 200.0, &EffectOptions::new(), &mut rng)
                .into_iter()
                .filter(|p| p.delay == 0.0)
                .collect();
            assert!(!particles.is_empty(), "{} has no undelayed particle", effect.name());

            particles = particles
                .into_iter()
                .filter_map(|p| effect.update(p, FRAME_DELTA))
                .collect();
            for particle in &particles {
                effect.draw(&mut surface, particle);
            }
            assert!(surface.primitive_count() > 0, "{} drew nothing", effect.name());
        }
    }

    #[test]
    fn oversized_trigger_options_stay_bounded_and_mortal() {
        let mut system = crate::system::ParticleSystem::new(
            RecordingSurface::new(200.0, 200.0),
            EngineConfig::default(),
        )
        .unwrap();
        system.register_effects(builtin());

        let huge = [
            EffectOptions::new().with("intensity", 1e300),
            EffectOptions::new().with("durationScale", 1e300),
            EffectOptions::new().with("count", u64::MAX),
        ];
        for options in &huge {
            let spawned = system.trigger("burst", 100.0, 100.0, options);
            assert!((1..=crate::config::MAX_TRIGGER_PARTICLES).contains(&spawned));
        }

        let longest = system
            .particles()
            .iter()
            .map(|p| p.max_progress + p.delay * FRAME_DELTA)
            .fold(0.0, f32::max);
        let bound = (longest / FRAME_DELTA).ceil() as usize + 2;
        for _ in 0..bound {
            system.step();
        }
        assert_eq!(system.particle_count(), 0);
    }

    #[test]
    fn smoke_lingers_past_its_base_lifetime() {
        let effect = Smoke::default();
        assert_eq!(effect.config().duration_scale, 1.25);
        let mut rng = random::seeded(Some(3));
        for particle in effect.create(0.0, 0.0, &EffectOptions::new(), &mut rng) {
            assert!(particle.max_progress >= 36.0 * 1.25 * 0.85);
        }
    }

    #[test]
    fn dormant_particles_are_not_drawn() {
        let effect = Shockwave::default();
        let mut rng = random::seeded(Some(1));
        let delayed = effect
            .create(0.0, 0.0, &EffectOptions::new(), &mut rng)
            .into_iter()
            .find(|p| p.delay > 0.0)
            .expect("shockwave staggers its rings");

        let delayed = effect.update(delayed, FRAME_DELTA).unwrap();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        effect.draw(&mut surface, &delayed);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn palette_option_overrides_default_colors() {
        let effect = Confetti::default();
        let mut rng = random::seeded(Some(2));
        let options = EffectOptions::new().with("colors", vec!["#00ff00"]).with("count", 5);
        let particles: Vec<Particle> = effect
            .create(0.0, 0.0, &options, &mut rng)
            .into_iter()
            .filter_map(|p| effect.update(p, FRAME_DELTA))
            .collect();
        assert_eq!(particles.len(), 5);

        let mut surface = RecordingSurface::new(10.0, 10.0);
        for p in &particles {
            effect.draw(&mut surface, p);
        }
        for command in surface.commands() {
            if let DrawCommand::Rect { color, .. } = command {
                assert_eq!((color.r, color.g, color.b), (0.0, 1.0, 0.0));
            }
        }
    }
}
