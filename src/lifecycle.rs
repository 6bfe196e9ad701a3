//! The delay/progress timing convention shared by effect recipes.
//!
//! Every frame adds `frame_delta` to `progress`. A particle with a nonzero
//! `delay` stays dormant until `progress` exceeds `delay * frame_delta`;
//! after that its normalized lifetime is
//! `t = (progress - delay * frame_delta) / max_progress`, and `t >= 1` ends it.

use crate::easing;
use crate::particle::Particle;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifePhase {
    /// Still inside its delay window.
    Dormant,
    /// Alive at normalized time `t` in `[0, 1)`.
    Active(f32),
    Expired,
}

/// Advance `particle` by one frame and report where it is in its lifetime.
pub fn advance(particle: &mut Particle, frame_delta: f32) -> LifePhase {
    particle.progress += frame_delta;
    phase(particle, frame_delta)
}

/// Phase of `particle` without advancing it.
pub fn phase(particle: &Particle, frame_delta: f32) -> LifePhase {
    let start = particle.delay * frame_delta;
    if particle.progress <= start {
        return LifePhase::Dormant;
    }
    if particle.max_progress <= 0.0 {
        return LifePhase::Expired;
    }
    let t = (particle.progress - start) / particle.max_progress;
    if t >= 1.0 {
        LifePhase::Expired
    } else {
        LifePhase::Active(t)
    }
}

/// Standard fade: alpha follows `1 - ease_out_cubic(t)` and the particle
/// dies when its lifetime runs out. This is the default `Effect::update`.
pub fn fade_update(mut particle: Particle, frame_delta: f32) -> Option<Particle> {
    match advance(&mut particle, frame_delta) {
        LifePhase::Dormant => Some(particle),
        LifePhase::Active(t) => {
            particle.alpha = 1.0 - easing::ease_out_cubic(t);
            Some(particle)
        }
        LifePhase::Expired => None,
    }
}

/// Update applied by the engine to particles whose owner effect is not
/// registered. Dies once `progress >= max_progress + delay`, so an orphaned
/// particle can never live forever.
pub fn orphan_update(mut particle: Particle, frame_delta: f32) -> Option<Particle> {
    particle.progress += frame_delta;
    if particle.progress >= particle.max_progress + particle.delay {
        return None;
    }
    if let LifePhase::Active(t) = phase(&particle, frame_delta) {
        particle.alpha = 1.0 - easing::ease_out_cubic(t);
        if particle.alpha <= 0.0 {
            return None;
        }
    }
    Some(particle)
}
