use std::any::Any;
use std::fmt;

/// Opaque identifier stamped by the engine when a particle is spawned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// One simulated visual entity.
///
/// The base fields are shared by every effect. Anything effect-specific
/// (velocity, size, color, rotation, ...) lives in the extension payload,
/// which only the owning effect reads.
pub struct Particle {
    /// Unset (`None`) until the engine stamps the particle in `trigger`.
    pub id: Option<ParticleId>,
    /// Spawn-time anchor; effects keep the rendered position in their payload.
    pub x: f32,
    pub y: f32,
    pub progress: f32,
    pub max_progress: f32,
    /// Frames the particle stays dormant before its lifetime starts.
    pub delay: f32,
    pub alpha: f32,
    /// Name of the effect that created this particle.
    pub owner: String,
    extra: Option<Box<dyn Any>>,
}

impl Particle {
    pub fn new(x: f32, y: f32, max_progress: f32) -> Self {
        Self {
            id: None,
            x,
            y,
            progress: 0.0,
            max_progress,
            delay: 0.0,
            alpha: 1.0,
            owner: String::new(),
            extra: None,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_extra<T: Any>(mut self, extra: T) -> Self {
        self.extra = Some(Box::new(extra));
        self
    }

    pub fn extra<T: Any>(&self) -> Option<&T> {
        self.extra.as_deref().and_then(|e| e.downcast_ref::<T>())
    }

    pub fn extra_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.extra.as_deref_mut().and_then(|e| e.downcast_mut::<T>())
    }

    pub fn has_extra(&self) -> bool {
        self.extra.is_some()
    }
}

impl fmt::Debug for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Particle")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("progress", &self.progress)
            .field("max_progress", &self.max_progress)
            .field("delay", &self.delay)
            .field("alpha", &self.alpha)
            .field("owner", &self.owner)
            .field("has_extra", &self.extra.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Velocity(f32, f32);

    #[test]
    fn extra_payload_downcasts_only_to_its_own_type() {
        let mut p = Particle::new(1.0, 2.0, 10.0).with_extra(Velocity(3.0, 4.0));
        assert_eq!(p.extra::<Velocity>(), Some(&Velocity(3.0, 4.0)));
        assert!(p.extra::<f32>().is_none());

        p.extra_mut::<Velocity>().unwrap().0 = 9.0;
        assert_eq!(p.extra::<Velocity>(), Some(&Velocity(9.0, 4.0)));
    }

    #[test]
    fn new_particle_starts_fresh() {
        let p = Particle::new(0.0, 0.0, 5.0).with_delay(2.0);
        assert!(p.id.is_none());
        assert_eq!(p.progress, 0.0);
        assert_eq!(p.delay, 2.0);
        assert_eq!(p.alpha, 1.0);
        assert!(!p.has_extra());
    }
}
