use ::rand::{Rng, SeedableRng};
use macroquad::prelude::{Color, Vec2};
use rand_chacha::ChaCha8Rng;

/// RNG lent to effects while they spawn particles.
pub type EffectRng = ChaCha8Rng;

pub fn seeded(seed: Option<u64>) -> EffectRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Uniform value in `[min, max)`; returns `min` for an empty range.
pub fn range(rng: &mut EffectRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Uniform integer in `[min, max]`.
pub fn int(rng: &mut EffectRng, min: i32, max: i32) -> i32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

pub fn chance(rng: &mut EffectRng, probability: f32) -> bool {
    rng.gen::<f32>() < probability
}

pub fn angle(rng: &mut EffectRng) -> f32 {
    rng.gen_range(0.0..std::f32::consts::TAU)
}

/// Vector of random direction with length in `[min_len, max_len)`.
pub fn direction(rng: &mut EffectRng, min_len: f32, max_len: f32) -> Vec2 {
    Vec2::from_angle(angle(rng)) * range(rng, min_len, max_len)
}

/// Pick one palette entry; white for an empty palette.
pub fn pick(rng: &mut EffectRng, palette: &[Color]) -> Color {
    if palette.is_empty() {
        return Color::new(1.0, 1.0, 1.0, 1.0);
    }
    palette[rng.gen_range(0..palette.len())]
}
