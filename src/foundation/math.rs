use crate::foundation::core::DVec3;
use xxhash_rust::xxh3::xxh3_64_with_seed;

const ID_SEED: u64 = 0x5ce7_1d0c_4a11_9e3b;

/// Deterministic SplitMix64 generator.
///
/// Every random draw in the engine comes from one of these, seeded from stable identifiers.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mix64(self.state)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniformly distributed unit vector.
    pub fn unit_vector(&mut self) -> DVec3 {
        let z = self.range(-1.0, 1.0);
        let theta = self.range(0.0, std::f64::consts::TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        DVec3::new(r * theta.cos(), r * theta.sin(), z)
    }
}

/// SplitMix64 finalizer.
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stable seed for a string identifier (shot id, card id).
pub fn seed_for_id(id: &str) -> u64 {
    xxh3_64_with_seed(id.as_bytes(), ID_SEED)
}

/// Combine a base seed with an index into an independent stream seed.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    mix64(base ^ index.wrapping_mul(0xD6E8_FEB8_6659_FD93))
}

/// Hash-based lattice value in `[0, 1)`.
pub fn noise01(seed: u64, x: u64) -> f64 {
    let mut rng = Rng64::new(seed ^ x.wrapping_mul(0xD6E8_FEB8_6659_FD93));
    rng.next_f64_01()
}

/// Smooth 1D value noise in `[-1, 1]` over lattice steps.
///
/// `x` is measured in lattice steps; integer `x` lands exactly on a lattice value.
pub fn value_noise(seed: u64, x: f64) -> f64 {
    let x = if x.is_finite() { x.max(0.0) } else { 0.0 };
    let i0 = x.floor();
    let t = x - i0;
    let i0u = i0 as u64;
    let a = noise01(seed, i0u) * 2.0 - 1.0;
    let b = noise01(seed, i0u.wrapping_add(1)) * 2.0 - 1.0;
    let s = t * t * (3.0 - 2.0 * t);
    a + (b - a) * s
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
