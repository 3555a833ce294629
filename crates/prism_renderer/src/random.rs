//! Random number sources for sampling.
//!
//! Every component that needs randomness takes a `&mut dyn RandomSource`
//! argument. Production renders use [`SeededRandom`], one per bucket, so the
//! generator is never shared between threads; tests plug in [`FixedRandom`]
//! to make material decisions deterministic.

use crate::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed random values.
pub trait RandomSource {
    /// Uniform value in [0, 1).
    fn uniform_real(&mut self) -> f32;

    /// Vector with each component uniform in [0, 1).
    fn uniform_vec3(&mut self) -> Vec3 {
        Vec3::new(self.uniform_real(), self.uniform_real(), self.uniform_real())
    }

    /// Random point strictly inside the unit sphere (rejection sampling).
    fn vector_in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = 2.0 * self.uniform_vec3() - Vec3::ONE;
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Random axis index in {0, 1, 2}.
    fn axis(&mut self) -> usize {
        ((self.uniform_real() * 3.0) as usize).min(2)
    }
}

/// Seeded ChaCha-backed generator (`StdRng`).
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Independent stream `stream` derived from a base seed.
    ///
    /// Used to give each render bucket its own generator.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        // StdRng scrambles the seed itself; the odd multiplier only spreads
        // neighbouring stream ids apart
        Self::new(seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn uniform_real(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Deterministic fake returning the same values on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    real: f32,
    vector: Vec3,
}

impl FixedRandom {
    /// `real` is returned by every scalar draw and must lie in [0, 1).
    /// The unit-sphere vector defaults to zero.
    pub fn new(real: f32) -> Self {
        debug_assert!((0.0..1.0).contains(&real), "fixed value must be in [0, 1)");
        Self {
            real,
            vector: Vec3::ZERO,
        }
    }

    /// Set the vector returned by `vector_in_unit_sphere` (length < 1).
    pub fn with_vector(mut self, vector: Vec3) -> Self {
        debug_assert!(vector.length_squared() < 1.0, "vector must lie inside the unit sphere");
        self.vector = vector;
        self
    }
}

impl Default for FixedRandom {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RandomSource for FixedRandom {
    fn uniform_real(&mut self) -> f32 {
        self.real
    }

    fn vector_in_unit_sphere(&mut self) -> Vec3 {
        self.vector
    }
}
