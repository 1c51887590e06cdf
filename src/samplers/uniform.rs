//! Uniform random sampler drawing minimal samples without replacement.

use log::trace;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Sample;
use crate::core::Sampler;
use crate::error::{Error, Result};

/// Uniform random sampler drawing minimal samples without replacement.
///
/// The random source is owned by the sampler. Use [`from_seed`](Self::from_seed)
/// or [`with_rng`](Self::with_rng) for reproducible runs.
#[derive(Debug, Clone)]
pub struct UniformSampler<R = StdRng> {
    rng: R,
}

impl Default for UniformSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSampler {
    /// Construct a new sampler seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Construct a sampler from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSampler<R> {
    /// Construct a sampler around a caller-supplied generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> Sampler for UniformSampler<R> {
    fn sample(&mut self, sample_size: usize, population_size: usize) -> Result<Sample> {
        if sample_size > population_size {
            return Err(Error::InsufficientPopulation {
                requested: sample_size,
                available: population_size,
            });
        }

        let mut sample = Sample::empty(population_size);
        if sample_size == 0 {
            return Ok(sample);
        }

        // Draws that hit an index already in the sample are retried. The
        // size check above keeps this loop finite.
        let dist = Uniform::new(0, population_size);
        let mut rejected = 0usize;
        while sample.len() < sample_size {
            if !sample.insert(dist.sample(&mut self.rng)) {
                rejected += 1;
            }
        }
        if rejected > 0 {
            trace!("uniform sampler retried {rejected} duplicate draws");
        }

        Ok(sample)
    }
}
