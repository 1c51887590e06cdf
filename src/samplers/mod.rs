//! Sampling strategies for the consensus engine.
//!
//! Every sampler implements the shared [`Sampler`](crate::core::Sampler)
//! trait and hands back a [`Sample`]: the drawn indices plus a membership
//! mask so the engine can skip sampled points in constant time.

pub mod uniform;

pub use uniform::UniformSampler;

/// Distinct population indices drawn for one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    indices: Vec<usize>,
    members: Vec<bool>,
}

impl Sample {
    /// Empty sample over a population of `population_size` records.
    pub fn empty(population_size: usize) -> Self {
        Self {
            indices: Vec::new(),
            members: vec![false; population_size],
        }
    }

    /// Add `index` unless it is already part of the sample.
    ///
    /// Returns `true` if the index was inserted.
    ///
    /// # Panics
    /// Panics if `index` is outside the population.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.members[index] {
            return false;
        }
        self.members[index] = true;
        self.indices.push(index);
        true
    }

    /// Drawn indices in draw order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Whether `index` was drawn.
    pub fn contains(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}
