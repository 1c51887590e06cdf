//! Core traits and the consensus engine.
//!
//! - [`Model`]: what a concrete estimator must provide (fit, per-point loss,
//!   aggregate loss, deep copy through `Clone`).
//! - [`Sampler`]: draws the minimal subsets that seed each fit.
//! - [`Ransac`]: the engine running the trial loop and retaining the best
//!   model seen so far.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::population::Population;
use crate::samplers::{Sample, UniformSampler};
use crate::settings::RansacSettings;

/// Estimator whose parameters are fitted by the consensus engine.
///
/// `Clone` must produce a fully independent copy: refitting the clone never
/// changes the scores of the instance it came from, and vice versa. The
/// engine keeps the best model as such a copy while it refits the working one.
pub trait Model: Clone {
    /// Minimum number of indices [`fit`](Self::fit) accepts.
    fn min_sample_size(&self) -> usize;

    /// Recompute the parameters from exactly the given indices.
    ///
    /// Implementations return [`Error::TooFewPoints`] for fewer than
    /// [`min_sample_size`](Self::min_sample_size) indices and
    /// [`Error::DegenerateSample`] when the subset cannot define a model.
    fn fit(&mut self, population: &Population, indices: &[usize]) -> Result<()>;

    /// Non-negative loss of one point against the current parameters.
    fn score_one(&self, population: &Population, index: usize) -> f64;

    /// Aggregate loss over a consensus set. Lower is strictly better.
    fn score_set(&self, population: &Population, indices: &[usize]) -> f64;
}

/// Sampler responsible for drawing minimal samples from the population.
pub trait Sampler {
    /// Draw `sample_size` distinct indices from `0..population_size`.
    ///
    /// Fails with [`Error::InsufficientPopulation`] when
    /// `sample_size > population_size`.
    fn sample(&mut self, sample_size: usize, population_size: usize) -> Result<Sample>;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn sample(&mut self, sample_size: usize, population_size: usize) -> Result<Sample> {
        (**self).sample(sample_size, population_size)
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn sample(&mut self, sample_size: usize, population_size: usize) -> Result<Sample> {
        (**self).sample(sample_size, population_size)
    }
}

/// Best model retained by a run.
#[derive(Debug, Clone)]
pub struct EstimationResult<M> {
    /// Independent copy of the working model taken at promotion time.
    pub model: M,
    /// Aggregate loss of `inliers` under `model`.
    pub loss: f64,
    /// Consensus set: the sampled indices followed by the inliers found.
    pub inliers: Vec<usize>,
    /// Zero-based trial that produced the model.
    pub trial: usize,
    /// Number of trials executed by the run.
    pub iterations: usize,
}

/// Lifecycle of a [`Ransac`] engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, never run.
    Idle,
    /// Inside [`Ransac::run`] or [`Ransac::run_while`].
    Running,
    /// A run has returned, successfully or not.
    Done,
}

/// Consensus engine.
#[derive(Debug)]
pub struct Ransac<S = UniformSampler> {
    settings: RansacSettings,
    sampler: S,
    state: EngineState,
}

impl Ransac<UniformSampler> {
    /// Engine with a uniform sampler seeded from OS entropy.
    pub fn new(settings: RansacSettings) -> Self {
        Self::with_sampler(settings, UniformSampler::new())
    }

    /// Engine with a uniform sampler seeded from `seed`.
    pub fn seeded(settings: RansacSettings, seed: u64) -> Self {
        Self::with_sampler(settings, UniformSampler::from_seed(seed))
    }
}

impl<S: Sampler> Ransac<S> {
    /// Engine drawing its samples from `sampler`.
    pub fn with_sampler(settings: RansacSettings, sampler: S) -> Self {
        Self {
            settings,
            sampler,
            state: EngineState::Idle,
        }
    }

    /// Settings used by the next run.
    pub fn settings(&self) -> &RansacSettings {
        &self.settings
    }

    /// Mutable settings; changes apply from the next run.
    pub fn settings_mut(&mut self) -> &mut RansacSettings {
        &mut self.settings
    }

    /// The owned sampler, e.g. to reseed it between runs.
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run every configured trial and return the best model found.
    ///
    /// `model` is the working instance: it is refitted on every trial and is
    /// left holding the last trial's fit. `Ok(None)` means no consensus set
    /// ever exceeded `threshold_point`.
    pub fn run<M: Model>(
        &mut self,
        population: &Population,
        model: &mut M,
    ) -> Result<Option<EstimationResult<M>>> {
        self.run_while(population, model, |_| true)
    }

    /// Like [`run`](Self::run), but asks `keep_going` before each trial.
    ///
    /// `keep_going` receives the zero-based trial number; returning `false`
    /// stops the run and returns the best model found so far.
    pub fn run_while<M, F>(
        &mut self,
        population: &Population,
        model: &mut M,
        keep_going: F,
    ) -> Result<Option<EstimationResult<M>>>
    where
        M: Model,
        F: FnMut(usize) -> bool,
    {
        self.state = EngineState::Running;
        let outcome = self.consensus_loop(population, model, keep_going);
        self.state = EngineState::Done;
        outcome
    }

    fn consensus_loop<M, F>(
        &mut self,
        population: &Population,
        model: &mut M,
        mut keep_going: F,
    ) -> Result<Option<EstimationResult<M>>>
    where
        M: Model,
        F: FnMut(usize) -> bool,
    {
        let settings = self.settings;
        settings.validate()?;

        let n = population.len();
        if settings.sample_size > n {
            return Err(Error::InsufficientPopulation {
                requested: settings.sample_size,
                available: n,
            });
        }

        let mut best: Option<EstimationResult<M>> = None;
        let mut consensus: Vec<usize> = Vec::with_capacity(n);
        let mut trials = 0;

        for trial in 0..settings.iterations {
            if !keep_going(trial) {
                debug!("consensus run stopped by caller before trial {trial}");
                break;
            }
            trials += 1;

            let sample = self.sampler.sample(settings.sample_size, n)?;
            match model.fit(population, sample.indices()) {
                Ok(()) => {}
                Err(err) if err.is_recoverable() => {
                    debug!("trial {trial}: {err}, skipping");
                    continue;
                }
                Err(err) => return Err(err),
            }

            consensus.clear();
            consensus.extend_from_slice(sample.indices());
            consensus.extend((0..n).filter(|&i| {
                !sample.contains(i) && model.score_one(population, i) < settings.threshold_loss
            }));
            trace!("trial {trial}: consensus of {} points", consensus.len());

            if consensus.len() <= settings.threshold_point {
                continue;
            }

            let loss = model.score_set(population, &consensus);
            if loss.is_nan() {
                debug!("trial {trial}: aggregate loss is NaN, skipping");
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => loss < current.loss,
            };
            if better {
                debug!(
                    "trial {trial}: new best model, loss {loss:.6} over {} points",
                    consensus.len()
                );
                best = Some(EstimationResult {
                    model: model.clone(),
                    loss,
                    inliers: consensus.clone(),
                    trial,
                    iterations: 0,
                });
            }
        }

        match &best {
            Some(result) => debug!(
                "consensus run finished after {trials} trials, best loss {:.6} from trial {}",
                result.loss, result.trial
            ),
            None => debug!("consensus run finished after {trials} trials without a model"),
        }

        Ok(best.map(|result| EstimationResult {
            iterations: trials,
            ..result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::collections::VecDeque;

    use crate::types::DataMatrix;

    /// Model scripted by the data: column 0 is each point's loss and column 1
    /// is the aggregate loss reported when that point seeds the fit.
    #[derive(Clone, Debug, Default)]
    struct ScriptedModel {
        fitted_from: Option<usize>,
        fit_calls: usize,
        set_calls: Cell<usize>,
    }

    impl Model for ScriptedModel {
        fn min_sample_size(&self) -> usize {
            1
        }

        fn fit(&mut self, _population: &Population, indices: &[usize]) -> Result<()> {
            self.fit_calls += 1;
            let Some(&first) = indices.first() else {
                return Err(Error::TooFewPoints { needed: 1, got: 0 });
            };
            self.fitted_from = Some(first);
            Ok(())
        }

        fn score_one(&self, population: &Population, index: usize) -> f64 {
            population.value(index, 0)
        }

        fn score_set(&self, population: &Population, _indices: &[usize]) -> f64 {
            self.set_calls.set(self.set_calls.get() + 1);
            self.fitted_from
                .map_or(f64::INFINITY, |i| population.value(i, 1))
        }
    }

    /// Sampler handing out a fixed sequence of samples.
    struct ScriptedSampler {
        samples: VecDeque<Vec<usize>>,
    }

    impl ScriptedSampler {
        fn new(samples: &[&[usize]]) -> Self {
            Self {
                samples: samples.iter().map(|s| s.to_vec()).collect(),
            }
        }
    }

    impl Sampler for ScriptedSampler {
        fn sample(&mut self, _sample_size: usize, population_size: usize) -> Result<Sample> {
            let mut sample = Sample::empty(population_size);
            for i in self.samples.pop_front().unwrap_or_default() {
                sample.insert(i);
            }
            Ok(sample)
        }
    }

    fn all_inliers(n: usize) -> Population {
        Population::from_matrix(DataMatrix::zeros(n, 2))
    }

    #[test]
    fn sample_larger_than_population_fails_before_any_trial() {
        let population = all_inliers(3);
        let settings = RansacSettings::default().with_sample_size(4);
        let mut engine = Ransac::seeded(settings, 0);
        let mut model = ScriptedModel::default();

        let err = engine.run(&population, &mut model).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientPopulation {
                requested: 4,
                available: 3
            }
        ));
        assert_eq!(model.fit_calls, 0);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn invalid_settings_fail_fast() {
        let population = all_inliers(3);
        let settings = RansacSettings::default().with_iterations(0);
        let mut engine = Ransac::seeded(settings, 0);
        let mut model = ScriptedModel::default();

        assert!(matches!(
            engine.run(&population, &mut model),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn fit_errors_abort_the_run() {
        let population = all_inliers(5);
        let settings = RansacSettings::default()
            .with_sample_size(0)
            .with_threshold_point(0);
        let mut engine = Ransac::seeded(settings, 0);
        let mut model = ScriptedModel::default();

        assert!(matches!(
            engine.run(&population, &mut model),
            Err(Error::TooFewPoints { needed: 1, got: 0 })
        ));
        assert_eq!(model.fit_calls, 1);
    }

    #[test]
    fn state_moves_from_idle_to_done() {
        let population = all_inliers(20);
        let mut engine = Ransac::seeded(RansacSettings::default().with_iterations(5), 3);
        assert_eq!(engine.state(), EngineState::Idle);

        let mut model = ScriptedModel::default();
        let result = engine.run(&population, &mut model).unwrap();
        assert_eq!(engine.state(), EngineState::Done);

        let result = result.expect("every point is an inlier");
        assert_eq!(result.iterations, 5);
        assert_eq!(result.inliers.len(), 20);
        assert_eq!(model.fit_calls, 5);
    }

    #[test]
    fn consensus_starts_with_sample_and_skips_sampled_points() {
        // Besides the sampled point 4, only points 1 and 3 fall below 0.5.
        let population = Population::from_rows(&[
            [0.9, 0.0],
            [0.1, 0.0],
            [0.7, 0.0],
            [0.2, 0.0],
            [5.0, 0.3],
        ]);
        let settings = RansacSettings::new(1, 0.5, 2, 1).unwrap();
        let mut engine = Ransac::with_sampler(settings, ScriptedSampler::new(&[&[4]]));
        let mut model = ScriptedModel::default();

        let result = engine.run(&population, &mut model).unwrap().unwrap();
        assert_eq!(result.inliers, vec![4, 1, 3]);
        assert_eq!(result.model.fitted_from, Some(4));
        assert!((result.loss - 0.3).abs() < 1e-12);
    }

    #[test]
    fn threshold_point_is_exclusive() {
        // Every consensus set holds exactly 2 points.
        let population = Population::from_rows(&[[0.0, 0.1], [0.0, 0.1], [9.0, 0.1], [9.0, 0.1]]);
        let settings = RansacSettings::new(3, 0.5, 2, 1).unwrap();
        let samples: &[&[usize]] = &[&[0], &[1], &[0]];
        let mut engine = Ransac::with_sampler(settings, ScriptedSampler::new(samples));
        let mut model = ScriptedModel::default();

        assert!(engine.run(&population, &mut model).unwrap().is_none());
        assert_eq!(model.fit_calls, 3);
        assert_eq!(model.set_calls.get(), 0);
    }

    #[test]
    fn threshold_point_at_population_size_never_promotes() {
        let population = all_inliers(12);
        let settings = RansacSettings::default().with_threshold_point(12);
        let mut engine = Ransac::seeded(settings, 5);
        let mut model = ScriptedModel::default();

        assert!(engine.run(&population, &mut model).unwrap().is_none());
    }

    #[test]
    fn equal_loss_keeps_earliest_model() {
        let population = all_inliers(4);
        let settings = RansacSettings::new(3, 0.5, 0, 1).unwrap();
        let samples: &[&[usize]] = &[&[2], &[0], &[3]];
        let mut engine = Ransac::with_sampler(settings, ScriptedSampler::new(samples));
        let mut model = ScriptedModel::default();

        let result = engine.run(&population, &mut model).unwrap().unwrap();
        assert_eq!(result.trial, 0);
        assert_eq!(result.model.fitted_from, Some(2));
        assert_eq!(model.set_calls.get(), 3);
    }

    #[test]
    fn strictly_lower_loss_replaces_best() {
        let population = Population::from_rows(&[[0.0, 0.4], [0.0, 0.4], [0.0, 0.2], [0.0, 0.3]]);
        let settings = RansacSettings::new(4, 0.5, 0, 1).unwrap();
        let samples: &[&[usize]] = &[&[0], &[1], &[2], &[3]];
        let mut engine = Ransac::with_sampler(settings, ScriptedSampler::new(samples));
        let mut model = ScriptedModel::default();

        let result = engine.run(&population, &mut model).unwrap().unwrap();
        assert_eq!(result.trial, 2);
        assert_eq!(result.model.fitted_from, Some(2));
        assert!((result.loss - 0.2).abs() < 1e-12);
        // The working model moved on after the promotion; the retained copy did not.
        assert_eq!(model.fitted_from, Some(3));
    }

    #[test]
    fn caller_can_stop_between_trials() {
        let population = all_inliers(10);
        let mut engine = Ransac::seeded(RansacSettings::default().with_threshold_point(0), 1);
        let mut model = ScriptedModel::default();

        let result = engine
            .run_while(&population, &mut model, |trial| trial < 3)
            .unwrap()
            .unwrap();
        assert_eq!(result.iterations, 3);
        assert_eq!(model.fit_calls, 3);
    }

    #[test]
    fn settings_changes_apply_to_the_next_run() {
        let population = all_inliers(10);
        let mut engine = Ransac::seeded(RansacSettings::default(), 4);
        assert_eq!(engine.settings().threshold_point, 10);
        let mut model = ScriptedModel::default();
        assert!(engine.run(&population, &mut model).unwrap().is_none());

        engine.settings_mut().threshold_point = 9;
        engine.settings_mut().iterations = 4;
        let result = engine.run(&population, &mut model).unwrap().unwrap();
        assert_eq!(result.iterations, 4);
        assert_eq!(result.inliers.len(), 10);
    }

    #[test]
    fn boxed_sampler_is_driven_through_the_box() {
        let population = all_inliers(6);
        let settings = RansacSettings::new(2, 0.5, 0, 1).unwrap();
        let sampler: Box<dyn Sampler> = Box::new(ScriptedSampler::new(&[&[5], &[1]]));
        let mut engine = Ransac::with_sampler(settings, sampler);
        let mut model = ScriptedModel::default();

        let result = engine.run(&population, &mut model).unwrap().unwrap();
        assert_eq!(result.inliers[0], 5);
        assert_eq!(model.fitted_from, Some(1));

        // The script is exhausted, so the next draw is empty.
        assert!(engine.sampler_mut().sample(1, 6).unwrap().is_empty());
    }

    #[test]
    fn degenerate_samples_skip_the_trial() {
        #[derive(Clone)]
        struct NeverFits;

        impl Model for NeverFits {
            fn min_sample_size(&self) -> usize {
                1
            }

            fn fit(&mut self, _population: &Population, _indices: &[usize]) -> Result<()> {
                Err(Error::DegenerateSample("always".to_string()))
            }

            fn score_one(&self, _population: &Population, _index: usize) -> f64 {
                unreachable!("scoring after a failed fit")
            }

            fn score_set(&self, _population: &Population, _indices: &[usize]) -> f64 {
                unreachable!("scoring after a failed fit")
            }
        }

        let population = all_inliers(10);
        let mut engine = Ransac::seeded(RansacSettings::default().with_iterations(20), 9);
        assert!(engine.run(&population, &mut NeverFits).unwrap().is_none());
    }
}
