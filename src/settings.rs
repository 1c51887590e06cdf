//! Configuration for the consensus engine.
//!
//! Settings are plain in-code values. The defaults reproduce the classic
//! two-point line fitting setup: 1000 trials, a loss threshold of `0.5`,
//! more than 10 points in a consensus set, and minimal samples of 2.

use crate::error::{Error, Result};

/// Main configuration object for [`Ransac`](crate::core::Ransac).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RansacSettings {
    /// Number of trials. Every trial always runs; there is no early exit.
    pub iterations: usize,
    /// Size of the random subset used to seed each fit.
    ///
    /// Must not exceed the population size.
    pub sample_size: usize,
    /// A point is an inlier iff its single-point loss is strictly below this.
    pub threshold_loss: f64,
    /// A consensus set must hold strictly more points than this to compete
    /// for the best model.
    pub threshold_point: usize,
}

impl Default for RansacSettings {
    fn default() -> Self {
        Self {
            iterations: 1000,
            sample_size: 2,
            threshold_loss: 0.5,
            threshold_point: 10,
        }
    }
}

impl RansacSettings {
    /// Build and validate settings.
    pub fn new(
        iterations: usize,
        threshold_loss: f64,
        threshold_point: usize,
        sample_size: usize,
    ) -> Result<Self> {
        let settings = Self {
            iterations,
            sample_size,
            threshold_loss,
            threshold_point,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_threshold_loss(mut self, threshold_loss: f64) -> Self {
        self.threshold_loss = threshold_loss;
        self
    }

    pub fn with_threshold_point(mut self, threshold_point: usize) -> Self {
        self.threshold_point = threshold_point;
        self
    }

    /// Check the population-independent constraints.
    ///
    /// `sample_size` against the population is checked when the engine runs.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidSettings(
                "iterations must be positive".to_string(),
            ));
        }
        if !self.threshold_loss.is_finite() || self.threshold_loss < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "threshold_loss must be finite and non-negative, got {}",
                self.threshold_loss
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_line_fitting_setup() {
        let cfg = RansacSettings::default();
        assert_eq!(cfg.iterations, 1000);
        assert_eq!(cfg.sample_size, 2);
        assert!((cfg.threshold_loss - 0.5).abs() < 1e-12);
        assert_eq!(cfg.threshold_point, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn new_takes_arguments_in_documented_order() {
        let cfg = RansacSettings::new(200, 0.25, 7, 3).unwrap();
        assert_eq!(cfg.iterations, 200);
        assert!((cfg.threshold_loss - 0.25).abs() < 1e-12);
        assert_eq!(cfg.threshold_point, 7);
        assert_eq!(cfg.sample_size, 3);
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let err = RansacSettings::new(0, 0.5, 10, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn bad_loss_thresholds_are_rejected() {
        for threshold in [-0.1, f64::NAN, f64::INFINITY] {
            let cfg = RansacSettings::default().with_threshold_loss(threshold);
            assert!(
                matches!(cfg.validate(), Err(Error::InvalidSettings(_))),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn zero_loss_threshold_is_allowed() {
        let cfg = RansacSettings::default().with_threshold_loss(0.0);
        assert!(cfg.validate().is_ok());
    }
}
