//! High-level entry points for common estimation tasks.

use nalgebra::DMatrix;

use crate::core::{EstimationResult, Ransac};
use crate::error::{Error, Result};
use crate::models::Line;
use crate::population::Population;
use crate::settings::RansacSettings;

/// Fit a 2D line to an `N x 2` matrix of points.
///
/// # Arguments
/// * `points` - one `[x, y]` point per row
/// * `settings` - engine settings
/// * `seed` - fixed sampler seed, or `None` to seed from OS entropy
///
/// # Returns
/// `Ok(None)` when no consensus set exceeded `settings.threshold_point`.
pub fn estimate_line(
    points: &DMatrix<f64>,
    settings: RansacSettings,
    seed: Option<u64>,
) -> Result<Option<EstimationResult<Line>>> {
    if points.ncols() != 2 {
        return Err(Error::Dimension {
            needed: 2,
            got: points.ncols(),
        });
    }

    let population = Population::from_matrix(points.clone());
    let mut engine = match seed {
        Some(seed) => Ransac::seeded(settings, seed),
        None => Ransac::new(settings),
    };
    engine.run(&population, &mut Line::default())
}
