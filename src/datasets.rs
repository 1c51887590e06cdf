//! Synthetic point clouds for demos and tests.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::population::Population;
use crate::types::DataMatrix;

/// Two Gaussian clusters with unit variance.
///
/// The first `size / 2` points are centred on `(1, 1)`, the rest on
/// `(-1, -1)`.
pub fn two_cluster_cloud<R: Rng>(size: usize, rng: &mut R) -> Population {
    let first_half = size / 2;
    let mut data = DataMatrix::zeros(size, 2);
    for i in 0..size {
        let centre = if i < first_half { 1.0 } else { -1.0 };
        for j in 0..2 {
            let z: f64 = rng.sample(StandardNormal);
            data[(i, j)] = z + centre;
        }
    }
    Population::from_matrix(data)
}

/// Points on `y = slope * x + intercept` with uniform noise in
/// `[-noise, noise)`, followed by `n_outliers` points drawn uniformly from
/// `[-10, 10) x [-20, 20)`.
///
/// Inliers come first, so indices `0..n_inliers` are the ground truth.
pub fn line_with_outliers<R: Rng>(
    n_inliers: usize,
    n_outliers: usize,
    slope: f64,
    intercept: f64,
    noise: f64,
    rng: &mut R,
) -> Population {
    let mut data = DataMatrix::zeros(n_inliers + n_outliers, 2);
    for i in 0..n_inliers {
        let x = i as f64 * 0.2 - 6.0;
        let jitter = if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        };
        data[(i, 0)] = x;
        data[(i, 1)] = slope * x + intercept + jitter;
    }
    for i in n_inliers..n_inliers + n_outliers {
        data[(i, 0)] = rng.gen_range(-10.0..10.0);
        data[(i, 1)] = rng.gen_range(-20.0..20.0);
    }
    Population::from_matrix(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn clusters_sit_on_opposite_sides() {
        let mut rng = StdRng::seed_from_u64(17);
        let cloud = two_cluster_cloud(400, &mut rng);
        assert_eq!(cloud.len(), 400);
        assert_eq!(cloud.dim(), 2);

        let mean = |range: std::ops::Range<usize>| {
            let len = range.len() as f64;
            range.map(|i| cloud.value(i, 0) + cloud.value(i, 1)).sum::<f64>() / len
        };
        assert!(mean(0..200) > 1.5);
        assert!(mean(200..400) < -1.5);
    }

    #[test]
    fn odd_sizes_put_the_extra_point_in_the_second_cluster() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(two_cluster_cloud(7, &mut rng).len(), 7);
    }

    #[test]
    fn noiseless_inliers_lie_on_the_line() {
        let mut rng = StdRng::seed_from_u64(5);
        let population = line_with_outliers(10, 5, 2.0, 1.0, 0.0, &mut rng);
        assert_eq!(population.len(), 15);
        for i in 0..10 {
            let p = population.point2(i);
            assert!((p.y - (2.0 * p.x + 1.0)).abs() < 1e-12);
        }
    }
}
