//! 2D line model `ax + by + c = 0`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Matrix2, SymmetricEigen, Vector2, Vector3};

use crate::core::Model;
use crate::error::{Error, Result};
use crate::population::Population;

const EPS: f64 = 1e-10;

/// 2D line stored as `[a, b, c]` with `a² + b² = 1`, so `|ax + by + c|` is the
/// Euclidean distance of `(x, y)` to the line.
///
/// The first two fields of each record are read as `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    params: Vector3<f64>,
}

impl Default for Line {
    /// The x axis.
    fn default() -> Self {
        Self {
            params: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Line {
    /// Line from (not necessarily normalized) coefficients.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Result<Self> {
        let norm = a.hypot(b);
        if !norm.is_finite() || norm < EPS {
            return Err(Error::DegenerateSample(format!(
                "line normal ({a}, {b}) has no direction"
            )));
        }
        Ok(Self {
            params: Vector3::new(a, b, c) / norm,
        })
    }

    /// Line through two points, i.e. the cross product of their homogeneous
    /// coordinates.
    pub fn through_points(p: Vector2<f64>, q: Vector2<f64>) -> Result<Self> {
        if (p - q).norm_squared() < EPS {
            return Err(Error::DegenerateSample(format!(
                "points ({}, {}) and ({}, {}) coincide",
                p.x, p.y, q.x, q.y
            )));
        }
        Self::from_coefficients(p.y - q.y, q.x - p.x, p.x * q.y - q.x * p.y)
    }

    /// Total least squares fit: the normal is the eigenvector of the scatter
    /// matrix with the smallest eigenvalue, and the line passes through the
    /// centroid.
    pub fn fit_least_squares(population: &Population, indices: &[usize]) -> Result<Self> {
        if indices.len() < 2 {
            return Err(Error::TooFewPoints {
                needed: 2,
                got: indices.len(),
            });
        }

        let centroid = indices
            .iter()
            .map(|&i| population.point2(i))
            .sum::<Vector2<f64>>()
            / indices.len() as f64;

        let scatter = indices
            .iter()
            .map(|&i| {
                let d = population.point2(i) - centroid;
                d * d.transpose()
            })
            .fold(Matrix2::zeros(), |acc, m| acc + m);

        if scatter.trace() < EPS {
            return Err(Error::DegenerateSample(format!(
                "all {} points coincide",
                indices.len()
            )));
        }

        let eigen = SymmetricEigen::new(scatter);
        let normal = eigen.eigenvectors.column(eigen.eigenvalues.imin()).into_owned();
        Self::from_coefficients(normal.x, normal.y, -normal.dot(&centroid))
    }

    pub fn params(&self) -> Vector3<f64> {
        self.params
    }

    pub fn a(&self) -> f64 {
        self.params.x
    }

    pub fn b(&self) -> f64 {
        self.params.y
    }

    pub fn c(&self) -> f64 {
        self.params.z
    }

    /// Unit normal `(a, b)`.
    pub fn normal(&self) -> Vector2<f64> {
        self.params.xy()
    }

    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        (self.params.x * x + self.params.y * y + self.params.z).abs()
    }

    /// `(slope, intercept)` of `y = slope * x + intercept`, `None` for vertical lines.
    pub fn to_slope_intercept(&self) -> Option<(f64, f64)> {
        let (a, b, c) = (self.a(), self.b(), self.c());
        if b.abs() < EPS {
            return None;
        }
        Some((-a / b, -c / b))
    }

    /// Write `a, b, c` as one line with six decimals.
    pub fn write_params<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{:.6}, {:.6}, {:.6}", self.a(), self.b(), self.c())?;
        writer.flush()?;
        Ok(())
    }

    /// Export the parameters to `path` in the [`write_params`](Self::write_params) format.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_params(BufWriter::new(file))
    }
}

impl Model for Line {
    fn min_sample_size(&self) -> usize {
        2
    }

    fn fit(&mut self, population: &Population, indices: &[usize]) -> Result<()> {
        if population.dim() < 2 {
            return Err(Error::Dimension {
                needed: 2,
                got: population.dim(),
            });
        }

        *self = match indices {
            [] | [_] => {
                return Err(Error::TooFewPoints {
                    needed: 2,
                    got: indices.len(),
                })
            }
            &[i, j] => Self::through_points(population.point2(i), population.point2(j))?,
            _ => Self::fit_least_squares(population, indices)?,
        };
        Ok(())
    }

    fn score_one(&self, population: &Population, index: usize) -> f64 {
        let p = population.point2(index);
        self.distance_to_point(p.x, p.y)
    }

    /// Root mean square point-to-line distance divided by the size of the
    /// set; `0` for an empty set.
    ///
    /// Every member is already closer than `threshold_loss`, so the RMS of a
    /// consensus set varies little between candidates and the division makes
    /// the better supported line win.
    fn score_set(&self, population: &Population, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let n = indices.len() as f64;
        let sum_sq: f64 = indices
            .iter()
            .map(|&i| self.score_one(population, i).powi(2))
            .sum();
        (sum_sq / n).sqrt() / n
    }
}
