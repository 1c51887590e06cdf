//! # Consensus - generic RANSAC estimation
//!
//! `consensus` fits a model to data contaminated with outliers using RANSAC
//! (RANdom SAmple Consensus). The engine knows nothing about the model: any
//! type implementing [`Model`](crate::core::Model) can be estimated.
//!
//! Each trial draws a minimal random sample, fits the working model to it,
//! grows a consensus set with every other point whose loss is below
//! `threshold_loss`, and, when that set holds more than `threshold_point`
//! points, ranks it by the model's aggregate loss. The best model is kept as
//! an independent clone.
//!
//! ## Quick Start
//!
//! ```rust
//! use consensus::{Line, Population, Ransac, RansacSettings};
//!
//! // Twenty points on y = x plus two outliers.
//! let mut rows: Vec<[f64; 2]> = (0..20).map(|i| [i as f64, i as f64]).collect();
//! rows.push([3.0, 15.0]);
//! rows.push([12.0, -4.0]);
//! let population = Population::from_rows(&rows);
//!
//! let settings = RansacSettings::default().with_iterations(200);
//! let mut engine = Ransac::seeded(settings, 7);
//! let result = engine
//!     .run(&population, &mut Line::default())
//!     .unwrap()
//!     .expect("the diagonal has more than 10 points");
//!
//! assert!(result.loss < 1e-9);
//! assert_eq!(result.inliers.len(), 20);
//! ```
//!
//! ## Custom models
//!
//! ```rust
//! use consensus::{Model, Population, Result, Error};
//!
//! /// Estimates a constant value from the first field of each record.
//! #[derive(Clone, Default)]
//! struct Constant(f64);
//!
//! impl Model for Constant {
//!     fn min_sample_size(&self) -> usize {
//!         1
//!     }
//!
//!     fn fit(&mut self, population: &Population, indices: &[usize]) -> Result<()> {
//!         if indices.is_empty() {
//!             return Err(Error::TooFewPoints { needed: 1, got: 0 });
//!         }
//!         let sum: f64 = indices.iter().map(|&i| population.value(i, 0)).sum();
//!         self.0 = sum / indices.len() as f64;
//!         Ok(())
//!     }
//!
//!     fn score_one(&self, population: &Population, index: usize) -> f64 {
//!         (population.value(index, 0) - self.0).abs()
//!     }
//!
//!     fn score_set(&self, population: &Population, indices: &[usize]) -> f64 {
//!         let n = indices.len().max(1) as f64;
//!         indices.iter().map(|&i| self.score_one(population, i)).sum::<f64>() / n
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - **[`core`](crate::core)**: the [`Model`](crate::core::Model) and [`Sampler`](crate::core::Sampler)
//!   traits and the [`Ransac`](crate::core::Ransac) engine
//! - **[`population`]**: observations and their CSV export
//! - **[`samplers`]**: sampling strategies
//! - **[`settings`]**: engine configuration
//! - **[`models`]**: built-in models
//! - **[`api`]**: one-call estimation helpers
//! - **[`datasets`]**: synthetic point clouds

pub mod api;
pub mod core;
pub mod datasets;
pub mod error;
pub mod models;
pub mod population;
pub mod samplers;
pub mod settings;
pub mod types;

pub use api::estimate_line;
pub use self::core::{EngineState, EstimationResult, Model, Ransac, Sampler};
pub use error::{Error, Result};
pub use models::Line;
pub use population::{Data, Population};
pub use samplers::{Sample, UniformSampler};
pub use settings::RansacSettings;
