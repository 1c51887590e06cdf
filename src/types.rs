//! Shared numeric storage types.

use nalgebra::DMatrix;

/// Dynamic matrix of `f64` holding one observation per row.
///
/// Row indices are the identities the samplers and models work with.
pub type DataMatrix = DMatrix<f64>;
