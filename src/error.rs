//! Error and result types for the crate.
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a consensus estimation.
#[derive(Error, Debug)]
pub enum Error {
    /// More distinct indices were requested than the population holds.
    #[error("insufficient population: cannot draw {requested} distinct indices from {available}")]
    InsufficientPopulation { requested: usize, available: usize },

    /// Engine settings that can never produce a valid run.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A model was asked to fit fewer points than it needs.
    #[error("too few points: need {needed}, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    /// The sampled subset cannot define a model (e.g. coincident points).
    ///
    /// The engine treats this as a failed trial rather than a failed run.
    #[error("degenerate sample: {0}")]
    DegenerateSample(String),

    /// Records do not carry enough fields for the model.
    #[error("records have {got} fields, model needs at least {needed}")]
    Dimension { needed: usize, got: usize },

    /// A record's length differs from the first record of the population.
    #[error("record {index} has {got} fields, expected {expected}")]
    RaggedRecord {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// IO error while exporting, this wraps a [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the engine may skip the current trial and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegenerateSample(_))
    }
}
