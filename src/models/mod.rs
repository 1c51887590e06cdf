//! Concrete models implementing [`Model`](crate::core::Model).

pub mod line;

pub use line::Line;
