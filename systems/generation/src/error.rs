//! Errors raised before evolution starts.

use thiserror::Error;

/// Reasons a generator refuses to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Maps need at least one column and one row.
    #[error("map dimensions {width}x{height} must both be non-zero")]
    ZeroDimensions {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },

    /// Crossover pairs parents, so the population must be even and non-trivial.
    #[error("population size {size} must be an even number of at least 2")]
    InvalidPopulation {
        /// Requested population size.
        size: usize,
    },

    /// A seed individual does not share the generator's dimensions.
    #[error("seed map {index} is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch {
        /// Position of the offending seed.
        index: usize,
        /// Generator column count.
        width: u32,
        /// Generator row count.
        height: u32,
        /// Seed column count.
        found_width: u32,
        /// Seed row count.
        found_height: u32,
    },
}
