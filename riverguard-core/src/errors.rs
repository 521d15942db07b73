//! Error Types for the Scoring Core
//!
//! The core deliberately favors total, default-producing functions over
//! raised errors: empty windows return empty output, out-of-range
//! parameters are clamped (with a logged warning), and missing channel
//! values are defaulted at the score boundary. Errors therefore exist
//! only at configuration seams, where a caller hands us numbers that
//! cannot be silently repaired.
//!
//! Like the rest of the crate, error values are small, `Copy`, and
//! carry enough context to act on without further queries.

use thiserror_no_std::Error;

/// Result type for fallible configuration operations
pub type RiskResult<T> = Result<T, RiskError>;

/// Configuration errors - kept small and copyable
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RiskError {
    /// Custom normalized-index weights must sum to 1.0
    #[error("weights must be convex: sum is {sum}, expected 1.0")]
    NonConvexWeights {
        /// Actual sum of the supplied weights
        sum: f64,
    },

    /// A weight was negative or not a finite number
    #[error("weight for {channel} is not a finite non-negative number")]
    InvalidWeight {
        /// Human-readable channel name
        channel: &'static str,
    },
}
