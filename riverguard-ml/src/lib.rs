//! Isolation-Forest Anomaly Detection for Water-Quality Windows
//!
//! ## Overview
//!
//! This crate flags anomalous readings in a bounded recent window for
//! one sensor. The algorithm is an isolation forest: an ensemble of
//! random partitioning trees where a point is scored anomalous if it
//! separates from the bulk in unusually few partition steps.
//!
//! ## Why Isolation Forest?
//!
//! 1. **Unsupervised**: no labeled discharge events required
//! 2. **Multivariate**: one model over all eight channels catches
//!    combinations (high BOD *and* low oxygen) a per-channel threshold
//!    would miss
//! 3. **Cheap**: O(n log n) fit per window, O(log n) per score
//! 4. **Deterministic here**: the forest seed is a fixed constant, so
//!    the same window always produces the same flags
//!
//! ## Scoring
//!
//! ```text
//! score(x) = 2^(-E[h(x)] / c(n))
//! ```
//!
//! where `E[h(x)]` is the average path length of `x` over the trees and
//! `c(n)` the expected path length for `n` samples. Scores near 1 mean
//! "isolated quickly" (anomalous); scores near 0.5 mean "ordinary".
//!
//! ## Missing channels
//!
//! Absent channel values are treated as zero before scoring. This is a
//! deliberate, documented limitation: a row with many missing channels
//! is indistinguishable from a row of genuine zeros and is therefore
//! biased toward being flagged. Callers who backfill sensors should
//! expect flag churn on sparse rows.

use riverguard_core::reading::{Channel, Reading};
use thiserror_no_std::Error;

pub mod detector;
pub mod forest;
pub mod node;
pub mod tree;

pub use detector::{AnomalyDetector, Detection, DetectorConfig};
pub use forest::{ForestConfig, IsolationForest};
pub use node::{c_factor, Node, NodeType};
pub use tree::{IsolationTree, TreeConfig};

/// Fixed seed for every detector-owned forest
///
/// Named constant rather than a caller-supplied parameter so test
/// suites can assert exact flag output on fixed inputs.
pub const DETECTOR_SEED: u32 = 42;

/// Feature dimensionality: the eight fixed water-quality channels
pub const NUM_FEATURES: usize = Channel::COUNT;

/// Result type for ML operations
pub type MLResult<T> = Result<T, MLError>;

/// Errors from model fitting and traversal
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MLError {
    /// Not enough samples to fit
    #[error("insufficient data to fit model")]
    InsufficientData,
    /// Feature index outside the fixed channel vector
    #[error("invalid feature index")]
    InvalidFeature,
    /// Invalid model configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// One fixed-width feature vector over the eight channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Channel values in [`Channel::ALL`] order
    pub features: [f64; NUM_FEATURES],
}

impl Sample {
    /// Sample from raw feature values
    pub fn new(features: [f64; NUM_FEATURES]) -> Self {
        Self { features }
    }

    /// Sample from a reading, zero-filling missing channels
    pub fn from_reading(reading: &Reading) -> Self {
        let mut features = [0.0; NUM_FEATURES];
        for (slot, channel) in features.iter_mut().zip(Channel::ALL) {
            *slot = reading.channel(channel).unwrap_or(0.0);
        }
        Self { features }
    }

    /// Feature value at `index`, if in range
    pub fn get(&self, index: usize) -> Option<f64> {
        self.features.get(index).copied()
    }
}

/// Expected path length of unsuccessful BST search over `n` samples
///
/// The normalizing constant in the anomaly-score formula.
pub fn average_path_length(n: usize) -> f64 {
    node::c_factor(n)
}

/// Small xorshift RNG for tree construction
///
/// Deterministic given a seed; quality is more than sufficient for
/// picking split features and split points.
#[derive(Debug, Clone)]
pub(crate) struct Rng {
    state: u32,
}

impl Rng {
    pub(crate) fn new(seed: u32) -> Self {
        // Xorshift must not start at zero.
        Self {
            state: seed.max(1),
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform index in `0..n` (`n` must be non-zero)
    pub(crate) fn next_range(&mut self, n: usize) -> usize {
        (self.next_u32() as usize) % n
    }

    /// Uniform value in `[min, max)`
    pub(crate) fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        let unit = self.next_u32() as f64 / (u32::MAX as f64 + 1.0);
        min + unit * (max - min)
    }
}
