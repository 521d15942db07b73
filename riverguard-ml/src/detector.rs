//! Window-level anomaly detection
//!
//! Fits an isolation forest over a window of readings, scores every
//! row, and flags the top `contamination` fraction as anomalous. Each
//! flagged row yields a high-severity alert carrying the row's sensor
//! id and timestamp.

use riverguard_core::{Alert, Reading};
use serde::{Deserialize, Serialize};

use crate::{ForestConfig, IsolationForest, Sample, DETECTOR_SEED};

/// Detector configuration
///
/// The forest seed is fixed so that re-running detection over the same
/// window always flags the same rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Expected fraction of anomalous rows, clamped to `[0, 0.5]`
    pub contamination: f64,
    /// Number of trees in the forest
    pub num_trees: usize,
    /// Subsample size per tree
    pub sample_size: usize,
    /// Maximum tree depth
    pub max_depth: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let forest = ForestConfig::default();
        Self {
            contamination: riverguard_core::constants::DEFAULT_CONTAMINATION,
            num_trees: forest.num_trees,
            sample_size: forest.sample_size,
            max_depth: forest.max_depth,
        }
    }
}

/// Outcome of one detection pass
///
/// `flags` and `scores` align index-for-index with the input window;
/// `alerts` holds one entry per flagged row, in window order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    /// Per-row anomaly verdicts
    pub flags: Vec<bool>,
    /// One alert per flagged row
    pub alerts: Vec<Alert>,
    /// Per-row anomaly scores in `(0, 1)`
    pub scores: Vec<f64>,
}

impl Detection {
    /// Number of flagged rows
    pub fn anomaly_count(&self) -> usize {
        self.alerts.len()
    }
}

/// Isolation-forest anomaly detector over reading windows
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    /// Create a detector with the given configuration
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Fit and score one window of readings
    ///
    /// The threshold is the `(k+1)`-th largest score where
    /// `k = ceil(contamination * n)`; rows strictly above it are
    /// flagged. When every row scores identically nothing is flagged.
    pub fn detect(&self, readings: &[Reading]) -> Detection {
        if readings.is_empty() {
            return Detection::default();
        }

        let samples: Vec<Sample> = readings.iter().map(Sample::from_reading).collect();

        let mut forest = IsolationForest::new(ForestConfig {
            num_trees: self.config.num_trees,
            sample_size: self.config.sample_size,
            max_depth: self.config.max_depth,
            seed: DETECTOR_SEED,
        });
        if forest.fit(&samples).is_err() {
            return Detection::default();
        }

        let scores = forest.score_all(&samples);
        let threshold = self.threshold(&scores);

        let mut flags = Vec::with_capacity(readings.len());
        let mut alerts = Vec::new();
        for (reading, &score) in readings.iter().zip(&scores) {
            let flagged = match threshold {
                Some(t) => score > t,
                None => false,
            };
            flags.push(flagged);
            if flagged {
                alerts.push(Alert::anomaly(reading.sensor_id, reading.timestamp));
            }
        }

        log::debug!(
            "anomaly detection: {} of {} rows flagged",
            alerts.len(),
            readings.len()
        );

        Detection {
            flags,
            alerts,
            scores,
        }
    }

    /// Score cutoff for the window, or `None` when nothing should flag
    fn threshold(&self, scores: &[f64]) -> Option<f64> {
        let contamination = if self.config.contamination.is_finite() {
            if !(0.0..=0.5).contains(&self.config.contamination) {
                log::warn!(
                    "contamination {} outside [0, 0.5], clamping",
                    self.config.contamination
                );
            }
            self.config.contamination.clamp(0.0, 0.5)
        } else {
            log::warn!("non-finite contamination, treating as 0");
            0.0
        };

        let n = scores.len();
        let k = libm::ceil(contamination * n as f64) as usize;
        let k = k.min(n);
        if k == 0 {
            return None;
        }

        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(core::cmp::Ordering::Equal));

        // Strictly-greater comparison against the score just below the
        // top k, so ties at the cutoff do not over-flag.
        if k == n {
            sorted.last().copied()
        } else {
            Some(sorted[k])
        }
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
