//! Isolation forest ensemble
//!
//! Combines many random-partition trees for robust anomaly scoring.
//! Each tree trains on a random subsample of the window with a seed
//! derived from the forest seed, so the whole fit is deterministic.

use crate::{
    average_path_length, IsolationTree, MLError, MLResult, Rng, Sample, TreeConfig,
};

/// Forest configuration
///
/// Defaults follow the reference implementation the deployment was
/// calibrated against: 100 trees over subsamples of 256 with depth
/// ceil(log2(256)) = 8.
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    /// Number of trees
    pub num_trees: usize,
    /// Subsample size per tree (capped at the window size)
    pub sample_size: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Forest seed; per-tree seeds are derived from it
    pub seed: u32,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            sample_size: 256,
            max_depth: 8,
            seed: crate::DETECTOR_SEED,
        }
    }
}

/// Isolation forest over eight-channel samples
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    config: ForestConfig,
    rng: Rng,
    num_samples: usize,
}

impl IsolationForest {
    /// Create an unfitted forest
    pub fn new(config: ForestConfig) -> Self {
        let seed = config.seed;
        Self {
            trees: Vec::new(),
            config,
            rng: Rng::new(seed),
            num_samples: 0,
        }
    }

    /// Fit the ensemble over a window of samples
    pub fn fit(&mut self, samples: &[Sample]) -> MLResult<()> {
        if samples.is_empty() {
            return Err(MLError::InsufficientData);
        }

        self.num_samples = samples.len();
        self.trees.clear();

        for i in 0..self.config.num_trees {
            let tree_config = TreeConfig {
                max_depth: self.config.max_depth,
                seed: self.config.seed.wrapping_add(i as u32),
            };
            let mut tree = IsolationTree::new(tree_config);
            let subset = self.sample_subset(samples);
            tree.fit(&subset)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Random subsample without replacement (Fisher-Yates prefix)
    fn sample_subset(&mut self, samples: &[Sample]) -> Vec<Sample> {
        let sample_size = self.config.sample_size.min(samples.len());
        if sample_size >= samples.len() {
            return samples.to_vec();
        }

        let mut indices: Vec<usize> = (0..samples.len()).collect();
        for i in 0..sample_size {
            let j = i + self.rng.next_range(samples.len() - i);
            indices.swap(i, j);
        }

        indices[..sample_size].iter().map(|&i| samples[i]).collect()
    }

    /// Anomaly score in (0, 1); ~0.5 is ordinary, near 1 is isolated
    pub fn anomaly_score(&self, sample: &Sample) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }

        let total: f64 = self.trees.iter().map(|t| t.path_length(sample)).sum();
        let avg_path_length = total / self.trees.len() as f64;
        calculate_anomaly_score(avg_path_length, self.num_samples)
    }

    /// Scores for every sample, in input order
    pub fn score_all(&self, samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(|s| self.anomaly_score(s)).collect()
    }

    /// Whether the forest has been fitted
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Forest statistics
    pub fn stats(&self) -> ForestStats {
        ForestStats {
            num_trees: self.trees.len(),
            total_nodes: self.trees.iter().map(|t| t.node_count()).sum(),
            max_depth: self.trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            num_samples: self.num_samples,
        }
    }
}

/// Summary of a fitted forest
#[derive(Debug, Clone, Copy)]
pub struct ForestStats {
    /// Number of trees
    pub num_trees: usize,
    /// Total nodes across all trees
    pub total_nodes: usize,
    /// Deepest tree
    pub max_depth: usize,
    /// Window size used for the fit
    pub num_samples: usize,
}

/// `2^(-avg_path_length / c(n))`
///
/// Neutral 0.5 when there is no meaningful expectation to compare
/// against (n <= 1).
pub fn calculate_anomaly_score(avg_path_length: f64, num_samples: usize) -> f64 {
    if num_samples <= 1 {
        return 0.5;
    }

    let expected = average_path_length(num_samples);
    if expected == 0.0 {
        return 0.5;
    }

    libm::exp2(-avg_path_length / expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NUM_FEATURES;

    fn sample(bod: f64, do2: f64) -> Sample {
        let mut features = [0.0; NUM_FEATURES];
        features[1] = do2;
        features[2] = bod;
        Sample::new(features)
    }

    fn window() -> Vec<Sample> {
        let mut samples: Vec<Sample> = (0..30)
            .map(|i| sample(5.0 + 0.05 * i as f64, 6.0 + 0.02 * i as f64))
            .collect();
        // Two discharge events far outside the cluster.
        samples.push(sample(60.0, 0.5));
        samples.push(sample(45.0, 1.0));
        samples
    }

    #[test]
    fn unfitted_forest_is_neutral() {
        let forest = IsolationForest::new(ForestConfig::default());
        assert!(!forest.is_fitted());
        assert_eq!(forest.anomaly_score(&sample(5.0, 6.0)), 0.5);
    }

    #[test]
    fn fit_builds_configured_tree_count() {
        let mut forest = IsolationForest::new(ForestConfig {
            num_trees: 25,
            sample_size: 16,
            max_depth: 6,
            seed: 9,
        });
        forest.fit(&window()).unwrap();

        let stats = forest.stats();
        assert_eq!(stats.num_trees, 25);
        assert!(stats.total_nodes > 25);
        assert!(stats.max_depth <= 6);
        assert_eq!(stats.num_samples, 32);
    }

    #[test]
    fn outliers_score_higher_than_the_bulk() {
        let samples = window();
        let mut forest = IsolationForest::new(ForestConfig::default());
        forest.fit(&samples).unwrap();

        let scores = forest.score_all(&samples);
        let bulk_max = scores[..30].iter().cloned().fold(f64::MIN, f64::max);
        assert!(scores[30] > bulk_max);
        assert!(scores[31] > bulk_max);
    }

    #[test]
    fn fit_and_scores_are_deterministic() {
        let samples = window();
        let mut a = IsolationForest::new(ForestConfig::default());
        let mut b = IsolationForest::new(ForestConfig::default());
        a.fit(&samples).unwrap();
        b.fit(&samples).unwrap();

        assert_eq!(a.score_all(&samples), b.score_all(&samples));
    }

    #[test]
    fn score_formula_reference_points() {
        // Average path equal to the expectation: score of exactly 0.5.
        let expected = average_path_length(100);
        assert!((calculate_anomaly_score(expected, 100) - 0.5).abs() < 1e-12);
        // Shorter-than-expected path: anomalous.
        assert!(calculate_anomaly_score(expected * 0.3, 100) > 0.6);
        // Longer path: ordinary.
        assert!(calculate_anomaly_score(expected * 1.5, 100) < 0.5);
        // Degenerate fits are neutral.
        assert_eq!(calculate_anomaly_score(0.0, 0), 0.5);
        assert_eq!(calculate_anomaly_score(0.0, 1), 0.5);
    }
}
