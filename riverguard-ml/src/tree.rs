//! Isolation tree construction and traversal
//!
//! Trees are built by recursively partitioning the window on a random
//! channel at a random split point until samples are isolated or the
//! depth limit is reached. Nodes live in a flat array indexed by u16.

use crate::{MLError, MLResult, Node, NodeType, Rng, Sample, NUM_FEATURES};

/// Per-tree configuration
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Maximum depth before forcing a leaf
    pub max_depth: usize,
    /// Random seed for this tree
    pub seed: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            seed: crate::DETECTOR_SEED,
        }
    }
}

/// One random-partition tree
pub struct IsolationTree {
    nodes: Vec<Node>,
    config: TreeConfig,
    rng: Rng,
}

impl IsolationTree {
    /// Create an empty tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
            rng: Rng::new(config.seed),
        }
    }

    /// Build the tree over a sample subset
    pub fn fit(&mut self, samples: &[Sample]) -> MLResult<()> {
        if samples.is_empty() {
            return Err(MLError::InsufficientData);
        }
        self.nodes.clear();
        self.build(samples, 0);
        Ok(())
    }

    /// Recursively partition; returns the index of the created node
    fn build(&mut self, samples: &[Sample], depth: u8) -> u16 {
        let node_index = self.nodes.len() as u16;

        if depth as usize >= self.config.max_depth || samples.len() <= 1 || all_same(samples) {
            self.nodes.push(Node::external(samples.len() as u16, depth));
            return node_index;
        }

        let Some((feature, split_value)) = self.select_split(samples) else {
            // Every channel is constant across the partition.
            self.nodes.push(Node::external(samples.len() as u16, depth));
            return node_index;
        };

        let (left_samples, right_samples) = partition(samples, feature, split_value);
        if left_samples.is_empty() || right_samples.is_empty() {
            self.nodes.push(Node::external(samples.len() as u16, depth));
            return node_index;
        }

        // Reserve the slot, then build children so their indices are known.
        self.nodes.push(Node::external(0, depth));
        let left = self.build(&left_samples, depth + 1);
        let right = self.build(&right_samples, depth + 1);
        self.nodes[node_index as usize] =
            Node::internal(feature, split_value, left, right, depth);

        node_index
    }

    /// Random channel and split point within its observed range
    ///
    /// Retries a handful of times to dodge constant channels; `None`
    /// when the partition has no spread anywhere.
    fn select_split(&mut self, samples: &[Sample]) -> Option<(u8, f64)> {
        for _ in 0..10 {
            let feature = self.rng.next_range(NUM_FEATURES) as u8;
            let (min_val, max_val) = feature_range(samples, feature);
            if (max_val - min_val).abs() < f64::EPSILON {
                continue;
            }
            let split_value = self.rng.next_f64_range(min_val, max_val);
            return Some((feature, split_value));
        }

        // Fall back to scanning for any channel with spread.
        for feature in 0..NUM_FEATURES as u8 {
            let (min_val, max_val) = feature_range(samples, feature);
            if (max_val - min_val).abs() >= f64::EPSILON {
                return Some((feature, self.rng.next_f64_range(min_val, max_val)));
            }
        }
        None
    }

    /// Path length of a sample through this tree
    pub fn path_length(&self, sample: &Sample) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }

        let mut current = 0usize;
        loop {
            let node = &self.nodes[current];
            match node.node_type {
                NodeType::External { .. } => return node.path_length(),
                NodeType::Internal { .. } => match node.traverse(sample) {
                    Ok(next) if (next as usize) < self.nodes.len() => current = next as usize,
                    // Malformed index or feature lookup failure: treat
                    // the current depth as terminal.
                    _ => return node.depth as f64,
                },
            }
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node in the tree
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth as usize).max().unwrap_or(0)
    }
}

fn all_same(samples: &[Sample]) -> bool {
    match samples.split_first() {
        Some((first, rest)) => rest.iter().all(|s| s.features == first.features),
        None => true,
    }
}

fn feature_range(samples: &[Sample], feature: u8) -> (f64, f64) {
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;
    for sample in samples {
        // Feature index is always within the fixed vector here.
        let value = sample.features[feature as usize];
        min_val = min_val.min(value);
        max_val = max_val.max(value);
    }
    (min_val, max_val)
}

fn partition(samples: &[Sample], feature: u8, split_value: f64) -> (Vec<Sample>, Vec<Sample>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &sample in samples {
        if sample.features[feature as usize] < split_value {
            left.push(sample);
        } else {
            right.push(sample);
        }
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(bod: f64, cond: f64) -> Sample {
        let mut features = [0.0; NUM_FEATURES];
        features[2] = bod;
        features[7] = cond;
        Sample::new(features)
    }

    fn test_samples() -> Vec<Sample> {
        vec![
            sample(5.0, 300.0),
            sample(5.5, 310.0),
            sample(4.8, 295.0),
            sample(5.2, 305.0),
            // Discharge spike
            sample(40.0, 1500.0),
        ]
    }

    #[test]
    fn empty_fit_is_an_error() {
        let mut tree = IsolationTree::new(TreeConfig::default());
        assert_eq!(tree.fit(&[]), Err(MLError::InsufficientData));
    }

    #[test]
    fn fit_builds_bounded_tree() {
        let mut tree = IsolationTree::new(TreeConfig {
            max_depth: 5,
            seed: 123,
        });
        tree.fit(&test_samples()).unwrap();

        assert!(tree.node_count() > 0);
        assert!(tree.depth() <= 5);
    }

    #[test]
    fn outlier_has_shorter_path() {
        let samples = test_samples();
        let mut total_normal = 0.0;
        let mut total_outlier = 0.0;

        // Average over several seeds; a single random tree can be
        // unlucky.
        for seed in 0..20 {
            let mut tree = IsolationTree::new(TreeConfig { max_depth: 8, seed });
            tree.fit(&samples).unwrap();
            total_normal += tree.path_length(&samples[0]);
            total_outlier += tree.path_length(&samples[4]);
        }

        assert!(total_outlier < total_normal);
    }

    #[test]
    fn identical_samples_collapse_to_leaf() {
        let samples = vec![sample(5.0, 300.0); 10];
        let mut tree = IsolationTree::new(TreeConfig::default());
        tree.fit(&samples).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.path_length(&samples[0]), crate::c_factor(10));
    }

    #[test]
    fn fit_is_deterministic() {
        let samples = test_samples();
        let mut a = IsolationTree::new(TreeConfig::default());
        let mut b = IsolationTree::new(TreeConfig::default());
        a.fit(&samples).unwrap();
        b.fit(&samples).unwrap();

        for s in &samples {
            assert_eq!(a.path_length(s), b.path_length(s));
        }
    }
}
