//! Isolation tree nodes
//!
//! Compact array-stored node representation: internal nodes carry a
//! split (channel index + value) and child indices, external nodes
//! carry the number of samples that reached them plus their depth.

use crate::{MLError, MLResult, Sample};

/// Node payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeType {
    /// Internal node with a split condition
    Internal {
        /// Channel index to split on
        feature: u8,
        /// Split value
        split_value: f64,
        /// Left child index (feature value below the split)
        left: u16,
        /// Right child index
        right: u16,
    },
    /// Leaf node
    External {
        /// Number of training samples that reached this leaf
        size: u16,
    },
}

/// One tree node plus its depth from the root
#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// Node payload
    pub node_type: NodeType,
    /// Path length from root
    pub depth: u8,
}

impl Node {
    /// Create an internal node
    pub fn internal(feature: u8, split_value: f64, left: u16, right: u16, depth: u8) -> Self {
        Self {
            node_type: NodeType::Internal {
                feature,
                split_value,
                left,
                right,
            },
            depth,
        }
    }

    /// Create an external (leaf) node
    pub fn external(size: u16, depth: u8) -> Self {
        Self {
            node_type: NodeType::External { size },
            depth,
        }
    }

    /// Whether this is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::External { .. })
    }

    /// Path length contribution when traversal terminates here
    ///
    /// Leaves holding more than one sample add the expected remaining
    /// depth `c(size)` for the unresolved subtree.
    pub fn path_length(&self) -> f64 {
        match self.node_type {
            NodeType::External { size } => self.depth as f64 + c_factor(size as usize),
            NodeType::Internal { .. } => self.depth as f64,
        }
    }

    /// Child index the sample descends into
    pub fn traverse(&self, sample: &Sample) -> MLResult<u16> {
        match self.node_type {
            NodeType::Internal {
                feature,
                split_value,
                left,
                right,
            } => {
                let value = sample
                    .get(feature as usize)
                    .ok_or(MLError::InvalidFeature)?;
                if value < split_value {
                    Ok(left)
                } else {
                    Ok(right)
                }
            }
            NodeType::External { .. } => {
                Err(MLError::InvalidConfig("cannot traverse from leaf node"))
            }
        }
    }
}

/// Average path length of unsuccessful BST search over `n` samples
///
/// `c(n) = 2 H(n-1) - 2(n-1)/n`, the standard isolation-forest
/// normalizer. Exact values for small `n`, harmonic approximation
/// beyond.
pub fn c_factor(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    match n {
        2 => 1.0,
        3 => 1.6667,
        4 => 2.1667,
        5 => 2.5667,
        6 => 2.9000,
        7 => 3.1857,
        8 => 3.4357,
        9 => 3.6579,
        10 => 3.8579,
        _ => {
            let h = harmonic_approx(n - 1);
            2.0 * h - 2.0 * (n as f64 - 1.0) / (n as f64)
        }
    }
}

/// Harmonic number approximation: ln(n) + Euler-Mascheroni + 1/(2n)
fn harmonic_approx(n: usize) -> f64 {
    const EULER: f64 = 0.577_215_664_901_532_9;
    libm::log(n as f64) + EULER + 0.5 / (n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_creation() {
        let internal = Node::internal(0, 25.0, 1, 2, 3);
        assert!(!internal.is_leaf());
        assert_eq!(internal.depth, 3);

        let external = Node::external(10, 5);
        assert!(external.is_leaf());
        assert_eq!(external.path_length(), 5.0 + c_factor(10));
    }

    #[test]
    fn node_traverse() {
        let node = Node::internal(2, 25.0, 1, 2, 0);

        let mut low = [0.0; crate::NUM_FEATURES];
        low[2] = 20.0;
        assert_eq!(node.traverse(&Sample::new(low)).unwrap(), 1);

        let mut high = [0.0; crate::NUM_FEATURES];
        high[2] = 30.0;
        assert_eq!(node.traverse(&Sample::new(high)).unwrap(), 2);

        let leaf = Node::external(1, 4);
        assert!(leaf.traverse(&Sample::new(low)).is_err());
    }

    #[test]
    fn c_factor_values() {
        assert_eq!(c_factor(0), 0.0);
        assert_eq!(c_factor(1), 0.0);
        assert_eq!(c_factor(2), 1.0);
        assert!((c_factor(10) - 3.8579).abs() < 0.001);
        // The approximation continues the exact table without a jump.
        assert!((c_factor(11) - 4.0398).abs() < 0.01);
        assert!(c_factor(100) > c_factor(50));
        assert!((c_factor(256) - 10.25).abs() < 0.05);
    }
}
