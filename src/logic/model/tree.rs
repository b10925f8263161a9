//! Decision Tree - flat node arena
//!
//! Nodes live in a `Vec`, root at index 0, children referenced by index.
//! `Tree::validate` guarantees every child index points forward, so the
//! structure is acyclic and every traversal terminates.

use serde::{Deserialize, Serialize};

use super::ensemble::ModelError;

/// A decision tree node (internal split or leaf)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Go `left` if `features[feature] < threshold`, else `right`
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Contribution added to the raw score
    Leaf { value: f32 },
}

/// A single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Single-leaf tree
    pub fn leaf(value: f32) -> Self {
        Self::new(vec![Node::Leaf { value }])
    }

    /// Check structure against a feature count. `tree` is only used for
    /// error reporting.
    pub fn validate(&self, tree: usize, feature_count: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyTree { tree });
        }

        for (node, n) in self.nodes.iter().enumerate() {
            match *n {
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::NonFinite { tree, node });
                    }
                }
                Node::Split { feature, threshold, left, right } => {
                    if feature >= feature_count {
                        return Err(ModelError::FeatureOutOfRange { tree, node, feature, feature_count });
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::NonFinite { tree, node });
                    }
                    for child in [left, right] {
                        if child >= self.nodes.len() {
                            return Err(ModelError::ChildOutOfRange { tree, node, child });
                        }
                        if child <= node {
                            return Err(ModelError::BackwardChild { tree, node, child });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Index of the leaf reached by `features`.
    ///
    /// Caller guarantees the tree was validated and `features` is long enough.
    pub(crate) fn leaf_index(&self, features: &[f32]) -> usize {
        let mut idx = 0usize;
        loop {
            match self.nodes[idx] {
                Node::Leaf { .. } => return idx,
                Node::Split { feature, threshold, left, right } => {
                    // Strict '<': ties (and NaN) go right
                    idx = if features[feature] < threshold { left } else { right };
                }
            }
        }
    }

    /// Leaf value reached by `features`.
    ///
    /// Crate-private: only `TreeEnsembleModel` calls this, after validating
    /// every tree at construction.
    pub(crate) fn predict(&self, features: &[f32]) -> f32 {
        match self.nodes[self.leaf_index(features)] {
            Node::Leaf { value } => value,
            Node::Split { .. } => unreachable!("leaf_index always stops on a leaf"),
        }
    }

    /// Longest root-to-leaf path, counting the leaf
    pub(crate) fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Features this tree ever splits on
    pub(crate) fn split_features(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| match *n {
            Node::Split { feature, .. } => Some(feature),
            Node::Leaf { .. } => None,
        })
    }
}
