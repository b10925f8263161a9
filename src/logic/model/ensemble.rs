//! Tree Ensemble - gradient-boosted forest evaluation
//!
//! `raw_score = bias + Σ leaf(tree_i)` summed in stored order, then passed
//! through the link function. All arithmetic is `f32`, the precision the
//! trainer evaluates in, so scores reproduce bit-for-bit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tree::Tree;
use crate::logic::features::layout::feature_name;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree} node {node}: child {child} out of range")]
    ChildOutOfRange { tree: usize, node: usize, child: usize },

    #[error("tree {tree} node {node}: child {child} does not come after its parent")]
    BackwardChild { tree: usize, node: usize, child: usize },

    #[error("tree {tree} node {node}: feature {feature} out of range (layout has {feature_count})")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
        feature_count: usize,
    },

    #[error("tree {tree} node {node}: non-finite threshold or leaf value")]
    NonFinite { tree: usize, node: usize },

    #[error("bias must be finite")]
    NonFiniteBias,
}

// ============================================================================
// LINK FUNCTION
// ============================================================================

/// Maps a raw score onto a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkFunction {
    #[default]
    Sigmoid,
    /// Raw score clamped to [0, 1]
    Identity,
}

impl LinkFunction {
    pub fn apply(&self, raw: f32) -> f32 {
        match self {
            LinkFunction::Sigmoid => sigmoid(raw),
            LinkFunction::Identity => raw.clamp(0.0, 1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkFunction::Sigmoid => "sigmoid",
            LinkFunction::Identity => "identity",
        }
    }
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// MODEL
// ============================================================================

/// Output of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub raw_score: f32,
    pub probability: f32,
}

/// Immutable forest bound to the feature layout.
///
/// Construction validates every tree, so evaluation never fails on a
/// correctly sized input and needs no synchronization when shared.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsembleModel {
    trees: Vec<Tree>,
    bias: f32,
    link: LinkFunction,
}

impl TreeEnsembleModel {
    pub fn new(trees: Vec<Tree>, bias: f32, link: LinkFunction) -> Result<Self, ModelError> {
        if !bias.is_finite() {
            return Err(ModelError::NonFiniteBias);
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, FEATURE_COUNT)?;
        }
        Ok(Self { trees, bias, link })
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn link(&self) -> LinkFunction {
        self.link
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Evaluate an unchecked slice. Wrong length is an error, never
    /// truncated or padded.
    pub fn evaluate(&self, features: &[f32]) -> Result<Evaluation, ModelError> {
        self.check_len(features)?;
        Ok(self.evaluate_unchecked(features))
    }

    /// Evaluate a typed vector; length is guaranteed by the type
    pub fn evaluate_vector(&self, vector: &FeatureVector) -> Evaluation {
        self.evaluate_unchecked(vector.as_slice())
    }

    /// Per-tree leaf values in stored order
    pub fn contributions(&self, vector: &FeatureVector) -> Vec<f32> {
        self.trees.iter().map(|t| t.predict(vector.as_slice())).collect()
    }

    /// Deepest root-to-leaf path over all trees, counting the leaf
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(Tree::depth).max().unwrap_or(0)
    }

    /// Layout names of every feature some tree splits on, in layout order
    pub fn split_feature_names(&self) -> Vec<&'static str> {
        let used: BTreeSet<usize> = self.trees.iter().flat_map(|t| t.split_features()).collect();
        used.into_iter().filter_map(feature_name).collect()
    }

    fn check_len(&self, features: &[f32]) -> Result<(), ModelError> {
        if features.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }
        Ok(())
    }

    fn evaluate_unchecked(&self, features: &[f32]) -> Evaluation {
        let mut raw_score = self.bias;
        for tree in &self.trees {
            raw_score += tree.predict(features);
        }
        Evaluation {
            raw_score,
            probability: self.link.apply(raw_score),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
