//! XGBoost dump import
//!
//! Converts `Booster.dump_model(path, dump_format="json")` output into the
//! arena layout. XGBoost sends `x < split_condition` to `yes`, which maps
//! directly onto `left`. Split names are either `f<index>` or a layout
//! feature name.

use std::collections::HashMap;

use serde::Deserialize;

use super::ensemble::{LinkFunction, ModelError, TreeEnsembleModel};
use super::tree::{Node, Tree};
use crate::logic::features::layout::feature_index;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid XGBoost dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tree {tree}: unknown split feature `{name}`")]
    UnknownFeature { tree: usize, name: String },

    #[error("tree {tree}: node id {node} appears twice")]
    DuplicateNode { tree: usize, node: usize },

    #[error("tree {tree}: node ids are not contiguous (missing {node})")]
    MissingNode { tree: usize, node: usize },

    #[error("base_score {0} must lie strictly between 0 and 1 for a sigmoid link")]
    InvalidBaseScore(f32),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One node of the nested dump
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpNode {
    Split {
        nodeid: usize,
        split: String,
        split_condition: f32,
        yes: usize,
        no: usize,
        #[serde(default)]
        children: Vec<DumpNode>,
    },
    Leaf {
        nodeid: usize,
        leaf: f32,
    },
}

/// Parse a JSON tree dump into a bound model.
///
/// `base_score` is XGBoost's global bias in output space; for the sigmoid
/// link it is converted to a margin via logit.
pub fn from_dump(json: &str, base_score: f32, link: LinkFunction) -> Result<TreeEnsembleModel, ImportError> {
    let dump: Vec<DumpNode> = serde_json::from_str(json)?;

    let bias = match link {
        LinkFunction::Sigmoid => {
            if !(base_score > 0.0 && base_score < 1.0) {
                return Err(ImportError::InvalidBaseScore(base_score));
            }
            (base_score / (1.0 - base_score)).ln()
        }
        LinkFunction::Identity => base_score,
    };

    let trees = dump
        .iter()
        .enumerate()
        .map(|(i, root)| convert_tree(i, root))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!("Imported {} trees from XGBoost dump (bias={})", trees.len(), bias);
    Ok(TreeEnsembleModel::new(trees, bias, link)?)
}

fn convert_tree(tree: usize, root: &DumpNode) -> Result<Tree, ImportError> {
    let mut slots: HashMap<usize, Node> = HashMap::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let (id, converted) = match node {
            DumpNode::Leaf { nodeid, leaf } => (*nodeid, Node::Leaf { value: *leaf }),
            DumpNode::Split { nodeid, split, split_condition, yes, no, children } => {
                stack.extend(children.iter());
                let feature = resolve_feature(split).ok_or_else(|| ImportError::UnknownFeature {
                    tree,
                    name: split.clone(),
                })?;
                (
                    *nodeid,
                    Node::Split {
                        feature,
                        threshold: *split_condition,
                        left: *yes,
                        right: *no,
                    },
                )
            }
        };
        if slots.insert(id, converted).is_some() {
            return Err(ImportError::DuplicateNode { tree, node: id });
        }
    }

    let nodes = (0..slots.len())
        .map(|id| slots.remove(&id).ok_or(ImportError::MissingNode { tree, node: id }))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Tree::new(nodes))
}

fn resolve_feature(split: &str) -> Option<usize> {
    if let Some(index) = split.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return Some(index);
    }
    feature_index(split)
}
