//! Model Module - Tree Ensemble Inference Engine
//!
//! Explicit, auditable traversal of a serialized forest. The trainer is
//! not a runtime dependency; only the split/leaf structure is.

pub mod tree;
pub mod ensemble;
pub mod artifact;
pub mod xgboost;

// Re-export common types
pub use tree::{Node, Tree};
pub use ensemble::{Evaluation, LinkFunction, ModelError, TreeEnsembleModel};
pub use artifact::{ArtifactError, LoadedModel, ModelArtifact, ModelMetadata};
