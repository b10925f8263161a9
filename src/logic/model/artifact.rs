//! Model Artifact - on-disk forest format
//!
//! JSON document carrying the forest plus the feature layout it was fit
//! against. Optional `<artifact>.sha256` sidecar holds the hex SHA-256 of
//! the artifact bytes; when present it must match.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ensemble::{LinkFunction, ModelError, TreeEnsembleModel};
use super::tree::Tree;
use crate::logic::features::layout::{self, LayoutMismatchError, FEATURE_LAYOUT, FEATURE_VERSION};

/// Current artifact format
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot access model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported artifact format v{0} (expected v{ARTIFACT_FORMAT_VERSION})")]
    UnsupportedFormat(u32),

    #[error("artifact checksum mismatch: sidecar says {expected}, file hashes to {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("feature schema mismatch: {0}")]
    Layout(#[from] LayoutMismatchError),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Serialized forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    pub feature_version: u8,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hash: Option<u32>,
    pub bias: f32,
    #[serde(default)]
    pub link: LinkFunction,
    pub trees: Vec<Tree>,
}

impl ModelArtifact {
    /// Snapshot a model under the current layout
    pub fn from_model(name: impl Into<String>, model: &TreeEnsembleModel) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            name: name.into(),
            feature_version: FEATURE_VERSION,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            layout_hash: Some(layout::layout_hash()),
            bias: model.bias(),
            link: model.link(),
            trees: model.trees().to_vec(),
        }
    }

    /// Bind to the compiled feature layout and validate the forest
    pub fn into_model(self) -> Result<TreeEnsembleModel, ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat(self.format_version));
        }
        layout::validate_names(self.feature_version, &self.feature_names, self.layout_hash)?;
        Ok(TreeEnsembleModel::new(self.trees, self.bias, self.link)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// LOADED MODEL
// ============================================================================

/// Where a model came from, for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub source: String,
    pub sha256: String,
    pub tree_count: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// A bound model plus its metadata
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: TreeEnsembleModel,
    pub metadata: ModelMetadata,
}

impl LoadedModel {
    /// Wrap an in-memory model (tests, import tool)
    pub fn in_memory(name: impl Into<String>, model: TreeEnsembleModel) -> Self {
        let metadata = ModelMetadata {
            name: name.into(),
            source: "<memory>".to_string(),
            sha256: String::new(),
            tree_count: model.trees().len(),
            loaded_at: chrono::Utc::now(),
        };
        Self { model, metadata }
    }
}

/// Sidecar checksum path: `<artifact>.sha256`
pub fn checksum_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".sha256");
    PathBuf::from(s)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Read, verify and bind a model artifact
pub fn load(path: &Path) -> Result<LoadedModel, ArtifactError> {
    tracing::info!("Loading model artifact from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let actual = sha256_hex(&bytes);

    let sidecar = checksum_path(path);
    match std::fs::read_to_string(&sidecar) {
        Ok(content) => {
            // sha256sum format: "<hex>  <filename>"
            let expected = content.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
            if expected != actual {
                return Err(ArtifactError::ChecksumMismatch { expected, actual });
            }
            tracing::debug!("Checksum verified against {}", sidecar.display());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No checksum sidecar for {}, skipping integrity check", path.display());
        }
        Err(source) => return Err(ArtifactError::Io { path: sidecar, source }),
    }

    let artifact = ModelArtifact::from_json(&bytes)?;
    let name = artifact.name.clone();
    let model = artifact.into_model()?;

    tracing::info!(
        "Model '{}' loaded: {} trees, link={}, bias={}",
        name,
        model.trees().len(),
        model.link().as_str(),
        model.bias()
    );

    let metadata = ModelMetadata {
        name,
        source: path.display().to_string(),
        sha256: actual,
        tree_count: model.trees().len(),
        loaded_at: chrono::Utc::now(),
    };
    Ok(LoadedModel { model, metadata })
}

/// Write artifact JSON and its checksum sidecar
pub fn save(path: &Path, artifact: &ModelArtifact) -> Result<(), ArtifactError> {
    let json = artifact.to_json()?;

    std::fs::write(path, json.as_bytes()).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sidecar = checksum_path(path);
    std::fs::write(&sidecar, format!("{}  {}\n", sha256_hex(json.as_bytes()), file_name))
        .map_err(|source| ArtifactError::Io { path: sidecar.clone(), source })?;

    tracing::info!("Model artifact written to {}", path.display());
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
