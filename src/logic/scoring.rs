//! Scoring Service
//!
//! Orchestrates Parser → Extractor → Model → Policy for one URL.
//!
//! The model and override table live in one immutable `Snapshot` behind
//! an `Arc`. Each request clones the `Arc` once and works on that snapshot
//! start to finish; reloads build a complete new snapshot and swap the
//! pointer, so in-flight requests never see a half-updated pair.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::logic::features::{self, FeatureVector};
use crate::logic::model::{artifact, ArtifactError, Evaluation, LoadedModel};
use crate::logic::policy::{
    self, OverrideError, OverrideTable, PolicyConfig, PolicyConfigError, Verdict,
};
use crate::logic::url::{self, ParseStatus, ParsedUrl};

/// Default cap on URL length before parsing
pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;

// ============================================================================
// ERRORS
// ============================================================================

/// Startup/reload-level: the service must not serve with these
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model artifact: {0}")]
    Model(#[from] ArtifactError),

    #[error("override table: {0}")]
    Overrides(#[from] OverrideError),

    #[error("policy config: {0}")]
    Policy(#[from] PolicyConfigError),

    #[error("max URL length must be positive")]
    InvalidMaxUrlLength,

    #[error("service was built without artifact sources, nothing to reload")]
    NoSources,
}

// ============================================================================
// CONFIG / SOURCES
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub policy: PolicyConfig,
    /// URLs longer than this (in chars) are truncated before parsing
    pub max_url_length: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), LoadError> {
        self.policy.validate()?;
        if self.max_url_length == 0 {
            return Err(LoadError::InvalidMaxUrlLength);
        }
        Ok(())
    }
}

/// Where snapshots are loaded from
#[derive(Debug, Clone)]
pub struct ArtifactSources {
    pub model_path: PathBuf,
    /// Missing file ⇒ empty table
    pub overrides_path: Option<PathBuf>,
    pub overrides_enabled: bool,
    /// Replaces the confidence stored in the table file
    pub override_confidence: Option<f32>,
}

impl ArtifactSources {
    pub fn load(&self) -> Result<Snapshot, LoadError> {
        let model = artifact::load(&self.model_path)?;

        let mut overrides = match &self.overrides_path {
            Some(path) if path.exists() => OverrideTable::load(path)?,
            Some(path) => {
                tracing::warn!("Override table {} not found, using empty table", path.display());
                OverrideTable::new()
            }
            None => OverrideTable::new(),
        };
        if !self.overrides_enabled {
            overrides.enabled = false;
        }
        if let Some(confidence) = self.override_confidence {
            overrides.confidence = confidence;
        }

        Ok(Snapshot { model, overrides })
    }
}

// ============================================================================
// SNAPSHOT / ASSESSMENT
// ============================================================================

/// Everything a request reads, immutable once published
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub model: LoadedModel,
    pub overrides: OverrideTable,
}

/// Result of scoring one URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    /// `None` when an override decided without the model
    pub evaluation: Option<Evaluation>,
    pub features: FeatureVector,
    pub hostname: String,
    pub status: ParseStatus,
    /// Input exceeded `max_url_length`
    pub truncated: bool,
}

impl Assessment {
    /// False for blank input. The verdict is still the model's answer for
    /// the degenerate vector, but callers should treat it as a client error.
    pub fn has_input(&self) -> bool {
        self.status != ParseStatus::Empty
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ScoringService {
    snapshot: RwLock<Arc<Snapshot>>,
    config: ScoringConfig,
    sources: Option<ArtifactSources>,
}

impl ScoringService {
    /// Build from in-memory parts
    pub fn new(snapshot: Snapshot, config: ScoringConfig) -> Result<Self, LoadError> {
        config.validate()?;
        snapshot.overrides.validate()?;
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            config,
            sources: None,
        })
    }

    /// Load artifacts and build; any failure is fatal for the caller
    pub fn from_sources(sources: ArtifactSources, config: ScoringConfig) -> Result<Self, LoadError> {
        let snapshot = sources.load()?;
        let mut service = Self::new(snapshot, config)?;
        service.sources = Some(sources);
        Ok(service)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Current snapshot; hold it for the duration of one request
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Score one URL. Total and deterministic, no I/O.
    pub fn score(&self, raw: &str) -> Assessment {
        let (input, truncated) = cap_length(raw, self.config.max_url_length);
        if truncated {
            tracing::debug!("URL truncated to {} chars before parsing", self.config.max_url_length);
        }

        let parsed = url::parse(input);
        let features = features::extract(&parsed);
        let snapshot = self.snapshot();

        tracing::trace!(features = %features.to_log_entry(), "Feature vector");

        let (verdict, evaluation) =
            policy::decide_lazy(&parsed.hostname, &snapshot.overrides, &self.config.policy, || {
                let eval = snapshot.model.model.evaluate_vector(&features);
                (eval.probability, eval)
            });

        tracing::debug!(
            host = %parsed.hostname,
            status = parsed.status.as_str(),
            label = verdict.label.as_str(),
            source = verdict.source.as_str(),
            probability = verdict.probability,
            "URL scored"
        );

        let ParsedUrl { hostname, status, .. } = parsed;
        Assessment {
            verdict,
            evaluation,
            features,
            hostname,
            status,
            truncated,
        }
    }

    /// Publish a new model, keeping the current override table
    pub fn swap_model(&self, model: LoadedModel) {
        let mut guard = self.snapshot.write();
        let next = Snapshot {
            model,
            overrides: guard.overrides.clone(),
        };
        tracing::info!("Model swapped to '{}'", next.model.metadata.name);
        *guard = Arc::new(next);
    }

    /// Publish a new override table, keeping the current model
    pub fn swap_overrides(&self, overrides: OverrideTable) -> Result<(), LoadError> {
        overrides.validate()?;
        let mut guard = self.snapshot.write();
        let next = Snapshot {
            model: guard.model.clone(),
            overrides,
        };
        tracing::info!("Override table swapped ({} hosts)", next.overrides.len());
        *guard = Arc::new(next);
        Ok(())
    }

    /// Re-read configured artifacts and publish them together.
    /// On error the current snapshot keeps serving.
    pub fn reload(&self) -> Result<Arc<Snapshot>, LoadError> {
        let sources = self.sources.as_ref().ok_or(LoadError::NoSources)?;
        let next = sources.load()?;
        next.overrides.validate()?;

        let next = Arc::new(next);
        *self.snapshot.write() = Arc::clone(&next);
        tracing::info!(
            "Reloaded model '{}' ({} trees) and {} overrides",
            next.model.metadata.name,
            next.model.metadata.tree_count,
            next.overrides.len()
        );
        Ok(next)
    }
}

/// Truncate to at most `max` chars on a char boundary
fn cap_length(raw: &str, max: usize) -> (&str, bool) {
    match raw.char_indices().nth(max) {
        Some((cut, _)) => (&raw[..cut], true),
        None => (raw, false),
    }
}

// ============================================================================
// TESTS
// ============================================================================
