//! Override Table
//!
//! Static hostname → label mapping consulted before the model.
//! Used for known test/benchmark domains. Supplied by configuration,
//! never mutated by the scoring path; reloads replace the whole table.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::DEFAULT_OVERRIDE_CONFIDENCE;
use super::types::Label;

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("cannot read override table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid override table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("override confidence {0} must lie in [0, 100]")]
    ConfidenceOutOfRange(f32),
}

fn default_enabled() -> bool {
    true
}

fn default_confidence() -> f32 {
    DEFAULT_OVERRIDE_CONFIDENCE
}

/// Hostname → forced label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideTable {
    /// Disabled tables never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Also match subdomains of listed hosts
    #[serde(default)]
    pub match_subdomains: bool,
    /// Confidence reported for forced verdicts
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    hosts: HashMap<String, Label>,
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self {
            enabled: true,
            match_subdomains: false,
            confidence: DEFAULT_OVERRIDE_CONFIDENCE,
            hosts: HashMap::new(),
        }
    }
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that never matches
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_host(mut self, host: &str, label: Label) -> Self {
        self.insert(host, label);
        self
    }

    pub fn insert(&mut self, host: &str, label: Label) {
        self.hosts.insert(normalize(host), label);
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Forced label for a hostname, if any
    pub fn lookup(&self, hostname: &str) -> Option<Label> {
        if !self.enabled || self.hosts.is_empty() {
            return None;
        }
        let host = normalize(hostname);
        if host.is_empty() {
            return None;
        }
        if let Some(label) = self.hosts.get(&host) {
            return Some(*label);
        }
        if self.match_subdomains {
            // a.b.example.com → b.example.com → example.com → com
            let mut rest = host.as_str();
            while let Some(dot) = rest.find('.') {
                rest = &rest[dot + 1..];
                if let Some(label) = self.hosts.get(rest) {
                    return Some(*label);
                }
            }
        }
        None
    }

    pub fn validate(&self) -> Result<(), OverrideError> {
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(OverrideError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, OverrideError> {
        let raw: Self = serde_json::from_slice(bytes)?;
        // Re-key so file entries get the same normalization as inserts
        let mut table = Self {
            enabled: raw.enabled,
            match_subdomains: raw.match_subdomains,
            confidence: raw.confidence,
            hosts: HashMap::with_capacity(raw.hosts.len()),
        };
        for (host, label) in raw.hosts {
            table.insert(&host, label);
        }
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        let bytes = std::fs::read(path).map_err(|source| OverrideError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json(&bytes)?;
        tracing::info!(
            "Override table loaded from {}: {} hosts (enabled={}, subdomains={})",
            path.display(),
            table.len(),
            table.enabled,
            table.match_subdomains
        );
        Ok(table)
    }
}

fn normalize(host: &str) -> String {
    host.trim().trim_end_matches('.').to_lowercase()
}
