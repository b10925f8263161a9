//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::logic::policy::{PolicyConfig, DEFAULT_PHISHING_THRESHOLD};
use crate::logic::scoring::{ArtifactSources, ScoringConfig, DEFAULT_MAX_URL_LENGTH};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("PHISHING_THRESHOLD must lie in [0, 1], got {0}")]
    Threshold(f32),

    #[error("OVERRIDE_CONFIDENCE must lie in [0, 100], got {0}")]
    OverrideConfidence(f32),

    #[error("MAX_URL_LENGTH must be positive")]
    MaxUrlLength,

    #[error("PORT must be non-zero")]
    Port,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model artifact (JSON + optional `.sha256` sidecar)
    pub model_path: PathBuf,

    /// Override table; a missing file means no overrides
    pub overrides_path: PathBuf,

    /// Master switch for the override table
    pub overrides_enabled: bool,

    /// Replaces the confidence stored in the override file
    pub override_confidence: Option<f32>,

    /// `probability >= threshold` ⇒ Phishing
    pub phishing_threshold: f32,

    /// URLs are truncated to this many chars before parsing
    pub max_url_length: usize,

    /// Environment (development, production)
    pub environment: String,

    /// Mount `/api/v1/model*`; off by default in production
    pub admin_api: bool,

    /// `json` for structured logs, anything else for plain text
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            model_path: PathBuf::from("models/url_model.json"),
            overrides_path: PathBuf::from("models/overrides.json"),
            overrides_enabled: true,
            override_confidence: None,
            phishing_threshold: DEFAULT_PHISHING_THRESHOLD,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            environment: "development".to_string(),
            admin_api: true,
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            overrides_path: env::var("OVERRIDES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.overrides_path),

            overrides_enabled: env::var("OVERRIDES_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.overrides_enabled),

            override_confidence: env::var("OVERRIDE_CONFIDENCE")
                .ok()
                .and_then(|c| c.parse().ok()),

            phishing_threshold: env::var("PHISHING_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.phishing_threshold),

            max_url_length: env::var("MAX_URL_LENGTH")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.max_url_length),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            admin_api: defaults.admin_api,

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        };

        config.admin_api = env::var("ADMIN_API_ENABLED")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(!config.is_production());
        config
    }

    /// Reject values the service must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Port);
        }
        if !(0.0..=1.0).contains(&self.phishing_threshold) {
            return Err(ConfigError::Threshold(self.phishing_threshold));
        }
        if let Some(c) = self.override_confidence {
            if !(0.0..=100.0).contains(&c) {
                return Err(ConfigError::OverrideConfidence(c));
            }
        }
        if self.max_url_length == 0 {
            return Err(ConfigError::MaxUrlLength);
        }
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            policy: PolicyConfig {
                phishing_threshold: self.phishing_threshold,
            },
            max_url_length: self.max_url_length,
        }
    }

    pub fn sources(&self) -> ArtifactSources {
        ArtifactSources {
            model_path: self.model_path.clone(),
            overrides_path: Some(self.overrides_path.clone()),
            overrides_enabled: self.overrides_enabled,
            override_confidence: self.override_confidence,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
