//! Policy Configuration
//!
//! Configuration for policy decisions.
//! Can be loaded from environment or set at runtime.

use serde::{Deserialize, Serialize};

/// Default decision threshold on phishing probability
pub const DEFAULT_PHISHING_THRESHOLD: f32 = 0.5;

/// Default confidence reported for override-table verdicts
pub const DEFAULT_OVERRIDE_CONFIDENCE: f32 = 92.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyConfigError {
    #[error("phishing threshold {0} must lie in [0, 1]")]
    ThresholdOutOfRange(f32),
}

// ============================================================================
// POLICY CONFIG
// ============================================================================

/// Policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// `probability >= phishing_threshold` ⇒ Phishing
    pub phishing_threshold: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            phishing_threshold: DEFAULT_PHISHING_THRESHOLD,
        }
    }
}

impl PolicyConfig {
    pub fn new(phishing_threshold: f32) -> Result<Self, PolicyConfigError> {
        let config = Self { phishing_threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&self.phishing_threshold) {
            return Err(PolicyConfigError::ThresholdOutOfRange(self.phishing_threshold));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
