//! Policy Types
//!
//! Core types for policy decisions. Data only, no logic.

use serde::{Deserialize, Serialize};

// ============================================================================
// LABEL
// ============================================================================

/// Final classification of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Safe,
    Phishing,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Safe => "safe",
            Label::Phishing => "phishing",
        }
    }

    pub fn is_phishing(&self) -> bool {
        matches!(self, Label::Phishing)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERDICT SOURCE
// ============================================================================

/// What produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Tree ensemble + threshold
    Model,
    /// Forced by the override table, model not consulted
    Override,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Model => "model",
            VerdictSource::Override => "override",
        }
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Complete policy decision for one URL
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    /// Phishing probability, [0, 1]
    pub probability: f32,
    /// Certainty in the chosen label, [0, 100]
    pub confidence: f32,
    /// UI-facing danger level, [0, 100]; always 0 for Safe
    pub risk_score: f32,
    pub source: VerdictSource,
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        !self.label.is_phishing()
    }
}
