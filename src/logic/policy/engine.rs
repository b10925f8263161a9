//! Policy Engine
//!
//! Decision logic only; types live in `types`.
//! Input: hostname + model probability + OverrideTable + PolicyConfig
//! Output: Verdict

use super::config::PolicyConfig;
use super::overrides::OverrideTable;
use super::types::*;

// ============================================================================
// MAIN DECISION FUNCTION
// ============================================================================

/// Policy decision with default config
pub fn decide(hostname: &str, probability: f32, overrides: &OverrideTable) -> Verdict {
    decide_with_config(hostname, probability, overrides, &PolicyConfig::default())
}

/// Policy decision with custom config
pub fn decide_with_config(
    hostname: &str,
    probability: f32,
    overrides: &OverrideTable,
    config: &PolicyConfig,
) -> Verdict {
    decide_lazy(hostname, overrides, config, || (probability, ())).0
}

/// Override lookup first; `evaluate` runs only when no override matches.
///
/// `evaluate` returns the phishing probability plus whatever the caller
/// wants to keep from the model run, handed back as `Some` alongside the
/// verdict. An override match yields `None`.
pub fn decide_lazy<T, F>(
    hostname: &str,
    overrides: &OverrideTable,
    config: &PolicyConfig,
    evaluate: F,
) -> (Verdict, Option<T>)
where
    F: FnOnce() -> (f32, T),
{
    match overrides.lookup(hostname) {
        Some(label) => (forced_verdict(label, overrides.confidence), None),
        None => {
            let (probability, detail) = evaluate();
            (model_verdict(probability, config), Some(detail))
        }
    }
}

/// Verdict from the override table; the model is not consulted
pub fn forced_verdict(label: Label, confidence: f32) -> Verdict {
    let certainty = confidence / 100.0;
    let probability = match label {
        Label::Phishing => certainty,
        Label::Safe => 1.0 - certainty,
    };
    Verdict {
        label,
        probability,
        confidence,
        risk_score: risk_score(label, confidence),
        source: VerdictSource::Override,
    }
}

/// Threshold the model probability
pub fn model_verdict(probability: f32, config: &PolicyConfig) -> Verdict {
    let label = classify(probability, config.phishing_threshold);

    // Certainty in the chosen label, never raw class-1 probability
    let confidence = match label {
        Label::Phishing => 100.0 * probability,
        Label::Safe => 100.0 * (1.0 - probability),
    };

    Verdict {
        label,
        probability,
        confidence,
        risk_score: risk_score(label, confidence),
        source: VerdictSource::Model,
    }
}

/// `probability >= threshold` ⇒ Phishing
pub fn classify(probability: f32, threshold: f32) -> Label {
    if probability >= threshold {
        Label::Phishing
    } else {
        Label::Safe
    }
}

/// Asymmetric by contract: `100 - confidence` for Phishing, 0 for Safe.
///
/// Safe URLs get no gradation. Kept as-is until the product decides
/// whether risk should follow `100 * probability` for both labels.
pub fn risk_score(label: Label, confidence: f32) -> f32 {
    match label {
        Label::Phishing => 100.0 - confidence,
        Label::Safe => 0.0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
