//! Lexical Feature Extraction
//!
//! Character counts over the full raw URL, plus scheme and
//! random-looking-token heuristics.

use super::host::{count_char, flag, subdomain_level};
use super::layout::idx;
use super::vector::{FeatureExtractor, FeatureVector};
use crate::logic::url::ParsedUrl;

/// Words phishing kits like to put in URLs
pub const SENSITIVE_WORDS: &[&str] = &["login", "password", "bank", "account"];

/// Minimum alphabetic run length considered for RandomString
pub const RANDOM_RUN_MIN_LEN: usize = 10;

/// Max distinct-chars / run-length ratio for a run to count as random filler
pub const RANDOM_RUN_MAX_DIVERSITY: f32 = 0.4;

/// Lexical Features
#[derive(Debug, Clone, Default)]
pub struct LexicalFeatures {
    pub length: u32,
    pub dashes: u32,
    pub at_symbols: u32,
    pub tildes: u32,
    pub underscores: u32,
    pub percents: u32,
    pub has_hash: bool,
    pub digits: u32,
    pub sensitive_words: u32,
    pub no_https: bool,
    pub random_string: bool,
}

impl LexicalFeatures {
    pub fn from_parsed(url: &ParsedUrl) -> Self {
        let raw = url.raw.as_str();
        let lowered = raw.to_lowercase();

        Self {
            length: raw.chars().count() as u32,
            dashes: count_char(raw, '-'),
            at_symbols: count_char(raw, '@'),
            tildes: count_char(raw, '~'),
            underscores: count_char(raw, '_'),
            percents: count_char(raw, '%'),
            has_hash: raw.contains('#'),
            digits: raw.chars().filter(|c| c.is_ascii_digit()).count() as u32,
            sensitive_words: SENSITIVE_WORDS
                .iter()
                .map(|w| lowered.matches(w).count() as u32)
                .sum(),
            no_https: !url.is_https(),
            random_string: has_random_run(&url.hostname) || has_random_run(&url.path.to_ascii_lowercase()),
        }
    }
}

impl FeatureExtractor for LexicalFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[idx::URL_LENGTH] = self.length as f32;
        vector.values[idx::NUM_DASH] = self.dashes as f32;
        vector.values[idx::AT_SYMBOL] = self.at_symbols as f32;
        vector.values[idx::TILDE_SYMBOL] = self.tildes as f32;
        vector.values[idx::NUM_UNDERSCORE] = self.underscores as f32;
        vector.values[idx::NUM_PERCENT] = self.percents as f32;
        vector.values[idx::NUM_HASH] = flag(self.has_hash);
        vector.values[idx::NUM_NUMERIC_CHARS] = self.digits as f32;
        vector.values[idx::NUM_SENSITIVE_WORDS] = self.sensitive_words as f32;
        vector.values[idx::NO_HTTPS] = flag(self.no_https);
        vector.values[idx::RANDOM_STRING] = flag(self.random_string);
    }
}

/// Long alphabetic run with few distinct characters
fn has_random_run(s: &str) -> bool {
    s.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| run.len() >= RANDOM_RUN_MIN_LEN)
        .any(|run| {
            let mut seen = [false; 26];
            for b in run.bytes() {
                seen[(b.to_ascii_lowercase() - b'a') as usize] = true;
            }
            let distinct = seen.iter().filter(|&&s| s).count();
            (distinct as f32 / run.len() as f32) <= RANDOM_RUN_MAX_DIVERSITY
        })
}

/// Risk tier features: coarse 1 / 0 / -1 bands of other features
#[derive(Debug, Clone, Default)]
pub struct RiskTierFeatures {
    pub subdomain_tier: i8,
    pub length_tier: i8,
}

impl RiskTierFeatures {
    pub fn from_parsed(url: &ParsedUrl) -> Self {
        let subdomain_tier = match subdomain_level(&url.hostname) {
            0 | 1 => 1,
            2 => 0,
            _ => -1,
        };
        let length_tier = match url.raw.chars().count() {
            0..=53 => 1,
            54..=75 => 0,
            _ => -1,
        };
        Self { subdomain_tier, length_tier }
    }
}

impl FeatureExtractor for RiskTierFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[idx::SUBDOMAIN_LEVEL_RT] = f32::from(self.subdomain_tier);
        vector.values[idx::URL_LENGTH_RT] = f32::from(self.length_tier);
    }
}
