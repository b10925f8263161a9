//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The order below is the column order of the training table (minus `id`
//! and the label). Every model artifact embeds these names and is rejected
//! at load time if they differ.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Hostname / URL counts (0-13) ===
    "NumDots",               // 0: '.' in hostname
    "SubdomainLevel",        // 1: labels beyond the registered domain
    "PathLevel",             // 2: non-empty path segments
    "UrlLength",             // 3: chars in raw URL
    "NumDash",               // 4: '-' in URL
    "NumDashInHostname",     // 5: '-' in hostname
    "AtSymbol",              // 6: '@' in URL
    "TildeSymbol",           // 7: '~' in URL
    "NumUnderscore",         // 8: '_' in URL
    "NumPercent",            // 9: '%' in URL
    "NumQueryComponents",    // 10: '&'-delimited query parts
    "NumAmpersand",          // 11: '&' in query
    "NumHash",               // 12: '#' present
    "NumNumericChars",       // 13: digits in URL

    // === Heuristics (14-19) ===
    "NoHttps",               // 14: scheme is not https
    "RandomString",          // 15: long low-diversity alphabetic run
    "IpAddress",             // 16: dotted-quad hostname
    "DomainInSubdomains",    // 17: TLD token used as subdomain label
    "DomainInPaths",         // 18: TLD token used in path
    "HttpsInHostname",       // 19: "https" inside hostname

    // === Lengths (20-24) ===
    "HostnameLength",        // 20
    "PathLength",            // 21
    "QueryLength",           // 22
    "DoubleSlashInPath",     // 23: "//" in path
    "NumSensitiveWords",     // 24: login/password/bank/account

    // === Page content (25-41), structural 0 ===
    "EmbeddedBrandName",
    "PctExtHyperlinks",
    "PctExtResourceUrls",
    "ExtFavicon",
    "InsecureForms",
    "RelativeFormAction",
    "ExtFormAction",
    "AbnormalFormAction",
    "PctNullSelfRedirectHyperlinks",
    "FrequentDomainNameMismatch",
    "FakeLinkInStatusBar",
    "RightClickDisabled",
    "PopUpWindow",
    "SubmitInfoToEmail",
    "IframeOrFrame",
    "MissingTitle",
    "ImagesOnlyInForm",

    // === Risk tiers (42-47) ===
    "SubdomainLevelRT",      // 42: 1 / 0 / -1
    "UrlLengthRT",           // 43: 1 / 0 / -1
    "PctExtResourceUrlsRT",  // 44: page content, structural 0
    "AbnormalExtFormActionR",             // 45: page content, structural 0
    "ExtMetaScriptLinkRT",                // 46: page content, structural 0
    "PctExtNullSelfRedirectHyperlinksRT", // 47: page content, structural 0
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 48;

/// Slot indices, named so extractors never hard-code positions
pub mod idx {
    pub const NUM_DOTS: usize = 0;
    pub const SUBDOMAIN_LEVEL: usize = 1;
    pub const PATH_LEVEL: usize = 2;
    pub const URL_LENGTH: usize = 3;
    pub const NUM_DASH: usize = 4;
    pub const NUM_DASH_IN_HOSTNAME: usize = 5;
    pub const AT_SYMBOL: usize = 6;
    pub const TILDE_SYMBOL: usize = 7;
    pub const NUM_UNDERSCORE: usize = 8;
    pub const NUM_PERCENT: usize = 9;
    pub const NUM_QUERY_COMPONENTS: usize = 10;
    pub const NUM_AMPERSAND: usize = 11;
    pub const NUM_HASH: usize = 12;
    pub const NUM_NUMERIC_CHARS: usize = 13;
    pub const NO_HTTPS: usize = 14;
    pub const RANDOM_STRING: usize = 15;
    pub const IP_ADDRESS: usize = 16;
    pub const DOMAIN_IN_SUBDOMAINS: usize = 17;
    pub const DOMAIN_IN_PATHS: usize = 18;
    pub const HTTPS_IN_HOSTNAME: usize = 19;
    pub const HOSTNAME_LENGTH: usize = 20;
    pub const PATH_LENGTH: usize = 21;
    pub const QUERY_LENGTH: usize = 22;
    pub const DOUBLE_SLASH_IN_PATH: usize = 23;
    pub const NUM_SENSITIVE_WORDS: usize = 24;
    pub const SUBDOMAIN_LEVEL_RT: usize = 42;
    pub const URL_LENGTH_RT: usize = 43;
}

// Compile-time guard: slot count and name table must agree
const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches when binding a model
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a model's feature layout doesn't match the extractor's
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutMismatchError {
    #[error("feature layout version mismatch: expected v{expected}, got v{actual}")]
    Version { expected: u8, actual: u8 },

    #[error("feature count mismatch: expected {expected}, got {actual}")]
    Count { expected: usize, actual: usize },

    #[error("feature #{index} mismatch: expected `{expected}`, got `{actual}`")]
    Name {
        index: usize,
        expected: &'static str,
        actual: String,
    },

    #[error("feature layout hash mismatch: expected {expected:08x}, got {actual:08x}")]
    Hash { expected: u32, actual: u32 },
}

/// Validate that a model was fit against the current layout
pub fn validate_names(
    version: u8,
    names: &[String],
    hash: Option<u32>,
) -> Result<(), LayoutMismatchError> {
    if version != FEATURE_VERSION {
        return Err(LayoutMismatchError::Version {
            expected: FEATURE_VERSION,
            actual: version,
        });
    }

    if names.len() != FEATURE_COUNT {
        return Err(LayoutMismatchError::Count {
            expected: FEATURE_COUNT,
            actual: names.len(),
        });
    }

    for (index, (&expected, actual)) in FEATURE_LAYOUT.iter().zip(names).enumerate() {
        if expected != actual.as_str() {
            return Err(LayoutMismatchError::Name {
                index,
                expected,
                actual: actual.clone(),
            });
        }
    }

    if let Some(actual) = hash {
        let expected = layout_hash();
        if actual != expected {
            return Err(LayoutMismatchError::Hash { expected, actual });
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
