//! Policy Module
//!
//! Turns a model probability into a Verdict.
//! Overrides are checked first and bypass the model entirely.
//!
//! ## Structure
//! - `types`: Core types (Label, Verdict, VerdictSource)
//! - `config`: Threshold configuration
//! - `overrides`: Hostname → forced label table
//! - `engine`: Decision logic
//!
//! ## Usage
//! ```ignore
//! use crate::logic::policy::{decide_with_config, OverrideTable, PolicyConfig};
//!
//! let verdict = decide_with_config(&parsed.hostname, eval.probability, &overrides, &config);
//! if verdict.label.is_phishing() {
//!     show_warning();
//! }
//! ```

pub mod types;
pub mod config;
pub mod overrides;
pub mod engine;

// Re-export main types for convenience
pub use types::{Label, Verdict, VerdictSource};

pub use config::{PolicyConfig, PolicyConfigError, DEFAULT_OVERRIDE_CONFIDENCE, DEFAULT_PHISHING_THRESHOLD};

pub use overrides::{OverrideError, OverrideTable};

pub use engine::{decide, decide_lazy, decide_with_config, forced_verdict, model_verdict, risk_score};
