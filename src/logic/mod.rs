//! Logic Module - URL scoring pipeline
//!
//! Parser → Extractor → Model → Policy, orchestrated by `scoring`.
//!
//! - `url/` - RFC 3986 split, hostname normalization
//! - `features/` - Feature layout + extraction (host, path, lexical)
//! - `model/` - Tree ensemble inference, artifacts, XGBoost import
//! - `policy/` - Threshold, override table, verdicts

pub mod url;
pub mod features;
pub mod model;
pub mod policy;
pub mod scoring;
