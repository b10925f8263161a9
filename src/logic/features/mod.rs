//! Features Module - Feature Extraction Engine
//!
//! Maps a `ParsedUrl` onto the fixed `FeatureVector` layout.
//! Total and pure: the same input always yields the same vector, and
//! nothing here touches the network, the clock or randomness. Slots that
//! would need a rendered page stay at their structural 0.

pub mod layout;
pub mod vector;
pub mod host;
pub mod path;
pub mod lexical;


// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo, LayoutMismatchError};
pub use vector::{FeatureExtractor, FeatureVector, VectorLengthError};

use crate::logic::url::ParsedUrl;
use host::HostFeatures;
use lexical::{LexicalFeatures, RiskTierFeatures};
use path::{PathFeatures, QueryFeatures};

/// Build the full feature vector for a parsed URL
pub fn extract(url: &ParsedUrl) -> FeatureVector {
    let mut vector = FeatureVector::new();

    HostFeatures::from_parsed(url).extract(&mut vector);
    PathFeatures::from_parsed(url).extract(&mut vector);
    QueryFeatures::from_parsed(url).extract(&mut vector);
    LexicalFeatures::from_parsed(url).extract(&mut vector);
    RiskTierFeatures::from_parsed(url).extract(&mut vector);

    vector
}
