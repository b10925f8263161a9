//! Path and Query Feature Extraction

use super::host::{count_char, flag, COMMON_TLDS};
use super::layout::idx;
use super::vector::{FeatureExtractor, FeatureVector};
use crate::logic::url::ParsedUrl;

/// Path Features
#[derive(Debug, Clone, Default)]
pub struct PathFeatures {
    pub level: u32,
    pub length: u32,
    pub double_slash: bool,
    pub tld_in_path: bool,
}

impl PathFeatures {
    pub fn from_parsed(url: &ParsedUrl) -> Self {
        let path = url.path.as_str();
        Self {
            level: path.split('/').filter(|s| !s.is_empty()).count() as u32,
            length: path.chars().count() as u32,
            double_slash: path.contains("//"),
            tld_in_path: contains_tld(&path.to_ascii_lowercase()),
        }
    }
}

impl FeatureExtractor for PathFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[idx::PATH_LEVEL] = self.level as f32;
        vector.values[idx::PATH_LENGTH] = self.length as f32;
        vector.values[idx::DOUBLE_SLASH_IN_PATH] = flag(self.double_slash);
        vector.values[idx::DOMAIN_IN_PATHS] = flag(self.tld_in_path);
    }
}

/// `.<tld>` followed by '/', '.' or end of path
fn contains_tld(path: &str) -> bool {
    COMMON_TLDS.iter().any(|tld| {
        let needle = format!(".{tld}");
        path.match_indices(&needle).any(|(pos, _)| {
            matches!(path[pos + needle.len()..].chars().next(), None | Some('/') | Some('.'))
        })
    })
}

/// Query Features
#[derive(Debug, Clone, Default)]
pub struct QueryFeatures {
    pub components: u32,
    pub ampersands: u32,
    pub length: u32,
}

impl QueryFeatures {
    pub fn from_parsed(url: &ParsedUrl) -> Self {
        let query = url.query.as_str();
        Self {
            components: if query.is_empty() { 0 } else { query.split('&').count() as u32 },
            ampersands: count_char(query, '&'),
            length: query.chars().count() as u32,
        }
    }
}

impl FeatureExtractor for QueryFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[idx::NUM_QUERY_COMPONENTS] = self.components as f32;
        vector.values[idx::NUM_AMPERSAND] = self.ampersands as f32;
        vector.values[idx::QUERY_LENGTH] = self.length as f32;
    }
}
