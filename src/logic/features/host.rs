//! Hostname Feature Extraction
//!
//! Trích xuất các features từ hostname (authority component).

use once_cell::sync::Lazy;
use regex::Regex;

use super::layout::idx;
use super::vector::{FeatureExtractor, FeatureVector};
use crate::logic::url::ParsedUrl;

/// Literal dotted-quad, no octet range check
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{1,3}){3}$").expect("dotted-quad pattern is valid")
});

/// TLD tokens that should not appear as a subdomain label or inside a path
pub const COMMON_TLDS: &[&str] = &[
    "com", "net", "org", "edu", "gov", "mil", "int", "info", "biz", "io", "co",
    "us", "uk", "de", "fr", "ru", "cn", "jp", "br", "in", "au", "ca", "xyz",
    "top", "online", "site",
];

/// Hostname Features
#[derive(Debug, Clone, Default)]
pub struct HostFeatures {
    pub num_dots: u32,
    pub subdomain_level: u32,
    pub num_dash: u32,
    pub is_ip: bool,
    pub tld_in_subdomain: bool,
    pub https_in_hostname: bool,
    pub length: u32,
}

impl HostFeatures {
    pub fn from_parsed(url: &ParsedUrl) -> Self {
        let host = url.hostname.as_str();
        let labels = labels(host);

        let subdomains = &labels[..labels.len().saturating_sub(2)];

        Self {
            num_dots: count_char(host, '.'),
            subdomain_level: subdomain_level(host),
            num_dash: count_char(host, '-'),
            is_ip: DOTTED_QUAD.is_match(host),
            tld_in_subdomain: subdomains.iter().any(|l| COMMON_TLDS.contains(l)),
            https_in_hostname: host.contains("https"),
            length: host.chars().count() as u32,
        }
    }
}

impl FeatureExtractor for HostFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[idx::NUM_DOTS] = self.num_dots as f32;
        vector.values[idx::SUBDOMAIN_LEVEL] = self.subdomain_level as f32;
        vector.values[idx::NUM_DASH_IN_HOSTNAME] = self.num_dash as f32;
        vector.values[idx::IP_ADDRESS] = flag(self.is_ip);
        vector.values[idx::DOMAIN_IN_SUBDOMAINS] = flag(self.tld_in_subdomain);
        vector.values[idx::HTTPS_IN_HOSTNAME] = flag(self.https_in_hostname);
        vector.values[idx::HOSTNAME_LENGTH] = self.length as f32;
    }
}

/// Non-empty dot-separated labels
fn labels(host: &str) -> Vec<&str> {
    host.split('.').filter(|l| !l.is_empty()).collect()
}

/// `max(0, labels - 2)`
pub fn subdomain_level(host: &str) -> u32 {
    labels(host).len().saturating_sub(2) as u32
}

pub(super) fn count_char(s: &str, c: char) -> u32 {
    s.chars().filter(|&x| x == c).count() as u32
}

pub(super) fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}
