//! URL Parser
//!
//! Decomposes a raw URL string into scheme, hostname, path and query.
//! Pure function, no DNS, no I/O. Never fails: malformed input yields
//! empty components and a `ParseStatus` describing why.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// PATTERNS
// ============================================================================

/// RFC 3986 Appendix B. Matches every string, so the only question is
/// which groups are present.
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("RFC 3986 pattern is valid")
});

/// Scheme must start with a letter (RFC 3986 §3.1)
static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("scheme pattern is valid")
});

// ============================================================================
// TYPES
// ============================================================================

/// Outcome of decomposing a raw URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// Input was blank after trimming
    Empty,
    /// Input had no usable authority/host
    Malformed,
    /// All components extracted
    Parsed,
}

impl ParseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStatus::Empty => "empty",
            ParseStatus::Malformed => "malformed",
            ParseStatus::Parsed => "parsed",
        }
    }
}

/// Decomposed URL
///
/// All string fields default to empty on failure; `raw` is always the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUrl {
    /// Lower-cased scheme ("" when none detected)
    pub scheme: String,
    /// Lower-cased literal host, userinfo and port removed
    pub hostname: String,
    pub path: String,
    /// Query without the leading `?`
    pub query: String,
    pub raw: String,
    pub status: ParseStatus,
}

impl ParsedUrl {
    fn degenerate(raw: &str, scheme: String, status: ParseStatus) -> Self {
        Self {
            scheme,
            hostname: String::new(),
            path: String::new(),
            query: String::new(),
            raw: raw.to_string(),
            status,
        }
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a raw URL. Total: never panics, never errors.
pub fn parse(raw: &str) -> ParsedUrl {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedUrl::degenerate(raw, String::new(), ParseStatus::Empty);
    }

    let Some(caps) = URI_PATTERN.captures(trimmed) else {
        return ParsedUrl::degenerate(raw, String::new(), ParseStatus::Malformed);
    };

    let scheme = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|s| SCHEME_PATTERN.is_match(s))
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let Some(authority) = caps.get(2).map(|m| m.as_str()) else {
        return ParsedUrl::degenerate(raw, scheme, ParseStatus::Malformed);
    };

    let Some(hostname) = host_from_authority(authority) else {
        return ParsedUrl::degenerate(raw, scheme, ParseStatus::Malformed);
    };

    ParsedUrl {
        scheme,
        hostname,
        path: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
        query: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
        raw: raw.to_string(),
        status: ParseStatus::Parsed,
    }
}

/// Extract the lower-cased host from an authority component.
///
/// Returns `None` when the host is empty, contains characters that cannot
/// appear in a registered name (Unicode letters and digits allowed) or IP
/// literal, or the port is not a u16.
fn host_from_authority(authority: &str) -> Option<String> {
    // userinfo ends at the last '@'
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    let (host, port) = if host_port.starts_with('[') {
        // IPv6 literal keeps its brackets
        let close = host_port.find(']')?;
        let rest = &host_port[close + 1..];
        let port = match rest.strip_prefix(':') {
            Some(p) => Some(p),
            None if rest.is_empty() => None,
            None => return None,
        };
        (&host_port[..=close], port)
    } else {
        match host_port.rfind(':') {
            Some(colon) => (&host_port[..colon], Some(&host_port[colon + 1..])),
            None => (host_port, None),
        }
    };

    if let Some(port) = port {
        // "host:" is tolerated as an empty port, like browsers do
        if !port.is_empty() && port.parse::<u16>().is_err() {
            return None;
        }
    }

    // IDN hosts stay literal (no punycode); Unicode case folding
    let host = host.to_lowercase();
    if host.is_empty() || !is_valid_host(&host) {
        return None;
    }
    Some(host)
}

fn is_valid_host(host: &str) -> bool {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return !inner.is_empty()
            && inner.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }
    host.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let p = parse("HTTPS://User:pw@WWW.Example.COM:8443/a/b/login.php?x=1&y=2#frag");
        assert_eq!(p.scheme, "https");
        assert_eq!(p.hostname, "www.example.com");
        assert_eq!(p.path, "/a/b/login.php");
        assert_eq!(p.query, "x=1&y=2");
        assert_eq!(p.status, ParseStatus::Parsed);
        assert!(p.is_https());
    }

    #[test]
    fn test_parse_keeps_raw() {
        let raw = "  http://example.com  ";
        let p = parse(raw);
        assert_eq!(p.raw, raw);
        assert_eq!(p.hostname, "example.com");
    }

    #[test]
    fn test_parse_empty() {
        let p = parse("");
        assert_eq!(p.status, ParseStatus::Empty);
        assert_eq!(p.scheme, "");
        assert_eq!(p.hostname, "");
        assert_eq!(p.raw, "");

        assert_eq!(parse("   ").status, ParseStatus::Empty);
    }

    #[test]
    fn test_parse_without_authority_is_malformed() {
        let p = parse("www.google.com/search");
        assert_eq!(p.status, ParseStatus::Malformed);
        assert_eq!(p.scheme, "");
        assert_eq!(p.path, "");

        let p = parse("mailto:someone@example.com");
        assert_eq!(p.status, ParseStatus::Malformed);
        assert_eq!(p.scheme, "mailto");
        assert_eq!(p.hostname, "");
    }

    #[test]
    fn test_parse_invalid_host_is_malformed() {
        let p = parse("http://exa mple.com/path?q=1");
        assert_eq!(p.status, ParseStatus::Malformed);
        assert_eq!(p.scheme, "http");
        assert_eq!(p.hostname, "");
        assert_eq!(p.path, "");
        assert_eq!(p.query, "");
    }

    #[test]
    fn test_parse_bad_port_is_malformed() {
        assert_eq!(parse("http://example.com:99999/").status, ParseStatus::Malformed);
        assert_eq!(parse("http://example.com:abc/").status, ParseStatus::Malformed);
        assert_eq!(parse("http://example.com:/").status, ParseStatus::Parsed);
    }

    #[test]
    fn test_parse_ipv6_literal() {
        let p = parse("http://[::1]:8080/admin");
        assert_eq!(p.hostname, "[::1]");
        assert_eq!(p.path, "/admin");
        assert_eq!(p.status, ParseStatus::Parsed);
    }

    #[test]
    fn test_parse_ip_host() {
        let p = parse("http://192.168.0.1/login");
        assert_eq!(p.hostname, "192.168.0.1");
        assert_eq!(p.path, "/login");
        assert!(!p.is_https());
    }

    #[test]
    fn test_parse_userinfo_uses_last_at() {
        let p = parse("http://google.com@evil.example@phish.test/x");
        assert_eq!(p.hostname, "phish.test");
    }

    #[test]
    fn test_parse_idn_host_kept_literal() {
        let p = parse("http://Bücher-Bank.de/login?x=1");
        assert_eq!(p.status, ParseStatus::Parsed);
        assert_eq!(p.hostname, "bücher-bank.de");
        assert_eq!(p.path, "/login");
        assert_eq!(p.query, "x=1");

        let p = parse("http://paypal.com.xn--80ak6aa92e.com.bücher.de/x");
        assert_eq!(p.hostname, "paypal.com.xn--80ak6aa92e.com.bücher.de");
        assert_eq!(p.path, "/x");
    }

    #[test]
    fn test_parse_unicode_punctuation_in_host_is_malformed() {
        assert_eq!(parse("http://exa\u{2022}mple.com/").status, ParseStatus::Malformed);
    }

    #[test]
    fn test_parse_numeric_scheme_not_detected() {
        // "1http" is not a valid scheme, the authority still parses
        let p = parse("1http://example.com");
        assert_eq!(p.scheme, "");
        assert_eq!(p.hostname, "example.com");
    }
}
