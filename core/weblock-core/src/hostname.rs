//! Hostname normalization for protected-website keys.
//!
//! Every website is keyed by a normalized hostname: lowercase, no scheme,
//! no leading "www.", no path or query. Normalizing an already-normalized
//! host is a no-op, so keys stay stable across round trips.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("valid regex"));

/// Reduces raw user input ("https://WWW.Example.com/path") to a stable
/// host key ("example.com").
pub fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim();
    let candidate = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => strip_www(&host.to_ascii_lowercase()).to_string(),
            None => fallback_normalize(trimmed),
        },
        Err(_) => fallback_normalize(trimmed),
    }
}

// Manual reduction for input the URL parser rejects.
fn fallback_normalize(raw: &str) -> String {
    let without_scheme = SCHEME_RE.replace(raw, "");
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    strip_www(&host.to_ascii_lowercase()).to_string()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(normalize_host("https://example.com/some/path"), "example.com");
        assert_eq!(normalize_host("http://example.com?q=1"), "example.com");
    }

    #[test]
    fn strips_leading_www() {
        assert_eq!(normalize_host("www.example.com"), "example.com");
        assert_eq!(normalize_host("https://www.example.com"), "example.com");
    }

    #[test]
    fn lowercases_host() {
        assert_eq!(normalize_host("HTTPS://WWW.Example.COM/Path"), "example.com");
    }

    #[test]
    fn bare_host_is_untouched() {
        assert_eq!(normalize_host("example.com"), "example.com");
    }

    #[test]
    fn drops_port() {
        assert_eq!(normalize_host("example.com:8080/admin"), "example.com");
    }

    #[test]
    fn subdomains_other_than_www_are_kept() {
        assert_eq!(normalize_host("https://docs.example.com"), "docs.example.com");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_host("  example.com  "), "example.com");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "https://www.Example.com/path",
            "example.com",
            "WWW.EXAMPLE.COM",
            "docs.example.com:443/x",
        ] {
            let once = normalize_host(raw);
            assert_eq!(normalize_host(&once), once, "input: {}", raw);
        }
    }

    #[test]
    fn unparseable_input_falls_back_to_manual_stripping() {
        // A space makes the URL parser reject this outright.
        assert_eq!(normalize_host("https://bad host.com/path"), "bad host.com");
    }
}
