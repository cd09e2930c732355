//! Domain normalization.
//!
//! Collapses hostnames to their registrable base domain using a closed set of
//! compound public suffixes. No public suffix list is consulted.

use url::Url;

/// Two-label suffixes under which registrations happen one level deeper.
pub const COMPOUND_SUFFIXES: &[&str] = &[
    "com.br", "com.au", "com.cn", "com.mx", "com.ar", "co.uk", "org.uk", "gov.uk",
    "com.tr", "com.sa", "com.pl", "com.ru", "com.jp", "co.jp", "co.kr",
];

/// Returns the effective base domain of `hostname`, lowercased.
///
/// ```
/// use privacy_sentinel::services::domain::effective_domain;
///
/// assert_eq!(effective_domain("cdn.tracker.example.com"), "example.com");
/// assert_eq!(effective_domain("shop.example.co.uk"), "example.co.uk");
/// assert_eq!(effective_domain("localhost"), "localhost");
/// ```
pub fn effective_domain(hostname: &str) -> String {
    let host = hostname.to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }
    let last_two = labels[labels.len() - 2..].join(".");
    if COMPOUND_SUFFIXES.contains(&last_two.as_str()) {
        labels[labels.len() - 3..].join(".")
    } else {
        last_two
    }
}

/// Hostname of `url`, or an empty string when it does not parse or has no host.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

/// Base domain of the host of `url`; empty when the URL has no host.
pub fn base_domain_of_url(url: &str) -> String {
    let host = host_of(url);
    if host.is_empty() {
        return host;
    }
    effective_domain(&host)
}

/// Base domain of a cookie domain attribute (leading dots ignored).
pub fn base_domain_of_cookie(cookie_domain: &str) -> String {
    let trimmed = cookie_domain.trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    effective_domain(trimmed)
}

/// True for `http` and `https` URLs.
pub fn is_web_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
