//! Link classification and normalization.
//!
//! Everything here is pure: a raw `href` value and the address of the page it
//! was found on go in, a verdict or a canonical address string comes out.
//! Malformed input never produces an error, it is simply treated as a
//! relative (and therefore internal) link.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static MAILTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^mailto:").expect("mailto pattern is valid"));
static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9.+-]*://").expect("scheme pattern is valid")
});
static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("http pattern is valid"));

/// Outcome of classifying one raw link against the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLink {
    /// Same host; carries the normalized address.
    Internal(String),
    /// Different host; carries the raw link untouched.
    External(String),
    /// Not something we fetch (mailto, ftp, ...).
    Ignored,
}

/// Parse an absolute address, `None` when `raw` is relative or malformed.
pub fn parse_address(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}

/// Prefix `http://` unless `raw` already starts with `scheme://`.
pub fn prepend_scheme_if_missing(raw: &str) -> String {
    if SCHEME.is_match(raw) {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

/// Whether a link may be followed at all.
///
/// Schemeless links count as fetchable; they are assumed to be http-family
/// until normalized against their page.
pub fn is_fetchable_link(raw: &str) -> bool {
    if MAILTO.is_match(raw) {
        return false;
    }

    match SCHEME.find(raw) {
        Some(scheme) => HTTP_SCHEME.is_match(scheme.as_str()),
        None => true,
    }
}

/// Serialized origin (`scheme://host[:port]`) of an address.
pub fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Host plus non-default port, the way a URL's `host` component reads.
fn host_component(url: &Url) -> Option<String> {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => Some(format!("{}:{}", host, port)),
        (Some(host), None) => Some(host.to_string()),
        (None, _) => None,
    }
}

/// Turn `raw` into an absolute address string relative to `base`.
///
/// Relative paths are appended to the base href verbatim; `.` and `..`
/// segments are not resolved.
pub fn normalize(raw: &str, base: &Url) -> String {
    if let Some(target) = parse_address(raw) {
        target.to_string()
    } else if raw.starts_with("//") {
        format!("http:{}", raw)
    } else if raw.starts_with('/') {
        format!("{}{}", origin(base), raw)
    } else {
        format!("{}{}", base.as_str(), raw)
    }
}

/// True only for absolute links whose host differs from `base`'s.
pub fn is_external(raw: &str, base: &Url) -> bool {
    match parse_address(raw) {
        Some(target) => host_component(&target) != host_component(base),
        None => false,
    }
}

pub fn classify(raw: &str, base: &Url) -> ClassifiedLink {
    if !is_fetchable_link(raw) {
        ClassifiedLink::Ignored
    } else if is_external(raw, base) {
        ClassifiedLink::External(raw.to_string())
    } else {
        ClassifiedLink::Internal(normalize(raw, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn test_prepend_scheme_when_missing() {
        assert_eq!(prepend_scheme_if_missing("example.com"), "http://example.com");
        assert_eq!(
            prepend_scheme_if_missing("example.com/path?q=1"),
            "http://example.com/path?q=1"
        );
    }

    #[test]
    fn test_prepend_scheme_keeps_existing() {
        assert_eq!(
            prepend_scheme_if_missing("https://example.com"),
            "https://example.com"
        );
        assert_eq!(prepend_scheme_if_missing("FTP://host/x"), "FTP://host/x");
        assert_eq!(
            prepend_scheme_if_missing("svn+ssh://host/repo"),
            "svn+ssh://host/repo"
        );
    }

    #[test]
    fn test_prepend_scheme_requires_double_slash() {
        // "localhost:3000" has no "://" so it is treated as a bare host
        assert_eq!(
            prepend_scheme_if_missing("localhost:3000"),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_mailto_is_not_fetchable() {
        assert!(!is_fetchable_link("mailto:a@b.com"));
        assert!(!is_fetchable_link("MAILTO:a@b.com"));
        assert!(!is_fetchable_link("MailTo:someone"));
    }

    #[test]
    fn test_other_schemes_are_not_fetchable() {
        assert!(!is_fetchable_link("ftp://files.example.com/a.zip"));
        assert!(!is_fetchable_link("file:///etc/passwd"));
        assert!(!is_fetchable_link("ws://example.com/socket"));
    }

    #[test]
    fn test_http_family_is_fetchable() {
        assert!(is_fetchable_link("http://example.com"));
        assert!(is_fetchable_link("HTTPS://example.com/a"));
        assert!(is_fetchable_link("/about"));
        assert!(is_fetchable_link("about"));
        assert!(is_fetchable_link("//cdn.example.com/x"));
        assert!(is_fetchable_link(""));
    }

    #[test]
    fn test_scheme_without_slashes_is_fetchable() {
        // Only "scheme://" prefixes are recognized as schemes
        assert!(is_fetchable_link("javascript:void(0)"));
        assert!(is_fetchable_link("tel:+15555555"));
    }

    #[test]
    fn test_normalize_absolute_link() {
        assert_eq!(
            normalize("http://other.com/x", &base()),
            "http://other.com/x"
        );
        assert_eq!(
            normalize("HTTP://Example.COM/About", &base()),
            "http://example.com/About"
        );
        assert_eq!(normalize("https://example.com", &base()), "https://example.com/");
    }

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize("//cdn.example.com/lib.js", &base()),
            "http://cdn.example.com/lib.js"
        );
    }

    #[test]
    fn test_normalize_absolute_path_uses_origin() {
        let base = Url::parse("https://example.com:8443/docs/intro?x=1#top").unwrap();
        assert_eq!(normalize("/about", &base), "https://example.com:8443/about");
    }

    #[test]
    fn test_normalize_relative_path_concatenates_href() {
        let base = Url::parse("http://example.com/docs/").unwrap();
        assert_eq!(normalize("guide", &base), "http://example.com/docs/guide");

        // No segment resolution: the page name is not stripped
        let page = Url::parse("http://example.com/docs/intro").unwrap();
        assert_eq!(normalize("guide", &page), "http://example.com/docs/introguide");
        assert_eq!(normalize("../up", &base), "http://example.com/docs/../up");
    }

    #[test]
    fn test_normalize_empty_link_is_base() {
        assert_eq!(normalize("", &base()), "http://example.com/");
    }

    #[test]
    fn test_normalize_is_idempotent_for_absolute_links() {
        for raw in [
            "http://example.com",
            "HTTPS://Example.com/a/b?c=d#e",
            "http://other.com:8080/x/../y",
            "http://example.com/%7Euser",
        ] {
            let once = normalize(raw, &base());
            assert_eq!(normalize(&once, &base()), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_is_external_different_host() {
        assert!(is_external("http://other.com/x", &base()));
        assert!(is_external("https://sub.example.com/", &base()));
    }

    #[test]
    fn test_is_external_same_host() {
        assert!(!is_external("http://example.com/about", &base()));
        // Scheme does not matter, only the host
        assert!(!is_external("https://example.com/secure", &base()));
        assert!(!is_external("HTTP://EXAMPLE.COM/", &base()));
    }

    #[test]
    fn test_is_external_port_is_part_of_host() {
        assert!(is_external("http://example.com:8080/", &base()));
        // Default port is dropped by parsing, so it is the same host
        assert!(!is_external("http://example.com:80/", &base()));
    }

    #[test]
    fn test_relative_and_malformed_links_are_internal() {
        assert!(!is_external("/about", &base()));
        assert!(!is_external("about", &base()));
        assert!(!is_external("//other.com/x", &base()));
        assert!(!is_external("http://", &base()));
    }

    #[test]
    fn test_hostless_absolute_link_is_external() {
        assert!(is_external("javascript:void(0)", &base()));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("/about", &base()),
            ClassifiedLink::Internal("http://example.com/about".to_string())
        );
        assert_eq!(
            classify("http://other.com/x", &base()),
            ClassifiedLink::External("http://other.com/x".to_string())
        );
        assert_eq!(classify("mailto:a@b.com", &base()), ClassifiedLink::Ignored);
        assert_eq!(classify("ftp://example.com/f", &base()), ClassifiedLink::Ignored);
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("http://example.com").is_some());
        assert!(parse_address("/relative").is_none());
        assert!(parse_address("not a url").is_none());
        assert!(parse_address("http://").is_none());
    }

    #[test]
    fn test_origin() {
        let url = Url::parse("https://example.com:8443/a?b").unwrap();
        assert_eq!(origin(&url), "https://example.com:8443");
        assert_eq!(origin(&base()), "http://example.com");
    }
}
