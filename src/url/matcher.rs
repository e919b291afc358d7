use super::domain::{extract_domain, registered_domain};
use url::Url;

/// Checks if a domain matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "example.com" matches only "example.com"
/// 2. Wildcard match: "*.example.com" matches:
///    - "example.com" (the bare domain)
///    - "blog.example.com" (single subdomain)
///    - "api.v2.example.com" (nested subdomains)
///
/// # Examples
///
/// ```
/// use linkscope::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Decides whether `url` belongs to the crawled site `domain`
///
/// Hostnames are compared after stripping a leading `www.` from both sides,
/// and any subdomain of the registered domain counts as internal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkscope::url::is_internal;
///
/// let url = Url::parse("https://www.example.com/about").unwrap();
/// assert!(is_internal("example.com", &url));
///
/// let url = Url::parse("https://docs.example.com/").unwrap();
/// assert!(is_internal("www.example.com", &url));
///
/// let url = Url::parse("https://notexample.com/").unwrap();
/// assert!(!is_internal("example.com", &url));
/// ```
pub fn is_internal(domain: &str, url: &Url) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };

    let site = registered_domain(domain);
    matches_wildcard(&format!("*.{}", site), &registered_domain(&host))
}
