use once_cell::sync::Lazy;
use regex::Regex;

// @module: URL validation and image URL normalization

/// Maximum accepted URL length; longer URLs are truncated
const MAX_URL_LEN: usize = 2000;

// @const: Bare domain-like token (example.com/...)
static BARE_DOMAIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9]*\.[a-zA-Z]{2,}").unwrap());

// @const: Valid hostname shape right after an http(s) scheme
static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[a-zA-Z0-9][-a-zA-Z0-9.]*[a-zA-Z0-9]").unwrap());

// @const: Beehiiv image-resizing proxy path segment
static BEEHIIV_PROXY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https://media\.beehiiv\.com/)cdn-cgi/image/[^/]+/([^?]*)").unwrap()
});

// @const: wp.com-wrapped stratechery image host
static WPCOM_PROXY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://i\d+\.wp\.com/(stratechery\.com/[^?]+)").unwrap());

/// Substrings identifying tracking pixels and layout spacers; images whose
/// URL matches are never materialized as blocks.
const TRACKING_DENYLIST: [&str; 5] = ["tracking", "pixel", "1x1", "spacer", "blank"];

/// Validate and normalize a candidate URL.
///
/// Accepts protocol-relative URLs (prefixed with `https:`), `http(s)` and
/// `mailto:` URLs, and bare domain-like tokens (prefixed with `https://`).
/// Quoted-printable line continuations and embedded whitespace are stripped
/// first. `http(s)` URLs must present a hostname shape after the scheme.
/// Anything else yields None.
pub fn validate_url(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let mut url: String = url
        .trim()
        .replace("=\r\n", "")
        .replace("=\n", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if url.starts_with("//") {
        url = format!("https:{}", url);
    } else if !url.starts_with("http://") && !url.starts_with("https://") && !url.starts_with("mailto:") {
        if BARE_DOMAIN_REGEX.is_match(&url) {
            url = format!("https://{}", url);
        } else {
            return None;
        }
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        if !HOSTNAME_REGEX.is_match(&url) {
            return None;
        }
        if url.len() > MAX_URL_LEN {
            let mut end = MAX_URL_LEN;
            while !url.is_char_boundary(end) {
                end -= 1;
            }
            url.truncate(end);
        }
        return Some(url);
    }

    if url.starts_with("mailto:") {
        return Some(url);
    }

    None
}

/// Drop the query string from a URL
pub fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or_default().to_string()
}

/// Normalize platform CDN image URLs to their canonical un-proxied form.
///
/// Beehiiv's resizing proxy path segment is stripped, and wp.com-wrapped
/// stratechery hosts are rewritten to the origin host. All other URLs pass
/// through unchanged.
pub fn rewrite_image_url(url: &str) -> String {
    if url.contains("media.beehiiv.com/cdn-cgi") {
        if let Some(caps) = BEEHIIV_PROXY_REGEX.captures(url) {
            return format!("{}{}", &caps[1], &caps[2]);
        }
    }

    if let Some(caps) = WPCOM_PROXY_REGEX.captures(url) {
        return format!("https://{}", &caps[1]);
    }

    url.to_string()
}

/// Whether an image URL matches the tracking-pixel/spacer denylist
pub fn is_tracking_pixel(url: &str) -> bool {
    let lower = url.to_lowercase();
    TRACKING_DENYLIST.iter().any(|needle| lower.contains(needle))
}
