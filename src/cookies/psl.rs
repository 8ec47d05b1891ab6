//! Public Suffix List (PSL) rules for cookie domains.
//!
//! Prevents supercookie attacks by rejecting cookies set on public
//! suffixes like `.com`, `.co.uk`, etc., and derives the registrable
//! domain (eTLD+1) used to bucket cookies in the store.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate. Unknown TLDs fall
//! under the list's default `*` rule, so `izzle` is a public suffix and
//! `google.izzle` is registrable.

use psl::{List, Psl};
use std::net::IpAddr;

/// Whether `host` is an IPv4 literal or a (bracketed or bare) IPv6 literal.
pub fn is_ip_literal(host: &str) -> bool {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().is_ok()
}

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
/// Returns true if the domain itself is a public suffix.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    let domain_lower = domain_lower.strip_suffix('.').unwrap_or(&domain_lower);
    let domain_bytes = domain_lower.as_bytes();

    // Get the suffix for this domain
    if let Some(suffix) = List.suffix(domain_bytes) {
        // The domain is a public suffix if it equals its own suffix
        suffix.as_bytes() == domain_bytes
    } else {
        false
    }
}

/// Get the registrable domain (eTLD+1) for a domain.
/// For "sub.example.com", returns "example.com".
/// For "example.com", returns "example.com".
/// For "com" (public suffix) or an IP address, returns None.
///
/// A trailing dot is kept: "www.example.com." yields "example.com.", which
/// never equals the registrable domain of the undotted host.
pub fn registrable_domain(domain: &str) -> Option<String> {
    if domain.is_empty() || is_ip_literal(domain) {
        return None;
    }

    let domain_lower = domain.to_lowercase();
    let (bare, trailing_dot) = match domain_lower.strip_suffix('.') {
        Some(bare) => (bare, true),
        None => (domain_lower.as_str(), false),
    };
    if bare.is_empty() || bare.ends_with('.') {
        return None;
    }

    psl::domain(bare.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| {
            if trailing_dot {
                format!("{}.", s)
            } else {
                s.to_string()
            }
        })
}

/// The bucket a cookie domain is stored under: its registrable domain, or
/// the bare domain itself for IP addresses and registry-less hosts.
pub fn domain_key(domain: &str) -> String {
    let bare = domain.strip_prefix('.').unwrap_or(domain);
    registrable_domain(bare).unwrap_or_else(|| bare.to_lowercase())
}

/// Check if a cookie domain is valid for a given URL.
/// The cookie domain must be a suffix of the URL's host and
/// must not be a public suffix.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    // Remove leading dot from cookie domain if present
    let cookie_domain = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    let cookie_domain_lower = cookie_domain.to_lowercase();
    let url_host_lower = url_host.to_lowercase();

    // 1. Both sides must share a registrable domain; public suffixes and
    //    IP addresses have none.
    let url_registrable = match registrable_domain(&url_host_lower) {
        Some(d) => d,
        None => return false,
    };
    if registrable_domain(&cookie_domain_lower).as_deref() != Some(url_registrable.as_str()) {
        return false;
    }

    // 2. URL host must match or be a subdomain of cookie domain
    if url_host_lower == cookie_domain_lower {
        return true;
    }

    // Check if url_host ends with .cookie_domain
    url_host_lower.ends_with(&format!(".{}", cookie_domain_lower))
}
