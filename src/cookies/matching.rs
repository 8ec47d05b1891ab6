//! Domain and path matching rules.
//!
//! These functions are pure: the same inputs always give the same answer.
//! Hosts and cookie domains are expected to be lower-case already.

use crate::base::neterror::NetError;
use crate::cookies::psl;
use url::{Host, Url};

/// Check if a cookie domain matches a request host.
///
/// A host cookie (no leading dot) only matches the exact host. A domain
/// cookie `.example.com` matches `example.com` and any of its subdomains.
pub fn domain_match(cookie_domain: &str, host: &str) -> bool {
    if cookie_domain == host {
        return true;
    }

    match cookie_domain.strip_prefix('.') {
        Some(bare) => host == bare || host.ends_with(cookie_domain),
        None => false,
    }
}

/// Check if a request path matches a cookie path.
/// Implements RFC 6265 path matching.
pub fn path_match(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }

    if let Some(rest) = request_path.strip_prefix(cookie_path) {
        // Cookie path is a prefix
        return cookie_path.ends_with('/') || rest.starts_with('/');
    }

    false
}

/// The path a cookie gets when `Set-Cookie` does not name a usable one:
/// the request path up to, but not including, its right-most `/`.
pub fn default_path(url_path: &str) -> String {
    match url_path.rfind('/') {
        None | Some(0) => "/".to_string(),
        Some(idx) => url_path[..idx].to_string(),
    }
}

/// Resolve the domain a cookie will be stored under.
///
/// Without a `Domain` attribute the cookie is a host cookie on the exact
/// request host. With one, the attribute (given an implied leading dot) must
/// share the request host's registrable domain and the host must be that
/// domain or one of its subdomains. IP hosts may only name themselves, which
/// produces a host cookie.
pub fn cookie_domain_for_url(url: &Url, domain_attr: Option<&str>) -> Result<String, NetError> {
    let host = url
        .host_str()
        .ok_or(NetError::InvalidUrl)?
        .to_ascii_lowercase();
    let is_ip = matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)));

    let attr = match domain_attr {
        None | Some("") => return Ok(host),
        Some(attr) => attr.to_ascii_lowercase(),
    };

    if is_ip {
        return if attr == host {
            Ok(host)
        } else {
            Err(NetError::CookieInvalidDomain)
        };
    }

    // `domain=example.com` is treated like `domain=.example.com`.
    let bare = attr.strip_prefix('.').unwrap_or(&attr);
    let canonical = match Host::parse(bare) {
        Ok(Host::Domain(domain)) => domain,
        _ => return Err(NetError::CookieInvalidDomain),
    };

    if psl::is_public_suffix(&canonical) {
        return Err(NetError::CookiePublicSuffix);
    }
    if !psl::is_valid_cookie_domain(&canonical, &host) {
        return Err(NetError::CookieInvalidDomain);
    }

    Ok(format!(".{}", canonical))
}
