use crate::base::neterror::NetError;
use crate::cookies::matching;
use crate::cookies::parsed_cookie::ParsedCookie;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use url::Url;

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
///
/// `domain` is lower-case. Domain cookies keep a leading dot
/// (`.example.com`); host cookies carry the exact host (`www.example.com`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
}

impl CanonicalCookie {
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            domain,
            path,
            creation_time,
            expiration_time,
            last_access_time: creation_time,
            secure: false,
            http_only: false,
        }
    }

    /// Build the stored form of a parsed `Set-Cookie` line received from
    /// `url`.
    pub fn create(
        url: &Url,
        parsed: &ParsedCookie,
        creation_time: OffsetDateTime,
    ) -> Result<Self, NetError> {
        let domain = matching::cookie_domain_for_url(url, parsed.domain())?;
        let path = canonical_path(url, parsed);
        let expiration_time = canonical_expiration(parsed, creation_time);

        let mut cookie = Self::new(
            parsed.name().to_string(),
            parsed.value().to_string(),
            domain,
            path,
            creation_time,
            expiration_time,
        );
        cookie.secure = parsed.is_secure();
        cookie.http_only = parsed.is_http_only();
        Ok(cookie)
    }

    /// Persistent cookies carry an expiry; session cookies don't.
    pub fn is_persistent(&self) -> bool {
        self.expiration_time.is_some()
    }

    pub fn is_domain_cookie(&self) -> bool {
        self.domain.starts_with('.')
    }

    pub fn is_host_cookie(&self) -> bool {
        !self.is_domain_cookie()
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => current_time >= expiry,
            None => false,
        }
    }

    /// Two cookies are equivalent when a new one would replace the old one.
    pub fn is_equivalent(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Whether `other` is a snapshot of this same stored cookie. Access
    /// time is ignored since reads bump it.
    pub fn is_same_cookie(&self, other: &CanonicalCookie) -> bool {
        self.is_equivalent(other)
            && self.value == other.value
            && self.creation_time == other.creation_time
    }

    pub fn is_domain_match(&self, host: &str) -> bool {
        matching::domain_match(&self.domain, host)
    }

    pub fn is_on_path(&self, url_path: &str) -> bool {
        matching::path_match(&self.path, url_path)
    }

    /// Order used when building a `Cookie` header: longer paths first, then
    /// older cookies first.
    pub fn cmp_for_request(&self, other: &CanonicalCookie) -> Ordering {
        other
            .path
            .len()
            .cmp(&self.path.len())
            .then_with(|| self.creation_time.cmp(&other.creation_time))
    }

    /// The `name=value` fragment of a `Cookie` header. Nameless cookies are
    /// sent as their bare value.
    pub fn to_cookie_pair(&self) -> String {
        if self.name.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }
}

/// Explicit `Path` attributes are taken as long as they are absolute;
/// anything else falls back to the directory of the request path.
fn canonical_path(url: &Url, parsed: &ParsedCookie) -> String {
    match parsed.path() {
        Some(path) if path.starts_with('/') => path.to_string(),
        _ => matching::default_path(url.path()),
    }
}

/// `Max-Age` wins over `Expires`. An unparseable value of either is ignored.
fn canonical_expiration(
    parsed: &ParsedCookie,
    creation_time: OffsetDateTime,
) -> Option<OffsetDateTime> {
    if let Some(expiry) = parsed
        .max_age()
        .and_then(|max_age| max_age_expiration(max_age, creation_time))
    {
        return Some(expiry);
    }

    parsed
        .expires()
        .and_then(crate::cookies::cookie_time::parse_cookie_time)
}

fn max_age_expiration(max_age: &str, creation_time: OffsetDateTime) -> Option<OffsetDateTime> {
    let trimmed = max_age.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    if negative {
        // Already expired.
        return Some(creation_time);
    }

    let seconds = digits[..len].parse::<i64>().unwrap_or(i64::MAX);
    Some(
        creation_time
            .checked_add(Duration::seconds(seconds))
            .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
    )
}
