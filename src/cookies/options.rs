//! Per-call cookie options and store-wide configuration.

use crate::cookies::cookie_map::GarbageCollectionLimits;
use time::Duration;

/// Options for a single set or get call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// Allow httponly cookies to be read, set or replaced.
    pub include_http_only: bool,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_http_only(mut self, include: bool) -> Self {
        self.include_http_only = include;
        self
    }
}

/// Store-wide configuration for [`CookieMonster`](super::monster::CookieMonster).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMonsterConfig {
    /// Cookies kept per registered domain before garbage collection
    pub max_cookies_per_key: usize,
    /// Extra cookies evicted from a domain once over the limit
    pub purge_cookies_per_key: usize,
    /// Cookies kept across the whole store
    pub max_cookies_total: usize,
    /// Extra cookies evicted store-wide once over the limit
    pub purge_cookies_total: usize,
    /// Minimum gap between two access-time updates of the same cookie
    pub last_access_threshold: Duration,
    /// URL schemes cookies may be set for and read from
    pub cookieable_schemes: Vec<String>,
}

impl Default for CookieMonsterConfig {
    fn default() -> Self {
        let limits = GarbageCollectionLimits::default();
        Self {
            max_cookies_per_key: limits.max_per_key,
            purge_cookies_per_key: limits.purge_per_key,
            max_cookies_total: limits.max_total,
            purge_cookies_total: limits.purge_total,
            last_access_threshold: Duration::ZERO,
            cookieable_schemes: ["http", "https", "ws", "wss"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CookieMonsterConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-domain limit and how far below it a purge goes.
    pub fn per_key_limit(mut self, max: usize, purge: usize) -> Self {
        self.max_cookies_per_key = max;
        self.purge_cookies_per_key = purge;
        self
    }

    /// Set the store-wide limit and how far below it a purge goes.
    pub fn total_limit(mut self, max: usize, purge: usize) -> Self {
        self.max_cookies_total = max;
        self.purge_cookies_total = purge;
        self
    }

    /// Set the access-time update threshold.
    pub fn last_access_threshold(mut self, threshold: Duration) -> Self {
        self.last_access_threshold = threshold;
        self
    }

    /// Replace the set of cookieable schemes.
    pub fn cookieable_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cookieable_schemes = schemes
            .into_iter()
            .map(|s| s.into().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn is_cookieable_scheme(&self, scheme: &str) -> bool {
        self.cookieable_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
    }

    /// Garbage-collection bounds with each purge clamped to its maximum.
    pub fn gc_limits(&self) -> GarbageCollectionLimits {
        GarbageCollectionLimits {
            max_per_key: self.max_cookies_per_key,
            purge_per_key: self.purge_cookies_per_key.min(self.max_cookies_per_key),
            max_total: self.max_cookies_total,
            purge_total: self.purge_cookies_total.min(self.max_cookies_total),
        }
    }
}

/// Schemes over which secure cookies are sent.
pub fn is_secure_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CookieMonsterConfig::default();
        assert_eq!(config.max_cookies_per_key, 70);
        assert_eq!(config.purge_cookies_per_key, 20);
        assert_eq!(config.max_cookies_total, 1100);
        assert_eq!(config.purge_cookies_total, 100);
        assert_eq!(config.last_access_threshold, Duration::ZERO);
        assert!(config.is_cookieable_scheme("http"));
        assert!(config.is_cookieable_scheme("WSS"));
        assert!(!config.is_cookieable_scheme("ftp"));
        assert!(!config.is_cookieable_scheme("file"));
    }

    #[test]
    fn test_builder() {
        let config = CookieMonsterConfig::new()
            .per_key_limit(10, 4)
            .total_limit(20, 50)
            .last_access_threshold(Duration::seconds(1))
            .cookieable_schemes(["HTTP", "ftp"]);

        let limits = config.gc_limits();
        assert_eq!(limits.max_per_key, 10);
        assert_eq!(limits.purge_per_key, 4);
        // Purge clamped to the maximum.
        assert_eq!(limits.purge_total, 20);
        assert!(config.is_cookieable_scheme("ftp"));
        assert!(config.is_cookieable_scheme("http"));
        assert!(!config.is_cookieable_scheme("https"));
    }

    #[test]
    fn test_options() {
        assert!(!CookieOptions::default().include_http_only);
        assert!(CookieOptions::new().include_http_only(true).include_http_only);
    }

    #[test]
    fn test_secure_scheme() {
        assert!(is_secure_scheme("https"));
        assert!(is_secure_scheme("wss"));
        assert!(!is_secure_scheme("http"));
        assert!(!is_secure_scheme("ws"));
    }
}
