use crate::base::clock::{Clock, SystemClock};
use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::changes::{CookieChangeListener, CookieChangeSet};
use crate::cookies::cookie_map::CookieMap;
use crate::cookies::options::{is_secure_scheme, CookieMonsterConfig, CookieOptions};
use crate::cookies::parsed_cookie::ParsedCookie;
use crate::cookies::psl;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use url::Url;

/// The main entry point for cookie management.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// One lock guards the whole store. Share it between threads with `Arc`.
///
/// Change-sets are queued under that lock and handed to the listener
/// outside it, one thread at a time, in the order the mutations happened.
pub struct CookieMonster {
    state: Mutex<MonsterState>,
    delivering: Mutex<()>,
    clock: Arc<dyn Clock>,
    config: CookieMonsterConfig,
}

struct MonsterState {
    map: CookieMap,
    last_time_seen: Option<OffsetDateTime>,
    listener: Option<Arc<dyn CookieChangeListener>>,
    pending: VecDeque<(Arc<dyn CookieChangeListener>, CookieChangeSet)>,
}

impl MonsterState {
    /// Strictly increasing timestamps, even if the clock stalls or steps
    /// backwards.
    fn current_time(&mut self, clock: &dyn Clock) -> OffsetDateTime {
        let now = clock.now();
        let now = match self.last_time_seen {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_time_seen = Some(now);
        now
    }

    fn store_parsed(
        &mut self,
        url: &Url,
        parsed: &ParsedCookie,
        options: &CookieOptions,
        creation_time: Option<OffsetDateTime>,
        clock: &dyn Clock,
    ) -> Result<CookieChangeSet, NetError> {
        let now = self.current_time(clock);
        let cookie = CanonicalCookie::create(url, parsed, creation_time.unwrap_or(now))?;
        if cookie.http_only && !options.include_http_only {
            return Err(NetError::CookieHttpOnly);
        }

        let mut changes = self
            .map
            .delete_equivalent(&cookie, !options.include_http_only)?;

        if cookie
            .expiration_time
            .is_some_and(|expiry| expiry <= cookie.creation_time)
        {
            tracing::debug!(
                name = %cookie.name,
                domain = %cookie.domain,
                "Set-Cookie already expired, not stored"
            );
            return Ok(changes);
        }

        changes.extend(self.map.insert(cookie, now));
        Ok(changes)
    }
}

/// The request-side view of a URL: what every lookup filters on.
struct UrlInfo {
    host: String,
    key: String,
    path: String,
    secure: bool,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::with_config(CookieMonsterConfig::default())
    }

    pub fn with_config(config: CookieMonsterConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CookieMonsterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(MonsterState {
                map: CookieMap::with_limits(config.gc_limits()),
                last_time_seen: None,
                listener: None,
                pending: VecDeque::new(),
            }),
            delivering: Mutex::new(()),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CookieMonsterConfig {
        &self.config
    }

    /// Register the collaborator that receives every change-set.
    pub fn set_change_listener(&self, listener: Arc<dyn CookieChangeListener>) {
        self.state.lock().listener = Some(listener);
    }

    /// Set a cookie from a `Set-Cookie` line without httponly access.
    pub fn set_cookie(&self, url: &Url, cookie_line: &str) -> bool {
        self.set_cookie_with_options(url, cookie_line, &CookieOptions::default())
    }

    pub fn set_cookie_with_options(
        &self,
        url: &Url,
        cookie_line: &str,
        options: &CookieOptions,
    ) -> bool {
        self.try_set_cookie(url, cookie_line, options, None).is_ok()
    }

    /// Set a cookie with an explicit creation time instead of the store's
    /// clock.
    pub fn set_cookie_with_creation_time(
        &self,
        url: &Url,
        cookie_line: &str,
        creation_time: OffsetDateTime,
    ) -> bool {
        self.try_set_cookie(url, cookie_line, &CookieOptions::default(), Some(creation_time))
            .is_ok()
    }

    /// Parse, validate and store one `Set-Cookie` line.
    ///
    /// An already expired cookie only removes its equivalent (the server
    /// deletion idiom) and still succeeds.
    ///
    /// # Errors
    /// - [`NetError::DisallowedUrlScheme`] for a scheme outside the configured set
    /// - [`NetError::CookieTooLarge`] / [`NetError::CookieParseFailed`] for bad input
    /// - [`NetError::CookieInvalidDomain`] / [`NetError::CookiePublicSuffix`] for a rejected `Domain`
    /// - [`NetError::CookieHttpOnly`] when httponly access is needed but not granted
    pub fn try_set_cookie(
        &self,
        url: &Url,
        cookie_line: &str,
        options: &CookieOptions,
        creation_time: Option<OffsetDateTime>,
    ) -> Result<CookieChangeSet, NetError> {
        let result = self.set_cookie_internal(url, cookie_line, options, creation_time);
        if let Err(e) = &result {
            tracing::debug!(
                url = %url,
                code = e.as_i32(),
                error = %e,
                "rejected Set-Cookie"
            );
        }
        result
    }

    fn set_cookie_internal(
        &self,
        url: &Url,
        cookie_line: &str,
        options: &CookieOptions,
        creation_time: Option<OffsetDateTime>,
    ) -> Result<CookieChangeSet, NetError> {
        if !self.config.is_cookieable_scheme(url.scheme()) {
            return Err(NetError::DisallowedUrlScheme);
        }

        let parsed = ParsedCookie::new(cookie_line);
        if parsed.is_too_large() {
            return Err(NetError::CookieTooLarge);
        }
        if !parsed.is_valid() {
            return Err(NetError::CookieParseFailed);
        }

        self.mutate(|state, clock| {
            let result = state.store_parsed(url, &parsed, options, creation_time, clock);
            let changes = result.as_ref().cloned().unwrap_or_default();
            (result, changes)
        })
    }

    /// Store an already canonical cookie, replacing any equivalent one
    /// regardless of httponly.
    ///
    /// Returns false if the cookie has no domain or a relative path.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) -> bool {
        if cookie.domain.is_empty() || !cookie.path.starts_with('/') {
            return false;
        }

        self.mutate(|state, clock| {
            let now = state.current_time(clock);
            let mut changes = state.map.delete_equivalent(&cookie, false).unwrap_or_default();
            if !cookie.is_expired(now) {
                changes.extend(state.map.insert(cookie, now));
            }
            (true, changes)
        })
    }

    /// The `Cookie` header value for `url`, without httponly cookies.
    pub fn get_cookies(&self, url: &Url) -> String {
        self.get_cookies_with_options(url, &CookieOptions::default())
    }

    pub fn get_cookies_with_options(&self, url: &Url, options: &CookieOptions) -> String {
        self.get_cookies_for_url(url, options)
            .iter()
            .map(CanonicalCookie::to_cookie_pair)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Cookies that would be sent to `url`, longest path first, then oldest
    /// first.
    ///
    /// Expired cookies under the URL's domain key are removed along the way
    /// and the access time of each returned cookie is refreshed.
    pub fn get_cookies_for_url(&self, url: &Url, options: &CookieOptions) -> Vec<CanonicalCookie> {
        if !self.config.is_cookieable_scheme(url.scheme()) {
            return Vec::new();
        }
        let Some(info) = url_info(url) else {
            return Vec::new();
        };
        let threshold = self.config.last_access_threshold;

        let mut cookies = self.mutate(|state, clock| {
            let now = state.current_time(clock);
            let (cookies, changes) = state.map.matching_cookies(&info.key, now, threshold, |c| {
                c.is_domain_match(&info.host)
                    && c.is_on_path(&info.path)
                    && (!c.secure || info.secure)
                    && (!c.http_only || options.include_http_only)
            });
            (cookies, changes)
        });

        cookies.sort_by(CanonicalCookie::cmp_for_request);
        cookies
    }

    /// Every live cookie with its domain key, in key order and insertion
    /// order within a key. Expired cookies are purged first.
    pub fn get_all_cookies(&self) -> Vec<(String, CanonicalCookie)> {
        self.mutate(|state, clock| {
            let now = state.current_time(clock);
            let changes = state.map.remove_expired(now);
            let all = state
                .map
                .iter()
                .map(|(key, c)| (key.to_string(), c.clone()))
                .collect();
            (all, changes)
        })
    }

    /// Delete exactly `cookie` from the bucket `domain_key`.
    pub fn delete_cookie(&self, domain_key: &str, cookie: &CanonicalCookie) -> bool {
        self.mutate(|state, _| match state.map.delete(domain_key, cookie) {
            Some(changes) => (true, changes),
            None => (false, CookieChangeSet::new()),
        })
    }

    pub fn delete_all(&self) -> usize {
        self.delete_matching(None, |_| true)
    }

    /// Delete cookies created at or after `since`.
    pub fn delete_all_created_after(&self, since: OffsetDateTime) -> usize {
        self.delete_matching(None, |c| c.creation_time >= since)
    }

    /// Delete cookies created in `[begin, end)`.
    pub fn delete_all_created_between(&self, begin: OffsetDateTime, end: OffsetDateTime) -> usize {
        self.delete_matching(None, |c| c.creation_time >= begin && c.creation_time < end)
    }

    /// Delete every cookie that would be sent to the URL's host, whatever
    /// its path, secure or httponly flag.
    pub fn delete_all_for_url(&self, url: &Url) -> usize {
        let Some(info) = url_info(url) else {
            return 0;
        };
        self.delete_matching(Some(info.key.as_str()), |c| c.is_domain_match(&info.host))
    }

    /// Delete cookies named `name` that match `url`, httponly ones included.
    pub fn delete_cookie_by_name(&self, url: &Url, name: &str) -> usize {
        let Some(info) = url_info(url) else {
            return 0;
        };
        self.delete_matching(Some(info.key.as_str()), |c| {
            c.name == name
                && c.is_domain_match(&info.host)
                && c.is_on_path(&info.path)
                && (!c.secure || info.secure)
        })
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.state.lock().map.len()
    }

    fn delete_matching<F>(&self, key: Option<&str>, pred: F) -> usize
    where
        F: Fn(&CanonicalCookie) -> bool,
    {
        self.mutate(|state, _| {
            let changes = state.map.delete_where(key, |_, c| pred(c));
            (changes.removed_count(), changes)
        })
    }

    /// Run `f` under the lock and queue the change-set it returns for the
    /// listener.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut MonsterState, &dyn Clock) -> (R, CookieChangeSet),
    ) -> R {
        let result = {
            let mut state = self.state.lock();
            let (result, changes) = f(&mut state, self.clock.as_ref());
            if let (Some(listener), false) = (state.listener.clone(), changes.is_empty()) {
                state.pending.push_back((listener, changes));
            }
            result
        };

        self.deliver_pending();
        result
    }

    /// Drain the queue without holding the store lock.
    ///
    /// Only one thread delivers at a time. Anyone finding delivery busy
    /// leaves its change-set to the current deliverer, which re-checks the
    /// queue after letting go so nothing is stranded. A listener that
    /// mutates the store lands here too and returns at once.
    fn deliver_pending(&self) {
        loop {
            let Some(guard) = self.delivering.try_lock() else {
                return;
            };
            while let Some((listener, changes)) = self.next_pending() {
                listener.on_cookies_changed(&changes);
            }
            drop(guard);

            if self.state.lock().pending.is_empty() {
                return;
            }
        }
    }

    fn next_pending(&self) -> Option<(Arc<dyn CookieChangeListener>, CookieChangeSet)> {
        self.state.lock().pending.pop_front()
    }
}

fn url_info(url: &Url) -> Option<UrlInfo> {
    let host = url.host_str()?.to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(UrlInfo {
        key: psl::domain_key(&host),
        host,
        path: url.path().to_string(),
        secure: is_secure_scheme(url.scheme()),
    })
}
