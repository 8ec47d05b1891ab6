//! The cookie store proper.
//!
//! Cookies are bucketed by registered domain key (see [`psl::domain_key`]).
//! Buckets iterate in key order and keep insertion order inside, which is the
//! order [`CookieMap::iter`] reports. The map does no locking and reads no
//! clock; callers pass `now` in.

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::changes::{ChangeCause, CookieChangeSet};
use crate::cookies::psl;
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// Per-domain and global bounds enforced after every insert.
///
/// When a bucket grows past `max_per_key` it is purged down to
/// `max_per_key - purge_per_key`; when the whole store grows past
/// `max_total` it is purged down to `max_total - purge_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarbageCollectionLimits {
    pub max_per_key: usize,
    pub purge_per_key: usize,
    pub max_total: usize,
    pub purge_total: usize,
}

impl Default for GarbageCollectionLimits {
    fn default() -> Self {
        Self {
            max_per_key: 70,
            purge_per_key: 20,
            max_total: 1100,
            purge_total: 100,
        }
    }
}

/// Multi-valued map from registered domain key to the cookies stored
/// under it.
#[derive(Debug, Default)]
pub struct CookieMap {
    cookies: BTreeMap<String, Vec<CanonicalCookie>>,
    len: usize,
    limits: GarbageCollectionLimits,
}

impl CookieMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: GarbageCollectionLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> GarbageCollectionLimits {
        self.limits
    }

    /// Total number of cookies across every bucket.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len_for_key(&self, key: &str) -> usize {
        self.cookies.get(key).map_or(0, Vec::len)
    }

    pub fn cookies_for_key(&self, key: &str) -> &[CanonicalCookie] {
        self.cookies.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalCookie)> {
        self.cookies
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |c| (key.as_str(), c)))
    }

    /// Store `cookie` without checking for an equivalent one, then run
    /// garbage collection. The inserted cookie itself is never evicted.
    pub fn insert(&mut self, cookie: CanonicalCookie, now: OffsetDateTime) -> CookieChangeSet {
        let key = psl::domain_key(&cookie.domain);
        let mut changes = CookieChangeSet::new();
        changes.push(cookie.clone(), ChangeCause::Inserted);

        self.cookies.entry(key.clone()).or_default().push(cookie.clone());
        self.len += 1;

        changes.extend(self.garbage_collect(&key, now, &cookie));
        changes
    }

    pub fn find_equivalent(&self, domain: &str, path: &str, name: &str) -> Option<&CanonicalCookie> {
        let key = psl::domain_key(domain);
        let index = self.equivalent_index(&key, domain, path, name)?;
        self.cookies_for_key(&key).get(index)
    }

    /// Remove the cookie `cookie` would replace.
    ///
    /// If that cookie is httponly and `skip_http_only` is set, nothing is
    /// removed and [`NetError::CookieHttpOnly`] is returned.
    pub fn delete_equivalent(
        &mut self,
        cookie: &CanonicalCookie,
        skip_http_only: bool,
    ) -> Result<CookieChangeSet, NetError> {
        let key = psl::domain_key(&cookie.domain);
        let mut changes = CookieChangeSet::new();
        let Some(index) = self.equivalent_index(&key, &cookie.domain, &cookie.path, &cookie.name)
        else {
            return Ok(changes);
        };

        if skip_http_only && self.cookies_for_key(&key)[index].http_only {
            return Err(NetError::CookieHttpOnly);
        }
        if let Some(old) = self.remove_at(&key, index) {
            changes.push(old, ChangeCause::Overwrite);
        }
        Ok(changes)
    }

    fn equivalent_index(&self, key: &str, domain: &str, path: &str, name: &str) -> Option<usize> {
        self.cookies_for_key(key)
            .iter()
            .position(|c| c.domain == domain && c.path == path && c.name == name)
    }

    /// Drop every expired cookie under `key` and return the live ones that
    /// pass `filter`, in bucket order.
    ///
    /// Returned cookies get their access time bumped to `now` when more
    /// than `access_threshold` has passed since the last bump.
    pub fn matching_cookies<F>(
        &mut self,
        key: &str,
        now: OffsetDateTime,
        access_threshold: Duration,
        filter: F,
    ) -> (Vec<CanonicalCookie>, CookieChangeSet)
    where
        F: Fn(&CanonicalCookie) -> bool,
    {
        let changes = self.remove_where(Some(key), |_, c| c.is_expired(now), ChangeCause::Expired);
        for change in &changes {
            tracing::trace!(
                name = %change.cookie.name,
                domain = %change.cookie.domain,
                "removed expired cookie on read"
            );
        }

        let mut matched = Vec::new();
        if let Some(bucket) = self.cookies.get_mut(key) {
            for cookie in bucket.iter_mut().filter(|c| filter(c)) {
                if now - cookie.last_access_time > access_threshold {
                    cookie.last_access_time = now;
                }
                matched.push(cookie.clone());
            }
        }

        (matched, changes)
    }

    /// Remove the stored cookie `cookie` is a snapshot of from bucket `key`.
    pub fn delete(&mut self, key: &str, cookie: &CanonicalCookie) -> Option<CookieChangeSet> {
        let index = self
            .cookies
            .get(key)?
            .iter()
            .position(|c| c.is_same_cookie(cookie))?;
        let removed = self.remove_at(key, index)?;

        let mut changes = CookieChangeSet::new();
        changes.push(removed, ChangeCause::Explicit);
        Some(changes)
    }

    /// Remove every cookie (restricted to bucket `key` if given) for which
    /// `pred` returns true.
    pub fn delete_where<F>(&mut self, key: Option<&str>, pred: F) -> CookieChangeSet
    where
        F: FnMut(&str, &CanonicalCookie) -> bool,
    {
        self.remove_where(key, pred, ChangeCause::Explicit)
    }

    /// Drop every expired cookie in the store.
    pub fn remove_expired(&mut self, now: OffsetDateTime) -> CookieChangeSet {
        self.remove_where(None, |_, c| c.is_expired(now), ChangeCause::Expired)
    }

    fn remove_at(&mut self, key: &str, index: usize) -> Option<CanonicalCookie> {
        let bucket = self.cookies.get_mut(key)?;
        if index >= bucket.len() {
            return None;
        }
        let cookie = bucket.remove(index);
        if bucket.is_empty() {
            self.cookies.remove(key);
        }
        self.len -= 1;
        Some(cookie)
    }

    fn remove_where<F>(&mut self, scope: Option<&str>, mut pred: F, cause: ChangeCause) -> CookieChangeSet
    where
        F: FnMut(&str, &CanonicalCookie) -> bool,
    {
        let mut changes = CookieChangeSet::new();
        let mut removed_total = 0;

        self.cookies.retain(|key, bucket| {
            if scope.is_some_and(|s| s != key) {
                return true;
            }
            let (removed, kept): (Vec<CanonicalCookie>, Vec<CanonicalCookie>) =
                std::mem::take(bucket)
                    .into_iter()
                    .partition(|c| pred(key, c));
            *bucket = kept;
            removed_total += removed.len();
            for cookie in removed {
                changes.push(cookie, cause);
            }
            !bucket.is_empty()
        });

        self.len -= removed_total;
        changes
    }

    fn garbage_collect(
        &mut self,
        key: &str,
        now: OffsetDateTime,
        keep: &CanonicalCookie,
    ) -> CookieChangeSet {
        let limits = self.limits;
        let mut changes = CookieChangeSet::new();

        if self.len_for_key(key) > limits.max_per_key {
            changes.extend(self.collect_range(
                Some(key),
                now,
                limits.max_per_key,
                limits.purge_per_key,
                keep,
            ));
        }

        if self.len > limits.max_total {
            changes.extend(self.collect_range(
                None,
                now,
                limits.max_total,
                limits.purge_total,
                keep,
            ));
        }

        if !changes.is_empty() {
            tracing::debug!(
                key = %key,
                expired = changes.count(ChangeCause::Expired),
                evicted = changes.count(ChangeCause::Evicted),
                remaining = self.len,
                "garbage collected cookies"
            );
        }
        changes
    }

    /// Expired cookies go first. If the range is still over `max`, the least
    /// recently used cookies are evicted until `max - purge` remain.
    fn collect_range(
        &mut self,
        scope: Option<&str>,
        now: OffsetDateTime,
        max: usize,
        purge: usize,
        keep: &CanonicalCookie,
    ) -> CookieChangeSet {
        let mut changes = self.remove_where(scope, |_, c| c.is_expired(now), ChangeCause::Expired);

        let remaining = match scope {
            Some(key) => self.len_for_key(key),
            None => self.len,
        };
        if remaining <= max {
            return changes;
        }
        let target = max - purge.min(max);

        let mut candidates: Vec<(OffsetDateTime, OffsetDateTime, &str, usize)> = self
            .cookies
            .iter()
            .filter(|(key, _)| scope.map_or(true, |s| s == key.as_str()))
            .flat_map(|(key, bucket)| {
                bucket
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_equivalent(keep))
                    .map(move |(i, c)| (c.last_access_time, c.creation_time, key.as_str(), i))
            })
            .collect();
        candidates.sort();
        candidates.truncate(remaining - target);

        let mut victims: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (_, _, key, index) in candidates {
            victims.entry(key.to_string()).or_default().push(index);
        }

        for (key, mut indices) in victims {
            // Highest index first so earlier indices stay valid.
            indices.sort_unstable_by(|a, b| b.cmp(a));
            for index in indices {
                if let Some(cookie) = self.remove_at(&key, index) {
                    changes.push(cookie, ChangeCause::Evicted);
                }
            }
        }

        changes
    }
}
