//! Change-sets produced by store mutations.
//!
//! The store never talks to disk. Every mutation returns the cookies it added
//! and removed, and a [`CookieChangeListener`] (a persistence layer, a sync
//! service, a test) decides what to do with them.

use crate::cookies::canonical_cookie::CanonicalCookie;
use serde::{Deserialize, Serialize};

/// Why a cookie entered or left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCause {
    /// A new cookie was stored.
    Inserted,
    /// Removed by an explicit delete call.
    Explicit,
    /// Replaced by an equivalent cookie (same name, domain and path).
    Overwrite,
    /// Found expired on read or during garbage collection.
    Expired,
    /// Evicted to stay under the per-domain or global limit.
    Evicted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieChange {
    pub cookie: CanonicalCookie,
    pub cause: ChangeCause,
}

impl CookieChange {
    pub fn is_removal(&self) -> bool {
        self.cause != ChangeCause::Inserted
    }
}

/// Ordered list of changes made by one store operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieChangeSet {
    changes: Vec<CookieChange>,
}

impl CookieChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cookie: CanonicalCookie, cause: ChangeCause) {
        self.changes.push(CookieChange { cookie, cause });
    }

    pub fn extend(&mut self, other: CookieChangeSet) {
        self.changes.extend(other.changes);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CookieChange> {
        self.changes.iter()
    }

    /// Cookies stored by the operation.
    pub fn added(&self) -> impl Iterator<Item = &CanonicalCookie> {
        self.changes
            .iter()
            .filter(|c| !c.is_removal())
            .map(|c| &c.cookie)
    }

    /// Cookies removed by the operation, for any reason.
    pub fn removed(&self) -> impl Iterator<Item = &CookieChange> {
        self.changes.iter().filter(|c| c.is_removal())
    }

    pub fn removed_count(&self) -> usize {
        self.removed().count()
    }

    pub fn count(&self, cause: ChangeCause) -> usize {
        self.changes.iter().filter(|c| c.cause == cause).count()
    }
}

impl IntoIterator for CookieChangeSet {
    type Item = CookieChange;
    type IntoIter = std::vec::IntoIter<CookieChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a CookieChangeSet {
    type Item = &'a CookieChange;
    type IntoIter = std::slice::Iter<'a, CookieChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Receives every non-empty change-set, in the order the store applied
/// them. Called outside the store lock, so the listener may call back in.
pub trait CookieChangeListener: Send + Sync {
    fn on_cookies_changed(&self, changes: &CookieChangeSet);
}
