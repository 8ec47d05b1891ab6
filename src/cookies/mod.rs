//! Cookie parsing, matching and storage.
//!
//! - **Parsing**: [`ParsedCookie`](parsed_cookie::ParsedCookie) tokenizes a
//!   `Set-Cookie` line; [`cookie_time`] reads its `Expires` date
//! - **Canonical form**: [`CanonicalCookie`](canonical_cookie::CanonicalCookie)
//!   is the validated cookie as stored
//! - **Storage**: [`CookieMap`](cookie_map::CookieMap) buckets cookies by
//!   registered domain and runs garbage collection
//! - **Facade**: [`CookieMonster`](monster::CookieMonster) ties it together
//!   behind one lock
//!
//! # Architecture
//!
//! This implementation mirrors Chromium's cookie storage architecture:
//!
//! | Chromium (C++) | cookiemonster (Rust) | Responsibility |
//! |----------------|----------------------|----------------|
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | Cookie jar with LRU eviction |
//! | `CookieMonster::ParsedCookie` | [`ParsedCookie`](parsed_cookie::ParsedCookie) | `Set-Cookie` tokenizer |
//! | `CookieMonster::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie representation |
//! | `CookieMonster::ParseCookieTime` | [`parse_cookie_time`](cookie_time::parse_cookie_time) | Cookie date parsing |
//! | `RegistryControlledDomainService` | [`psl`] | Registrable domain lookup |
//! | `PersistentCookieStore` | [`CookieChangeListener`](changes::CookieChangeListener) | Receives store mutations |
//!
//! # Example
//!
//! ```rust
//! use cookiemonster::cookies::{CookieMonster, CookieOptions};
//! use url::Url;
//!
//! let jar = CookieMonster::new();
//! let url = Url::parse("http://www.google.izzle/").unwrap();
//!
//! // httponly cookies need explicit access.
//! assert!(!jar.set_cookie(&url, "sid=1; httponly"));
//! let opts = CookieOptions::new().include_http_only(true);
//! assert!(jar.set_cookie_with_options(&url, "sid=1; httponly", &opts));
//! assert_eq!(jar.get_cookies(&url), "");
//! assert_eq!(jar.get_cookies_with_options(&url, &opts), "sid=1");
//! ```
//!
//! # Chromium References
//!
//! - Cookie monster: `net/base/cookie_monster.cc`
//! - Registry rules: `net/base/registry_controlled_domain.cc`

pub mod canonical_cookie;
pub mod changes;
pub mod cookie_map;
pub mod cookie_time;
pub mod matching;
pub mod monster;
pub mod options;
pub mod parsed_cookie;
pub mod psl;

pub use canonical_cookie::CanonicalCookie;
pub use changes::{ChangeCause, CookieChange, CookieChangeListener, CookieChangeSet};
pub use monster::CookieMonster;
pub use options::{CookieMonsterConfig, CookieOptions};
pub use parsed_cookie::ParsedCookie;
