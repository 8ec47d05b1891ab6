//! # cookiemonster
//!
//! A Chromium-inspired in-memory HTTP cookie store for Rust.
//!
//! `cookiemonster` models the cookie jar a browser keeps per profile: it
//! parses `Set-Cookie` lines the way browsers actually do, applies domain and
//! path matching rules, expires cookies and bounds memory with an LRU garbage
//! collector.
//!
//! ## Features
//!
//! - **Permissive parsing**: nameless cookies, quoted values, `;;` runs
//! - **Cookie dates**: the many historical `Expires` formats
//! - **Domain rules**: Public Suffix List validation, IP hosts, trailing dots
//! - **Garbage collection**: 70 cookies per domain, 1100 in total (configurable)
//! - **Change-sets**: every mutation reports what it added and removed
//!
//! ## Quick Start
//!
//! ```rust
//! use cookiemonster::cookies::CookieMonster;
//! use url::Url;
//!
//! let jar = CookieMonster::new();
//! let url = Url::parse("http://www.example.com/").unwrap();
//!
//! assert!(jar.set_cookie(&url, "A=B"));
//! assert!(jar.set_cookie(&url, "C=D; domain=.example.com"));
//! assert_eq!(jar.get_cookies(&url), "A=B; C=D");
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and the clock abstraction
//! - [`cookies`] - Parsing, matching, storage and the `CookieMonster` facade

pub mod base;
pub mod cookies;
