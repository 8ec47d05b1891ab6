//! Base types and error handling.
//!
//! Provides foundational types shared by the cookie store:
//! - [`NetError`](neterror::NetError): error codes in the style of `net_error_list.h`
//! - [`Clock`](clock::Clock): injectable time source

pub mod clock;
pub mod neterror;
