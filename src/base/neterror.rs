use thiserror::Error;

/// Reasons a cookie operation can be refused.
///
/// Codes follow `net_error_list.h` where Chromium has an equivalent; the
/// cookie-specific variants live in the custom range starting at -900.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,

    // Cookie errors
    #[error("Cookie domain is a public suffix")]
    CookiePublicSuffix,
    #[error("Cookie line could not be parsed")]
    CookieParseFailed,
    #[error("Cookie domain does not match the request host")]
    CookieInvalidDomain,
    #[error("HttpOnly cookie cannot be set or overwritten without HttpOnly access")]
    CookieHttpOnly,
    #[error("Cookie line exceeds the maximum cookie size")]
    CookieTooLarge,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::CookiePublicSuffix => -904,
            NetError::CookieParseFailed => -905,
            NetError::CookieInvalidDomain => -906,
            NetError::CookieHttpOnly => -907,
            NetError::CookieTooLarge => -908,
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether this error was raised by cookie validation rather than by the
    /// request URL.
    pub fn is_cookie_error(&self) -> bool {
        matches!(
            self,
            NetError::CookiePublicSuffix
                | NetError::CookieParseFailed
                | NetError::CookieInvalidDomain
                | NetError::CookieHttpOnly
                | NetError::CookieTooLarge
        )
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -904 => NetError::CookiePublicSuffix,
            -905 => NetError::CookieParseFailed,
            -906 => NetError::CookieInvalidDomain,
            -907 => NetError::CookieHttpOnly,
            -908 => NetError::CookieTooLarge,
            _ => NetError::Unknown(code),
        }
    }
}
