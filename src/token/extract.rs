//! Token extraction helpers for web front-ends.
//!
//! Subsystems carry the SSO token either in a cookie or in a bearer
//! `Authorization` header. These are pure string functions so any web
//! framework can use them without adapters.

/// Cookie name the hub sets for the SSO token.
pub const SSO_COOKIE: &str = "sso_token";

/// Extract a token from an `Authorization` header value.
///
/// Accepts only the `Bearer` scheme; anything else yields `None`. The
/// remainder after the scheme prefix is taken verbatim, whitespace
/// included.
#[must_use]
pub fn from_bearer_header(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?;
    (!token.is_empty()).then_some(token)
}

/// Extract a named cookie value from a `Cookie` header string.
#[must_use]
pub fn from_cookie_header<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name && !value.is_empty()).then_some(value)
    })
}

/// Extract a token from a request's cookie and authorization headers.
///
/// The cookie wins when both are present, matching how the hub's own
/// middleware resolves it.
#[must_use]
pub fn from_request_parts<'a>(
    cookies: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    cookies
        .and_then(|c| from_cookie_header(c, SSO_COOKIE))
        .or_else(|| authorization.and_then(from_bearer_header))
}
