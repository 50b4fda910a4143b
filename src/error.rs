//! Error taxonomies for the token authority.
//!
//! Verification, refresh and configuration failures are separate enums so
//! callers can match on exactly the outcomes they care about. None of these
//! is fatal to the process except a bad configuration at startup.

use thiserror::Error;

/// Outcome of a failed token verification.
///
/// The three variants are deliberately distinguishable: an expired token
/// should prompt a re-login, a malformed one is rejected outright, and a
/// wrong issuer/audience pair means a token minted for a different system
/// was presented here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Signature is valid but the token is past its expiry instant.
    #[error("token has expired")]
    Expired,

    /// Signature is invalid or the claim set cannot be decoded.
    #[error("invalid token")]
    Malformed,

    /// Signature is valid but the issuer or audience claim does not match
    /// this authority.
    #[error("token issuer or audience mismatch")]
    WrongAudienceOrIssuer,
}

/// Failure while minting a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    /// Claim serialization or signing failed.
    #[error("token encoding error: {0}")]
    Encoding(String),
}

/// Failure while refreshing a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The presented token did not verify; expiry is a hard cliff and no
    /// grace window applies.
    #[error("refresh rejected: {0}")]
    Verification(#[from] VerifyError),

    /// The principal backing the token no longer exists in the directory.
    #[error("principal {user_id} not found")]
    PrincipalNotFound {
        /// Subject id carried by the stale token.
        user_id: i64,
    },

    /// Re-minting the fresh token failed.
    #[error(transparent)]
    Mint(#[from] MintError),
}

/// Configuration error raised at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The signing secret is missing or empty. This is the only fatal
    /// condition in the component; it must fail process startup.
    #[error("signing secret is missing or empty")]
    MissingSecret,

    /// An environment variable could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
