//! Centralized configuration for the token authority.
//!
//! Configuration is injected explicitly at construction; `from_env` is the
//! deployment path and validates everything at startup. A missing signing
//! secret fails startup rather than individual requests.

use crate::error::ConfigError;
use chrono::Duration;
use std::env;

/// Default issuer claim stamped into every minted token.
pub const DEFAULT_ISSUER: &str = "aims-hub";

/// Default audience claim stamped into every minted token.
pub const DEFAULT_AUDIENCE: &str = "aims-systems";

/// Default token validity window: 8 hours.
pub const DEFAULT_VALIDITY_SECS: i64 = 8 * 60 * 60;

/// Token authority configuration.
#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    /// Shared HMAC signing secret. Rotating it invalidates every
    /// outstanding token immediately.
    pub secret: String,
    /// Issuer label checked on every verification.
    pub issuer: String,
    /// Audience label checked on every verification.
    pub audience: String,
    /// Validity window applied by `mint` when the caller passes none.
    pub default_validity: Duration,
}

impl AuthorityConfig {
    /// Create a configuration with the given secret and the fixed
    /// issuer/audience/validity defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] when the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            secret,
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            default_validity: Duration::seconds(DEFAULT_VALIDITY_SECS),
        })
    }

    /// Override the issuer label.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Override the audience label.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Override the default validity window.
    #[must_use]
    pub fn with_default_validity(mut self, validity: Duration) -> Self {
        self.default_validity = validity;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `SSO_SECRET_KEY` is required; `SSO_ISSUER`, `SSO_AUDIENCE` and
    /// `SSO_TOKEN_TTL` (seconds) fall back to the fixed defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is missing or a variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secret = env::var("SSO_SECRET_KEY").map_err(|_| ConfigError::MissingSecret)?;
        let issuer = env::var("SSO_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());
        let audience = env::var("SSO_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());
        let ttl_secs = parse_env("SSO_TOKEN_TTL", DEFAULT_VALIDITY_SECS)?;

        Ok(Self::new(secret)?
            .with_issuer(issuer)
            .with_audience(audience)
            .with_default_validity(Duration::seconds(ttl_secs)))
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
