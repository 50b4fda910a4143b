//! The token authority: mint, verify, refresh, and access checks.

use crate::access::{AccessDecision, DenialReason};
use crate::config::AuthorityConfig;
use crate::directory::UserDirectory;
use crate::error::{ConfigError, MintError, RefreshError, VerifyError};
use crate::principal::Principal;
use crate::token::claims::SsoClaims;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};

/// Mints and verifies SSO tokens for the hub.
///
/// Holds only immutable configuration and keys derived from it once, so a
/// single instance is freely shared across request handlers. Every
/// operation is a pure computation over its own token string plus a clock
/// read; verification never performs I/O.
pub struct TokenAuthority {
    config: AuthorityConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Build an authority from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] when the secret is empty.
    /// Callers are expected to treat this as fatal at startup.
    pub fn new(config: AuthorityConfig) -> Result<Self, ConfigError> {
        if config.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Configuration this authority was built from.
    #[must_use]
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Mint a token for the principal with the default validity window.
    ///
    /// # Errors
    ///
    /// Returns [`MintError`] when claim encoding fails.
    pub fn mint(&self, principal: &Principal) -> Result<String, MintError> {
        self.mint_with_validity(principal, self.config.default_validity)
    }

    /// Mint a token with an explicit validity window.
    ///
    /// Successive mints for the same principal carry distinct `iat`
    /// values, so the signed output differs over time even when every
    /// other claim is identical. A non-positive window yields a token
    /// already past its expiry cliff.
    ///
    /// # Errors
    ///
    /// Returns [`MintError`] when claim encoding fails.
    pub fn mint_with_validity(
        &self,
        principal: &Principal,
        validity: Duration,
    ) -> Result<String, MintError> {
        let claims = SsoClaims::from_principal(
            principal,
            &self.config.issuer,
            &self.config.audience,
            validity,
        );
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| MintError::Encoding(e.to_string()))?;
        debug!(user_id = principal.user_id, exp = claims.exp, "minted sso token");
        Ok(token)
    }

    /// Verify a token of unconstrained origin.
    ///
    /// Checks signature, issuer, audience and expiry, with no leeway:
    /// expiry is a hard cliff. The three failure variants are
    /// caller-distinguishable because the user-visible handling differs.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Expired`], [`VerifyError::Malformed`] or
    /// [`VerifyError::WrongAudienceOrIssuer`].
    pub fn verify(&self, token: &str) -> Result<SsoClaims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        match decode::<SsoClaims>(token, &self.decoding_key, &validation) {
            // jsonwebtoken's exp check is strict (exp < now); re-check so
            // a token is already expired during its expiry second.
            Ok(data) if data.claims.is_expired() => Err(VerifyError::Expired),
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    VerifyError::WrongAudienceOrIssuer
                }
                _ => VerifyError::Malformed,
            }),
        }
    }

    /// Decode the claim segment without verifying signature or expiry.
    ///
    /// Diagnostics only; never use the result for authorization.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Malformed`] when the token does not have
    /// three segments or the claim segment does not decode.
    pub fn decode_unverified(&self, token: &str) -> Result<SsoClaims, VerifyError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(VerifyError::Malformed),
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| VerifyError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| VerifyError::Malformed)
    }

    /// Refresh a still-valid token against the live directory.
    ///
    /// The principal is re-resolved rather than copied from the old
    /// claims, so any authorization change made since the original mint
    /// lands in the new token. Safe to call redundantly for the same
    /// token; each call yields an independent fresh token.
    ///
    /// # Errors
    ///
    /// [`RefreshError::Verification`] when the token fails verification
    /// for any reason (an expired token is never refreshed), and
    /// [`RefreshError::PrincipalNotFound`] when the directory no longer
    /// knows the subject.
    pub async fn refresh<D: UserDirectory>(
        &self,
        token: &str,
        directory: &D,
    ) -> Result<String, RefreshError> {
        let claims = self.verify(token).map_err(|e| {
            warn!(error = %e, "refresh rejected");
            e
        })?;
        let principal = directory
            .find_by_id(claims.user_id)
            .await
            .ok_or(RefreshError::PrincipalNotFound {
                user_id: claims.user_id,
            })?;
        debug!(user_id = principal.user_id, "refreshing sso token");
        Ok(self.mint(&principal)?)
    }

    /// Evaluate a token against a requested subsystem code.
    ///
    /// Never fails: verification errors and missing grants both come back
    /// as a denial with the reason attached. Access and role default
    /// independently, so a granted subsystem with no role entry resolves
    /// to `"viewer"`.
    #[must_use]
    pub fn check_access(&self, token: &str, subsystem: &str) -> AccessDecision {
        let claims = match self.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                return AccessDecision::Denied {
                    reason: DenialReason::Verification(e),
                }
            }
        };

        if !claims.has_access(subsystem) {
            return AccessDecision::Denied {
                reason: DenialReason::NoAccess {
                    subsystem: subsystem.to_string(),
                },
            };
        }

        AccessDecision::Granted {
            role: claims.role_for(subsystem).to_string(),
        }
    }
}
