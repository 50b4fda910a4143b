//! SSO token authority for the AIMS hub.
//!
//! Mints signed, time-boxed credentials for authenticated principals,
//! verifies presented credentials, derives per-subsystem access decisions
//! from their claims, and refreshes them against the live user directory.
//!
//! Tokens are stateless HS256 JWTs; nothing is stored server-side and a
//! secret rotation invalidates every outstanding credential at once.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod config;
pub mod directory;
pub mod error;
pub mod principal;
pub mod token;

// Re-exports for convenience
pub use access::{AccessDecision, DenialReason};
pub use config::AuthorityConfig;
pub use directory::{InMemoryDirectory, UserDirectory};
pub use error::{ConfigError, MintError, RefreshError, VerifyError};
pub use principal::{Principal, Role};
pub use token::{SsoClaims, TokenAuthority};
