//! Token claims, the minting/verifying authority, and request extraction.

pub mod authority;
pub mod claims;
pub mod extract;

pub use authority::TokenAuthority;
pub use claims::SsoClaims;
