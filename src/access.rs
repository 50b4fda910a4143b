//! Per-subsystem access decisions derived from token claims.

use crate::error::VerifyError;
use thiserror::Error;

/// Why a subsystem access check was denied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The presented token did not verify.
    #[error(transparent)]
    Verification(#[from] VerifyError),

    /// The token is valid but carries no grant for the subsystem.
    #[error("no access to {subsystem} system")]
    NoAccess {
        /// Subsystem code that was requested.
        subsystem: String,
    },
}

/// Result of evaluating a token against a requested subsystem code.
///
/// Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted, with the role resolved for that subsystem.
    Granted {
        /// Role the principal holds in the subsystem (`"viewer"` when the
        /// role map has no entry for it).
        role: String,
    },
    /// Access denied.
    Denied {
        /// Why the check failed.
        reason: DenialReason,
    },
}

impl AccessDecision {
    /// Whether access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// Resolved subsystem role, when granted.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        match self {
            Self::Granted { role } => Some(role),
            Self::Denied { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_accessors() {
        let decision = AccessDecision::Granted {
            role: "editor".to_string(),
        };
        assert!(decision.is_allowed());
        assert_eq!(decision.role(), Some("editor"));
    }

    #[test]
    fn test_denied_reason_message() {
        let decision = AccessDecision::Denied {
            reason: DenialReason::NoAccess {
                subsystem: "aims".to_string(),
            },
        };
        assert!(!decision.is_allowed());
        assert_eq!(decision.role(), None);

        let AccessDecision::Denied { reason } = decision else {
            unreachable!();
        };
        assert_eq!(reason.to_string(), "no access to aims system");
    }

    #[test]
    fn test_verification_reason_wraps_error() {
        let reason = DenialReason::from(VerifyError::Expired);
        assert_eq!(reason.to_string(), "token has expired");
    }
}
