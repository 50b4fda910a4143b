//! SSO claim set carried inside every token.

use crate::principal::{Principal, Role, DEFAULT_SUBSYSTEM_ROLE};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decoded claim set of an SSO token.
///
/// The shape is fixed: every field is present in every minted token, with
/// the access and role maps already resolved to their baselines. Tokens
/// are immutable once minted and never stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SsoClaims {
    /// Principal identifier.
    pub user_id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Hub-wide role.
    pub user_role: Role,
    /// Organizational unit.
    pub department: String,
    /// Sub-unit.
    pub division: String,
    /// Per-subsystem permission map.
    pub system_access: HashMap<String, bool>,
    /// Per-subsystem role map.
    pub system_roles: HashMap<String, String>,
    /// Elevated flag.
    pub is_superuser: bool,
    /// Elevated flag.
    pub is_staff: bool,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Issuer label.
    pub iss: String,
    /// Audience label.
    pub aud: String,
}

impl SsoClaims {
    /// Build the claim set for a principal at the current instant.
    ///
    /// The validity window may be negative; the resulting token is then
    /// already past its expiry cliff.
    #[must_use]
    pub fn from_principal(
        principal: &Principal,
        issuer: &str,
        audience: &str,
        validity: Duration,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id: principal.user_id,
            username: principal.username.clone(),
            email: principal.email.clone(),
            full_name: principal.full_name.clone(),
            user_role: principal.role,
            department: principal.department.clone(),
            division: principal.division.clone(),
            system_access: principal.resolved_system_access(),
            system_roles: principal.resolved_system_roles(),
            is_superuser: principal.is_superuser,
            is_staff: principal.is_staff,
            iat: now,
            exp: now + validity.num_seconds(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    /// Whether the expiry instant has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Whether the subsystem is granted in the access map.
    #[must_use]
    pub fn has_access(&self, subsystem: &str) -> bool {
        self.system_access.get(subsystem).copied().unwrap_or(false)
    }

    /// Role held in the subsystem; `"viewer"` when the role map has no
    /// entry. Access and role default independently.
    #[must_use]
    pub fn role_for(&self, subsystem: &str) -> &str {
        self.system_roles
            .get(subsystem)
            .map_or(DEFAULT_SUBSYSTEM_ROLE, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::HUB_SUBSYSTEM;

    fn sample_principal() -> Principal {
        Principal::new(42, "somchai")
            .with_email("somchai@npu.ac.th")
            .with_full_name("Somchai Jaidee")
            .with_role(Role::AcademicService)
            .with_unit("Academic Resource Office", "Information Services")
    }

    #[test]
    fn test_from_principal_copies_fields() {
        let claims = SsoClaims::from_principal(
            &sample_principal(),
            "aims-hub",
            "aims-systems",
            Duration::hours(8),
        );

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "somchai");
        assert_eq!(claims.user_role, Role::AcademicService);
        assert_eq!(claims.iss, "aims-hub");
        assert_eq!(claims.aud, "aims-systems");
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_from_principal_resolves_baseline_maps() {
        let claims = SsoClaims::from_principal(
            &sample_principal(),
            "aims-hub",
            "aims-systems",
            Duration::hours(1),
        );

        assert!(claims.has_access(HUB_SUBSYSTEM));
        assert_eq!(claims.role_for(HUB_SUBSYSTEM), "viewer");
    }

    #[test]
    fn test_role_defaults_independently_of_access() {
        let principal = sample_principal()
            .with_system_access(HashMap::from([("aims".to_string(), true)]));
        let claims =
            SsoClaims::from_principal(&principal, "aims-hub", "aims-systems", Duration::hours(1));

        // Access granted but no role recorded: falls back to viewer.
        assert!(claims.has_access("aims"));
        assert_eq!(claims.role_for("aims"), "viewer");
        assert!(!claims.has_access("dashboard"));
    }

    #[test]
    fn test_negative_validity_is_already_expired() {
        let claims = SsoClaims::from_principal(
            &sample_principal(),
            "aims-hub",
            "aims-systems",
            Duration::seconds(-1),
        );
        assert!(claims.is_expired());
    }

    #[test]
    fn test_json_shape_is_flat() {
        let claims = SsoClaims::from_principal(
            &sample_principal(),
            "aims-hub",
            "aims-systems",
            Duration::hours(1),
        );
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["user_role"], "academic_service");
        assert_eq!(value["iss"], "aims-hub");
        assert!(value["system_access"].is_object());
        assert!(value["iat"].is_i64());
    }
}
