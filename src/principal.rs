//! Principals and their per-subsystem authorization state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Subsystem code of the hub itself. Every principal can at least read it.
pub const HUB_SUBSYSTEM: &str = "hub";

/// Role assumed for a subsystem when access is granted but no role is
/// recorded for it.
pub const DEFAULT_SUBSYSTEM_ROLE: &str = "viewer";

/// Hub-wide role of a principal, drawn from a fixed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative control over every subsystem.
    SuperAdmin,
    /// Administers staff data and subsystem grants.
    StaffAdmin,
    /// Academic-service staff with operational access.
    AcademicService,
    /// Read-only access.
    ReadOnly,
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::StaffAdmin => "staff_admin",
            Self::AcademicService => "academic_service",
            Self::ReadOnly => "read_only",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated person with resolved roles and subsystem permissions.
///
/// Principal storage belongs to the external user directory; this type is
/// the in-memory shape the authority mints from. The access and role maps
/// are optional because the directory may never have recorded an explicit
/// grant; resolution falls back to the fixed baseline without writing
/// anything back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable identifier.
    pub user_id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Hub-wide role.
    pub role: Role,
    /// Organizational unit.
    pub department: String,
    /// Sub-unit.
    pub division: String,
    /// Per-subsystem permission map, when explicitly granted.
    pub system_access: Option<HashMap<String, bool>>,
    /// Per-subsystem role map, when explicitly assigned.
    pub system_roles: Option<HashMap<String, String>>,
    /// Elevated flag.
    pub is_superuser: bool,
    /// Elevated flag.
    pub is_staff: bool,
}

impl Principal {
    /// Create a principal with read-only defaults and no explicit grants.
    #[must_use]
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: String::new(),
            full_name: String::new(),
            role: Role::ReadOnly,
            department: String::new(),
            division: String::new(),
            system_access: None,
            system_roles: None,
            is_superuser: false,
            is_staff: false,
        }
    }

    /// Set the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the hub-wide role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the organizational unit and sub-unit.
    #[must_use]
    pub fn with_unit(
        mut self,
        department: impl Into<String>,
        division: impl Into<String>,
    ) -> Self {
        self.department = department.into();
        self.division = division.into();
        self
    }

    /// Grant an explicit per-subsystem access map.
    #[must_use]
    pub fn with_system_access(mut self, access: HashMap<String, bool>) -> Self {
        self.system_access = Some(access);
        self
    }

    /// Assign an explicit per-subsystem role map.
    #[must_use]
    pub fn with_system_roles(mut self, roles: HashMap<String, String>) -> Self {
        self.system_roles = Some(roles);
        self
    }

    /// Set the superuser/staff flags.
    #[must_use]
    pub fn with_flags(mut self, is_superuser: bool, is_staff: bool) -> Self {
        self.is_superuser = is_superuser;
        self.is_staff = is_staff;
        self
    }

    /// Access map with the baseline applied.
    ///
    /// Falls back to [`default_system_access`] when no map was granted, and
    /// inserts hub access when an explicit map omits it; an explicit hub
    /// entry set by an administrator is left alone. Pure read-time
    /// resolution; the principal record itself is never modified.
    #[must_use]
    pub fn resolved_system_access(&self) -> HashMap<String, bool> {
        let mut access = self
            .system_access
            .clone()
            .unwrap_or_else(default_system_access);
        access.entry(HUB_SUBSYSTEM.to_string()).or_insert(true);
        access
    }

    /// Role map with the baseline applied when none was assigned.
    #[must_use]
    pub fn resolved_system_roles(&self) -> HashMap<String, String> {
        self.system_roles
            .clone()
            .unwrap_or_else(default_system_roles)
    }
}

/// Baseline access map granted to every principal: the hub itself.
#[must_use]
pub fn default_system_access() -> HashMap<String, bool> {
    HashMap::from([(HUB_SUBSYSTEM.to_string(), true)])
}

/// Baseline role map: viewer on the hub.
#[must_use]
pub fn default_system_roles() -> HashMap<String, String> {
    HashMap::from([(
        HUB_SUBSYSTEM.to_string(),
        DEFAULT_SUBSYSTEM_ROLE.to_string(),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_strings() {
        assert_eq!(Role::SuperAdmin.as_str(), "super_admin");
        assert_eq!(Role::AcademicService.as_str(), "academic_service");
        assert_eq!(
            serde_json::to_string(&Role::StaffAdmin).unwrap(),
            "\"staff_admin\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"read_only\"").unwrap(),
            Role::ReadOnly
        );
    }

    #[test]
    fn test_resolved_access_defaults_to_baseline() {
        let principal = Principal::new(1, "somchai");
        let access = principal.resolved_system_access();
        assert_eq!(access.get(HUB_SUBSYSTEM), Some(&true));
        assert_eq!(access.len(), 1);
    }

    #[test]
    fn test_resolved_access_keeps_explicit_grants() {
        let principal = Principal::new(1, "somchai")
            .with_system_access(HashMap::from([("aims".to_string(), true)]));
        let access = principal.resolved_system_access();
        assert_eq!(access.get("aims"), Some(&true));
        // Hub stays readable even when the explicit map omits it.
        assert_eq!(access.get(HUB_SUBSYSTEM), Some(&true));
    }

    #[test]
    fn test_resolved_access_respects_explicit_hub_override() {
        let principal = Principal::new(1, "somchai").with_system_access(HashMap::from([
            ("aims".to_string(), true),
            (HUB_SUBSYSTEM.to_string(), false),
        ]));
        let access = principal.resolved_system_access();
        assert_eq!(access.get(HUB_SUBSYSTEM), Some(&false));
    }

    #[test]
    fn test_resolution_does_not_mutate_principal() {
        let principal = Principal::new(1, "somchai");
        let _ = principal.resolved_system_access();
        let _ = principal.resolved_system_roles();
        assert!(principal.system_access.is_none());
        assert!(principal.system_roles.is_none());
    }
}
