//! User directory contract.
//!
//! The hub authenticates against an external LDAP-backed directory; this
//! trait is the authority's view of it. Refresh re-resolves principals
//! through it so a refreshed token always reflects the directory's current
//! authorization state.

use crate::principal::Principal;
use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

/// Directory lookup trait with native async methods.
pub trait UserDirectory: Send + Sync {
    /// Check credentials and return the resolved principal on success.
    /// The directory's own retry and error behavior is opaque to the
    /// authority; a failed check is simply `None`.
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Option<Principal>> + Send;

    /// Resolve a principal by its stable identifier.
    fn find_by_id(&self, user_id: i64) -> impl Future<Output = Option<Principal>> + Send;
}

/// In-memory directory for tests and development.
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<i64, (String, Principal)>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a principal with its password. Replaces any previous
    /// record with the same id.
    pub fn insert(&self, principal: Principal, password: impl Into<String>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner());
        entries.insert(principal.user_id, (password.into(), principal));
    }

    /// Update the stored principal in place, keeping its password.
    /// Returns false when no record exists for the id.
    pub fn update(&self, principal: Principal) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(&principal.user_id) {
            Some((_, stored)) => {
                *stored = principal;
                true
            }
            None => false,
        }
    }

    /// Remove a principal record.
    pub fn remove(&self, user_id: i64) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner());
        entries.remove(&user_id);
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for InMemoryDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner());
        entries.values().find_map(|(stored_password, principal)| {
            (principal.username == username && stored_password == password)
                .then(|| principal.clone())
        })
    }

    async fn find_by_id(&self, user_id: i64) -> Option<Principal> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner());
        entries.get(&user_id).map(|(_, principal)| principal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;

    fn sample() -> Principal {
        Principal::new(7, "somchai")
            .with_email("somchai@npu.ac.th")
            .with_role(Role::AcademicService)
    }

    #[tokio::test]
    async fn test_authenticate_checks_password() {
        let directory = InMemoryDirectory::new();
        directory.insert(sample(), "correct horse");

        let found = directory.authenticate("somchai", "correct horse").await;
        assert_eq!(found.map(|p| p.user_id), Some(7));

        assert!(directory.authenticate("somchai", "wrong").await.is_none());
        assert!(directory.authenticate("nobody", "correct horse").await.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_password() {
        let directory = InMemoryDirectory::new();
        directory.insert(sample(), "pw");

        let updated = sample().with_role(Role::StaffAdmin);
        assert!(directory.update(updated));

        let found = directory.authenticate("somchai", "pw").await.unwrap();
        assert_eq!(found.role, Role::StaffAdmin);
    }

    #[test]
    fn test_find_by_id_after_remove() {
        let directory = InMemoryDirectory::new();
        directory.insert(sample(), "pw");
        assert!(tokio_test::block_on(directory.find_by_id(7)).is_some());

        directory.remove(7);
        assert!(tokio_test::block_on(directory.find_by_id(7)).is_none());
    }
}
