//! Role store abstraction
//!
//! User→role assignments live in the application's backing data store;
//! this module defines the lookup seam the resolver calls and an
//! in-memory implementation for single-process use and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use uuid::Uuid;

use atrium_rbac::{Role, RoleCatalog};

use crate::error::{AuthzError, AuthzResult};

/// External lookup for the roles currently assigned to a user.
///
/// An unknown user id is `Ok(vec![])`, never an error — authorization
/// fails closed on an empty set. `Err` is reserved for connectivity-class
/// failures (store unreachable, query failed).
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Roles currently assigned to the user, in assignment order.
    async fn roles_for_user(&self, user_id: Uuid) -> AuthzResult<Vec<Role>>;
}

/// In-memory role store backed by a [`RoleCatalog`].
///
/// Suitable for tests and single-process applications. Tracks how many
/// lookups it has served so tests can observe cache invalidation
/// triggering re-resolution, and can be switched into a failing mode to
/// exercise the deny-on-system-error path.
#[derive(Debug)]
pub struct MemoryRoleStore {
    /// Role definitions.
    catalog: RoleCatalog,
    /// user id → assigned role ids, in assignment order.
    assignments: RwLock<HashMap<Uuid, Vec<String>>>,
    /// Lookups served.
    lookups: AtomicU64,
    /// When set, every lookup fails.
    failing: AtomicBool,
}

impl MemoryRoleStore {
    /// Create a store over the given role catalog with no assignments.
    pub fn new(catalog: RoleCatalog) -> Self {
        Self {
            catalog,
            assignments: RwLock::new(HashMap::new()),
            lookups: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Create a store over the built-in Atrium role set.
    pub fn builtin() -> Self {
        Self::new(RoleCatalog::builtin())
    }

    /// The backing role catalog.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Assign a role to a user.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::RoleNotFound`](atrium_rbac::CatalogError)
    /// if the role id is not in the catalog.
    pub fn assign(&self, user_id: Uuid, role_id: &str) -> AuthzResult<()> {
        self.catalog.get(role_id)?;
        let mut assignments = self.assignments.write();
        let roles = assignments.entry(user_id).or_default();
        if !roles.iter().any(|r| r == role_id) {
            roles.push(role_id.to_string());
        }
        Ok(())
    }

    /// Remove a role assignment.
    pub fn revoke(&self, user_id: Uuid, role_id: &str) {
        if let Some(roles) = self.assignments.write().get_mut(&user_id) {
            roles.retain(|r| r != role_id);
        }
    }

    /// Remove every assignment for a user.
    pub fn clear_assignments(&self, user_id: Uuid) {
        self.assignments.write().remove(&user_id);
    }

    /// Number of lookups served.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Switch induced failure on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn roles_for_user(&self, user_id: Uuid) -> AuthzResult<Vec<Role>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(AuthzError::RoleStore("induced failure".to_string()));
        }

        let assignments = self.assignments.read();
        let Some(role_ids) = assignments.get(&user_id) else {
            return Ok(Vec::new());
        };

        // Assignments pointing at roles removed from the catalog are the
        // management workflow's cleanup problem; here they grant nothing.
        Ok(role_ids
            .iter()
            .filter_map(|id| self.catalog.get(id).ok())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_is_empty_not_error() {
        let store = MemoryRoleStore::builtin();
        let roles = store.roles_for_user(Uuid::now_v7()).await.unwrap();
        assert!(roles.is_empty());
    }

    #[tokio::test]
    async fn test_assign_and_lookup() {
        let store = MemoryRoleStore::builtin();
        let user = Uuid::now_v7();

        store.assign(user, "employee").unwrap();
        store.assign(user, "hr_manager").unwrap();
        // Duplicate assignment is a no-op
        store.assign(user, "employee").unwrap();

        let roles = store.roles_for_user(user).await.unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].id, "employee");
        assert_eq!(roles[1].id, "hr_manager");
    }

    #[tokio::test]
    async fn test_assign_unknown_role_fails() {
        let store = MemoryRoleStore::builtin();
        assert!(store.assign(Uuid::now_v7(), "astronaut").is_err());
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = MemoryRoleStore::builtin();
        let user = Uuid::now_v7();

        store.assign(user, "employee").unwrap();
        store.revoke(user, "employee");
        assert!(store.roles_for_user(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_counter_and_failure() {
        let store = MemoryRoleStore::builtin();
        let user = Uuid::now_v7();

        store.roles_for_user(user).await.unwrap();
        store.set_failing(true);
        assert!(store.roles_for_user(user).await.is_err());
        assert_eq!(store.lookups(), 2);
    }
}
