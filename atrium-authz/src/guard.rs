//! Client-facing guard layer
//!
//! Presentation code asks "can the current user do X" on every render;
//! it cannot afford I/O there. A [`PermissionGuard`] holds one user's
//! pre-fetched permission snapshot and answers synchronously from it,
//! while still offering the full audited check for actions that matter.
//!
//! Loading contract: until [`load`](PermissionGuard::load) has succeeded
//! once, every synchronous answer is `false` and
//! [`is_loading`](PermissionGuard::is_loading) is `true`, so callers can
//! tell "denied" from "not yet known".

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use atrium_rbac::{Action, PermissionKey, Resource};

use crate::context::PermissionContext;
use crate::error::AuthzResult;
use crate::resolver::ResolvedPermissions;
use crate::service::AuthzService;

/// Per-user adapter for conditional rendering.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use atrium_authz::PermissionGuard;
/// use atrium_rbac::{Action, Resource};
///
/// # async fn example(service: Arc<atrium_authz::AuthzService>) {
/// let guard = PermissionGuard::new(service, Uuid::now_v7());
/// assert!(guard.is_loading());
///
/// guard.load().await.unwrap();
/// if guard.has_permission(Resource::Payroll, Action::Read) {
///     // render the payroll tab
/// }
/// # }
/// ```
pub struct PermissionGuard {
    /// The engine, for loads and full checks.
    service: Arc<AuthzService>,
    /// The user this guard renders for.
    user_id: Uuid,
    /// Pre-fetched snapshot; `None` until the first successful load.
    snapshot: RwLock<Option<Arc<ResolvedPermissions>>>,
}

impl std::fmt::Debug for PermissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGuard")
            .field("user_id", &self.user_id)
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl PermissionGuard {
    /// Create a guard for a user. No I/O happens until `load`.
    pub fn new(service: Arc<AuthzService>, user_id: Uuid) -> Self {
        Self {
            service,
            user_id,
            snapshot: RwLock::new(None),
        }
    }

    /// The user this guard belongs to.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Fetch (or refresh) the permission snapshot.
    ///
    /// Goes through the resolver's cache, so a refresh after
    /// invalidation picks up role changes. On failure the previous
    /// snapshot, if any, stays in place.
    pub async fn load(&self) -> AuthzResult<()> {
        let resolved = self.service.resolver().resolve(self.user_id).await?;
        *self.snapshot.write() = Some(resolved);
        Ok(())
    }

    /// `true` until the first successful `load`.
    pub fn is_loading(&self) -> bool {
        self.snapshot.read().is_none()
    }

    /// Synchronous permission predicate against the snapshot.
    ///
    /// Honors wildcards (the snapshot keeps the raw grants), performs no
    /// I/O, records no audit entry, and returns `false` while loading.
    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        let key = PermissionKey::new(resource, action);
        match self.snapshot.read().as_ref() {
            Some(resolved) => resolved.evaluate(&key).0,
            None => false,
        }
    }

    /// Full audited check through the engine.
    ///
    /// Use for actions, not rendering: resolver (cached) plus exactly
    /// one audit entry.
    pub async fn check_permission(
        &self,
        resource: Resource,
        action: Action,
        resource_id: Option<&str>,
    ) -> bool {
        let mut ctx = PermissionContext::new(self.user_id, resource, action);
        if let Some(resource_id) = resource_id {
            ctx = ctx.with_resource_id(resource_id);
        }
        self.service.check(&ctx).await.is_allowed()
    }

    /// `true` if the snapshot holds at least one of the given keys.
    ///
    /// Reduces over the already-concrete expanded set; wildcards were
    /// expanded at resolution time, so no pattern matching happens here.
    pub fn has_any(&self, keys: &[PermissionKey]) -> bool {
        match self.snapshot.read().as_ref() {
            Some(resolved) => keys.iter().any(|key| resolved.has_exact(key)),
            None => false,
        }
    }

    /// `true` if the snapshot holds every one of the given keys.
    ///
    /// Returns `false` while loading, even for an empty list — an
    /// unknown permission set satisfies nothing.
    pub fn has_all(&self, keys: &[PermissionKey]) -> bool {
        match self.snapshot.read().as_ref() {
            Some(resolved) => keys.iter().all(|key| resolved.has_exact(key)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PermissionResolver;
    use crate::store::MemoryRoleStore;
    use atrium_audit::{AuditEmitter, MemoryAuditSink};
    use atrium_rbac::PermissionCatalog;

    fn guard_for(role: &str) -> (PermissionGuard, Arc<MemoryRoleStore>, Arc<MemoryAuditSink>) {
        let store = Arc::new(MemoryRoleStore::builtin());
        let sink = Arc::new(MemoryAuditSink::new());
        let resolver = PermissionResolver::new(
            store.clone(),
            Arc::new(PermissionCatalog::builtin()),
        );
        let service = Arc::new(AuthzService::new(
            resolver,
            Arc::new(AuditEmitter::new(sink.clone())),
        ));

        let user = Uuid::now_v7();
        store.assign(user, role).unwrap();
        (PermissionGuard::new(service, user), store, sink)
    }

    fn keys(raw: &[&str]) -> Vec<PermissionKey> {
        raw.iter().map(|k| k.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_loading_state_fails_closed() {
        let (guard, _store, _sink) = guard_for("super_admin");

        assert!(guard.is_loading());
        assert!(!guard.has_permission(Resource::Dashboard, Action::Read));
        assert!(!guard.has_any(&keys(&["dashboard.read"])));
        assert!(!guard.has_all(&[]));

        guard.load().await.unwrap();
        assert!(!guard.is_loading());
        assert!(guard.has_permission(Resource::Dashboard, Action::Read));
    }

    #[tokio::test]
    async fn test_sync_predicate_honors_wildcards() {
        let (guard, _store, sink) = guard_for("hr_admin");
        guard.load().await.unwrap();

        // employees.* in the role; employees.delete only via wildcard.
        assert!(guard.has_permission(Resource::Employees, Action::Delete));
        assert!(!guard.has_permission(Resource::Settings, Action::ManageSettings));

        // The sync path never audits.
        assert!(sink.entries().is_empty());
    }

    #[tokio::test]
    async fn test_has_any_and_has_all() {
        let (guard, _store, _sink) = guard_for("employee");
        guard.load().await.unwrap();

        assert!(guard.has_any(&keys(&["payroll.read", "leave_requests.create"])));
        assert!(!guard.has_any(&keys(&["payroll.read", "payroll.update"])));

        assert!(guard.has_all(&keys(&["dashboard.read", "training.read"])));
        assert!(!guard.has_all(&keys(&["dashboard.read", "payroll.read"])));
    }

    #[tokio::test]
    async fn test_has_all_uses_expanded_wildcards() {
        let (guard, _store, _sink) = guard_for("auditor");
        guard.load().await.unwrap();

        // *.read expanded to concrete keys at resolution time.
        assert!(guard.has_all(&keys(&["employees.read", "payroll.read", "reports.read"])));
        assert!(!guard.has_all(&keys(&["employees.read", "employees.update"])));
    }

    #[tokio::test]
    async fn test_check_permission_audits() {
        let (guard, _store, sink) = guard_for("employee");
        guard.load().await.unwrap();

        assert!(
            guard
                .check_permission(Resource::LeaveRequests, Action::Create, Some("lr-33"))
                .await
        );
        guard.service.emitter().flush().await.unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resource_id.as_deref(), Some("lr-33"));
    }

    #[tokio::test]
    async fn test_reload_after_invalidation_picks_up_role_change() {
        let (guard, store, _sink) = guard_for("employee");
        guard.load().await.unwrap();
        assert!(!guard.has_permission(Resource::Payroll, Action::Read));

        let user = guard.user_id();
        store.assign(user, "auditor").unwrap();
        guard.service.invalidate_user(user);
        guard.load().await.unwrap();

        assert!(guard.has_permission(Resource::Payroll, Action::Read));
    }
}
