//! Permission resolution
//!
//! Turns "who is this user" into "what may they do": fetch the user's
//! assigned roles, union the grant patterns, and filter the permission
//! catalog down to the concrete permissions those grants imply. Results
//! are cached per user until explicitly invalidated.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use atrium_audit::AccessReason;
use atrium_rbac::{KeyPattern, Permission, PermissionCatalog, PermissionKey};

use crate::cache::PermissionCache;
use crate::error::AuthzResult;
use crate::store::RoleStore;

/// The effective permission set for one user.
///
/// `permissions` is the catalog filtered through the user's grants —
/// always concrete, never raw wildcard strings; a wildcard grant shows
/// up here as every catalog entry it implies. `grants` keeps the raw
/// role-level patterns so the wildcard step of a check (and the guard's
/// synchronous predicate) can run without refetching roles.
#[derive(Debug, Clone)]
pub struct ResolvedPermissions {
    /// The user this resolution belongs to.
    pub user_id: Uuid,

    /// Concrete permissions, in catalog order.
    pub permissions: Vec<Permission>,

    /// Raw grant patterns, unioned across the user's roles in role
    /// order, deduplicated.
    pub grants: Vec<KeyPattern>,

    /// When this resolution was computed.
    pub resolved_at: DateTime<Utc>,

    /// Every concrete key in `permissions`, for O(1) lookups.
    keys: HashSet<PermissionKey>,

    /// Keys granted literally (an exact grant entry that exists in the
    /// catalog), as opposed to implied by a wildcard. Decides whether an
    /// allow is reported as `direct_permission` or `wildcard_permission`.
    direct: HashSet<PermissionKey>,
}

impl ResolvedPermissions {
    pub(crate) fn new(
        user_id: Uuid,
        permissions: Vec<Permission>,
        grants: Vec<KeyPattern>,
    ) -> Self {
        let keys: HashSet<PermissionKey> = permissions.iter().map(Permission::key).collect();
        let direct = grants
            .iter()
            .filter_map(KeyPattern::as_exact)
            .filter(|key| keys.contains(key))
            .copied()
            .collect();
        Self {
            user_id,
            permissions,
            grants,
            resolved_at: Utc::now(),
            keys,
            direct,
        }
    }

    /// Check for a concrete permission in the expanded set.
    ///
    /// Wildcard grants are already expanded into `permissions`, so this
    /// is the right predicate for reducing over caller-supplied key
    /// lists (`has_any`/`has_all` in the guard).
    pub fn has_exact(&self, key: &PermissionKey) -> bool {
        self.keys.contains(key)
    }

    /// Evaluate a key against this resolution.
    ///
    /// Fixed precedence: a literal exact grant decides first
    /// (`direct_permission`), then any wildcard grant — `resource.*` and
    /// `*.action` are equally permissive, `*.*` last
    /// (`wildcard_permission`) — otherwise deny
    /// (`permission_not_found`). There is no explicit-deny concept. Pure
    /// function; no I/O, no audit.
    pub fn evaluate(&self, key: &PermissionKey) -> (bool, AccessReason) {
        if self.direct.contains(key) {
            return (true, AccessReason::DirectPermission);
        }
        if self
            .grants
            .iter()
            .any(|pattern| pattern.is_wildcard() && pattern.matches(key))
        {
            return (true, AccessReason::WildcardPermission);
        }
        (false, AccessReason::PermissionNotFound)
    }

    /// Check if the user holds no permissions at all.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.grants.is_empty()
    }
}

/// Computes and caches effective permission sets.
pub struct PermissionResolver {
    /// External user→role lookup.
    store: Arc<dyn RoleStore>,
    /// The closed permission list.
    catalog: Arc<PermissionCatalog>,
    /// Per-user resolution cache.
    cache: Arc<PermissionCache>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("catalog_len", &self.catalog.len())
            .field("cached_users", &self.cache.len())
            .finish()
    }
}

impl PermissionResolver {
    /// Create a resolver over a role store and permission catalog.
    pub fn new(store: Arc<dyn RoleStore>, catalog: Arc<PermissionCatalog>) -> Self {
        Self {
            store,
            catalog,
            cache: Arc::new(PermissionCache::new()),
        }
    }

    /// The permission catalog this resolver filters against.
    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        &self.catalog
    }

    /// The shared per-user cache.
    pub fn cache(&self) -> &Arc<PermissionCache> {
        &self.cache
    }

    /// Resolve the user's effective permissions, using the cache.
    ///
    /// A user with no assigned roles resolves to an empty set, not an
    /// error. Two concurrent resolutions for the same user may both do
    /// the work; resolution is idempotent, so last-write-wins is safe.
    ///
    /// # Errors
    ///
    /// Only [`AuthzError::RoleStore`](crate::error::AuthzError)
    /// connectivity failures propagate; the check path catches them and
    /// denies.
    pub async fn resolve(&self, user_id: Uuid) -> AuthzResult<Arc<ResolvedPermissions>> {
        if let Some(hit) = self.cache.get(user_id) {
            return Ok(hit);
        }
        self.resolve_fresh(user_id).await
    }

    /// Resolve bypassing the cache, then store the result.
    pub async fn resolve_fresh(&self, user_id: Uuid) -> AuthzResult<Arc<ResolvedPermissions>> {
        let roles = self.store.roles_for_user(user_id).await?;

        let mut grants: Vec<KeyPattern> = Vec::new();
        for role in &roles {
            for pattern in &role.permissions {
                if !grants.contains(pattern) {
                    grants.push(*pattern);
                }
            }
        }

        let permissions: Vec<Permission> = self
            .catalog
            .all()
            .iter()
            .filter(|perm| {
                let key = perm.key();
                grants.iter().any(|pattern| pattern.matches(&key))
            })
            .cloned()
            .collect();

        tracing::debug!(
            user_id = %user_id,
            roles = roles.len(),
            grants = grants.len(),
            permissions = permissions.len(),
            "resolved user permissions"
        );

        Ok(self
            .cache
            .insert(ResolvedPermissions::new(user_id, permissions, grants)))
    }

    /// Drop the cached resolution for one user.
    ///
    /// Call on role-assignment change or logout; the next check
    /// re-resolves.
    pub fn invalidate(&self, user_id: Uuid) -> bool {
        self.cache.invalidate(user_id)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
