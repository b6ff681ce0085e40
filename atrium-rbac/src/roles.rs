//! # Roles
//!
//! Role records and the [`RoleCatalog`].
//!
//! Roles are data, not code: the HR application creates and edits them
//! through a management workflow outside this crate. This core only ever
//! reads a role's grant list at resolution time. System roles are
//! additionally immutable by convention — the mutation API above this
//! crate refuses to edit them, and nothing in this crate mutates a
//! registered role.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, RbacResult};
use crate::key::{KeyPattern, PermissionKey};

/// A role: a named, ordered set of permission grants.
///
/// Each grant is a [`KeyPattern`] — an exact `<resource>.<action>` key or
/// one of the wildcard forms (`resource.*`, `*.action`, `*.*`).
///
/// `hierarchy_level` orders roles for display (lower = more privileged)
/// and is never consulted by authorization: a level-2 role holds exactly
/// the grants in its list, nothing inherited.
///
/// # Example
///
/// ```
/// use atrium_rbac::roles::Role;
///
/// let role = Role::new("leave_approver", "Leave Approver")
///     .with_description("Reviews and approves leave requests")
///     .with_permissions(&["leave_requests.read", "leave_requests.approve"])
///     .unwrap();
/// assert_eq!(role.permissions.len(), 2);
/// assert!(!role.is_system_role);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Stable role id (slug).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display description.
    #[serde(default)]
    pub description: String,

    /// Ordered, deduplicated grant list.
    pub permissions: Vec<KeyPattern>,

    /// Display/sort ordering; lower = more privileged.
    ///
    /// Never used for authorization decisions.
    #[serde(default)]
    pub hierarchy_level: i32,

    /// System roles cannot be deleted or edited by the management API.
    #[serde(default)]
    pub is_system_role: bool,

    /// Informational member count; not authoritative.
    #[serde(default)]
    pub user_count: u64,
}

impl Role {
    /// Create a new role with an empty grant list.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            permissions: Vec::new(),
            hierarchy_level: 0,
            is_system_role: false,
            user_count: 0,
        }
    }

    /// Set the display description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the grant list from key strings, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`KeyError`](crate::error::KeyError) if any
    /// entry is malformed — a role with an unparseable grant is a data
    /// bug, not something to skip over.
    pub fn with_permissions(mut self, keys: &[&str]) -> RbacResult<Self> {
        for key in keys {
            let pattern: KeyPattern = key.parse().map_err(CatalogError::Key)?;
            self.add_permission(pattern);
        }
        Ok(self)
    }

    /// Set the hierarchy level.
    pub fn with_hierarchy_level(mut self, level: i32) -> Self {
        self.hierarchy_level = level;
        self
    }

    /// Mark this role as a system role.
    pub fn system(mut self) -> Self {
        self.is_system_role = true;
        self
    }

    /// Add a grant, ignoring duplicates.
    pub fn add_permission(&mut self, pattern: KeyPattern) {
        if !self.permissions.contains(&pattern) {
            self.permissions.push(pattern);
        }
    }

    /// Remove a grant.
    pub fn remove_permission(&mut self, pattern: &KeyPattern) {
        self.permissions.retain(|p| p != pattern);
    }

    /// Check whether any grant in this role matches the given key.
    pub fn grants(&self, key: &PermissionKey) -> bool {
        self.permissions.iter().any(|pattern| pattern.matches(key))
    }
}

/// All roles known to the system, with lookup by id.
///
/// Like the permission catalog, this is a read-only view: role mutation
/// happens in the management workflow above this crate, which replaces
/// the catalog when assignments change.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    /// Ordered role list, as supplied at construction.
    roles: Vec<Role>,
    /// Role id → position in `roles`.
    index: HashMap<String, usize>,
}

impl RoleCatalog {
    /// Build a catalog from an ordered role list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateRole`] if two roles share an id.
    pub fn new(roles: Vec<Role>) -> RbacResult<Self> {
        let mut index = HashMap::with_capacity(roles.len());
        for (position, role) in roles.iter().enumerate() {
            if index.insert(role.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateRole(role.id.clone()));
            }
        }
        Ok(Self { roles, index })
    }

    /// The built-in Atrium HR role set.
    ///
    /// Ships the default system roles a fresh deployment starts with.
    /// Together they exercise every grant form: exact keys, `resource.*`,
    /// `*.action`, and `*.*`.
    pub fn builtin() -> Self {
        let roles = vec![
            Role::new("super_admin", "Super Admin")
                .with_description("Unrestricted access to every module")
                .with_permissions(&["*.*"])
                .expect("builtin role keys parse")
                .with_hierarchy_level(0)
                .system(),
            Role::new("hr_admin", "HR Admin")
                .with_description("Full control of HR modules, read-only access control")
                .with_permissions(&[
                    "employees.*",
                    "payroll.*",
                    "leave_requests.*",
                    "offboarding.*",
                    "policies.*",
                    "workflows.*",
                    "training.*",
                    "documents.*",
                    "reports.*",
                    "dashboard.read",
                    "notifications.*",
                    "user_permissions.read",
                ])
                .expect("builtin role keys parse")
                .with_hierarchy_level(1)
                .system(),
            Role::new("hr_manager", "HR Manager")
                .with_description("Day-to-day people management without payroll control")
                .with_permissions(&[
                    "employees.read",
                    "employees.update",
                    "leave_requests.*",
                    "offboarding.read",
                    "offboarding.create",
                    "training.*",
                    "documents.read",
                    "reports.read",
                    "dashboard.read",
                ])
                .expect("builtin role keys parse")
                .with_hierarchy_level(2)
                .system(),
            Role::new("auditor", "Auditor")
                .with_description("Read-only view of every module plus audit export")
                .with_permissions(&["*.read", "audit_logs.export"])
                .expect("builtin role keys parse")
                .with_hierarchy_level(3)
                .system(),
            Role::new("employee", "Employee")
                .with_description("Self-service access")
                .with_permissions(&[
                    "dashboard.read",
                    "leave_requests.read",
                    "leave_requests.create",
                    "training.read",
                    "documents.read",
                    "policies.read",
                    "notifications.read",
                ])
                .expect("builtin role keys parse")
                .with_hierarchy_level(4)
                .system(),
        ];

        Self::new(roles).expect("builtin roles have unique ids")
    }

    /// All roles, in catalog order.
    pub fn all(&self) -> &[Role] {
        &self.roles
    }

    /// Look up a role by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::RoleNotFound`] for unknown ids.
    pub fn get(&self, id: &str) -> RbacResult<&Role> {
        self.index
            .get(id)
            .map(|&position| &self.roles[position])
            .ok_or_else(|| CatalogError::RoleNotFound(id.to_string()))
    }

    /// System roles only.
    pub fn system_roles(&self) -> Vec<&Role> {
        self.roles.iter().filter(|r| r.is_system_role).collect()
    }

    /// Custom (non-system) roles only.
    pub fn custom_roles(&self) -> Vec<&Role> {
        self.roles.iter().filter(|r| !r.is_system_role).collect()
    }

    /// Number of roles in the catalog.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
