//! # Permissions
//!
//! Permission metadata records and the immutable [`PermissionCatalog`].
//!
//! A permission is the unit the authorization engine reasons about:
//! one concrete `<resource>.<action>` key plus the display metadata the
//! application shows when administering roles. The catalog is the closed
//! list of every permission the system recognizes; it is built once and
//! never mutated in place (updates replace the catalog wholesale).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::{CatalogError, RbacResult};
use crate::key::PermissionKey;
use crate::resources::Resource;

/// A permission known to the system.
///
/// The canonical id is always `<resource>.<action>` — it is derived from
/// the typed fields rather than stored, so the invariant cannot drift.
/// Wildcard entries do not exist here; they live only in role grant
/// lists as [`KeyPattern`](crate::key::KeyPattern)s.
///
/// # Example
///
/// ```
/// use atrium_rbac::permissions::Permission;
/// use atrium_rbac::resources::Resource;
/// use atrium_rbac::actions::Action;
///
/// let perm = Permission::new(Resource::Payroll, Action::Approve, "Approve payroll runs")
///     .with_category("Payroll")
///     .sensitive();
/// assert_eq!(perm.id(), "payroll.approve");
/// assert!(perm.is_sensitive);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// The resource this permission applies to.
    pub resource: Resource,

    /// The action allowed on the resource.
    pub action: Action,

    /// Short display name.
    pub name: String,

    /// Longer display description.
    #[serde(default)]
    pub description: String,

    /// Free-form grouping label for UI organization.
    ///
    /// Never consulted by authorization logic.
    pub category: String,

    /// Whether this permission guards sensitive data.
    ///
    /// Informational only: it drives stricter audit detail, not a
    /// separate authorization path.
    #[serde(default)]
    pub is_sensitive: bool,
}

impl Permission {
    /// Create a new permission.
    ///
    /// The category defaults to the resource's display name; override
    /// with [`with_category`](Self::with_category).
    pub fn new(resource: Resource, action: Action, name: impl Into<String>) -> Self {
        Self {
            resource,
            action,
            name: name.into(),
            description: String::new(),
            category: resource.display_name().to_string(),
            is_sensitive: false,
        }
    }

    /// Set the display description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the grouping category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Mark this permission as guarding sensitive data.
    pub fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }

    /// The typed key for this permission.
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.resource, self.action)
    }

    /// The canonical string id, `<resource>.<action>`.
    pub fn id(&self) -> String {
        self.key().to_string()
    }
}

/// The immutable list of all permissions the system recognizes.
///
/// Built once at load time; there is no mutation API. A deployment that
/// changes its permission surface constructs a new catalog and swaps it
/// in wholesale.
///
/// # Example
///
/// ```
/// use atrium_rbac::permissions::PermissionCatalog;
/// use atrium_rbac::key::PermissionKey;
///
/// let catalog = PermissionCatalog::builtin();
/// let key: PermissionKey = "employees.read".parse().unwrap();
/// assert!(catalog.contains(&key));
/// ```
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    /// Ordered permission list, as supplied at construction.
    permissions: Vec<Permission>,
    /// Key → position in `permissions`.
    index: HashMap<PermissionKey, usize>,
}

impl PermissionCatalog {
    /// Build a catalog from an ordered permission list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePermission`] if two entries share
    /// a key. The caller decides whether that is a data bug or a merge
    /// conflict; the catalog never silently drops entries.
    pub fn new(permissions: Vec<Permission>) -> RbacResult<Self> {
        let mut index = HashMap::with_capacity(permissions.len());
        for (position, permission) in permissions.iter().enumerate() {
            if index.insert(permission.key(), position).is_some() {
                return Err(CatalogError::DuplicatePermission(permission.id()));
            }
        }
        Ok(Self { permissions, index })
    }

    /// The built-in Atrium HR permission catalog.
    ///
    /// One entry per operation the administration modules expose. The
    /// list is static and duplicate-free by inspection.
    pub fn builtin() -> Self {
        use Action::*;
        use Resource::*;

        fn p(resource: Resource, action: Action, name: &str) -> Permission {
            Permission::new(resource, action, name)
        }

        let permissions = vec![
            // Employee management
            p(Employees, Read, "View employees").with_category("Employee Management"),
            p(Employees, Create, "Add employees").with_category("Employee Management"),
            p(Employees, Update, "Edit employees").with_category("Employee Management"),
            p(Employees, Delete, "Remove employees").with_category("Employee Management"),
            p(Employees, Export, "Export employee data").with_category("Employee Management"),
            // Payroll
            p(Payroll, Read, "View payroll").sensitive(),
            p(Payroll, Update, "Edit payroll").sensitive(),
            p(Payroll, Approve, "Approve payroll runs").sensitive(),
            p(Payroll, Export, "Export payroll data").sensitive(),
            // Leave & absence
            p(LeaveRequests, Read, "View leave requests").with_category("Leave & Absence"),
            p(LeaveRequests, Create, "Submit leave requests").with_category("Leave & Absence"),
            p(LeaveRequests, Update, "Edit leave requests").with_category("Leave & Absence"),
            p(LeaveRequests, Delete, "Cancel leave requests").with_category("Leave & Absence"),
            p(LeaveRequests, Approve, "Approve leave requests").with_category("Leave & Absence"),
            // Offboarding
            p(Offboarding, Read, "View offboarding cases"),
            p(Offboarding, Create, "Start offboarding"),
            p(Offboarding, Update, "Edit offboarding checklists"),
            p(Offboarding, Approve, "Approve offboarding completion"),
            // Policies
            p(Policies, Read, "View policies"),
            p(Policies, Create, "Create policies"),
            p(Policies, Update, "Edit policies"),
            p(Policies, Delete, "Retire policies"),
            // Workflows
            p(Workflows, Read, "View workflows"),
            p(Workflows, Create, "Create workflows"),
            p(Workflows, Update, "Edit workflows"),
            p(Workflows, Delete, "Delete workflows"),
            p(Workflows, Execute, "Run workflows"),
            // Training
            p(Training, Read, "View training courses"),
            p(Training, Create, "Create training courses"),
            p(Training, Update, "Edit training courses"),
            p(Training, Delete, "Delete training courses"),
            p(Training, Assign, "Assign training"),
            // Documents
            p(Documents, Read, "View documents"),
            p(Documents, Create, "Upload documents"),
            p(Documents, Update, "Replace documents"),
            p(Documents, Delete, "Delete documents"),
            // Reports
            p(Reports, Read, "View reports"),
            p(Reports, Create, "Build reports"),
            p(Reports, Export, "Export reports"),
            // Access control
            p(UserPermissions, Read, "View role assignments")
                .with_category("Access Control")
                .sensitive(),
            p(UserPermissions, Update, "Change role assignments")
                .with_category("Access Control")
                .sensitive(),
            p(UserPermissions, Assign, "Assign roles")
                .with_category("Access Control")
                .sensitive(),
            // Audit
            p(AuditLogs, Read, "View audit logs").sensitive(),
            p(AuditLogs, Export, "Export audit logs").sensitive(),
            // Settings
            p(Settings, Read, "View settings"),
            p(Settings, Update, "Edit settings"),
            p(Settings, ManageSettings, "Administer organization settings"),
            // Dashboard
            p(Dashboard, Read, "View dashboard"),
            // Notifications
            p(Notifications, Read, "View notifications"),
            p(Notifications, Create, "Send notifications"),
        ];

        Self::new(permissions).expect("builtin catalog is duplicate-free")
    }

    /// All permissions, in catalog order.
    pub fn all(&self) -> &[Permission] {
        &self.permissions
    }

    /// Look up a permission by its concrete key.
    pub fn get(&self, key: &PermissionKey) -> Option<&Permission> {
        self.index.get(key).map(|&position| &self.permissions[position])
    }

    /// Check whether the catalog recognizes a key.
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.index.contains_key(key)
    }

    /// Permissions grouped by category, derived from the full list.
    ///
    /// Categories are ordered by name; permissions keep catalog order
    /// within each group.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Permission>> {
        let mut grouped: BTreeMap<&str, Vec<&Permission>> = BTreeMap::new();
        for permission in &self.permissions {
            grouped
                .entry(permission.category.as_str())
                .or_default()
                .push(permission);
        }
        grouped
    }

    /// Number of permissions in the catalog.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}
