//! # Atrium RBAC (Role-Based Access Control)
//!
//! This crate provides the RBAC data model for the Atrium HR platform:
//! the permission catalog, role records, and the key/pattern types the
//! authorization engine matches against.
//!
//! ## Overview
//!
//! The atrium-rbac crate handles:
//! - **Resources**: All resource types across the HR modules
//! - **Actions**: Operations that can be performed on resources
//! - **Permission Keys**: Canonical `<resource>.<action>` identifiers
//!   with an explicit, fallible parser
//! - **Key Patterns**: Role grant entries, including the wildcard forms
//! - **Catalogs**: The immutable permission catalog and the role catalog
//!
//! ## Architecture
//!
//! ```text
//! PermissionKey = Resource + Action          ("employees.read")
//! KeyPattern    = Exact | resource.* | *.action | *.*
//!
//! PermissionCatalog: every concrete permission the system recognizes
//! RoleCatalog:       roles, each an ordered list of KeyPatterns
//! ```
//!
//! Wildcards exist only inside role grant lists. The permission catalog
//! is always concrete — `PermissionKey` cannot represent `*`, so that
//! invariant holds by construction.
//!
//! ## Usage
//!
//! ```rust
//! use atrium_rbac::{Action, KeyPattern, PermissionCatalog, PermissionKey, Resource, Role};
//!
//! // Parse keys and patterns
//! let key: PermissionKey = "employees.read".parse().unwrap();
//! let pattern: KeyPattern = "employees.*".parse().unwrap();
//! assert!(pattern.matches(&key));
//!
//! // Look up catalog metadata
//! let catalog = PermissionCatalog::builtin();
//! let perm = catalog.get(&key).unwrap();
//! assert_eq!(perm.id(), "employees.read");
//!
//! // Build a role
//! let role = Role::new("leave_approver", "Leave Approver")
//!     .with_permissions(&["leave_requests.read", "leave_requests.approve"])
//!     .unwrap();
//! assert!(role.grants(&PermissionKey::new(Resource::LeaveRequests, Action::Approve)));
//! ```
//!
//! ## Integration
//!
//! This crate is consumed by:
//! - `atrium-authz`: permission resolution and authorization checks
//! - `atrium-audit`: audit entries record the checked resource/action

pub mod actions;
pub mod error;
pub mod key;
pub mod permissions;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::Action;
pub use error::{CatalogError, KeyError, RbacResult};
pub use key::{KeyPattern, PermissionKey, WILDCARD};
pub use permissions::{Permission, PermissionCatalog};
pub use resources::Resource;
pub use roles::{Role, RoleCatalog};
