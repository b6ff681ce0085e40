//! # Atrium Authorization
//!
//! This crate provides permission resolution and authorization checks
//! for the Atrium HR platform, on top of the `atrium-rbac` model and the
//! `atrium-audit` pipeline.
//!
//! ## Overview
//!
//! The atrium-authz crate handles:
//! - **Resolution**: user → assigned roles → effective concrete
//!   permission set, via a pluggable [`RoleStore`]
//! - **Caching**: per-user resolutions and memoized decisions,
//!   invalidated explicitly on role change or logout
//! - **Checks**: the audited allow/deny decision (exact match, then
//!   wildcard match, then deny), a synchronous cache-only variant, and
//!   a batch form
//! - **Guard layer**: per-user snapshot adapters for render paths
//!
//! ## Architecture
//!
//! ```text
//! RoleCatalog + PermissionCatalog
//!          │
//!          ▼
//!   PermissionResolver ──→ PermissionCache (per user)
//!          │                      │
//!          ▼                      ▼
//!    AuthzService::check    check_cached / PermissionGuard (sync)
//!          │
//!          ▼
//!     AuditEmitter ──→ AuditSink
//! ```
//!
//! The guard layer consumes only the cached per-user set; it never
//! touches the catalogs or the role store directly.
//!
//! ## Fail-closed contract
//!
//! There is no fail-open mode. A user with no roles is denied
//! everything; an internal failure denies with reason `system_error`;
//! the synchronous path answers `false` until a resolution is cached.
//! [`AuthzService::check`] always returns a decision, never an error.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use atrium_audit::{AuditEmitter, MemoryAuditSink};
//! use atrium_authz::{AuthzService, MemoryRoleStore, PermissionContext, PermissionResolver};
//! use atrium_rbac::{Action, PermissionCatalog, Resource};
//!
//! # async fn example() {
//! let store = Arc::new(MemoryRoleStore::builtin());
//! let user_id = Uuid::now_v7();
//! store.assign(user_id, "hr_manager").unwrap();
//!
//! let service = AuthzService::new(
//!     PermissionResolver::new(store, Arc::new(PermissionCatalog::builtin())),
//!     Arc::new(AuditEmitter::new(Arc::new(MemoryAuditSink::new()))),
//! );
//!
//! let ctx = PermissionContext::new(user_id, Resource::LeaveRequests, Action::Approve);
//! assert!(service.check(&ctx).await.is_allowed());
//! # }
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod guard;
pub mod resolver;
pub mod service;
pub mod store;

// Re-export main types for convenience
pub use cache::PermissionCache;
pub use context::PermissionContext;
pub use error::{AuthzError, AuthzResult};
pub use guard::PermissionGuard;
pub use resolver::{PermissionResolver, ResolvedPermissions};
pub use service::{AccessOutcome, AuthzService};
pub use store::{MemoryRoleStore, RoleStore};
