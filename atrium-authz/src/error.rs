//! Error types for authorization operations
//!
//! Only collaborator connectivity failures surface as errors, and only
//! from the resolver's direct API. The check path catches everything and
//! denies; the synchronous cache-only path cannot fail at all.

use thiserror::Error;

/// Authorization error types.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The role store could not be reached or failed internally.
    ///
    /// Unknown users are NOT this error — they resolve to an empty role
    /// set. This variant is reserved for connectivity-class failures.
    #[error("role store error: {0}")]
    RoleStore(String),

    /// A catalog lookup or construction failed
    #[error("catalog error: {0}")]
    Catalog(#[from] atrium_rbac::CatalogError),

    /// The audit pipeline reported a failure
    #[error(transparent)]
    Audit(#[from] atrium_audit::AuditError),
}

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;
