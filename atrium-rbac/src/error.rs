//! Error types for the RBAC model
//!
//! This module defines the errors produced when parsing permission keys
//! and constructing catalogs.

use thiserror::Error;

/// Errors produced when parsing a permission key or pattern.
///
/// The original key format is `<resource>.<action>`; every deviation has
/// a distinct variant so callers can report exactly what was wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key has no `.` separator
    #[error("permission key `{0}` is missing the `.` separator")]
    MissingSeparator(String),

    /// The resource segment is not a known resource
    #[error("unknown resource `{0}` in permission key")]
    UnknownResource(String),

    /// The action segment is not a known action
    #[error("unknown action `{0}` in permission key")]
    UnknownAction(String),

    /// A wildcard token appeared where a concrete key is required
    #[error("wildcard token in concrete permission key `{0}`")]
    UnexpectedWildcard(String),
}

/// Errors produced when building or querying a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two catalog entries share the same permission key
    #[error("duplicate permission `{0}` in catalog")]
    DuplicatePermission(String),

    /// Two catalog entries share the same role id
    #[error("duplicate role `{0}` in catalog")]
    DuplicateRole(String),

    /// Lookup by role id found nothing
    #[error("role `{0}` not found")]
    RoleNotFound(String),

    /// A backing source failed to produce the catalog.
    ///
    /// A fetch failure must surface to the caller; a catalog is never
    /// silently empty.
    #[error("failed to load catalog: {0}")]
    LoadFailed(String),

    /// A catalog entry's key failed to parse
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Result type for catalog operations.
pub type RbacResult<T> = Result<T, CatalogError>;
