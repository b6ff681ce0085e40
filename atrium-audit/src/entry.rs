//! Audit entry types
//!
//! This module defines the record written for every authorization
//! decision: the decision itself, the reason it was reached, and the
//! envelope carrying request context into the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use atrium_rbac::{Action, PermissionKey, Resource};

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Access was granted.
    Allowed,
    /// Access was refused.
    Denied,
}

impl Decision {
    /// Get the string representation of the decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::Denied => "denied",
        }
    }

    /// Check if the decision grants access.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Why an authorization check reached its decision.
///
/// Every decision has a traceable reason; a check may never allow
/// without one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// The resolved permission set contains the exact key.
    DirectPermission,
    /// A wildcard grant (`resource.*`, `*.action`, `*.*`) matched.
    WildcardPermission,
    /// Neither an exact nor a wildcard match was found.
    PermissionNotFound,
    /// An internal failure forced a deny.
    SystemError,
}

impl AccessReason {
    /// Get the string representation of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessReason::DirectPermission => "direct_permission",
            AccessReason::WildcardPermission => "wildcard_permission",
            AccessReason::PermissionNotFound => "permission_not_found",
            AccessReason::SystemError => "system_error",
        }
    }
}

/// One record in the authorization audit trail.
///
/// Entries are append-only: created when a check runs, buffered by the
/// [`AuditEmitter`](crate::emitter::AuditEmitter), and flushed in batches
/// to a durable sink. Nothing updates or deletes an entry.
///
/// The `context` map is carried through opaquely — the engine never
/// interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id.
    pub id: Uuid,

    /// The user the check was performed for.
    pub user_id: Uuid,

    /// Organization context, passed through opaquely.
    pub org_id: Option<Uuid>,

    /// The resource that was checked.
    pub resource: Resource,

    /// The action that was checked.
    pub action: Action,

    /// Specific resource instance, when the caller supplied one.
    pub resource_id: Option<String>,

    /// The decision that was returned to the caller.
    pub decision: Decision,

    /// Why the decision was reached.
    pub reason: Option<AccessReason>,

    /// Opaque key-value context from the caller.
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,

    /// When the check ran.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new audit entry for a decision.
    pub fn new(user_id: Uuid, resource: Resource, action: Action, decision: Decision) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            org_id: None,
            resource,
            action,
            resource_id: None,
            decision,
            reason: None,
            context: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set the decision reason.
    pub fn with_reason(mut self, reason: AccessReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Set the organization context.
    pub fn with_org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    /// Set the specific resource instance.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Add a context value.
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// The permission key this entry records a check for.
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.resource, self.action)
    }
}
