//! Per-check input context
//!
//! This module provides the [`PermissionContext`] passed to the full
//! authorization check: who is asking, what they want to do, and any
//! opaque context the caller wants carried into the audit trail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_rbac::{Action, PermissionKey, Resource};

/// Input to one authorization check.
///
/// `org_id` and `additional_context` are carried through to the audit
/// record untouched; the authorization logic never interprets them.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use atrium_authz::PermissionContext;
/// use atrium_rbac::{Action, Resource};
///
/// let ctx = PermissionContext::new(Uuid::now_v7(), Resource::LeaveRequests, Action::Approve)
///     .with_resource_id("lr-2041")
///     .with_context("source", serde_json::json!("approvals_page"));
/// assert_eq!(ctx.key().to_string(), "leave_requests.approve");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionContext {
    /// The user the check is performed for.
    pub user_id: Uuid,

    /// The resource being accessed.
    pub resource: Resource,

    /// The action being attempted.
    pub action: Action,

    /// Specific resource instance, when known.
    pub resource_id: Option<String>,

    /// Organization context, passed through opaquely.
    pub org_id: Option<Uuid>,

    /// Opaque key-value context for the audit record.
    #[serde(default)]
    pub additional_context: HashMap<String, serde_json::Value>,
}

impl PermissionContext {
    /// Create a check context.
    pub fn new(user_id: Uuid, resource: Resource, action: Action) -> Self {
        Self {
            user_id,
            resource,
            action,
            resource_id: None,
            org_id: None,
            additional_context: HashMap::new(),
        }
    }

    /// Set the specific resource instance.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Set the organization context.
    pub fn with_org(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    /// Add an opaque context value.
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.additional_context.insert(key.into(), value);
        self
    }

    /// The permission key being checked.
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.resource, self.action)
    }
}
