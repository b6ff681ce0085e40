//! # Resource Types
//!
//! Defines all resource types across the Atrium HR application surface.
//! Resources are the nouns that permissions protect: one variant per
//! administrative module plus the shared platform surfaces.

use serde::{Deserialize, Serialize};

/// Resource types that can have permissions assigned.
///
/// Covers the HR administration modules (employees, payroll, leave,
/// offboarding, policies, workflows, training) and the shared surfaces
/// (documents, reports, access control, audit, settings).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Employee records and profiles.
    Employees,
    /// Payroll runs, salary data, and compensation.
    Payroll,
    /// Leave and absence requests.
    LeaveRequests,
    /// Offboarding checklists and exit workflows.
    Offboarding,
    /// Company policy documents.
    Policies,
    /// Configurable approval workflows.
    Workflows,
    /// Training courses and completion tracking.
    Training,
    /// Uploaded documents and attachments.
    Documents,
    /// Generated reports.
    Reports,
    /// Role and permission assignments.
    UserPermissions,
    /// Authorization audit trail.
    AuditLogs,
    /// Organization-level settings.
    Settings,
    /// Landing dashboard widgets.
    Dashboard,
    /// In-app notifications.
    Notifications,
}

impl Resource {
    /// Get the string representation of the resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::Payroll => "payroll",
            Resource::LeaveRequests => "leave_requests",
            Resource::Offboarding => "offboarding",
            Resource::Policies => "policies",
            Resource::Workflows => "workflows",
            Resource::Training => "training",
            Resource::Documents => "documents",
            Resource::Reports => "reports",
            Resource::UserPermissions => "user_permissions",
            Resource::AuditLogs => "audit_logs",
            Resource::Settings => "settings",
            Resource::Dashboard => "dashboard",
            Resource::Notifications => "notifications",
        }
    }

    /// Parse resource from its canonical string representation.
    ///
    /// Strict, like [`Action::parse`](crate::actions::Action::parse):
    /// only the exact snake_case token is accepted, and `*` is never a
    /// resource.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_rbac::resources::Resource;
    ///
    /// assert_eq!(Resource::parse("employees"), Some(Resource::Employees));
    /// assert_eq!(Resource::parse("leave_requests"), Some(Resource::LeaveRequests));
    /// assert_eq!(Resource::parse("*"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employees" => Some(Resource::Employees),
            "payroll" => Some(Resource::Payroll),
            "leave_requests" => Some(Resource::LeaveRequests),
            "offboarding" => Some(Resource::Offboarding),
            "policies" => Some(Resource::Policies),
            "workflows" => Some(Resource::Workflows),
            "training" => Some(Resource::Training),
            "documents" => Some(Resource::Documents),
            "reports" => Some(Resource::Reports),
            "user_permissions" => Some(Resource::UserPermissions),
            "audit_logs" => Some(Resource::AuditLogs),
            "settings" => Some(Resource::Settings),
            "dashboard" => Some(Resource::Dashboard),
            "notifications" => Some(Resource::Notifications),
            _ => None,
        }
    }

    /// Get all resources.
    pub fn all() -> Vec<Self> {
        vec![
            Resource::Employees,
            Resource::Payroll,
            Resource::LeaveRequests,
            Resource::Offboarding,
            Resource::Policies,
            Resource::Workflows,
            Resource::Training,
            Resource::Documents,
            Resource::Reports,
            Resource::UserPermissions,
            Resource::AuditLogs,
            Resource::Settings,
            Resource::Dashboard,
            Resource::Notifications,
        ]
    }

    /// Get a human-readable display name for the resource.
    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Employees => "Employees",
            Resource::Payroll => "Payroll",
            Resource::LeaveRequests => "Leave Requests",
            Resource::Offboarding => "Offboarding",
            Resource::Policies => "Policies",
            Resource::Workflows => "Workflows",
            Resource::Training => "Training",
            Resource::Documents => "Documents",
            Resource::Reports => "Reports",
            Resource::UserPermissions => "User Permissions",
            Resource::AuditLogs => "Audit Logs",
            Resource::Settings => "Settings",
            Resource::Dashboard => "Dashboard",
            Resource::Notifications => "Notifications",
        }
    }
}
