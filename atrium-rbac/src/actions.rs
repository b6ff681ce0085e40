//! # Actions
//!
//! Defines all actions that can be performed on resources.
//! Actions represent the operations users can perform on resources.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// Actions represent different levels of access and operations:
/// - **Read**: View/access resource data
/// - **Create**: Create new resource instances
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **Approve**: Approve pending requests/changes
/// - **Assign**: Assign a resource to a user
/// - **Execute**: Trigger actions/processes
/// - **Export**: Download/export resource data
/// - **ManageSettings**: Administer resource configuration
///
/// Granting one action never implies another: a role that should both
/// read and update a resource must carry both keys (or a wildcard).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view resource.
    Read,

    /// Create new resource.
    Create,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,

    /// Approve pending requests or changes.
    ///
    /// Used by workflows with a review step (leave requests,
    /// offboarding checklists, payroll runs).
    Approve,

    /// Assign a resource to a user (training courses, workflow steps).
    Assign,

    /// Execute/trigger a process.
    Execute,

    /// Export resource data.
    Export,

    /// Manage resource configuration and settings.
    ManageSettings,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// A static string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Assign => "assign",
            Action::Execute => "execute",
            Action::Export => "export",
            Action::ManageSettings => "manage_settings",
        }
    }

    /// Parse action from its canonical string representation.
    ///
    /// Permission keys are canonical data, not user input, so parsing is
    /// strict: only the exact snake_case token is accepted.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("manage_settings"), Some(Action::ManageSettings));
    /// assert_eq!(Action::parse("view"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "approve" => Some(Action::Approve),
            "assign" => Some(Action::Assign),
            "execute" => Some(Action::Execute),
            "export" => Some(Action::Export),
            "manage_settings" => Some(Action::ManageSettings),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Approve,
            Action::Assign,
            Action::Execute,
            Action::Export,
            Action::ManageSettings,
        ]
    }

    /// Check if this is a destructive action.
    ///
    /// Destructive actions permanently modify or remove data.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Action::Delete)
    }

    /// Check if this is a read-only action.
    ///
    /// Read-only actions don't modify resources.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Action::Read | Action::Export)
    }
}
