//! # Permission Keys
//!
//! Core key types for the RBAC system. A concrete [`PermissionKey`]
//! identifies one `<resource>.<action>` pair; a [`KeyPattern`] is the
//! form role grants take, where either segment may be the `*` wildcard.
//!
//! Parsing is explicit and fallible: a malformed key is a [`KeyError`],
//! never a silently-dropped entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::actions::Action;
use crate::error::KeyError;
use crate::resources::Resource;

/// The reserved wildcard token in key patterns.
pub const WILDCARD: &str = "*";

/// A concrete permission key: one resource paired with one action.
///
/// The canonical string form is `<resource>.<action>` and is globally
/// unique. Wildcards cannot be represented here; they exist only in
/// [`KeyPattern`] entries inside role grant lists.
///
/// # Example
///
/// ```
/// use atrium_rbac::key::PermissionKey;
/// use atrium_rbac::resources::Resource;
/// use atrium_rbac::actions::Action;
///
/// let key = PermissionKey::new(Resource::Employees, Action::Read);
/// assert_eq!(key.to_string(), "employees.read");
///
/// let parsed: PermissionKey = "employees.read".parse().unwrap();
/// assert_eq!(parsed, key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    /// The resource this key applies to.
    pub resource: Resource,
    /// The action on the resource.
    pub action: Action,
}

impl PermissionKey {
    /// Create a new permission key.
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Split a raw key string into its two segments.
    ///
    /// Shared by the concrete and pattern parsers so both report the
    /// same error for a missing separator.
    fn split(s: &str) -> Result<(&str, &str), KeyError> {
        s.split_once('.')
            .ok_or_else(|| KeyError::MissingSeparator(s.to_string()))
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.action.as_str())
    }
}

impl FromStr for PermissionKey {
    type Err = KeyError;

    /// Parse a concrete `<resource>.<action>` key.
    ///
    /// Wildcard tokens are rejected: `employees.*` is a valid
    /// [`KeyPattern`] but not a valid concrete key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = Self::split(s)?;
        if resource == WILDCARD || action == WILDCARD {
            return Err(KeyError::UnexpectedWildcard(s.to_string()));
        }
        let resource = Resource::parse(resource)
            .ok_or_else(|| KeyError::UnknownResource(resource.to_string()))?;
        let action =
            Action::parse(action).ok_or_else(|| KeyError::UnknownAction(action.to_string()))?;
        Ok(Self { resource, action })
    }
}

impl Serialize for PermissionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PermissionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A grant entry in a role's permission list.
///
/// Patterns are a closed set; the `*` token is only meaningful in the
/// three wildcard positions below and is rejected anywhere else.
///
/// Matching precedence during an authorization check is fixed:
/// an exact concrete match decides first, then either single wildcard
/// (the two are equally permissive), then the full wildcard. There is no
/// explicit-deny concept, so any match allows.
///
/// # Example
///
/// ```
/// use atrium_rbac::key::{KeyPattern, PermissionKey};
/// use atrium_rbac::resources::Resource;
/// use atrium_rbac::actions::Action;
///
/// let pattern: KeyPattern = "employees.*".parse().unwrap();
/// assert!(pattern.matches(&PermissionKey::new(Resource::Employees, Action::Delete)));
/// assert!(!pattern.matches(&PermissionKey::new(Resource::Payroll, Action::Read)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    /// An exact `<resource>.<action>` grant.
    Exact(PermissionKey),
    /// `<resource>.*` — every action on one resource.
    AnyAction(Resource),
    /// `*.<action>` — one action on every resource.
    AnyResource(Action),
    /// `*.*` — everything.
    Any,
}

impl KeyPattern {
    /// Check whether this pattern grants the given concrete key.
    pub fn matches(&self, key: &PermissionKey) -> bool {
        match self {
            KeyPattern::Exact(exact) => exact == key,
            KeyPattern::AnyAction(resource) => *resource == key.resource,
            KeyPattern::AnyResource(action) => *action == key.action,
            KeyPattern::Any => true,
        }
    }

    /// Check whether this pattern contains a wildcard segment.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, KeyPattern::Exact(_))
    }

    /// The concrete key, if this pattern is exact.
    pub fn as_exact(&self) -> Option<&PermissionKey> {
        match self {
            KeyPattern::Exact(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Exact(key) => key.fmt(f),
            KeyPattern::AnyAction(resource) => write!(f, "{}.{}", resource.as_str(), WILDCARD),
            KeyPattern::AnyResource(action) => write!(f, "{}.{}", WILDCARD, action.as_str()),
            KeyPattern::Any => write!(f, "{0}.{0}", WILDCARD),
        }
    }
}

impl FromStr for KeyPattern {
    type Err = KeyError;

    /// Parse a grant entry, accepting the `*` token in either segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = PermissionKey::split(s)?;
        match (resource, action) {
            (WILDCARD, WILDCARD) => Ok(KeyPattern::Any),
            (WILDCARD, action) => Action::parse(action)
                .map(KeyPattern::AnyResource)
                .ok_or_else(|| KeyError::UnknownAction(action.to_string())),
            (resource, WILDCARD) => Resource::parse(resource)
                .map(KeyPattern::AnyAction)
                .ok_or_else(|| KeyError::UnknownResource(resource.to_string())),
            _ => s.parse().map(KeyPattern::Exact),
        }
    }
}

impl From<PermissionKey> for KeyPattern {
    fn from(key: PermissionKey) -> Self {
        KeyPattern::Exact(key)
    }
}

impl Serialize for KeyPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(resource: Resource, action: Action) -> PermissionKey {
        PermissionKey::new(resource, action)
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            key(Resource::Employees, Action::Read).to_string(),
            "employees.read"
        );
        assert_eq!(
            key(Resource::Settings, Action::ManageSettings).to_string(),
            "settings.manage_settings"
        );
    }

    #[test]
    fn test_key_parse() {
        let parsed: PermissionKey = "payroll.approve".parse().unwrap();
        assert_eq!(parsed, key(Resource::Payroll, Action::Approve));
    }

    #[test]
    fn test_key_parse_errors() {
        assert_eq!(
            "employeesread".parse::<PermissionKey>(),
            Err(KeyError::MissingSeparator("employeesread".to_string()))
        );
        assert_eq!(
            "squirrels.read".parse::<PermissionKey>(),
            Err(KeyError::UnknownResource("squirrels".to_string()))
        );
        assert_eq!(
            "employees.teleport".parse::<PermissionKey>(),
            Err(KeyError::UnknownAction("teleport".to_string()))
        );
        assert_eq!(
            "employees.*".parse::<PermissionKey>(),
            Err(KeyError::UnexpectedWildcard("employees.*".to_string()))
        );
        assert_eq!(
            "*.*".parse::<PermissionKey>(),
            Err(KeyError::UnexpectedWildcard("*.*".to_string()))
        );
    }

    #[test]
    fn test_pattern_parse_all_forms() {
        assert_eq!(
            "employees.read".parse::<KeyPattern>().unwrap(),
            KeyPattern::Exact(key(Resource::Employees, Action::Read))
        );
        assert_eq!(
            "employees.*".parse::<KeyPattern>().unwrap(),
            KeyPattern::AnyAction(Resource::Employees)
        );
        assert_eq!(
            "*.read".parse::<KeyPattern>().unwrap(),
            KeyPattern::AnyResource(Action::Read)
        );
        assert_eq!("*.*".parse::<KeyPattern>().unwrap(), KeyPattern::Any);
    }

    #[test]
    fn test_pattern_parse_errors() {
        assert_eq!(
            "*.fly".parse::<KeyPattern>(),
            Err(KeyError::UnknownAction("fly".to_string()))
        );
        assert_eq!(
            "rockets.*".parse::<KeyPattern>(),
            Err(KeyError::UnknownResource("rockets".to_string()))
        );
        assert_eq!(
            "justonetoken".parse::<KeyPattern>(),
            Err(KeyError::MissingSeparator("justonetoken".to_string()))
        );
    }

    #[test]
    fn test_pattern_matching() {
        let read_employees = key(Resource::Employees, Action::Read);
        let delete_employees = key(Resource::Employees, Action::Delete);
        let read_payroll = key(Resource::Payroll, Action::Read);

        let exact = KeyPattern::Exact(read_employees);
        assert!(exact.matches(&read_employees));
        assert!(!exact.matches(&delete_employees));

        let any_action = KeyPattern::AnyAction(Resource::Employees);
        assert!(any_action.matches(&read_employees));
        assert!(any_action.matches(&delete_employees));
        assert!(!any_action.matches(&read_payroll));

        let any_resource = KeyPattern::AnyResource(Action::Read);
        assert!(any_resource.matches(&read_employees));
        assert!(any_resource.matches(&read_payroll));
        assert!(!any_resource.matches(&delete_employees));

        assert!(KeyPattern::Any.matches(&read_employees));
        assert!(KeyPattern::Any.matches(&delete_employees));
        assert!(KeyPattern::Any.matches(&read_payroll));
    }

    #[test]
    fn test_pattern_display_roundtrip() {
        for raw in ["employees.read", "employees.*", "*.read", "*.*"] {
            let pattern: KeyPattern = raw.parse().unwrap();
            assert_eq!(pattern.to_string(), raw);
        }
    }

    #[test]
    fn test_is_wildcard() {
        assert!(!"employees.read".parse::<KeyPattern>().unwrap().is_wildcard());
        assert!("employees.*".parse::<KeyPattern>().unwrap().is_wildcard());
        assert!("*.*".parse::<KeyPattern>().unwrap().is_wildcard());
    }

    #[test]
    fn test_serde_string_form() {
        let pattern = KeyPattern::AnyAction(Resource::Training);
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "\"training.*\"");
        let back: KeyPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);

        let err = serde_json::from_str::<PermissionKey>("\"training.*\"");
        assert!(err.is_err());
    }
}
