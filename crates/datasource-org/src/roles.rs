//! Organization roles and role tiers
//!
//! This module defines the role a requester holds inside an organization and
//! the coarse tier that access decisions are made on.

use serde::{Deserialize, Serialize};

/// User role within an organization.
///
/// Roles are hierarchical: NoBasicRole < Viewer < Editor < Admin
///
/// Access decisions never look at the role directly; they resolve it to a
/// [`RoleTier`] first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    /// Member without a basic role
    #[serde(rename = "none")]
    NoBasicRole = 0,

    /// Read-only access to organization resources
    Viewer = 1,

    /// Can create and edit content
    Editor = 2,

    /// Full organization control
    Admin = 3,
}

/// Coarse role tier used by access decisions.
///
/// Every requester resolves to exactly one tier. Anything that is not
/// recognizably Admin or Editor lands on Viewer, the lowest tier, so an
/// unknown role can never widen access.
///
/// # Examples
///
/// ```
/// use datasource_org::{OrgRole, RoleTier};
///
/// assert_eq!(RoleTier::resolve(Some(OrgRole::Admin)), RoleTier::Admin);
/// assert_eq!(RoleTier::resolve(Some(OrgRole::NoBasicRole)), RoleTier::Viewer);
/// assert_eq!(RoleTier::resolve(None), RoleTier::Viewer);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleTier {
    /// Bypasses team restrictions
    Admin,
    /// Subject to team restrictions
    Editor,
    /// Subject to team restrictions
    Viewer,
}

impl RoleTier {
    /// Resolve the tier for an organization role.
    ///
    /// # Arguments
    ///
    /// * `role` - The requester's role, `None` when it is unset or unknown
    pub fn resolve(role: Option<OrgRole>) -> Self {
        match role {
            Some(OrgRole::Admin) => Self::Admin,
            Some(OrgRole::Editor) => Self::Editor,
            Some(OrgRole::Viewer) | Some(OrgRole::NoBasicRole) | None => Self::Viewer,
        }
    }

    /// Check whether this tier bypasses team restrictions.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Textual name of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }
}

impl std::fmt::Display for RoleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
