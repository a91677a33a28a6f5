//! Requester identity
//!
//! This module provides the [`Requester`] abstraction that access decisions
//! are made against, and [`SignedInUser`], the concrete identity attached to
//! authenticated requests.

use serde::{Deserialize, Serialize};

use crate::error::{OrgError, OrgResult};
use crate::roles::{OrgRole, RoleTier};

/// The calling identity of a request.
///
/// Implementations must be cheap to query; access decisions call these
/// accessors once per operation.
pub trait Requester: Send + Sync {
    /// Internal numeric ID of the user behind this identity.
    ///
    /// # Errors
    ///
    /// Returns [`OrgError::NotASignedInUser`] if the identity is not backed
    /// by a user record (anonymous or render sessions).
    fn internal_id(&self) -> OrgResult<i64>;

    /// Organization the identity is currently acting in.
    fn org_id(&self) -> i64;

    /// Role within the current organization, `None` if unknown.
    fn org_role(&self) -> Option<OrgRole>;

    /// Resolved role tier. Unknown roles resolve to [`RoleTier::Viewer`].
    fn role_tier(&self) -> RoleTier {
        RoleTier::resolve(self.org_role())
    }
}

/// Kind of principal behind a [`SignedInUser`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// Regular user account
    #[default]
    User,
    /// Service account acting through a token
    ServiceAccount,
    /// Anonymous access, no backing user
    Anonymous,
    /// Image renderer session, no backing user
    Render,
}

impl IdentityKind {
    /// Whether this kind is backed by a user record with an internal ID.
    pub fn has_user_record(&self) -> bool {
        matches!(self, Self::User | Self::ServiceAccount)
    }

    /// String representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::ServiceAccount => "service_account",
            Self::Anonymous => "anonymous",
            Self::Render => "render",
        }
    }
}

/// Identity of an authenticated caller.
///
/// # Examples
///
/// ```
/// use datasource_org::{OrgRole, Requester, RoleTier, SignedInUser};
///
/// let user = SignedInUser::new(7, 1, OrgRole::Editor);
/// assert_eq!(user.internal_id(), Ok(7));
/// assert_eq!(user.role_tier(), RoleTier::Editor);
///
/// let anon = SignedInUser::anonymous(1);
/// assert!(anon.internal_id().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedInUser {
    /// Internal user ID
    pub user_id: i64,

    /// Current organization ID
    pub org_id: i64,

    /// Role in the current organization
    #[serde(default)]
    pub org_role: Option<OrgRole>,

    /// Principal kind
    #[serde(default)]
    pub kind: IdentityKind,
}

impl SignedInUser {
    /// Creates a regular user identity.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The internal user ID
    /// * `org_id` - The organization the user is acting in
    /// * `org_role` - The user's role in that organization
    pub fn new(user_id: i64, org_id: i64, org_role: OrgRole) -> Self {
        Self {
            user_id,
            org_id,
            org_role: Some(org_role),
            kind: IdentityKind::User,
        }
    }

    /// Creates an anonymous identity with no role and no backing user.
    pub fn anonymous(org_id: i64) -> Self {
        Self {
            user_id: 0,
            org_id,
            org_role: None,
            kind: IdentityKind::Anonymous,
        }
    }

    /// Set the principal kind.
    pub fn with_kind(mut self, kind: IdentityKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Requester for SignedInUser {
    fn internal_id(&self) -> OrgResult<i64> {
        if !self.kind.has_user_record() {
            return Err(OrgError::NotASignedInUser(format!(
                "{} identity has no user record",
                self.kind.as_str()
            )));
        }
        if self.user_id <= 0 {
            return Err(OrgError::NotASignedInUser(format!(
                "invalid user id {}",
                self.user_id
            )));
        }
        Ok(self.user_id)
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn org_role(&self) -> Option<OrgRole> {
        self.org_role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_in_user_internal_id() {
        let user = SignedInUser::new(42, 1, OrgRole::Viewer);
        assert_eq!(user.internal_id(), Ok(42));
        assert_eq!(user.org_id(), 1);
    }

    #[test]
    fn test_service_account_has_internal_id() {
        let sa = SignedInUser::new(9, 1, OrgRole::Editor).with_kind(IdentityKind::ServiceAccount);
        assert_eq!(sa.internal_id(), Ok(9));
    }

    #[test]
    fn test_identities_without_user_record() {
        assert!(matches!(
            SignedInUser::anonymous(1).internal_id(),
            Err(OrgError::NotASignedInUser(_))
        ));

        let render = SignedInUser::new(3, 1, OrgRole::Viewer).with_kind(IdentityKind::Render);
        assert!(render.internal_id().is_err());

        let zero = SignedInUser::new(0, 1, OrgRole::Viewer);
        assert!(zero.internal_id().is_err());
    }

    #[test]
    fn test_role_tier_defaults_to_viewer() {
        assert_eq!(SignedInUser::anonymous(1).role_tier(), RoleTier::Viewer);
        assert_eq!(
            SignedInUser::new(1, 1, OrgRole::NoBasicRole).role_tier(),
            RoleTier::Viewer
        );
        assert_eq!(
            SignedInUser::new(1, 1, OrgRole::Admin).role_tier(),
            RoleTier::Admin
        );
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let user: SignedInUser =
            serde_json::from_str(r#"{"user_id": 5, "org_id": 2}"#).unwrap();
        assert_eq!(user.org_role, None);
        assert_eq!(user.kind, IdentityKind::User);
        assert_eq!(user.role_tier(), RoleTier::Viewer);
    }
}
