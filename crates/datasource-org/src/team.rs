//! Teams and team membership
//!
//! This module defines teams, the membership lookup that access decisions
//! consult, and an in-memory directory implementing it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::error::{OrgError, OrgResult};

/// A named group of users within an organization.
///
/// # Examples
///
/// ```
/// use datasource_org::Team;
///
/// let team = Team::new(3, 1, "Platform");
/// assert_eq!(team.id, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    /// Team ID
    pub id: i64,

    /// Organization ID
    pub org_id: i64,

    /// Team name
    pub name: String,
}

impl Team {
    /// Creates a new team.
    pub fn new(id: i64, org_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            org_id,
            name: name.into(),
        }
    }
}

/// Query for the teams a user belongs to in an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamIdsByUserQuery {
    /// Organization ID
    pub org_id: i64,
    /// Internal user ID
    pub user_id: i64,
}

/// Lookup of a user's team memberships.
///
/// Implementations own their own timeouts. Callers cancel a lookup by
/// dropping the returned future.
#[async_trait]
pub trait TeamMembershipLookup: Send + Sync {
    /// Get the IDs of all teams the user belongs to within the organization.
    async fn team_ids_by_user(&self, query: &TeamIdsByUserQuery) -> OrgResult<Vec<i64>>;
}

/// In-memory team directory.
///
/// Useful for tests and for deployments where teams are provisioned from
/// static configuration. A failure can be injected with
/// [`InMemoryTeamDirectory::fail_lookups`] to simulate an unavailable backend.
#[derive(Default)]
pub struct InMemoryTeamDirectory {
    teams: RwLock<HashMap<i64, Team>>,
    members: RwLock<HashMap<(i64, i64), BTreeSet<i64>>>,
    failure: RwLock<Option<OrgError>>,
}

impl InMemoryTeamDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team.
    pub async fn add_team(&self, team: Team) {
        self.teams.write().await.insert(team.id, team);
    }

    /// Add a user to a team.
    ///
    /// # Errors
    ///
    /// Returns [`OrgError::TeamLookup`] if the team is not registered.
    pub async fn add_member(&self, team_id: i64, user_id: i64) -> OrgResult<()> {
        let org_id = self
            .teams
            .read()
            .await
            .get(&team_id)
            .map(|t| t.org_id)
            .ok_or_else(|| OrgError::TeamLookup(format!("team {} not found", team_id)))?;

        self.members
            .write()
            .await
            .entry((org_id, user_id))
            .or_default()
            .insert(team_id);
        Ok(())
    }

    /// Remove a user from a team. Unknown memberships are ignored.
    pub async fn remove_member(&self, org_id: i64, team_id: i64, user_id: i64) {
        if let Some(set) = self.members.write().await.get_mut(&(org_id, user_id)) {
            set.remove(&team_id);
        }
    }

    /// Make every subsequent lookup fail with `error`, or clear with `None`.
    pub async fn fail_lookups(&self, error: Option<OrgError>) {
        *self.failure.write().await = error;
    }
}

#[async_trait]
impl TeamMembershipLookup for InMemoryTeamDirectory {
    async fn team_ids_by_user(&self, query: &TeamIdsByUserQuery) -> OrgResult<Vec<i64>> {
        if let Some(err) = self.failure.read().await.clone() {
            return Err(err);
        }

        Ok(self
            .members
            .read()
            .await
            .get(&(query.org_id, query.user_id))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
