//! # Data Source Organization
//!
//! Organization-level identity and team membership for data source access
//! control.
//!
//! ## Overview
//!
//! The datasource-org crate handles:
//! - **Roles**: Organization roles and the tier they resolve to
//! - **Identity**: The requester an access decision is made for
//! - **Teams**: Teams and the lookup of a user's team memberships
//!
//! ## Architecture
//!
//! ```text
//! Requester ─→ OrgRole ─→ RoleTier (Admin | Editor | Viewer)
//!     └─ internal_id ─→ TeamMembershipLookup ─→ team IDs
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use datasource_org::{InMemoryTeamDirectory, OrgRole, Requester, SignedInUser, Team};
//! use datasource_org::{TeamIdsByUserQuery, TeamMembershipLookup};
//!
//! # async fn example() -> datasource_org::OrgResult<()> {
//! let teams = InMemoryTeamDirectory::new();
//! teams.add_team(Team::new(1, 1, "Backend")).await;
//! teams.add_member(1, 7).await?;
//!
//! let user = SignedInUser::new(7, 1, OrgRole::Editor);
//! let ids = teams
//!     .team_ids_by_user(&TeamIdsByUserQuery { org_id: 1, user_id: user.internal_id()? })
//!     .await?;
//! assert_eq!(ids, vec![1]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod identity;
pub mod roles;
pub mod team;

// Re-export main types for convenience
pub use error::{OrgError, OrgResult};
pub use identity::{IdentityKind, Requester, SignedInUser};
pub use roles::{OrgRole, RoleTier};
pub use team::{InMemoryTeamDirectory, Team, TeamIdsByUserQuery, TeamMembershipLookup};
