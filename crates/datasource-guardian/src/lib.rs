//! # Data Source Guardian
//!
//! Decides which data sources a requester may query, based on their
//! organization role and team memberships.
//!
//! ## Overview
//!
//! The datasource-guardian crate handles:
//! - **Data sources**: The record carrying an optional team allow-list
//! - **Allowed teams**: Parsing and matching of the stored allow-list
//! - **Guardians**: Single-item checks and bulk filtering
//! - **Providers**: Per-request guardian construction
//!
//! ## Decision Model
//!
//! ```text
//! Admin                              → every data source
//! allowed_teams = ""                 → everyone in the org
//! allowed_teams = "1, 2"             → members of team 1 or team 2
//! ```
//!
//! `can_query` returns lookup failures to the caller. The filters hide
//! everything when the requester's teams cannot be resolved.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use datasource_guardian::{
//!     provide_guardian, DataSource, DataSourceGuardian, GuardianConfig, GuardianProvider,
//!     InMemoryDataSourceStore,
//! };
//! use datasource_org::{InMemoryTeamDirectory, OrgRole, SignedInUser, Team};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryDataSourceStore::new());
//! let prod = store
//!     .insert(DataSource::new(1, "Production", "postgres").with_team_ids([1]))
//!     .await;
//!
//! let teams = Arc::new(InMemoryTeamDirectory::new());
//! teams.add_team(Team::new(1, 1, "Backend")).await;
//! teams.add_member(1, 7).await?;
//!
//! let provider = provide_guardian(&GuardianConfig::from_env(), store.clone(), teams);
//! let user = Arc::new(SignedInUser::new(7, 1, OrgRole::Editor));
//! let guardian = provider.new_guardian(1, user, &[]);
//!
//! assert!(guardian.can_query(prod.id).await?);
//! let visible = guardian.filter_by_query_permissions(store.list(1).await).await?;
//! assert_eq!(visible.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod allowed_teams;
pub mod config;
pub mod datasource;
pub mod error;
pub mod guardian;
pub mod provider;
pub mod team_guardian;

// Re-export main types for convenience
pub use allowed_teams::{format_team_ids, AllowedTeams};
pub use config::GuardianConfig;
pub use datasource::{
    DataSource, DataSourceKey, DataSourceLookup, GetDataSourceQuery, InMemoryDataSourceStore,
};
pub use error::{GuardianError, GuardianResult};
pub use guardian::{AllowGuardian, DataSourceGuardian, GuardianKind};
pub use provider::{provide_guardian, AllowGuardianProvider, GuardianProvider, TeamGuardianProvider};
pub use team_guardian::TeamGuardian;
