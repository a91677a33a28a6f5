//! Guardian providers
//!
//! A provider is wired once with the lookups a deployment uses, then hands
//! out a guardian per request.

use std::sync::Arc;

use datasource_org::{Requester, TeamMembershipLookup};
use tracing::info;

use crate::config::GuardianConfig;
use crate::datasource::{DataSource, DataSourceLookup};
use crate::guardian::{AllowGuardian, DataSourceGuardian};
use crate::team_guardian::TeamGuardian;

/// Factory for per-request guardians.
pub trait GuardianProvider: Send + Sync {
    /// Create a guardian for `user` acting in `org_id`.
    ///
    /// # Arguments
    ///
    /// * `org_id` - Organization the decisions are scoped to
    /// * `user` - The requester
    /// * `data_sources` - Data sources the caller is about to check. Accepted
    ///   for interface compatibility; providers must not pick a guardian
    ///   based on them.
    fn new_guardian(
        &self,
        org_id: i64,
        user: Arc<dyn Requester>,
        data_sources: &[DataSource],
    ) -> Box<dyn DataSourceGuardian>;
}

/// Provider that always hands out a [`TeamGuardian`].
///
/// A team guardian admits unrestricted data sources on its own, so no
/// separate path is needed when no data source carries a restriction.
#[derive(Clone)]
pub struct TeamGuardianProvider {
    data_sources: Arc<dyn DataSourceLookup>,
    teams: Arc<dyn TeamMembershipLookup>,
}

impl TeamGuardianProvider {
    /// Creates a provider from the data source and team lookups.
    pub fn new(
        data_sources: Arc<dyn DataSourceLookup>,
        teams: Arc<dyn TeamMembershipLookup>,
    ) -> Self {
        Self {
            data_sources,
            teams,
        }
    }
}

impl GuardianProvider for TeamGuardianProvider {
    fn new_guardian(
        &self,
        org_id: i64,
        user: Arc<dyn Requester>,
        _data_sources: &[DataSource],
    ) -> Box<dyn DataSourceGuardian> {
        Box::new(TeamGuardian::new(
            user,
            org_id,
            Arc::clone(&self.data_sources),
            Arc::clone(&self.teams),
        ))
    }
}

/// Provider that always hands out an [`AllowGuardian`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowGuardianProvider;

impl GuardianProvider for AllowGuardianProvider {
    fn new_guardian(
        &self,
        _org_id: i64,
        _user: Arc<dyn Requester>,
        _data_sources: &[DataSource],
    ) -> Box<dyn DataSourceGuardian> {
        Box::new(AllowGuardian)
    }
}

/// Select the provider for a deployment.
///
/// Team-based access applies when `config.team_access_enabled` is set,
/// otherwise every requester may query every data source.
pub fn provide_guardian(
    config: &GuardianConfig,
    data_sources: Arc<dyn DataSourceLookup>,
    teams: Arc<dyn TeamMembershipLookup>,
) -> Arc<dyn GuardianProvider> {
    if config.team_access_enabled {
        info!("Data source team access enabled");
        Arc::new(TeamGuardianProvider::new(data_sources, teams))
    } else {
        info!("Data source team access disabled, all data sources are queryable");
        Arc::new(AllowGuardianProvider)
    }
}
