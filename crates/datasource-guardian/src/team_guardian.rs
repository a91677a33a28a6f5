//! Team-based guardian
//!
//! Decision rule, for a requester in one organization:
//!
//! ```text
//! Admin tier                      → admit
//! data source allow-list empty    → admit
//! user teams ∩ allow-list ≠ ∅     → admit
//! otherwise                       → deny
//! ```
//!
//! `can_query` propagates lookup failures. The filters translate them into an
//! empty result instead, so a failed lookup never exposes a restricted data
//! source.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use datasource_org::{Requester, TeamIdsByUserQuery, TeamMembershipLookup};

use crate::datasource::{DataSource, DataSourceLookup, GetDataSourceQuery};
use crate::error::GuardianResult;
use crate::guardian::{DataSourceGuardian, GuardianKind};

/// Guardian enforcing data source team restrictions.
///
/// Holds no mutable state. Nothing is cached between calls; every decision
/// reads the data source and the requester's teams again.
pub struct TeamGuardian {
    user: Arc<dyn Requester>,
    org_id: i64,
    data_sources: Arc<dyn DataSourceLookup>,
    teams: Arc<dyn TeamMembershipLookup>,
}

impl TeamGuardian {
    /// Creates a guardian for `user` acting in `org_id`.
    ///
    /// # Arguments
    ///
    /// * `user` - The requester decisions are made for
    /// * `org_id` - Organization data sources and teams are looked up in
    /// * `data_sources` - Data source lookup
    /// * `teams` - Team membership lookup
    pub fn new(
        user: Arc<dyn Requester>,
        org_id: i64,
        data_sources: Arc<dyn DataSourceLookup>,
        teams: Arc<dyn TeamMembershipLookup>,
    ) -> Self {
        Self {
            user,
            org_id,
            data_sources,
            teams,
        }
    }

    /// Organization this guardian is bound to.
    pub fn org_id(&self) -> i64 {
        self.org_id
    }

    fn is_admin(&self) -> bool {
        self.user.role_tier().is_admin()
    }

    async fn user_team_ids(&self) -> GuardianResult<Vec<i64>> {
        let user_id = self.user.internal_id()?;
        let team_ids = self
            .teams
            .team_ids_by_user(&TeamIdsByUserQuery {
                org_id: self.org_id,
                user_id,
            })
            .await?;
        Ok(team_ids)
    }

    async fn filter_by_team(&self, data_sources: Vec<DataSource>) -> Vec<DataSource> {
        if self.is_admin() {
            return data_sources;
        }

        let team_ids = match self.user_team_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    org_id = self.org_id,
                    error = %e,
                    "Could not resolve requester teams, hiding all data sources"
                );
                return Vec::new();
            }
        };

        let total = data_sources.len();
        let visible: Vec<DataSource> = data_sources
            .into_iter()
            .filter(|ds| ds.allowed_teams().admits(&team_ids))
            .collect();

        debug!(
            org_id = self.org_id,
            total,
            visible = visible.len(),
            "Filtered data sources by team"
        );
        visible
    }
}

#[async_trait]
impl DataSourceGuardian for TeamGuardian {
    #[instrument(skip(self))]
    async fn can_query(&self, datasource_id: i64) -> GuardianResult<bool> {
        if self.is_admin() {
            return Ok(true);
        }

        let ds = self
            .data_sources
            .get_data_source(&GetDataSourceQuery::by_id(self.org_id, datasource_id))
            .await?;

        let allowed = ds.allowed_teams();
        if allowed.is_unrestricted() {
            return Ok(true);
        }

        let team_ids = self.user_team_ids().await?;
        let admitted = allowed.admits(&team_ids);
        debug!(
            org_id = self.org_id,
            datasource_uid = %ds.uid,
            admitted,
            "Team access decision"
        );
        Ok(admitted)
    }

    #[instrument(skip_all)]
    async fn filter_by_read_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>> {
        Ok(self.filter_by_team(data_sources).await)
    }

    #[instrument(skip_all)]
    async fn filter_by_query_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>> {
        Ok(self.filter_by_team(data_sources).await)
    }

    fn kind(&self) -> GuardianKind {
        GuardianKind::Team
    }
}
