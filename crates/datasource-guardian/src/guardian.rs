//! # Guardians
//!
//! A guardian answers two questions for one requester in one organization:
//! may they query a given data source, and which data sources of a list may
//! they see. Both variants implement [`DataSourceGuardian`] so callers never
//! need to know which one a provider handed out.

use async_trait::async_trait;

use crate::datasource::DataSource;
use crate::error::GuardianResult;

/// Variant of a guardian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardianKind {
    /// Admits everything
    Allow,
    /// Enforces team restrictions
    Team,
}

/// Access decisions on data sources for a single requester.
///
/// A denial is never an error: [`can_query`](Self::can_query) returns
/// `Ok(false)` and the filters omit the data source.
#[async_trait]
pub trait DataSourceGuardian: Send + Sync {
    /// Check whether the requester may query the data source.
    ///
    /// # Errors
    ///
    /// Returns the lookup error if the data source, the requester's identity
    /// or their team memberships cannot be resolved.
    async fn can_query(&self, datasource_id: i64) -> GuardianResult<bool>;

    /// Keep the data sources the requester may read.
    async fn filter_by_read_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>>;

    /// Keep the data sources the requester may query.
    async fn filter_by_query_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>>;

    /// Which variant this guardian is.
    fn kind(&self) -> GuardianKind;
}

/// Guardian that admits every requester to every data source.
///
/// Used when team-based access is not enabled for the deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowGuardian;

#[async_trait]
impl DataSourceGuardian for AllowGuardian {
    async fn can_query(&self, _datasource_id: i64) -> GuardianResult<bool> {
        Ok(true)
    }

    async fn filter_by_read_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>> {
        Ok(data_sources)
    }

    async fn filter_by_query_permissions(
        &self,
        data_sources: Vec<DataSource>,
    ) -> GuardianResult<Vec<DataSource>> {
        Ok(data_sources)
    }

    fn kind(&self) -> GuardianKind {
        GuardianKind::Allow
    }
}
