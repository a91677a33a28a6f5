//! Error types for data source access decisions
//!
//! A denied decision is not an error. These errors only describe failures to
//! reach a decision: a missing data source, an unavailable store, or an
//! identity or team lookup that could not be completed.

use datasource_org::OrgError;
use thiserror::Error;

use crate::datasource::DataSourceKey;

/// Guardian error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardianError {
    /// Data source does not exist in the organization
    #[error("Data source {key} not found in organization {org_id}")]
    DataSourceNotFound {
        /// Organization the lookup was scoped to.
        org_id: i64,
        /// Requested data source ID or UID.
        key: DataSourceKey,
    },

    /// Data source store failure
    #[error("Data source store error: {0}")]
    Store(String),

    /// Identity or team membership failure
    #[error(transparent)]
    Org(#[from] OrgError),
}

/// Result type for guardian operations.
pub type GuardianResult<T> = Result<T, GuardianError>;

impl GuardianError {
    /// Check if this error reports a missing data source.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GuardianError::DataSourceNotFound { .. })
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            GuardianError::DataSourceNotFound { .. } => "DATASOURCE_NOT_FOUND",
            GuardianError::Store(_) => "DATASOURCE_STORE_ERROR",
            GuardianError::Org(e) => e.error_code(),
        }
    }
}
