//! Data source domain model
//!
//! This module provides the data source record, the lookup that access
//! decisions resolve data sources through, and an in-memory store
//! implementing it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::allowed_teams::{format_team_ids, AllowedTeams};
use crate::error::{GuardianError, GuardianResult};

/// A queryable data source within an organization.
///
/// Access to the data source can be restricted to a set of teams through
/// `allowed_teams`, stored as a comma-separated list of team IDs. An empty
/// value leaves the data source open to everyone in the organization.
///
/// # Examples
///
/// ```
/// use datasource_guardian::DataSource;
///
/// let ds = DataSource::new(1, "Production DB", "postgres").with_team_ids([2, 1]);
/// assert_eq!(ds.allowed_teams, "1,2");
/// assert!(ds.is_team_allowed(2));
/// assert!(!ds.is_team_allowed(3));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSource {
    /// Numeric ID, assigned by the store
    pub id: i64,

    /// Stable unique identifier
    pub uid: String,

    /// Organization ID
    pub org_id: i64,

    /// Display name
    pub name: String,

    /// Plugin type (e.g., "prometheus", "postgres")
    #[serde(rename = "type")]
    pub ds_type: String,

    /// Comma-separated IDs of teams allowed to query, empty for everyone
    #[serde(default)]
    pub allowed_teams: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last update timestamp
    pub updated: DateTime<Utc>,
}

impl DataSource {
    /// Creates a new unrestricted data source.
    ///
    /// The data source is created with:
    /// - ID 0 (assigned on insert into a store)
    /// - A newly generated UID
    /// - No team restrictions
    ///
    /// # Arguments
    ///
    /// * `org_id` - The owning organization
    /// * `name` - Display name
    /// * `ds_type` - Plugin type
    pub fn new(org_id: i64, name: impl Into<String>, ds_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            uid: Uuid::now_v7().simple().to_string(),
            org_id,
            name: name.into(),
            ds_type: ds_type.into(),
            allowed_teams: String::new(),
            created: now,
            updated: now,
        }
    }

    /// Set the numeric ID.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Set the raw allow-list string as stored.
    pub fn with_allowed_teams(mut self, allowed_teams: impl Into<String>) -> Self {
        self.allowed_teams = allowed_teams.into();
        self
    }

    /// Restrict the data source to the given teams. An empty selection
    /// removes the restriction.
    pub fn with_team_ids(mut self, team_ids: impl IntoIterator<Item = i64>) -> Self {
        self.allowed_teams = format_team_ids(team_ids);
        self
    }

    /// Parse the allow-list. Parsed on every call, never cached.
    pub fn allowed_teams(&self) -> AllowedTeams {
        AllowedTeams::parse(&self.allowed_teams)
    }

    /// Whether access is limited to specific teams.
    pub fn is_restricted(&self) -> bool {
        !self.allowed_teams().is_unrestricted()
    }

    /// Check whether members of `team_id` may query this data source.
    ///
    /// # Returns
    ///
    /// `true` if the data source is unrestricted or lists the team
    pub fn is_team_allowed(&self, team_id: i64) -> bool {
        self.allowed_teams().contains(team_id)
    }
}

/// Key a data source is looked up by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSourceKey {
    /// Numeric ID
    Id(i64),
    /// UID string
    Uid(String),
}

impl fmt::Display for DataSourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::Uid(uid) => write!(f, "uid={}", uid),
        }
    }
}

/// Query for a single data source within an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDataSourceQuery {
    /// Organization the lookup is scoped to
    pub org_id: i64,
    /// ID or UID of the data source
    pub key: DataSourceKey,
}

impl GetDataSourceQuery {
    /// Look up by numeric ID.
    pub fn by_id(org_id: i64, id: i64) -> Self {
        Self {
            org_id,
            key: DataSourceKey::Id(id),
        }
    }

    /// Look up by UID.
    pub fn by_uid(org_id: i64, uid: impl Into<String>) -> Self {
        Self {
            org_id,
            key: DataSourceKey::Uid(uid.into()),
        }
    }

    fn matches(&self, ds: &DataSource) -> bool {
        ds.org_id == self.org_id
            && match &self.key {
                DataSourceKey::Id(id) => ds.id == *id,
                DataSourceKey::Uid(uid) => &ds.uid == uid,
            }
    }

    fn not_found(&self) -> GuardianError {
        GuardianError::DataSourceNotFound {
            org_id: self.org_id,
            key: self.key.clone(),
        }
    }
}

/// Lookup of data source records.
///
/// Implementations own their own timeouts. Callers cancel a lookup by
/// dropping the returned future.
#[async_trait]
pub trait DataSourceLookup: Send + Sync {
    /// Get a single data source.
    ///
    /// # Errors
    ///
    /// Returns [`GuardianError::DataSourceNotFound`] if no data source in the
    /// query's organization matches, or another error if the store fails.
    async fn get_data_source(&self, query: &GetDataSourceQuery) -> GuardianResult<DataSource>;
}

/// In-memory data source store.
///
/// IDs are assigned sequentially on insert. A failure can be injected with
/// [`InMemoryDataSourceStore::fail_lookups`] to simulate an unavailable
/// backend.
#[derive(Default)]
pub struct InMemoryDataSourceStore {
    data_sources: RwLock<Vec<DataSource>>,
    failure: RwLock<Option<GuardianError>>,
}

impl InMemoryDataSourceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `data_sources` as given, IDs included.
    pub fn with_data_sources(data_sources: Vec<DataSource>) -> Self {
        Self {
            data_sources: RwLock::new(data_sources),
            failure: RwLock::new(None),
        }
    }

    /// Insert a data source, assigning the next free ID when `id` is 0.
    ///
    /// A record with an explicit ID replaces any stored record with the same
    /// organization and ID.
    ///
    /// # Returns
    ///
    /// The stored record
    pub async fn insert(&self, mut ds: DataSource) -> DataSource {
        let mut data_sources = self.data_sources.write().await;
        if ds.id == 0 {
            ds.id = data_sources.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        } else if let Some(slot) = data_sources
            .iter_mut()
            .find(|d| d.org_id == ds.org_id && d.id == ds.id)
        {
            *slot = ds.clone();
            return ds;
        }
        data_sources.push(ds.clone());
        ds
    }

    /// Replace the stored record with the same organization and ID.
    ///
    /// # Errors
    ///
    /// Returns [`GuardianError::DataSourceNotFound`] if no such record exists.
    pub async fn update(&self, mut ds: DataSource) -> GuardianResult<DataSource> {
        let mut data_sources = self.data_sources.write().await;
        let slot = data_sources
            .iter_mut()
            .find(|d| d.org_id == ds.org_id && d.id == ds.id)
            .ok_or(GuardianError::DataSourceNotFound {
                org_id: ds.org_id,
                key: DataSourceKey::Id(ds.id),
            })?;
        ds.created = slot.created;
        ds.updated = Utc::now();
        *slot = ds.clone();
        Ok(ds)
    }

    /// All data sources of an organization, in insertion order.
    pub async fn list(&self, org_id: i64) -> Vec<DataSource> {
        self.data_sources
            .read()
            .await
            .iter()
            .filter(|ds| ds.org_id == org_id)
            .cloned()
            .collect()
    }

    /// Make every subsequent lookup fail with `error`, or clear with `None`.
    pub async fn fail_lookups(&self, error: Option<GuardianError>) {
        *self.failure.write().await = error;
    }
}

#[async_trait]
impl DataSourceLookup for InMemoryDataSourceStore {
    async fn get_data_source(&self, query: &GetDataSourceQuery) -> GuardianResult<DataSource> {
        if let Some(err) = self.failure.read().await.clone() {
            return Err(err);
        }

        self.data_sources
            .read()
            .await
            .iter()
            .find(|ds| query.matches(ds))
            .cloned()
            .ok_or_else(|| query.not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_team_allowed() {
        let cases = [
            ("", 1, true),
            ("1", 1, true),
            ("1", 2, false),
            ("1,2", 1, true),
            ("1,2", 2, true),
            ("1,2", 3, false),
            ("1, 2, 3", 2, true),
        ];

        for (allowed_teams, team_id, expected) in cases {
            let ds = DataSource::new(1, "ds", "prometheus").with_allowed_teams(allowed_teams);
            assert_eq!(
                ds.is_team_allowed(team_id),
                expected,
                "allowed_teams={:?} team={}",
                allowed_teams,
                team_id
            );
        }
    }

    #[test]
    fn test_new_data_source_is_unrestricted() {
        let ds = DataSource::new(1, "Loki", "loki");
        assert_eq!(ds.id, 0);
        assert!(!ds.uid.is_empty());
        assert!(!ds.is_restricted());
    }

    #[test]
    fn test_with_team_ids() {
        let ds = DataSource::new(1, "ds", "loki").with_team_ids([3, 1]);
        assert_eq!(ds.allowed_teams, "1,3");
        assert!(ds.is_restricted());

        let cleared = ds.with_team_ids(Vec::new());
        assert_eq!(cleared.allowed_teams, "");
        assert!(!cleared.is_restricted());
    }

    #[test]
    fn test_serde_shape() {
        let ds = DataSource::new(1, "Prom", "prometheus")
            .with_uid("prom")
            .with_allowed_teams("1,2");
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["type"], "prometheus");
        assert_eq!(json["allowed_teams"], "1,2");

        let parsed: DataSource = serde_json::from_value(serde_json::json!({
            "id": 4,
            "uid": "legacy",
            "org_id": 1,
            "name": "Legacy",
            "type": "mysql",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(parsed.allowed_teams, "");
        assert!(!parsed.is_restricted());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(DataSourceKey::Id(3).to_string(), "id=3");
        assert_eq!(DataSourceKey::Uid("abc".into()).to_string(), "uid=abc");
    }

    #[tokio::test]
    async fn test_store_lookup_by_id_and_uid() {
        let store = InMemoryDataSourceStore::new();
        let first = store
            .insert(DataSource::new(1, "first", "loki").with_uid("first"))
            .await;
        let second = store.insert(DataSource::new(1, "second", "loki")).await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let found = store
            .get_data_source(&GetDataSourceQuery::by_id(1, 2))
            .await
            .unwrap();
        assert_eq!(found.name, "second");

        let found = store
            .get_data_source(&GetDataSourceQuery::by_uid(1, "first"))
            .await
            .unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn test_store_lookup_is_org_scoped() {
        let store = InMemoryDataSourceStore::new();
        store.insert(DataSource::new(2, "other org", "loki")).await;

        let err = store
            .get_data_source(&GetDataSourceQuery::by_id(1, 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GuardianError::DataSourceNotFound {
                org_id: 1,
                key: DataSourceKey::Id(1)
            }
        );
        assert_eq!(store.list(1).await.len(), 0);
        assert_eq!(store.list(2).await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_update() {
        let store = InMemoryDataSourceStore::new();
        let stored = store.insert(DataSource::new(1, "ds", "loki")).await;

        let updated = store
            .update(stored.clone().with_team_ids([4]))
            .await
            .unwrap();
        assert_eq!(updated.created, stored.created);

        let found = store
            .get_data_source(&GetDataSourceQuery::by_id(1, stored.id))
            .await
            .unwrap();
        assert_eq!(found.allowed_teams, "4");

        let missing = DataSource::new(1, "missing", "loki").with_id(99);
        assert!(store.update(missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_store_insert_with_existing_id_replaces() {
        let store = InMemoryDataSourceStore::new();
        store
            .insert(DataSource::new(1, "first", "loki").with_id(1))
            .await;
        store
            .insert(DataSource::new(1, "second", "loki").with_id(1).with_team_ids([2]))
            .await;

        let all = store.list(1).await;
        assert_eq!(all.len(), 1);

        let found = store
            .get_data_source(&GetDataSourceQuery::by_id(1, 1))
            .await
            .unwrap();
        assert_eq!(found.name, "second");
        assert_eq!(found.allowed_teams, "2");

        // Same ID in another organization is a separate record.
        store
            .insert(DataSource::new(2, "other", "loki").with_id(1))
            .await;
        assert_eq!(store.list(1).await.len(), 1);
        assert_eq!(store.list(2).await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_injected_failure() {
        let store = InMemoryDataSourceStore::with_data_sources(vec![
            DataSource::new(1, "ds", "loki").with_id(1),
        ]);
        store
            .fail_lookups(Some(GuardianError::Store("connection refused".into())))
            .await;

        let err = store
            .get_data_source(&GetDataSourceQuery::by_id(1, 1))
            .await
            .unwrap_err();
        assert_eq!(err, GuardianError::Store("connection refused".into()));
    }
}
