//! Guardian configuration.
//!
//! Configuration is loaded from environment variables, defaulting to
//! team-based access.

use serde::{Deserialize, Serialize};

/// Environment variable toggling team-based data source access.
pub const TEAM_ACCESS_ENABLED_VAR: &str = "DATASOURCE_TEAM_ACCESS_ENABLED";

/// Deployment-level guardian configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianConfig {
    /// Enforce data source team restrictions. When disabled, every requester
    /// may query every data source.
    #[serde(default = "default_team_access_enabled")]
    pub team_access_enabled: bool,
}

const fn default_team_access_enabled() -> bool {
    true
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            team_access_enabled: default_team_access_enabled(),
        }
    }
}

impl GuardianConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATASOURCE_TEAM_ACCESS_ENABLED`: Enforce team restrictions (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        Self {
            team_access_enabled: lookup(TEAM_ACCESS_ENABLED_VAR)
                .map(|s| parse_flag(&s).unwrap_or(default.team_access_enabled))
                .unwrap_or(default.team_access_enabled),
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> GuardianConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GuardianConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        assert!(GuardianConfig::default().team_access_enabled);
        assert!(load(&[]).team_access_enabled);
    }

    #[test]
    fn test_disable_from_env() {
        assert!(!load(&[(TEAM_ACCESS_ENABLED_VAR, "false")]).team_access_enabled);
        assert!(!load(&[(TEAM_ACCESS_ENABLED_VAR, "0")]).team_access_enabled);
        assert!(!load(&[(TEAM_ACCESS_ENABLED_VAR, " OFF ")]).team_access_enabled);
    }

    #[test]
    fn test_unrecognized_value_keeps_default() {
        assert!(load(&[(TEAM_ACCESS_ENABLED_VAR, "maybe")]).team_access_enabled);
    }

    #[test]
    fn test_deserialize_missing_field() {
        let config: GuardianConfig = serde_json::from_str("{}").unwrap();
        assert!(config.team_access_enabled);
    }
}
