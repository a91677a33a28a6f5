//! # Allowed Teams
//!
//! A data source stores the teams allowed to query it as a comma-separated
//! string (`"1, 2, 3"`). This module turns that string into a value that
//! access decisions can test membership against, and formats a team
//! selection back into the stored form.

use std::collections::BTreeSet;
use tracing::warn;

/// Parsed allow-list of a data source.
///
/// An empty or all-whitespace source string means the data source is
/// unrestricted. Any other string restricts access to the team IDs it
/// contains; tokens that are not integers match nothing.
///
/// # Example
///
/// ```
/// use datasource_guardian::AllowedTeams;
///
/// let teams = AllowedTeams::parse("1, 2, 3");
/// assert!(teams.contains(2));
/// assert!(!teams.contains(4));
/// assert!(teams.admits(&[4, 3]));
///
/// assert!(AllowedTeams::parse("   ").is_unrestricted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowedTeams {
    /// Every identity in the organization may query.
    #[default]
    Unrestricted,
    /// Only members of these teams may query.
    Teams(BTreeSet<i64>),
}

impl AllowedTeams {
    /// Parse the stored allow-list string.
    ///
    /// The string is split on commas and each token is trimmed. Empty tokens
    /// are skipped. Tokens that do not parse as an integer are logged and
    /// dropped, so they never match a team but never fail the decision
    /// either.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Unrestricted;
        }

        let mut teams = BTreeSet::new();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<i64>() {
                Ok(id) => {
                    teams.insert(id);
                }
                Err(e) => {
                    warn!(
                        token = %token,
                        allowed_teams = %raw,
                        error = %e,
                        "Ignoring malformed team ID in data source allowed teams"
                    );
                }
            }
        }
        Self::Teams(teams)
    }

    /// Whether the data source is open to the whole organization.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Check whether members of `team_id` may query.
    ///
    /// Always `true` for an unrestricted allow-list.
    pub fn contains(&self, team_id: i64) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Teams(teams) => teams.contains(&team_id),
        }
    }

    /// Check whether a user belonging to `user_teams` may query.
    ///
    /// # Arguments
    ///
    /// * `user_teams` - IDs of every team the user belongs to
    ///
    /// # Returns
    ///
    /// `true` if the allow-list is unrestricted or shares at least one team
    /// with `user_teams`
    pub fn admits(&self, user_teams: &[i64]) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Teams(teams) => user_teams.iter().any(|id| teams.contains(id)),
        }
    }

    /// The restricted team IDs, `None` when unrestricted.
    pub fn team_ids(&self) -> Option<&BTreeSet<i64>> {
        match self {
            Self::Unrestricted => None,
            Self::Teams(teams) => Some(teams),
        }
    }
}

/// Format a team selection into the stored allow-list form.
///
/// IDs are deduplicated, sorted and comma-joined without spaces. An empty
/// selection formats as the empty string, which means unrestricted.
///
/// # Example
///
/// ```
/// use datasource_guardian::format_team_ids;
///
/// assert_eq!(format_team_ids([3, 1, 3]), "1,3");
/// assert_eq!(format_team_ids(Vec::<i64>::new()), "");
/// ```
pub fn format_team_ids(ids: impl IntoIterator<Item = i64>) -> String {
    ids.into_iter()
        .collect::<BTreeSet<_>>()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_unrestricted() {
        assert_eq!(AllowedTeams::parse(""), AllowedTeams::Unrestricted);
        assert_eq!(AllowedTeams::parse("  \t "), AllowedTeams::Unrestricted);
        assert!(AllowedTeams::parse("").contains(1));
        assert!(AllowedTeams::parse("").admits(&[]));
    }

    #[test]
    fn test_single_team() {
        let teams = AllowedTeams::parse("1");
        assert!(teams.contains(1));
        assert!(!teams.contains(2));
    }

    #[test]
    fn test_multiple_teams() {
        let teams = AllowedTeams::parse("1,2");
        assert!(teams.contains(1));
        assert!(teams.contains(2));
        assert!(!teams.contains(3));
    }

    #[test]
    fn test_whitespace_insensitive() {
        assert_eq!(AllowedTeams::parse("1, 2, 3"), AllowedTeams::parse("1,2,3"));
        assert!(AllowedTeams::parse(" 1 ,  2 ,3 ").contains(2));
    }

    #[test]
    fn test_malformed_tokens_do_not_match() {
        let teams = AllowedTeams::parse("1, abc, 3");
        assert!(teams.contains(1));
        assert!(teams.contains(3));
        assert_eq!(teams.team_ids().map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_only_malformed_tokens_stay_restricted() {
        let teams = AllowedTeams::parse("abc");
        assert!(!teams.is_unrestricted());
        assert!(!teams.admits(&[1, 2, 3]));

        let commas = AllowedTeams::parse(",,");
        assert!(!commas.is_unrestricted());
        assert!(!commas.admits(&[1]));
    }

    #[test]
    fn test_admits_intersection() {
        let teams = AllowedTeams::parse("1,2,3");
        assert!(teams.admits(&[3]));
        assert!(teams.admits(&[9, 1]));
        assert!(!teams.admits(&[4]));
        assert!(!teams.admits(&[]));
    }

    #[test]
    fn test_negative_and_large_ids() {
        let teams = AllowedTeams::parse("-1, 9223372036854775807");
        assert!(teams.contains(-1));
        assert!(teams.contains(i64::MAX));
        assert!(!AllowedTeams::parse("9223372036854775808").contains(0));
    }

    #[test]
    fn test_format_team_ids() {
        assert_eq!(format_team_ids([1, 2, 3]), "1,2,3");
        assert_eq!(format_team_ids([2, 2, 1]), "1,2");
        assert_eq!(format_team_ids(Vec::<i64>::new()), "");
    }

    #[test]
    fn test_formatted_selection_parses_back() {
        let raw = format_team_ids([5, 7]);
        let teams = AllowedTeams::parse(&raw);
        assert_eq!(teams.team_ids().cloned(), Some(BTreeSet::from([5, 7])));
    }
}
