//! Error types for identity and team operations

use thiserror::Error;

/// Organization error types.
///
/// These errors cover identity resolution and team membership lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrgError {
    /// The requester is not backed by a user record
    #[error("Identity is not a signed-in user: {0}")]
    NotASignedInUser(String),

    /// Team membership could not be retrieved
    #[error("Team lookup failed: {0}")]
    TeamLookup(String),
}

/// Result type for organization operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Check if this error came from resolving the caller's identity.
    pub fn is_identity_error(&self) -> bool {
        matches!(self, OrgError::NotASignedInUser(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::NotASignedInUser(_) => "NOT_A_SIGNED_IN_USER",
            OrgError::TeamLookup(_) => "TEAM_LOOKUP_FAILED",
        }
    }
}
