//! Errors surfaced by the match service

use speedway_domain::{MatchError, MatchId, RepositoryError, TeamId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A match rule refused the request
    #[error(transparent)]
    Rule(#[from] MatchError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Match {0} has not been confirmed")]
    SnapshotNotFound(MatchId),

    #[error("Match {0} is confirmed and can no longer change")]
    AlreadyConfirmed(MatchId),
}

impl ServiceError {
    /// Stable label for logs and audit entries
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Rule(e) => e.kind().as_str(),
            ServiceError::Repository(RepositoryError::Conflict { .. }) => "conflict",
            ServiceError::Repository(_) => "repository",
            ServiceError::MatchNotFound(_)
            | ServiceError::TeamNotFound(_)
            | ServiceError::SnapshotNotFound(_) => "not_found",
            ServiceError::AlreadyConfirmed(_) => "confirmed",
        }
    }

    /// The rule violation behind this error, if any
    pub fn rule(&self) -> Option<&MatchError> {
        match self {
            ServiceError::Rule(e) => Some(e),
            _ => None,
        }
    }
}
