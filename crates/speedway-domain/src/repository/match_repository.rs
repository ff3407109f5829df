//! Match Repository - Abstract persistence for Matches and their snapshots
//!
//! Saves are optimistic: a write carries the revision it was read at and
//! is refused if someone else has written since.

use thiserror::Error;

use crate::model::match_record::{Match, MatchId};
use crate::model::snapshot::MatchSnapshot;

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Match not found: {id}")]
    NotFound { id: String },

    /// The stored record moved on since it was read
    #[error("Stale write for match {id}: read at revision {expected}, store is at {found}")]
    Conflict { id: String, expected: u64, found: u64 },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

/// Decide whether a write at `incoming` may replace a record at `stored`
///
/// A record that is not stored yet may only be written at revision 0.
pub fn check_revision(
    id: &MatchId,
    stored: Option<u64>,
    incoming: u64,
) -> Result<(), RepositoryError> {
    let found = stored.unwrap_or(0);
    if found != incoming {
        return Err(RepositoryError::Conflict {
            id: id.as_str().to_string(),
            expected: incoming,
            found,
        });
    }
    Ok(())
}

/// Match Repository Trait
///
/// This is a PORT in hexagonal architecture.
pub trait MatchRepository {
    /// Create or update a match
    ///
    /// Implementations must call [`check_revision`] against the stored copy
    /// and persist the match with its revision advanced by one. Returns the
    /// new revision.
    fn save(&self, record: &Match) -> Result<u64, RepositoryError>;

    fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError>;

    /// Like `find_by_id`, but a missing match is an error
    fn get(&self, id: &MatchId) -> Result<Match, RepositoryError> {
        self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            id: id.as_str().to_string(),
        })
    }

    fn delete(&self, id: &MatchId) -> Result<(), RepositoryError>;

    fn list(&self) -> Result<Vec<Match>, RepositoryError>;

    fn exists(&self, id: &MatchId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

/// Storage for confirmed-match snapshots
///
/// Re-confirming a match overwrites its snapshot.
pub trait SnapshotRepository {
    fn save_snapshot(&self, snapshot: &MatchSnapshot) -> Result<(), RepositoryError>;

    fn find_snapshot(&self, id: &MatchId) -> Result<Option<MatchSnapshot>, RepositoryError>;
}
