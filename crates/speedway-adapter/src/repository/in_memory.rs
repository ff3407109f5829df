//! In-Memory Repository Implementations
//!
//! Thread-safe stores for development, the CLI and tests. Clones share the
//! same underlying map.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use speedway_domain::{
    check_revision, Match, MatchId, MatchRepository, MatchSnapshot, RepositoryError,
    RosterProvider, SnapshotRepository, Team, TeamId,
};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read().map_err(|_| RepositoryError::Persistence {
        message: "Failed to acquire read lock".to_string(),
    })
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write().map_err(|_| RepositoryError::Persistence {
        message: "Failed to acquire write lock".to_string(),
    })
}

/// In-memory Match Repository with optimistic revision checks
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchRepository {
    matches: Arc<RwLock<HashMap<String, Match>>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchRepository for InMemoryMatchRepository {
    fn save(&self, record: &Match) -> Result<u64, RepositoryError> {
        let mut matches = write(&self.matches)?;
        let stored = matches.get(record.id().as_str()).map(Match::revision);
        check_revision(record.id(), stored, record.revision())?;

        let mut next = record.clone();
        next.advance_revision();
        let revision = next.revision();
        matches.insert(record.id().as_str().to_string(), next);
        Ok(revision)
    }

    fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        Ok(read(&self.matches)?.get(id.as_str()).cloned())
    }

    fn delete(&self, id: &MatchId) -> Result<(), RepositoryError> {
        write(&self.matches)?
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound {
                id: id.as_str().to_string(),
            })
    }

    fn list(&self) -> Result<Vec<Match>, RepositoryError> {
        let mut matches: Vec<Match> = read(&self.matches)?.values().cloned().collect();
        matches.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        Ok(matches)
    }
}

/// In-memory snapshot store; a second save for the same match overwrites
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotRepository {
    snapshots: Arc<RwLock<HashMap<String, MatchSnapshot>>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save_snapshot(&self, snapshot: &MatchSnapshot) -> Result<(), RepositoryError> {
        write(&self.snapshots)?.insert(snapshot.match_id.as_str().to_string(), snapshot.clone());
        Ok(())
    }

    fn find_snapshot(&self, id: &MatchId) -> Result<Option<MatchSnapshot>, RepositoryError> {
        Ok(read(&self.snapshots)?.get(id.as_str()).cloned())
    }
}

/// Rosters held in memory, usually loaded from a league file
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterProvider {
    teams: Arc<RwLock<HashMap<String, Team>>>,
}

impl InMemoryRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        let teams = teams
            .into_iter()
            .map(|t| (t.id.as_str().to_string(), t))
            .collect();
        Self {
            teams: Arc::new(RwLock::new(teams)),
        }
    }

    /// Register or replace a team
    pub fn register(&self, team: Team) -> Result<(), RepositoryError> {
        write(&self.teams)?.insert(team.id.as_str().to_string(), team);
        Ok(())
    }
}

impl RosterProvider for InMemoryRosterProvider {
    fn team(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError> {
        Ok(read(&self.teams)?.get(id.as_str()).cloned())
    }

    fn list_teams(&self) -> Result<Vec<Team>, RepositoryError> {
        let mut teams: Vec<Team> = read(&self.teams)?.values().cloned().collect();
        teams.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(teams)
    }
}
