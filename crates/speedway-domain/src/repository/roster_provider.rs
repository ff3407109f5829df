//! Roster Provider - Where teams come from
//!
//! The engine never edits a roster. It asks for both teams once per
//! request and works on that copy.

use super::match_repository::RepositoryError;
use crate::model::rider::{Team, TeamId};

pub trait RosterProvider {
    /// Look up a team and its ordered roster
    fn team(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError>;

    fn list_teams(&self) -> Result<Vec<Team>, RepositoryError>;
}
