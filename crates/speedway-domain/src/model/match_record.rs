//! Match - The record every mutation reads and rewrites
//!
//! A Match is an Entity. Its heats, scores and frozen rules travel together,
//! and the revision counter lets repositories reject stale writes.

use serde::{Deserialize, Serialize};

use super::gate::Side;
use super::heat::Heat;
use super::rider::{RiderId, TeamId};
use super::rules::Rules;

/// Unique identifier for a Match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MatchId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Upcoming,
    Confirmed,
}

/// Team totals (base points only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// How far `side` is behind its opponent (negative when ahead)
    pub fn trailing_by(&self, side: Side) -> i64 {
        i64::from(self.of(side.opponent())) - i64::from(self.of(side))
    }

    pub fn add(&mut self, side: Side, points: u32) {
        match side {
            Side::Home => self.home += points,
            Side::Away => self.away += points,
        }
    }
}

impl core::fmt::Display for Score {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    home_team_id: TeamId,
    away_team_id: TeamId,
    heats: Vec<Heat>,
    score: Score,
    status: MatchStatus,
    rules: Rules,
    #[serde(default)]
    revision: u64,
}

impl Match {
    /// Create a match from a generated fixture
    pub fn new(
        id: MatchId,
        home_team_id: TeamId,
        away_team_id: TeamId,
        heats: Vec<Heat>,
        rules: Rules,
    ) -> Self {
        Self {
            id,
            home_team_id,
            away_team_id,
            heats,
            score: Score::default(),
            status: MatchStatus::Upcoming,
            rules,
            revision: 0,
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &MatchId {
        &self.id
    }

    pub fn home_team_id(&self) -> &TeamId {
        &self.home_team_id
    }

    pub fn away_team_id(&self) -> &TeamId {
        &self.away_team_id
    }

    pub fn team_id(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home_team_id,
            Side::Away => &self.away_team_id,
        }
    }

    pub fn heats(&self) -> &[Heat] {
        &self.heats
    }

    pub fn heat(&self, number: u8) -> Option<&Heat> {
        self.heats.iter().find(|h| h.number == number)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == MatchStatus::Confirmed
    }

    /// Number of heats a rider is currently scheduled into
    pub fn rides_of(&self, rider_id: &RiderId) -> usize {
        self.heats
            .iter()
            .filter(|h| h.contains_rider(rider_id))
            .count()
    }

    /// How many times a rider has replaced another rider as a substitute
    pub fn substitutions_of(&self, rider_id: &RiderId) -> usize {
        self.heats
            .iter()
            .flat_map(|h| h.substitutions.iter())
            .filter(|s| s.outgoing.is_some() && &s.incoming == rider_id)
            .count()
    }

    pub fn completed_heats(&self) -> usize {
        self.heats.iter().filter(|h| h.is_completed()).count()
    }

    // ========== Mutations ==========

    pub fn heat_mut(&mut self, number: u8) -> Option<&mut Heat> {
        self.heats.iter_mut().find(|h| h.number == number)
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    pub fn mark_confirmed(&mut self) {
        self.status = MatchStatus::Confirmed;
    }

    /// Bump the revision after a successful write
    pub fn advance_revision(&mut self) {
        self.revision += 1;
    }
}
