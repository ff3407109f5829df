//! Rider and Team - The people on the start line
//!
//! A Rider is an Entity owned by a Team. From the engine's point of view
//! both are read-only: rosters are fetched once per request and handed in.

use serde::{Deserialize, Serialize};

use super::gate::Side;

/// Unique identifier for a Rider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(String);

impl RiderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RiderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a Team
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TeamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main riders carry lineup numbers 1-5, reserves 6-7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderRole {
    Main,
    Reserve,
}

impl RiderRole {
    /// Lineup numbers that belong to this role
    pub fn lineup_range(&self) -> core::ops::RangeInclusive<u8> {
        match self {
            RiderRole::Main => 1..=5,
            RiderRole::Reserve => 6..=7,
        }
    }
}

/// A registered rider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    pub team_id: TeamId,
    pub lineup_number: u8,
    #[serde(default)]
    pub is_reserve: bool,
}

impl Rider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        team_id: TeamId,
        lineup_number: u8,
    ) -> Self {
        Self {
            id: RiderId::new(id),
            name: name.into(),
            team_id,
            lineup_number,
            is_reserve: lineup_number >= 6,
        }
    }

    pub fn role(&self) -> RiderRole {
        if self.is_reserve {
            RiderRole::Reserve
        } else {
            RiderRole::Main
        }
    }
}

/// A team and its ordered roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub riders: Vec<Rider>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            riders: Vec::new(),
        }
    }

    pub fn with_rider(mut self, rider: Rider) -> Self {
        self.riders.push(rider);
        self
    }

    pub fn rider(&self, id: &RiderId) -> Option<&Rider> {
        self.riders.iter().find(|r| &r.id == id)
    }

    pub fn by_lineup(&self, lineup_number: u8) -> Option<&Rider> {
        self.riders.iter().find(|r| r.lineup_number == lineup_number)
    }

    pub fn main_riders(&self) -> impl Iterator<Item = &Rider> {
        self.riders.iter().filter(|r| r.role() == RiderRole::Main)
    }
}

/// Both rosters of a match, addressed by side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rosters {
    pub home: Team,
    pub away: Team,
}

impl Rosters {
    pub fn new(home: Team, away: Team) -> Self {
        Self { home, away }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Find a rider in either roster, together with the side it rides for
    pub fn find(&self, id: &RiderId) -> Option<(Side, &Rider)> {
        if let Some(rider) = self.home.rider(id) {
            return Some((Side::Home, rider));
        }
        self.away.rider(id).map(|rider| (Side::Away, rider))
    }
}
