//! # Speedway Domain Layer
//!
//! The match-heat rules engine: pure business logic, no I/O.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities & Value Objects                      ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Domain services (fixture, scoring, ...)       ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow of a match
//!
//! ```text
//! RosterProvider ─► FixtureGenerator ─► (SubstitutionValidator ─► HeatScorer) x13
//!                ─► NominationResolver ─► HeatScorer x2 ─► MatchAggregator
//! ```
//!
//! Every service here is a synchronous function over an immutable snapshot.
//! Rosters and rules are handed in by the caller; nothing reaches out.

pub mod error;
pub mod model;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::{ErrorKind, MatchError};

pub use model::{
    gate::{Gate, GateAssignment, HelmetColor, RiderSlot, Side},
    heat::{Heat, HeatResult, HeatStatus, ReportedResult, SubstitutionRecord},
    match_record::{Match, MatchId, MatchStatus, Score},
    rider::{Rider, RiderId, RiderRole, Rosters, Team, TeamId},
    rules::{NominationRules, RideLimits, Rules, TacticalRules},
    schedule::{GateCell, Schedule, ScheduleError, ELITSERIEN_2_15_7},
    snapshot::{Discrepancy, MatchSnapshot, OfficialScore, Resolution, Verification},
};

pub use repository::{
    match_repository::{check_revision, MatchRepository, RepositoryError, SnapshotRepository},
    roster_provider::RosterProvider,
};

pub use service::{
    aggregation::{MatchAggregator, RiderStanding},
    events::MatchEvent,
    fixture::FixtureGenerator,
    nomination::{Eligibility, HeatNomination, NominationResolver, Nominations},
    scoring::{points_for, HeatScore, HeatScorer},
    substitution::{GateChange, SubstitutionRequest, SubstitutionValidator},
};
