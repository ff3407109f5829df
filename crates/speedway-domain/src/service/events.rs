//! Match events
//!
//! The domain services report what happened; they never log or notify.
//! The caller decides what to do with an event.

use serde::{Deserialize, Serialize};

use crate::model::match_record::Score;
use crate::model::snapshot::{MatchSnapshot, Resolution, Verification};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchCreated {
        match_id: String,
        home_team_id: String,
        away_team_id: String,
        heats: usize,
    },
    /// One gate changed hands
    SubstitutionApplied {
        match_id: String,
        heat: u8,
        gate: u8,
        outgoing: Option<String>,
        incoming: String,
    },
    HeatScored {
        match_id: String,
        heat: u8,
        home_delta: u32,
        away_delta: u32,
        score: Score,
    },
    NominationsResolved {
        match_id: String,
        heats: Vec<u8>,
    },
    MatchConfirmed {
        match_id: String,
        score: Score,
        verification: Verification,
    },
    DiscrepancyResolved {
        match_id: String,
        resolution: Resolution,
        score: Score,
    },
}

impl MatchEvent {
    pub fn match_id(&self) -> &str {
        match self {
            MatchEvent::MatchCreated { match_id, .. }
            | MatchEvent::SubstitutionApplied { match_id, .. }
            | MatchEvent::HeatScored { match_id, .. }
            | MatchEvent::NominationsResolved { match_id, .. }
            | MatchEvent::MatchConfirmed { match_id, .. }
            | MatchEvent::DiscrepancyResolved { match_id, .. } => match_id,
        }
    }

    /// Short stable name, used as the audit action
    pub fn name(&self) -> &'static str {
        match self {
            MatchEvent::MatchCreated { .. } => "match_created",
            MatchEvent::SubstitutionApplied { .. } => "substitution_applied",
            MatchEvent::HeatScored { .. } => "heat_scored",
            MatchEvent::NominationsResolved { .. } => "nominations_resolved",
            MatchEvent::MatchConfirmed { .. } => "match_confirmed",
            MatchEvent::DiscrepancyResolved { .. } => "discrepancy_resolved",
        }
    }

    pub fn confirmed(snapshot: &MatchSnapshot) -> Self {
        MatchEvent::MatchConfirmed {
            match_id: snapshot.match_id.as_str().to_string(),
            score: snapshot.score,
            verification: snapshot.verification.clone(),
        }
    }

    pub fn resolved(snapshot: &MatchSnapshot, resolution: Resolution) -> Self {
        MatchEvent::DiscrepancyResolved {
            match_id: snapshot.match_id.as_str().to_string(),
            resolution,
            score: snapshot.score,
        }
    }
}
