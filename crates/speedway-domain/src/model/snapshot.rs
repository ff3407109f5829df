//! MatchSnapshot - The read-only record of a confirmed match
//!
//! Confirmation copies the heats and totals out of the live Match. If an
//! official result is known, the snapshot also records whether the two agree.

use serde::{Deserialize, Serialize};

use super::gate::Side;
use super::heat::Heat;
use super::match_record::{MatchId, Score};
use super::rider::TeamId;
use super::rules::Rules;
use crate::error::MatchError;

/// Final score published by the league, supplied from outside the engine
pub type OfficialScore = Score;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub side: Side,
    pub user_value: u32,
    pub official_value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    /// No official result to compare with
    Unverified,
    Validated,
    Disputed { discrepancies: Vec<Discrepancy> },
}

/// How a disputed snapshot is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    AcceptOfficial,
    KeepUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub score: Score,
    pub heats: Vec<Heat>,
    pub rules: Rules,
    pub official: Option<OfficialScore>,
    pub verification: Verification,
}

impl MatchSnapshot {
    /// Compare the recorded score with an official one
    pub fn verify(recorded: Score, official: Option<OfficialScore>) -> Verification {
        let Some(official) = official else {
            return Verification::Unverified;
        };

        let discrepancies: Vec<Discrepancy> = [Side::Home, Side::Away]
            .into_iter()
            .filter(|side| recorded.of(*side) != official.of(*side))
            .map(|side| Discrepancy {
                side,
                user_value: recorded.of(side),
                official_value: official.of(side),
            })
            .collect();

        if discrepancies.is_empty() {
            Verification::Validated
        } else {
            Verification::Disputed { discrepancies }
        }
    }

    pub fn is_disputed(&self) -> bool {
        matches!(self.verification, Verification::Disputed { .. })
    }

    /// Settle a dispute, optionally adopting the official totals
    pub fn resolve(&mut self, resolution: Resolution) -> Result<(), MatchError> {
        if !self.is_disputed() {
            return Err(MatchError::structural(format!(
                "match {} has no discrepancy to resolve",
                self.match_id
            )));
        }

        if resolution == Resolution::AcceptOfficial {
            let official = self.official.ok_or_else(|| {
                MatchError::structural("no official result is attached to this match")
            })?;
            self.score = official;
        }
        self.verification = Verification::Validated;
        Ok(())
    }
}
