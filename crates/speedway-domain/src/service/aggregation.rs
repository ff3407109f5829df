//! Match Aggregator - Totals, standings and confirmation
//!
//! Team totals are always recomputed from the completed heats, never
//! patched incrementally. Bonus points appear in rider standings only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::model::gate::Side;
use crate::model::match_record::{Match, Score};
use crate::model::rider::{RiderId, Rosters};
use crate::model::schedule::HEAT_COUNT;
use crate::model::snapshot::{MatchSnapshot, OfficialScore};

/// Results a heat needs before the match can be confirmed
pub const RESULTS_PER_HEAT: usize = 4;

/// One rider's line on the scoresheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderStanding {
    pub rider_id: RiderId,
    pub rider_name: String,
    pub side: Side,
    pub lineup_number: u8,
    pub points: u32,
    pub bonus_points: u32,
    pub heats: usize,
}

impl RiderStanding {
    pub fn total(&self) -> u32 {
        self.points + self.bonus_points
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAggregator;

impl MatchAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Base points over every completed heat
    pub fn totals(&self, record: &Match) -> Score {
        self.sum(record, |_| true)
    }

    /// The score going into `heat_number`: completed heats numbered below it
    pub fn score_before(&self, record: &Match, heat_number: u8) -> Score {
        self.sum(record, |number| number < heat_number)
    }

    /// Recompute the stored totals from scratch
    pub fn recompute(&self, record: &mut Match) -> Score {
        let totals = self.totals(record);
        record.set_score(totals);
        totals
    }

    fn sum(&self, record: &Match, include: impl Fn(u8) -> bool) -> Score {
        record
            .heats()
            .iter()
            .filter(|h| h.is_completed() && include(h.number))
            .fold(Score::default(), |mut score, heat| {
                let (home, away) = heat.side_points();
                score.add(Side::Home, home);
                score.add(Side::Away, away);
                score
            })
    }

    /// Per-rider points, bonus and heats raced, best first
    pub fn rider_standings(&self, record: &Match, rosters: &Rosters) -> Vec<RiderStanding> {
        let mut index: HashMap<&RiderId, usize> = HashMap::new();
        let mut standings: Vec<RiderStanding> = Vec::new();

        for side in [Side::Home, Side::Away] {
            for rider in &rosters.team(side).riders {
                index.insert(&rider.id, standings.len());
                standings.push(RiderStanding {
                    rider_id: rider.id.clone(),
                    rider_name: rider.name.clone(),
                    side,
                    lineup_number: rider.lineup_number,
                    points: 0,
                    bonus_points: 0,
                    heats: 0,
                });
            }
        }

        for heat in record.heats().iter().filter(|h| h.is_completed()) {
            for result in &heat.results {
                if let Some(&idx) = index.get(&result.rider_id) {
                    let standing = &mut standings[idx];
                    standing.points += result.points;
                    standing.bonus_points += result.bonus_points;
                    standing.heats += 1;
                }
            }
        }

        standings.sort_by(|a, b| {
            b.total()
                .cmp(&a.total())
                .then(b.points.cmp(&a.points))
                .then(a.side.cmp(&b.side))
                .then(a.lineup_number.cmp(&b.lineup_number))
        });
        standings
    }

    /// Every heat completed with a full set of results
    pub fn ensure_complete(&self, record: &Match) -> Result<(), MatchError> {
        let completed = record
            .heats()
            .iter()
            .filter(|h| h.is_completed() && h.results.len() >= RESULTS_PER_HEAT)
            .count();
        if completed < HEAT_COUNT {
            return Err(MatchError::Incomplete {
                completed,
                required: HEAT_COUNT,
            });
        }
        Ok(())
    }

    /// Confirm the match and take its snapshot
    ///
    /// Leaves the match untouched on failure. Confirming again is allowed and
    /// produces a fresh snapshot.
    pub fn confirm(
        &self,
        record: &mut Match,
        official: Option<OfficialScore>,
    ) -> Result<MatchSnapshot, MatchError> {
        self.ensure_complete(record)?;

        let score = self.recompute(record);
        record.mark_confirmed();

        Ok(MatchSnapshot {
            match_id: record.id().clone(),
            home_team_id: record.home_team_id().clone(),
            away_team_id: record.away_team_id().clone(),
            score,
            heats: record.heats().to_vec(),
            rules: record.rules().clone(),
            official,
            verification: MatchSnapshot::verify(score, official),
        })
    }
}
