//! Heat Scorer - Finishing order to points
//!
//! Base points are 3-2-1-0. Excluded riders score nothing. A rider who
//! finishes directly behind a teammate may earn an individual bonus point,
//! which never counts towards the team total.

use std::collections::HashSet;

use super::aggregation::MatchAggregator;
use super::events::MatchEvent;
use crate::error::MatchError;
use crate::model::gate::Side;
use crate::model::heat::{Heat, HeatResult, HeatStatus, ReportedResult};
use crate::model::match_record::Match;

/// Points for positions 1-4
pub const POSITION_POINTS: [u32; 4] = [3, 2, 1, 0];

pub fn points_for(position: u8) -> u32 {
    usize::from(position)
        .checked_sub(1)
        .and_then(|idx| POSITION_POINTS.get(idx))
        .copied()
        .unwrap_or(0)
}

/// The scored outcome of one heat, not yet written to the match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatScore {
    pub heat: u8,
    pub results: Vec<HeatResult>,
    pub home_delta: u32,
    pub away_delta: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeatScorer;

impl HeatScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a heat from the reported finishing order
    ///
    /// Results come back ranked by position, excluded riders last.
    pub fn score(&self, heat: &Heat, reported: &[ReportedResult]) -> Result<HeatScore, MatchError> {
        if heat.has_placeholder() {
            return Err(MatchError::structural(format!(
                "heat {} still awaits nominations",
                heat.number
            )));
        }
        if reported.is_empty() {
            return Err(MatchError::structural(format!(
                "no results reported for heat {}",
                heat.number
            )));
        }

        let mut seen_riders = HashSet::new();
        let mut seen_positions = HashSet::new();
        let mut results = Vec::with_capacity(reported.len());

        for entry in reported {
            let slot = heat
                .gate_of(&entry.rider_id)
                .and_then(|gate| heat.gate(gate).rider())
                .ok_or_else(|| {
                    MatchError::structural(format!(
                        "rider {} is not in heat {}",
                        entry.rider_id, heat.number
                    ))
                })?;
            if !seen_riders.insert(&entry.rider_id) {
                return Err(MatchError::structural(format!(
                    "rider {} is reported twice",
                    entry.rider_id
                )));
            }

            let points = if entry.excluded {
                0
            } else {
                let position = entry
                    .position
                    .filter(|p| (1..=4).contains(p))
                    .ok_or_else(|| {
                        MatchError::structural(format!(
                            "rider {} needs a position 1-4 or an exclusion",
                            entry.rider_id
                        ))
                    })?;
                if !seen_positions.insert(position) {
                    return Err(MatchError::structural(format!(
                        "position {} is reported twice",
                        position
                    )));
                }
                points_for(position)
            };

            results.push(HeatResult {
                rider_id: entry.rider_id.clone(),
                side: slot.side,
                position: entry.position,
                excluded: entry.excluded,
                points,
                bonus_points: 0,
            });
        }

        // Ranked finishers first, in position order
        results.sort_by_key(|r| (r.excluded, r.position.unwrap_or(u8::MAX)));
        award_bonus(&mut results);

        let (home_delta, away_delta) = results.iter().fold((0, 0), |(home, away), r| {
            match r.side {
                Side::Home => (home + r.points, away),
                Side::Away => (home, away + r.points),
            }
        });

        Ok(HeatScore {
            heat: heat.number,
            results,
            home_delta,
            away_delta,
        })
    }

    /// Write a score into the match and refresh the totals
    ///
    /// Re-scoring a heat replaces its earlier results.
    pub fn apply(&self, record: &mut Match, score: HeatScore) -> Result<MatchEvent, MatchError> {
        let heat = record.heat_mut(score.heat).ok_or_else(|| {
            MatchError::structural(format!("heat {} does not exist", score.heat))
        })?;
        heat.results = score.results;
        heat.status = HeatStatus::Completed;

        let totals = MatchAggregator::new().recompute(record);
        Ok(MatchEvent::HeatScored {
            match_id: record.id().as_str().to_string(),
            heat: score.heat,
            home_delta: score.home_delta,
            away_delta: score.away_delta,
            score: totals,
        })
    }
}

/// Mark the bonus point, looking at the first three finishers only
///
/// `results` must already be ranked with excluded riders at the end.
fn award_bonus(results: &mut [HeatResult]) {
    let ranked = results.iter().take_while(|r| !r.excluded).count();
    if ranked < 3 {
        return;
    }

    if results[0].side == results[1].side {
        results[1].bonus_points = 1;
    } else if results[1].side == results[2].side {
        results[2].bonus_points = 1;
    }
}
