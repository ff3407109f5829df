//! Fixture Generator - Builds the fifteen heats of a new match
//!
//! Each concrete schedule cell is looked up by lineup number in the roster
//! of the side its helmet color belongs to. Reserve rides (lineup 6-7) are
//! locked. Nomination cells stay placeholders until heat 13 is done.
//!
//! A reserve lineup the roster does not fill leaves its gate vacant. The
//! side fills it later with one of its own riders, outside the tactical
//! window. Scheduled rides never exceed the ride ceilings of the rules the
//! match is created under.

use std::collections::{BTreeMap, HashSet};

use crate::error::MatchError;
use crate::model::gate::{GateAssignment, RiderSlot, Side};
use crate::model::heat::Heat;
use crate::model::rider::{RiderId, RiderRole, Rosters, Team};
use crate::model::rules::Rules;
use crate::model::schedule::{GateCell, Schedule};

/// Fewest main riders a side may start a match with
pub const MIN_MAIN_RIDERS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGenerator;

impl FixtureGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Check one roster before any heat is built
    pub fn validate_roster(&self, side: Side, team: &Team) -> Result<(), MatchError> {
        let mut lineups = HashSet::new();
        for rider in &team.riders {
            if rider.team_id != team.id {
                return Err(MatchError::structural(format!(
                    "rider {} is registered to {}, not {}",
                    rider.id, rider.team_id, team.id
                )));
            }
            if !(1..=7).contains(&rider.lineup_number) {
                return Err(MatchError::structural(format!(
                    "rider {} has lineup number {}, expected 1-7",
                    rider.id, rider.lineup_number
                )));
            }
            if !rider.role().lineup_range().contains(&rider.lineup_number) {
                return Err(MatchError::structural(format!(
                    "rider {} is a {:?} rider but carries lineup number {}",
                    rider.id,
                    rider.role(),
                    rider.lineup_number
                )));
            }
            if !lineups.insert(rider.lineup_number) {
                return Err(MatchError::structural(format!(
                    "{} roster uses lineup number {} twice",
                    side, rider.lineup_number
                )));
            }
        }

        let main_riders = team.main_riders().count();
        if main_riders < MIN_MAIN_RIDERS {
            return Err(MatchError::InsufficientRoster {
                side,
                main_riders,
                required: MIN_MAIN_RIDERS,
            });
        }
        Ok(())
    }

    pub fn validate_rosters(&self, rosters: &Rosters) -> Result<(), MatchError> {
        if rosters.home.id == rosters.away.id {
            return Err(MatchError::structural(format!(
                "team {} cannot meet itself",
                rosters.home.id
            )));
        }
        self.validate_roster(Side::Home, &rosters.home)?;
        self.validate_roster(Side::Away, &rosters.away)?;

        if let Some(shared) = rosters
            .home
            .riders
            .iter()
            .find(|r| rosters.away.rider(&r.id).is_some())
        {
            return Err(MatchError::structural(format!(
                "rider {} is listed in both rosters",
                shared.id
            )));
        }
        Ok(())
    }

    /// Build the initial heats, all upcoming and without results
    pub fn generate(
        &self,
        rosters: &Rosters,
        schedule: &Schedule,
        rules: &Rules,
    ) -> Result<Vec<Heat>, MatchError> {
        self.validate_rosters(rosters)?;

        let heats: Vec<Heat> = schedule
            .rows()
            .map(|(number, row)| {
                let gates = core::array::from_fn(|idx| Self::assign(rosters, &row[idx]));
                Heat::new(number, gates)
            })
            .collect();

        self.check_ride_ceilings(rosters, &heats, rules)?;
        Ok(heats)
    }

    fn check_ride_ceilings(
        &self,
        rosters: &Rosters,
        heats: &[Heat],
        rules: &Rules,
    ) -> Result<(), MatchError> {
        let mut rides: BTreeMap<&RiderId, usize> = BTreeMap::new();
        for rider_id in heats.iter().flat_map(Heat::rider_ids) {
            *rides.entry(rider_id).or_default() += 1;
        }

        for (rider_id, count) in rides {
            let Some((_, rider)) = rosters.find(rider_id) else {
                continue;
            };
            let limit = rules.ride_limits.limit_for(rider.role());
            if count > limit {
                return Err(MatchError::Limit {
                    rider_id: rider.id.clone(),
                    rider_name: rider.name.clone(),
                    rides: count,
                    limit,
                });
            }
        }
        Ok(())
    }

    fn assign(rosters: &Rosters, cell: &GateCell) -> GateAssignment {
        match *cell {
            GateCell::Choice { choices } => GateAssignment::Placeholder { choices },
            GateCell::Rider { color, lineup } => {
                let side = color.side();
                match rosters.team(side).by_lineup(lineup) {
                    Some(rider) => GateAssignment::Concrete(RiderSlot {
                        rider_id: rider.id.clone(),
                        rider_name: rider.name.clone(),
                        side,
                        helmet: color,
                        lineup_number: lineup,
                        locked: RiderRole::Reserve.lineup_range().contains(&lineup),
                    }),
                    None => GateAssignment::Empty {
                        helmet: color,
                        lineup_number: lineup,
                    },
                }
            }
        }
    }
}
