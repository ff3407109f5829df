//! Nomination Resolver - Fills heats 14 and 15
//!
//! After heat 13 each side names two riders per nomination heat. Heat 14 is
//! free by default; heat 15 is restricted to a side's top-3 main riders by
//! points plus bonus, where everyone tied at the third score qualifies.
//!
//! Home nominees take gates 1 then 3, away nominees gates 2 then 4. Each
//! gate races in the placeholder color belonging to its side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::events::MatchEvent;
use crate::error::MatchError;
use crate::model::gate::{GateAssignment, RiderSlot, Side};
use crate::model::heat::Heat;
use crate::model::match_record::Match;
use crate::model::rider::{RiderId, RiderRole, Rosters};
use crate::model::schedule::LAST_REGULAR_HEAT;

/// Two riders per side for one nomination heat
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeatNomination {
    pub home: Vec<RiderId>,
    pub away: Vec<RiderId>,
}

impl HeatNomination {
    pub fn new<H, A>(home: [H; 2], away: [A; 2]) -> Self
    where
        H: Into<String>,
        A: Into<String>,
    {
        Self {
            home: home.into_iter().map(RiderId::new).collect(),
            away: away.into_iter().map(RiderId::new).collect(),
        }
    }

    pub fn side(&self, side: Side) -> &[RiderId] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// Nominations for heat 14, heat 15, or both at once
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Nominations {
    #[serde(default)]
    pub heat14: Option<HeatNomination>,
    #[serde(default)]
    pub heat15: Option<HeatNomination>,
}

impl Nominations {
    fn blocks(&self) -> impl Iterator<Item = (u8, &HeatNomination)> {
        [(14, self.heat14.as_ref()), (15, self.heat15.as_ref())]
            .into_iter()
            .filter_map(|(heat, block)| block.map(|b| (heat, b)))
    }
}

/// Riders a side may nominate into a restricted heat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub riders: Vec<RiderId>,
    /// Lowest score that still qualifies
    pub threshold: u32,
}

impl Eligibility {
    pub fn contains(&self, rider_id: &RiderId) -> bool {
        self.riders.contains(rider_id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NominationResolver;

impl NominationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Top-3 main riders of a side over all completed heats
    pub fn top_three(&self, record: &Match, rosters: &Rosters, side: Side) -> Eligibility {
        let mut totals: BTreeMap<&RiderId, u32> = rosters
            .team(side)
            .riders
            .iter()
            .filter(|r| r.role() == RiderRole::Main)
            .map(|r| (&r.id, 0))
            .collect();

        for result in record
            .heats()
            .iter()
            .filter(|h| h.is_completed())
            .flat_map(|h| h.results.iter())
        {
            if let Some(total) = totals.get_mut(&result.rider_id) {
                *total += result.points + result.bonus_points;
            }
        }

        let mut scores: Vec<u32> = totals.values().copied().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        let threshold = scores
            .get(2)
            .or_else(|| scores.last())
            .copied()
            .unwrap_or(0);

        Eligibility {
            riders: totals
                .into_iter()
                .filter(|(_, total)| *total >= threshold)
                .map(|(id, _)| id.clone())
                .collect(),
            threshold,
        }
    }

    /// Validate nominations and return the filled heats
    pub fn resolve(
        &self,
        record: &Match,
        rosters: &Rosters,
        nominations: &Nominations,
    ) -> Result<Vec<Heat>, MatchError> {
        if nominations.blocks().next().is_none() {
            return Err(MatchError::structural("no nominations submitted"));
        }

        let completed = record
            .heats()
            .iter()
            .filter(|h| h.number <= LAST_REGULAR_HEAT && h.is_completed())
            .count();
        if completed < usize::from(LAST_REGULAR_HEAT) {
            return Err(MatchError::Incomplete {
                completed,
                required: usize::from(LAST_REGULAR_HEAT),
            });
        }

        for (number, _) in nominations.blocks() {
            let open = record
                .heat(number)
                .map(|h| h.gates.iter().all(GateAssignment::is_placeholder))
                .unwrap_or(false);
            if !open {
                return Err(MatchError::structural(format!(
                    "heat {} is not awaiting nominations",
                    number
                )));
            }
        }

        self.check_structure(rosters, nominations)?;
        self.check_ownership(rosters, nominations)?;
        self.check_top_three(record, rosters, nominations)?;
        self.check_ride_limit(record, rosters, nominations)?;

        nominations
            .blocks()
            .map(|(number, block)| self.fill(record, rosters, number, block))
            .collect()
    }

    /// Replace the placeholder heats with the resolved ones
    pub fn apply(&self, record: &mut Match, heats: Vec<Heat>) -> Result<MatchEvent, MatchError> {
        let mut numbers = Vec::with_capacity(heats.len());
        for heat in heats {
            let number = heat.number;
            let slot = record.heat_mut(number).ok_or_else(|| {
                MatchError::structural(format!("heat {} does not exist", number))
            })?;
            slot.gates = heat.gates;
            numbers.push(number);
        }
        Ok(MatchEvent::NominationsResolved {
            match_id: record.id().as_str().to_string(),
            heats: numbers,
        })
    }

    // ========== Checks ==========

    fn check_structure(&self, rosters: &Rosters, nominations: &Nominations) -> Result<(), MatchError> {
        for (number, block) in nominations.blocks() {
            for side in [Side::Home, Side::Away] {
                let nominees = block.side(side);
                if nominees.len() != 2 {
                    return Err(MatchError::structural(format!(
                        "heat {}: {} must nominate exactly 2 riders, got {}",
                        number,
                        side,
                        nominees.len()
                    )));
                }
                if nominees[0] == nominees[1] {
                    return Err(MatchError::structural(format!(
                        "heat {}: {} nominated {} twice",
                        number, side, nominees[0]
                    )));
                }
                if let Some(unknown) = nominees.iter().find(|id| rosters.find(id).is_none()) {
                    return Err(MatchError::structural(format!(
                        "rider {} is not on either roster",
                        unknown
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_ownership(&self, rosters: &Rosters, nominations: &Nominations) -> Result<(), MatchError> {
        for (_, block) in nominations.blocks() {
            for side in [Side::Home, Side::Away] {
                for (idx, rider_id) in block.side(side).iter().enumerate() {
                    if rosters.team(side).rider(rider_id).is_none() {
                        return Err(MatchError::Ownership {
                            rider_id: rider_id.clone(),
                            gate: side.gates()[idx],
                            expected: side,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_top_three(
        &self,
        record: &Match,
        rosters: &Rosters,
        nominations: &Nominations,
    ) -> Result<(), MatchError> {
        let policy = &record.rules().nominations;
        for (number, block) in nominations.blocks() {
            if !policy.restricted(number) {
                continue;
            }
            for side in [Side::Home, Side::Away] {
                let eligible = self.top_three(record, rosters, side);
                if let Some(rider_id) = block.side(side).iter().find(|id| !eligible.contains(id)) {
                    return Err(MatchError::Nomination {
                        rider_id: rider_id.clone(),
                        side,
                        threshold: eligible.threshold,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_ride_limit(
        &self,
        record: &Match,
        rosters: &Rosters,
        nominations: &Nominations,
    ) -> Result<(), MatchError> {
        // A rider nominated into both heats gains two rides
        let mut added: BTreeMap<&RiderId, usize> = BTreeMap::new();
        for (_, block) in nominations.blocks() {
            for rider_id in block.home.iter().chain(block.away.iter()) {
                *added.entry(rider_id).or_default() += 1;
            }
        }

        let limits = record.rules().ride_limits;
        for (rider_id, extra) in added {
            let Some((_, rider)) = rosters.find(rider_id) else {
                continue;
            };
            let rides = record.rides_of(rider_id) + extra;
            let limit = limits.limit_for(rider.role());
            if rides > limit {
                return Err(MatchError::Limit {
                    rider_id: rider_id.clone(),
                    rider_name: rider.name.clone(),
                    rides,
                    limit,
                });
            }
        }
        Ok(())
    }

    fn fill(
        &self,
        record: &Match,
        rosters: &Rosters,
        number: u8,
        block: &HeatNomination,
    ) -> Result<Heat, MatchError> {
        let mut heat = record
            .heat(number)
            .cloned()
            .ok_or_else(|| MatchError::structural(format!("heat {} does not exist", number)))?;

        for side in [Side::Home, Side::Away] {
            for (gate, rider_id) in side.gates().into_iter().zip(block.side(side)) {
                let rider = rosters.team(side).rider(rider_id).ok_or_else(|| {
                    MatchError::structural(format!("rider {} left the roster", rider_id))
                })?;
                let helmet = heat.gate(gate).choice_for(side).ok_or_else(|| {
                    MatchError::structural(format!(
                        "heat {} gate {} offers no {} color",
                        number, gate, side
                    ))
                })?;
                heat.set_gate(
                    gate,
                    GateAssignment::Concrete(RiderSlot {
                        rider_id: rider.id.clone(),
                        rider_name: rider.name.clone(),
                        side,
                        helmet,
                        lineup_number: rider.lineup_number,
                        locked: false,
                    }),
                );
            }
        }
        Ok(heat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::gate::{Gate, HelmetColor};
    use crate::model::heat::ReportedResult;
    use crate::model::rules::{RideLimits, Rules};
    use crate::test_support::{
        new_match, new_match_with, play_heats, rosters, score_heat, HOME_ONE_TWO,
    };

    /// Heats 1-13 with home taking every 5-1
    fn after_heat_13() -> Match {
        let mut record = new_match();
        play_heats(&mut record, 1..=13, HOME_ONE_TWO);
        record
    }

    fn heat14(home: [&str; 2], away: [&str; 2]) -> Nominations {
        Nominations {
            heat14: Some(HeatNomination::new(home, away)),
            heat15: None,
        }
    }

    fn heat15(home: [&str; 2], away: [&str; 2]) -> Nominations {
        Nominations {
            heat14: None,
            heat15: Some(HeatNomination::new(home, away)),
        }
    }

    #[test]
    fn test_requires_heat_13() {
        let mut record = new_match();
        play_heats(&mut record, 1..=12, HOME_ONE_TWO);
        let err = NominationResolver::new()
            .resolve(&record, &rosters(), &heat14(["h1", "h2"], ["a1", "a2"]))
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Incomplete {
                completed: 12,
                required: 13
            }
        );
    }

    #[test]
    fn test_heat14_binds_gates_and_colors() {
        let mut record = after_heat_13();
        let resolver = NominationResolver::new();
        let heats = resolver
            .resolve(&record, &rosters(), &heat14(["h6", "h2"], ["a7", "a1"]))
            .unwrap();
        assert_eq!(heats.len(), 1);
        resolver.apply(&mut record, heats).unwrap();

        // Heat 14 is V/R V/R G/B G/B
        let heat = record.heat(14).unwrap();
        let slot = |gate| heat.gate(gate).rider().unwrap().clone();
        assert_eq!(slot(Gate::One).rider_id, RiderId::new("h6"));
        assert_eq!(slot(Gate::One).helmet, HelmetColor::Red);
        assert_eq!(slot(Gate::Three).rider_id, RiderId::new("h2"));
        assert_eq!(slot(Gate::Three).helmet, HelmetColor::Blue);
        assert_eq!(slot(Gate::Two).rider_id, RiderId::new("a7"));
        assert_eq!(slot(Gate::Two).helmet, HelmetColor::White);
        assert_eq!(slot(Gate::Four).rider_id, RiderId::new("a1"));
        assert_eq!(slot(Gate::Four).helmet, HelmetColor::Yellow);

        assert!(!heat.is_completed());
        assert!(heat.results.is_empty());
        assert!(record.heat(15).unwrap().has_placeholder());
    }

    /// Away totals after heat 13: a3 5, a1/a2/a4 2, a5 1
    fn away_split() -> Match {
        let mut record = new_match();
        play_heats(&mut record, 1..=12, HOME_ONE_TWO);
        // Heat 13 is R1 G5 B5 V3: h1 a5 h5 a3
        score_heat(
            &mut record,
            13,
            &[
                ReportedResult::finished("a3", 1),
                ReportedResult::finished("h1", 2),
                ReportedResult::finished("h5", 3),
                ReportedResult::excluded("a5"),
            ],
        );
        record
    }

    #[test]
    fn test_heat15_rejects_rider_outside_top_three() {
        let record = away_split();
        let err = NominationResolver::new()
            .resolve(&record, &rosters(), &heat15(["h2", "h3"], ["a3", "a5"]))
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::Nomination {
                rider_id: RiderId::new("a5"),
                side: Side::Away,
                threshold: 2,
            }
        );
    }

    #[test]
    fn test_ties_at_third_place_all_qualify() {
        let record = away_split();
        let resolver = NominationResolver::new();

        let eligible = resolver.top_three(&record, &rosters(), Side::Away);
        assert_eq!(eligible.threshold, 2);
        assert_eq!(
            eligible.riders,
            vec![
                RiderId::new("a1"),
                RiderId::new("a2"),
                RiderId::new("a3"),
                RiderId::new("a4"),
            ]
        );

        for pair in [["a1", "a2"], ["a2", "a4"], ["a4", "a3"]] {
            assert!(resolver
                .resolve(&record, &rosters(), &heat15(["h2", "h3"], pair))
                .is_ok());
        }
    }

    #[test]
    fn test_level_side_is_fully_eligible() {
        let record = after_heat_13();
        // Every home ride in a 5-1 is worth 3 with the bonus
        let eligible = NominationResolver::new().top_three(&record, &rosters(), Side::Home);
        assert_eq!(eligible.threshold, 12);
        assert_eq!(eligible.riders.len(), 5);
        assert!(!eligible.contains(&RiderId::new("h6")));
    }

    #[test]
    fn test_heat15_free_when_policy_allows() {
        let mut rules = Rules::elitserien();
        rules.nominations.heat15_top_three = false;
        let mut record = new_match_with(rules);
        play_heats(&mut record, 1..=13, HOME_ONE_TWO);

        let nominations = heat15(["h6", "h7"], ["a6", "a7"]);
        assert!(NominationResolver::new()
            .resolve(&record, &rosters(), &nominations)
            .is_ok());
    }

    #[test]
    fn test_heat14_restricted_when_not_free() {
        let mut rules = Rules::elitserien();
        rules.nominations.heat14_free = false;
        let mut record = new_match_with(rules);
        play_heats(&mut record, 1..=13, HOME_ONE_TWO);

        // Reserves are never among the top-3 main riders
        let err = NominationResolver::new()
            .resolve(&record, &rosters(), &heat14(["h6", "h1"], ["a1", "a2"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Nomination);
    }

    #[test]
    fn test_structure_and_ownership() {
        let record = after_heat_13();
        let resolver = NominationResolver::new();

        let one_rider = Nominations {
            heat14: Some(HeatNomination {
                home: vec![RiderId::new("h1")],
                away: vec![RiderId::new("a1"), RiderId::new("a2")],
            }),
            heat15: None,
        };
        assert_eq!(
            resolver.resolve(&record, &rosters(), &one_rider).unwrap_err().kind(),
            ErrorKind::Structural
        );

        let twice = heat14(["h1", "h1"], ["a1", "a2"]);
        assert_eq!(
            resolver.resolve(&record, &rosters(), &twice).unwrap_err().kind(),
            ErrorKind::Structural
        );

        let empty = Nominations::default();
        assert_eq!(
            resolver.resolve(&record, &rosters(), &empty).unwrap_err().kind(),
            ErrorKind::Structural
        );

        let wrong_side = heat14(["h1", "a3"], ["a1", "a2"]);
        assert_eq!(
            resolver.resolve(&record, &rosters(), &wrong_side).unwrap_err(),
            MatchError::Ownership {
                rider_id: RiderId::new("a3"),
                gate: Gate::Three,
                expected: Side::Home,
            }
        );
    }

    #[test]
    fn test_cannot_nominate_twice() {
        let mut record = after_heat_13();
        let resolver = NominationResolver::new();
        let first = heat14(["h1", "h2"], ["a1", "a2"]);
        let heats = resolver.resolve(&record, &rosters(), &first).unwrap();
        resolver.apply(&mut record, heats).unwrap();

        let err = resolver.resolve(&record, &rosters(), &first).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_combined_ride_limit() {
        let mut rules = Rules::elitserien();
        rules.nominations.heat15_top_three = false;
        rules.ride_limits = RideLimits {
            main_max: 5,
            reserve_max: 5,
        };
        let mut record = new_match_with(rules);
        play_heats(&mut record, 1..=13, HOME_ONE_TWO);

        // h1 has 4 rides; one nomination is fine, two are one too many
        let resolver = NominationResolver::new();
        let single = heat14(["h1", "h2"], ["a1", "a2"]);
        assert!(resolver.resolve(&record, &rosters(), &single).is_ok());

        let both = Nominations {
            heat14: Some(HeatNomination::new(["h1", "h2"], ["a1", "a2"])),
            heat15: Some(HeatNomination::new(["h1", "h3"], ["a3", "a4"])),
        };
        let err = resolver.resolve(&record, &rosters(), &both).unwrap_err();
        assert_eq!(
            err,
            MatchError::Limit {
                rider_id: RiderId::new("h1"),
                rider_name: "Home One".into(),
                rides: 6,
                limit: 5,
            }
        );
    }
}
