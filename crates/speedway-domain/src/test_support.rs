//! Shared builders for the unit tests
//!
//! Riders are named by side and lineup: `h1`..`h7` ride for home, `a1`..`a7`
//! for away, with 6 and 7 as reserves.

use core::ops::RangeInclusive;

use crate::model::gate::Gate;
use crate::model::heat::ReportedResult;
use crate::model::match_record::{Match, MatchId};
use crate::model::rider::{Rider, Rosters, Team, TeamId};
use crate::model::rules::Rules;
use crate::model::schedule::Schedule;
use crate::service::fixture::FixtureGenerator;
use crate::service::scoring::HeatScorer;

/// Finishing order by gate: home takes first and second
pub const HOME_ONE_TWO: [Gate; 4] = [Gate::One, Gate::Three, Gate::Two, Gate::Four];

const NUMBERS: [&str; 7] = ["One", "Two", "Three", "Four", "Five", "Six", "Seven"];

/// A full team of five mains and two reserves
pub fn team(id: &str, prefix: &str) -> Team {
    let label = if prefix == "h" { "Home" } else { "Away" };
    let team_id = TeamId::new(id);
    (1..=7u8).fold(Team::new(team_id.clone(), label), |team, lineup| {
        team.with_rider(Rider::new(
            format!("{}{}", prefix, lineup),
            format!("{} {}", label, NUMBERS[usize::from(lineup - 1)]),
            team_id.clone(),
            lineup,
        ))
    })
}

pub fn rosters() -> Rosters {
    Rosters::new(team("h", "h"), team("a", "a"))
}

pub fn rosters_without_reserves() -> Rosters {
    let mut rosters = rosters();
    rosters.home.riders.retain(|r| !r.is_reserve);
    rosters.away.riders.retain(|r| !r.is_reserve);
    rosters
}

pub fn new_match_with(rules: Rules) -> Match {
    new_match_from(&rosters(), rules)
}

pub fn new_match_from(rosters: &Rosters, rules: Rules) -> Match {
    let heats = FixtureGenerator::new()
        .generate(rosters, &Schedule::elitserien(), &rules)
        .unwrap();
    Match::new(
        MatchId::new("m-test"),
        TeamId::new("h"),
        TeamId::new("a"),
        heats,
        rules,
    )
}

pub fn new_match() -> Match {
    new_match_with(Rules::elitserien())
}

/// Heat 1 of the default fixture: h2, a1, h1, a2 from gate 1
pub fn heat_one() -> crate::model::heat::Heat {
    new_match().heat(1).unwrap().clone()
}

pub fn score_heat(record: &mut Match, heat: u8, reported: &[ReportedResult]) {
    let scorer = HeatScorer::new();
    let score = scorer.score(record.heat(heat).unwrap(), reported).unwrap();
    scorer.apply(record, score).unwrap();
}

/// Score every heat in `heats` with the same finishing order by gate
pub fn play_heats(record: &mut Match, heats: RangeInclusive<u8>, order: [Gate; 4]) {
    for number in heats {
        let heat = record.heat(number).unwrap();
        let reported: Vec<ReportedResult> = order
            .iter()
            .enumerate()
            .map(|(idx, gate)| {
                let rider = heat.gate(*gate).rider_id().unwrap();
                ReportedResult::finished(rider.as_str(), idx as u8 + 1)
            })
            .collect();
        score_heat(record, number, &reported);
    }
}
