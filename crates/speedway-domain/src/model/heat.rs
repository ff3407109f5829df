//! Heat - One race of four riders
//!
//! A heat owns a fixed array of four gates, so "exactly four gate
//! assignments" holds by construction.

use serde::{Deserialize, Serialize};

use super::gate::{Gate, GateAssignment, Side};
use super::rider::RiderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatStatus {
    Upcoming,
    Completed,
}

/// A finishing report as entered by the official
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedResult {
    pub rider_id: RiderId,
    #[serde(default)]
    pub position: Option<u8>,
    #[serde(default)]
    pub excluded: bool,
}

impl ReportedResult {
    pub fn finished(rider_id: impl Into<String>, position: u8) -> Self {
        Self {
            rider_id: RiderId::new(rider_id),
            position: Some(position),
            excluded: false,
        }
    }

    pub fn excluded(rider_id: impl Into<String>) -> Self {
        Self {
            rider_id: RiderId::new(rider_id),
            position: None,
            excluded: true,
        }
    }
}

/// A scored result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatResult {
    pub rider_id: RiderId,
    pub side: Side,
    pub position: Option<u8>,
    pub excluded: bool,
    pub points: u32,
    /// Individual only, never part of team totals
    pub bonus_points: u32,
}

/// A tactical substitution that has been applied to a heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    pub gate: Gate,
    pub outgoing: Option<RiderId>,
    pub incoming: RiderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heat {
    pub number: u8,
    pub gates: [GateAssignment; 4],
    #[serde(default)]
    pub results: Vec<HeatResult>,
    pub status: HeatStatus,
    #[serde(default)]
    pub substitutions: Vec<SubstitutionRecord>,
}

impl Heat {
    pub fn new(number: u8, gates: [GateAssignment; 4]) -> Self {
        Self {
            number,
            gates,
            results: Vec::new(),
            status: HeatStatus::Upcoming,
            substitutions: Vec::new(),
        }
    }

    pub fn gate(&self, gate: Gate) -> &GateAssignment {
        &self.gates[gate.index()]
    }

    pub fn set_gate(&mut self, gate: Gate, assignment: GateAssignment) {
        self.gates[gate.index()] = assignment;
    }

    pub fn is_completed(&self) -> bool {
        self.status == HeatStatus::Completed
    }

    pub fn has_placeholder(&self) -> bool {
        self.gates.iter().any(GateAssignment::is_placeholder)
    }

    /// The gate a rider starts from, if the rider is in this heat
    pub fn gate_of(&self, rider_id: &RiderId) -> Option<Gate> {
        Gate::ALL
            .into_iter()
            .find(|g| self.gate(*g).rider_id() == Some(rider_id))
    }

    pub fn rider_ids(&self) -> impl Iterator<Item = &RiderId> {
        self.gates.iter().filter_map(GateAssignment::rider_id)
    }

    pub fn contains_rider(&self, rider_id: &RiderId) -> bool {
        self.gate_of(rider_id).is_some()
    }

    /// Base points scored by each side in this heat
    pub fn side_points(&self) -> (u32, u32) {
        self.results.iter().fold((0, 0), |(home, away), r| match r.side {
            Side::Home => (home + r.points, away),
            Side::Away => (home, away + r.points),
        })
    }
}
