//! Substitution Validator - May this rider take that gate?
//!
//! A request maps gates of one heat to incoming riders. It is checked in a
//! fixed order and the first failure is reported:
//!
//! ```text
//! structural ─► ownership ─► lock ─► window ─► deficit ─► change cap ─► ride limit
//! ```
//!
//! Each stage looks at every requested gate (ascending) before the next
//! stage runs. Validation reads the match and never writes it.
//!
//! A gate left vacant by a missing reserve is filled through the same
//! request, but only the ownership, lock and ride limit stages apply to it.
//! Window, deficit and change cap govern replacements of a rider.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::aggregation::MatchAggregator;
use super::events::MatchEvent;
use crate::error::MatchError;
use crate::model::gate::{Gate, GateAssignment, RiderSlot, Side};
use crate::model::heat::{Heat, SubstitutionRecord};
use crate::model::match_record::Match;
use crate::model::rider::{Rider, RiderId, Rosters};
use crate::model::schedule::LAST_REGULAR_HEAT;

/// Requested gate changes for one heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRequest {
    pub heat: u8,
    pub changes: BTreeMap<Gate, RiderId>,
}

impl SubstitutionRequest {
    pub fn new(heat: u8) -> Self {
        Self {
            heat,
            changes: BTreeMap::new(),
        }
    }

    pub fn with_change(mut self, gate: Gate, rider_id: impl Into<String>) -> Self {
        self.changes.insert(gate, RiderId::new(rider_id));
        self
    }
}

/// A validated change, ready to be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateChange {
    pub gate: Gate,
    pub outgoing: Option<RiderId>,
    pub assignment: RiderSlot,
}

/// An effective change paired with the roster entry of its rider
struct Candidate<'a> {
    gate: Gate,
    side: Side,
    rider: &'a Rider,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubstitutionValidator;

impl SubstitutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a request against the match as it stands
    ///
    /// Entries naming the rider already at the gate are dropped. If nothing
    /// is left, the result is empty.
    pub fn validate(
        &self,
        record: &Match,
        rosters: &Rosters,
        request: &SubstitutionRequest,
    ) -> Result<Vec<GateChange>, MatchError> {
        let heat = record.heat(request.heat).ok_or_else(|| {
            MatchError::structural(format!("heat {} does not exist", request.heat))
        })?;
        let candidates = self.structural(heat, rosters, request)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let replacements: Vec<&Candidate<'_>> = candidates
            .iter()
            .filter(|c| !heat.gate(c.gate).is_vacant())
            .collect();

        self.check_ownership(&candidates)?;
        self.check_lock(heat, &candidates)?;
        if !replacements.is_empty() {
            self.check_window(record, heat.number)?;
            self.check_deficit(record, heat.number, &replacements)?;
            self.check_rate(record, &replacements)?;
        }
        self.check_ride_limit(record, heat, &candidates)?;

        candidates
            .iter()
            .map(|c| {
                let current = heat.gate(c.gate);
                let helmet = current.helmet().ok_or_else(|| {
                    MatchError::structural(format!("gate {} has no helmet color", c.gate))
                })?;
                Ok(GateChange {
                    gate: c.gate,
                    outgoing: current.rider_id().cloned(),
                    assignment: RiderSlot {
                        rider_id: c.rider.id.clone(),
                        rider_name: c.rider.name.clone(),
                        side: c.side,
                        helmet,
                        lineup_number: c.rider.lineup_number,
                        locked: false,
                    },
                })
            })
            .collect()
    }

    /// Write validated changes into the heat and record them
    pub fn apply(
        &self,
        record: &mut Match,
        heat_number: u8,
        changes: Vec<GateChange>,
    ) -> Result<Vec<MatchEvent>, MatchError> {
        let match_id = record.id().as_str().to_string();
        let heat = record.heat_mut(heat_number).ok_or_else(|| {
            MatchError::structural(format!("heat {} does not exist", heat_number))
        })?;

        let mut events = Vec::with_capacity(changes.len());
        for change in changes {
            let incoming = change.assignment.rider_id.clone();
            events.push(MatchEvent::SubstitutionApplied {
                match_id: match_id.clone(),
                heat: heat_number,
                gate: change.gate.number(),
                outgoing: change.outgoing.as_ref().map(|id| id.as_str().to_string()),
                incoming: incoming.as_str().to_string(),
            });
            heat.substitutions.push(SubstitutionRecord {
                gate: change.gate,
                outgoing: change.outgoing,
                incoming,
            });
            heat.set_gate(change.gate, GateAssignment::Concrete(change.assignment));
        }
        Ok(events)
    }

    // ========== Checks ==========

    fn structural<'r>(
        &self,
        heat: &Heat,
        rosters: &'r Rosters,
        request: &SubstitutionRequest,
    ) -> Result<Vec<Candidate<'r>>, MatchError> {
        if request.changes.is_empty() {
            return Err(MatchError::structural("no gate changes requested"));
        }
        if heat.number > LAST_REGULAR_HEAT {
            return Err(MatchError::structural(format!(
                "heat {} is filled by nomination",
                heat.number
            )));
        }
        if heat.is_completed() {
            return Err(MatchError::structural(format!(
                "heat {} is already completed",
                heat.number
            )));
        }

        let mut candidates = Vec::new();
        for (gate, rider_id) in &request.changes {
            let current = heat.gate(*gate);
            if current.is_placeholder() {
                return Err(MatchError::structural(format!(
                    "gate {} in heat {} is filled by nomination",
                    gate, heat.number
                )));
            }
            if current.rider_id() == Some(rider_id) {
                continue;
            }
            let (side, rider) = rosters.find(rider_id).ok_or_else(|| {
                MatchError::structural(format!("rider {} is not on either roster", rider_id))
            })?;
            candidates.push(Candidate {
                gate: *gate,
                side,
                rider,
            });
        }

        // Lineup after the change must not repeat a rider
        let mut seen = HashSet::new();
        for gate in Gate::ALL {
            let rider_id = match request.changes.get(&gate) {
                Some(id) => Some(id),
                None => heat.gate(gate).rider_id(),
            };
            if let Some(id) = rider_id {
                if !seen.insert(id) {
                    return Err(MatchError::structural(format!(
                        "rider {} would ride twice in heat {}",
                        id, heat.number
                    )));
                }
            }
        }

        Ok(candidates)
    }

    fn check_ownership(&self, candidates: &[Candidate<'_>]) -> Result<(), MatchError> {
        match candidates.iter().find(|c| c.side != c.gate.side()) {
            Some(c) => Err(MatchError::Ownership {
                rider_id: c.rider.id.clone(),
                gate: c.gate,
                expected: c.gate.side(),
            }),
            None => Ok(()),
        }
    }

    fn check_lock(&self, heat: &Heat, candidates: &[Candidate<'_>]) -> Result<(), MatchError> {
        match candidates.iter().find(|c| heat.gate(c.gate).is_locked()) {
            Some(c) => Err(MatchError::Lock {
                heat: heat.number,
                gate: c.gate,
            }),
            None => Ok(()),
        }
    }

    fn check_window(&self, record: &Match, heat_number: u8) -> Result<(), MatchError> {
        let tactical = &record.rules().tactical;
        if tactical.covers(heat_number) {
            return Ok(());
        }
        Err(MatchError::Window {
            heat: heat_number,
            start: tactical.start_heat,
            end: tactical.end_heat,
            enabled: tactical.enabled,
        })
    }

    fn check_deficit(
        &self,
        record: &Match,
        heat_number: u8,
        candidates: &[&Candidate<'_>],
    ) -> Result<(), MatchError> {
        let required = record.rules().tactical.min_deficit;
        let before = MatchAggregator::new().score_before(record, heat_number);

        let mut checked = HashSet::new();
        for candidate in candidates {
            let side = candidate.gate.side();
            if !checked.insert(side) {
                continue;
            }
            let trailing_by = before.trailing_by(side);
            if trailing_by < i64::from(required) {
                return Err(MatchError::Deficit {
                    side,
                    heat: heat_number,
                    trailing_by,
                    required,
                });
            }
        }
        Ok(())
    }

    fn check_rate(&self, record: &Match, candidates: &[&Candidate<'_>]) -> Result<(), MatchError> {
        let tactical = &record.rules().tactical;
        if candidates.len() > tactical.max_changes_per_heat {
            return Err(MatchError::Rate {
                requested: candidates.len(),
                max: tactical.max_changes_per_heat,
            });
        }

        for candidate in candidates {
            let uses = record.substitutions_of(&candidate.rider.id);
            if uses >= tactical.max_uses_per_rider {
                return Err(MatchError::RiderUses {
                    rider_id: candidate.rider.id.clone(),
                    uses,
                    max: tactical.max_uses_per_rider,
                });
            }
        }
        Ok(())
    }

    fn check_ride_limit(
        &self,
        record: &Match,
        heat: &Heat,
        candidates: &[Candidate<'_>],
    ) -> Result<(), MatchError> {
        let limits = record.rules().ride_limits;
        for candidate in candidates {
            let rider = candidate.rider;
            // Moving between gates of the same heat adds no ride
            let added = usize::from(!heat.contains_rider(&rider.id));
            let rides = record.rides_of(&rider.id) + added;
            let limit = limits.limit_for(rider.role());
            if rides > limit {
                return Err(MatchError::Limit {
                    rider_id: rider.id.clone(),
                    rider_name: rider.name.clone(),
                    rides,
                    limit,
                });
            }
        }
        Ok(())
    }
}
