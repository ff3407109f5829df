//! Rule violations reported by the domain services
//!
//! Every variant is recoverable at the caller boundary: validation always
//! runs to completion before anything is mutated.

use thiserror::Error;

use crate::model::gate::{Gate, Side};
use crate::model::rider::RiderId;

/// Coarse classification of a [`MatchError`], stable for logs and callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientRoster,
    Structural,
    Ownership,
    Lock,
    Window,
    Deficit,
    Rate,
    Limit,
    Nomination,
    Incomplete,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InsufficientRoster => "insufficient_roster",
            ErrorKind::Structural => "structural",
            ErrorKind::Ownership => "ownership",
            ErrorKind::Lock => "lock",
            ErrorKind::Window => "window",
            ErrorKind::Deficit => "deficit",
            ErrorKind::Rate => "rate",
            ErrorKind::Limit => "limit",
            ErrorKind::Nomination => "nomination",
            ErrorKind::Incomplete => "incomplete",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the match rules engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{side} roster has {main_riders} main riders, at least {required} are required")]
    InsufficientRoster {
        side: Side,
        main_riders: usize,
        required: usize,
    },

    #[error("Malformed request: {reason}")]
    Structural { reason: String },

    #[error("Rider {rider_id} does not ride for the {expected} side owning gate {gate}")]
    Ownership {
        rider_id: RiderId,
        gate: Gate,
        expected: Side,
    },

    #[error("Gate {gate} in heat {heat} is a locked reserve ride")]
    Lock { heat: u8, gate: Gate },

    #[error("Substitutions are not allowed in heat {heat} (window {start}-{end}, enabled: {enabled})")]
    Window {
        heat: u8,
        start: u8,
        end: u8,
        enabled: bool,
    },

    #[error("{side} trails by {trailing_by} before heat {heat}, a deficit of at least {required} is required")]
    Deficit {
        side: Side,
        heat: u8,
        trailing_by: i64,
        required: u32,
    },

    #[error("{requested} gate changes requested, at most {max} allowed per heat")]
    Rate { requested: usize, max: usize },

    #[error("Rider {rider_id} has already been brought in {uses} times, at most {max} allowed")]
    RiderUses {
        rider_id: RiderId,
        uses: usize,
        max: usize,
    },

    #[error("Rider {rider_name} ({rider_id}) would ride {rides} heats, the limit is {limit}")]
    Limit {
        rider_id: RiderId,
        rider_name: String,
        rides: usize,
        limit: usize,
    },

    #[error("Rider {rider_id} is not among the {side} top-3 scorers (threshold {threshold} points)")]
    Nomination {
        rider_id: RiderId,
        side: Side,
        threshold: u32,
    },

    #[error("Only {completed}/{required} heats are completed")]
    Incomplete { completed: usize, required: usize },
}

impl MatchError {
    pub fn structural(reason: impl Into<String>) -> Self {
        MatchError::Structural {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::InsufficientRoster { .. } => ErrorKind::InsufficientRoster,
            MatchError::Structural { .. } => ErrorKind::Structural,
            MatchError::Ownership { .. } => ErrorKind::Ownership,
            MatchError::Lock { .. } => ErrorKind::Lock,
            MatchError::Window { .. } => ErrorKind::Window,
            MatchError::Deficit { .. } => ErrorKind::Deficit,
            MatchError::Rate { .. } | MatchError::RiderUses { .. } => ErrorKind::Rate,
            MatchError::Limit { .. } => ErrorKind::Limit,
            MatchError::Nomination { .. } => ErrorKind::Nomination,
            MatchError::Incomplete { .. } => ErrorKind::Incomplete,
        }
    }
}
