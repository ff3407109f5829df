//! Domain Models - The vocabulary of a speedway match
//!
//! Every name here should match how officials talk about a meeting:
//! riders, gates, heats, helmets, nominations.

pub mod gate;
pub mod heat;
pub mod match_record;
pub mod rider;
pub mod rules;
pub mod schedule;
pub mod snapshot;
