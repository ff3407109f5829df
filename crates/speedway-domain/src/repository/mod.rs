//! Repository Traits - The ports the engine is driven through
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────────
//! trait MatchRepository │  InMemoryMatchRepository
//! trait RosterProvider  │  InMemoryRosterProvider / LeagueConfig
//! ```
//!
//! Every method takes `&self`: adapters are shared by concurrent callers
//! and carry their own interior locking.

pub mod match_repository;
pub mod roster_provider;
