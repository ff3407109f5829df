//! # Speedway Use Case Layer
//!
//! Application-specific orchestration around the domain services.
//!
//! `MatchService` is the single entry point for callers. For every request
//! it loads the match, fetches both rosters, runs the domain validators on
//! a private copy, and only then persists the result and tells observers.
//!
//! ```text
//! caller ─► MatchService ─► per-match lock
//!                          ├─► RosterProvider
//!                          ├─► domain service (validate ─► apply)
//!                          ├─► MatchRepository::save (revision check)
//!                          └─► MatchObserver(s)
//! ```

pub mod error;
pub mod locks;
pub mod observer;
pub mod service;

pub use speedway_domain;

pub use error::ServiceError;
pub use locks::MatchLocks;
pub use observer::MatchObserver;
pub use service::MatchService;
