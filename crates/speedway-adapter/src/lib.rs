//! # Speedway Adapter Layer
//!
//! Implementations of the domain ports.
//!
//! ## Structure
//!
//! - `repository/` - In-memory match, snapshot and roster stores
//! - `config` - League configuration files (YAML or JSON)

pub mod config;
pub mod repository;

pub use config::{ConfigError, LeagueConfig, RideLimitPreset};
pub use repository::in_memory::{
    InMemoryMatchRepository, InMemoryRosterProvider, InMemorySnapshotRepository,
};
