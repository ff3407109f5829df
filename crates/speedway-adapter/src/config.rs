//! League configuration files
//!
//! A league file carries the ruleset every new match is frozen with, an
//! optional custom programme, and the teams with their riders. YAML and
//! JSON are both accepted, picked by file extension.
//!
//! ```yaml
//! name: Elitserien
//! ride_limit_preset: standard
//! rules:
//!   tactical:
//!     min_deficit: 6
//! teams:
//!   - id: vet
//!     name: Vetlanda
//!     riders:
//!       - { id: vet-1, name: Rider One, lineup: 1 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use speedway_domain::{RideLimits, Rider, Rules, Schedule, ScheduleError, Team, TeamId};

use crate::repository::in_memory::InMemoryRosterProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Unsupported configuration format: {0} (expected .yaml, .yml or .json)")]
    UnknownFormat(PathBuf),
}

/// Named ride-limit ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideLimitPreset {
    /// Main 6, reserve 5
    Standard,
    /// Main 7, reserve 6
    RiderReplacement,
}

impl RideLimitPreset {
    pub fn limits(&self) -> RideLimits {
        match self {
            RideLimitPreset::Standard => RideLimits::standard(),
            RideLimitPreset::RiderReplacement => RideLimits::rider_replacement(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderConfig {
    pub id: String,
    pub name: String,
    pub lineup: u8,
    /// Defaults to lineup 6-7
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub riders: Vec<RiderConfig>,
}

impl TeamConfig {
    pub fn to_team(&self) -> Team {
        let team_id = TeamId::new(&self.id);
        self.riders
            .iter()
            .fold(Team::new(team_id.clone(), &self.name), |team, r| {
                let mut rider = Rider::new(&r.id, &r.name, team_id.clone(), r.lineup);
                if let Some(reserve) = r.reserve {
                    rider.is_reserve = reserve;
                }
                team.with_rider(rider)
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub rules: Rules,

    /// Overrides `rules.ride_limits` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_limit_preset: Option<RideLimitPreset>,

    /// Fifteen rows of four cells; the Elitserien table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Vec<String>>>,

    #[serde(default)]
    pub teams: Vec<TeamConfig>,
}

impl LeagueConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&content)?;
        // Surface a bad custom schedule at load time
        config.schedule()?;

        info!(
            path = %path.display(),
            teams = config.teams.len(),
            custom_schedule = config.schedule.is_some(),
            "League configuration loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// The rules new matches are created with
    pub fn effective_rules(&self) -> Rules {
        match self.ride_limit_preset {
            Some(preset) => self.rules.clone().with_ride_limits(preset.limits()),
            None => self.rules.clone(),
        }
    }

    pub fn schedule(&self) -> Result<Schedule, ConfigError> {
        match &self.schedule {
            Some(rows) => Ok(Schedule::parse(rows)?),
            None => Ok(Schedule::elitserien()),
        }
    }

    pub fn teams(&self) -> Vec<Team> {
        self.teams.iter().map(TeamConfig::to_team).collect()
    }

    pub fn roster_provider(&self) -> InMemoryRosterProvider {
        InMemoryRosterProvider::with_teams(self.teams())
    }
}
