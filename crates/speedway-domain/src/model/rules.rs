//! Rules - The ruleset frozen into a match at creation
//!
//! A match always validates against the rules in force when it began,
//! never a since-changed league default.

use serde::{Deserialize, Serialize};

use super::rider::RiderRole;

/// Tactical substitution window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalRules {
    pub enabled: bool,
    pub start_heat: u8,
    pub end_heat: u8,
    /// Points the requesting side must trail by
    pub min_deficit: u32,
    pub max_changes_per_heat: usize,
    /// How often one rider may be brought in over a match
    pub max_uses_per_rider: usize,
}

impl Default for TacticalRules {
    fn default() -> Self {
        Self {
            enabled: true,
            start_heat: 5,
            end_heat: 13,
            min_deficit: 6,
            max_changes_per_heat: 1,
            max_uses_per_rider: 99,
        }
    }
}

impl TacticalRules {
    pub fn covers(&self, heat_number: u8) -> bool {
        self.enabled && (self.start_heat..=self.end_heat).contains(&heat_number)
    }
}

/// Maximum scheduled heats per rider role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideLimits {
    pub main_max: usize,
    pub reserve_max: usize,
}

impl Default for RideLimits {
    fn default() -> Self {
        Self::standard()
    }
}

impl RideLimits {
    pub fn standard() -> Self {
        Self {
            main_max: 6,
            reserve_max: 5,
        }
    }

    /// Raised ceilings when a team runs rider replacement
    pub fn rider_replacement() -> Self {
        Self {
            main_max: 7,
            reserve_max: 6,
        }
    }

    pub fn limit_for(&self, role: RiderRole) -> usize {
        match role {
            RiderRole::Main => self.main_max,
            RiderRole::Reserve => self.reserve_max,
        }
    }
}

/// Heat 14/15 nomination policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominationRules {
    pub heat14_free: bool,
    pub heat15_top_three: bool,
}

impl Default for NominationRules {
    fn default() -> Self {
        Self {
            heat14_free: true,
            heat15_top_three: true,
        }
    }
}

impl NominationRules {
    /// Whether nominations for `heat_number` must come from the top three
    pub fn restricted(&self, heat_number: u8) -> bool {
        match heat_number {
            14 => !self.heat14_free,
            15 => self.heat15_top_three,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub tactical: TacticalRules,
    pub ride_limits: RideLimits,
    pub nominations: NominationRules,
}

impl Rules {
    /// The Elitserien defaults
    pub fn elitserien() -> Self {
        Self::default()
    }

    pub fn with_ride_limits(mut self, ride_limits: RideLimits) -> Self {
        self.ride_limits = ride_limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let rules = Rules::elitserien();
        assert!(!rules.tactical.covers(4));
        assert!(rules.tactical.covers(5));
        assert!(rules.tactical.covers(13));
        assert!(!rules.tactical.covers(14));
    }

    #[test]
    fn test_disabled_window_covers_nothing() {
        let mut rules = Rules::elitserien();
        rules.tactical.enabled = false;
        assert!((1..=15).all(|h| !rules.tactical.covers(h)));
    }

    #[test]
    fn test_partial_rules_fill_defaults() {
        let rules: Rules =
            serde_json::from_str(r#"{ "tactical": { "min_deficit": 8 } }"#).unwrap();
        assert_eq!(rules.tactical.min_deficit, 8);
        assert_eq!(rules.tactical.start_heat, 5);
        assert_eq!(rules.ride_limits, RideLimits::standard());
        assert!(rules.nominations.restricted(15));
        assert!(!rules.nominations.restricted(14));
    }

    #[test]
    fn test_limit_for_role() {
        let limits = RideLimits::rider_replacement();
        assert_eq!(limits.limit_for(RiderRole::Main), 7);
        assert_eq!(limits.limit_for(RiderRole::Reserve), 6);
    }
}
