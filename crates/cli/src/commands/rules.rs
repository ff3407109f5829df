//! speedway rules command

use clap::Args;
use console::style;
use speedway_adapter::LeagueConfig;
use speedway_domain::Rules;

#[derive(Debug, Args)]
pub struct RulesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RulesCommand {
    pub fn run(&self, league: &LeagueConfig) -> anyhow::Result<()> {
        let rules = league.effective_rules();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rules)?);
            return Ok(());
        }

        if let Some(name) = &league.name {
            println!("{}", style(name).bold());
        }
        for line in describe(&rules) {
            println!("{}", line);
        }
        Ok(())
    }
}

fn describe(rules: &Rules) -> Vec<String> {
    let tactical = &rules.tactical;
    let window = if tactical.enabled {
        format!("heats {}-{}", tactical.start_heat, tactical.end_heat)
    } else {
        "disabled".to_string()
    };
    let heat15 = if rules.nominations.heat15_top_three {
        "top-3 scorers only"
    } else {
        "free"
    };
    let heat14 = if rules.nominations.heat14_free {
        "free"
    } else {
        "top-3 scorers only"
    };

    vec![
        format!("Tactical substitutions: {}", window),
        format!("  Minimum deficit:      {} points", tactical.min_deficit),
        format!("  Changes per heat:     {}", tactical.max_changes_per_heat),
        format!("  Uses per rider:       {}", tactical.max_uses_per_rider),
        format!(
            "Ride limits:            main {}, reserve {}",
            rules.ride_limits.main_max, rules.ride_limits.reserve_max
        ),
        format!("Heat 14 nominations:    {}", heat14),
        format!("Heat 15 nominations:    {}", heat15),
    ]
}
