//! speedway fixture command

use anyhow::anyhow;
use clap::Args;
use speedway_adapter::LeagueConfig;
use speedway_domain::{FixtureGenerator, GateAssignment, GateCell, Heat, Rosters, Schedule, Team};

use super::helmet;

#[derive(Debug, Args)]
pub struct FixtureCommand {
    /// Home team id from the league file
    #[arg(long, requires = "away")]
    pub home: Option<String>,

    /// Away team id from the league file
    #[arg(long, requires = "home")]
    pub away: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FixtureCommand {
    pub fn run(&self, league: &LeagueConfig) -> anyhow::Result<()> {
        let schedule = league.schedule()?;

        let (Some(home), Some(away)) = (&self.home, &self.away) else {
            return self.print_schedule(&schedule);
        };

        let rosters = Rosters::new(find_team(league, home)?, find_team(league, away)?);
        let heats =
            FixtureGenerator::new().generate(&rosters, &schedule, &league.effective_rules())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&heats)?);
            return Ok(());
        }

        println!("{} vs {}", rosters.home.name, rosters.away.name);
        for heat in &heats {
            println!("{}", heat_line(heat));
        }
        println!();
        println!("* reserve ride, cannot be substituted");
        Ok(())
    }

    fn print_schedule(&self, schedule: &Schedule) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(schedule)?);
            return Ok(());
        }

        println!("Heat  Gate 1  Gate 2  Gate 3  Gate 4");
        for (number, row) in schedule.rows() {
            let cells: Vec<String> = row.iter().map(cell_label).collect();
            println!("{:>4}  {}", number, cells.join("  "));
        }
        Ok(())
    }
}

fn find_team(league: &LeagueConfig, id: &str) -> anyhow::Result<Team> {
    league
        .teams()
        .into_iter()
        .find(|t| t.id.as_str() == id)
        .ok_or_else(|| anyhow!("Team not found in league file: {}", id))
}

fn cell_label(cell: &GateCell) -> String {
    match cell {
        GateCell::Rider { color, lineup } => {
            helmet(*color, &format!("{:<6}", format!("{}{}", color.code(), lineup)))
        }
        GateCell::Choice { choices: [a, b] } => format!("{:<6}", format!("{}/{}", a, b)),
    }
}

fn heat_line(heat: &Heat) -> String {
    let gates: Vec<String> = heat
        .gates
        .iter()
        .map(|gate| match gate {
            GateAssignment::Concrete(slot) => {
                let lock = if slot.locked { "*" } else { "" };
                helmet(
                    slot.helmet,
                    &format!(
                        "{}{} {}{}",
                        slot.helmet.code(),
                        slot.lineup_number,
                        slot.rider_name,
                        lock
                    ),
                )
            }
            GateAssignment::Empty {
                helmet: color,
                lineup_number,
            } => helmet(*color, &format!("{}{} (to be filled)", color.code(), lineup_number)),
            GateAssignment::Placeholder { choices: [a, b] } => format!("{}/{} nomination", a, b),
        })
        .collect();
    format!("Heat {:>2} | {}", heat.number, gates.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_league() -> LeagueConfig {
        LeagueConfig::from_yaml_str(include_str!("../../../../demos/league.yaml")).unwrap()
    }

    #[test]
    fn test_cell_labels() {
        console::set_colors_enabled(false);
        let schedule = Schedule::elitserien();
        let first: Vec<String> = schedule.row(1).unwrap().iter().map(cell_label).collect();
        assert_eq!(first[0].trim_end(), "B2");
        assert_eq!(first[1].trim_end(), "V1");

        let last: Vec<String> = schedule.row(15).unwrap().iter().map(cell_label).collect();
        assert_eq!(last[0].trim_end(), "R/V");
    }

    #[test]
    fn test_vacant_gate_label() {
        console::set_colors_enabled(false);
        let mut rosters = Rosters::new(
            find_team(&demo_league(), "vetlanda").unwrap(),
            find_team(&demo_league(), "dackarna").unwrap(),
        );
        rosters.home.riders.retain(|r| !r.is_reserve);
        let heats = FixtureGenerator::new()
            .generate(&rosters, &Schedule::elitserien(), &demo_league().effective_rules())
            .unwrap();
        // Heat 2 opens with home lineup 6
        assert!(heat_line(&heats[1]).contains("R6 (to be filled)"));
    }

    #[test]
    fn test_unknown_team() {
        let league = LeagueConfig::default();
        let err = find_team(&league, "nobody").unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }
}
