//! CLI Commands

pub mod fixture;
pub mod play;
pub mod rules;

pub use fixture::FixtureCommand;
pub use play::PlayCommand;
pub use rules::RulesCommand;

use std::path::Path;

use anyhow::Context;
use console::style;
use speedway_adapter::LeagueConfig;
use speedway_domain::HelmetColor;

/// Load the league file, or fall back to the built-in defaults
pub fn load_league(path: Option<&Path>) -> anyhow::Result<LeagueConfig> {
    match path {
        Some(path) => LeagueConfig::from_file(path)
            .with_context(|| format!("Failed to load league file {}", path.display())),
        None => Ok(LeagueConfig::default()),
    }
}

/// Paint `text` in the helmet's color
pub fn helmet(color: HelmetColor, text: &str) -> String {
    let styled = style(text);
    match color {
        HelmetColor::Red => styled.red(),
        HelmetColor::Blue => styled.blue(),
        HelmetColor::Yellow => styled.yellow(),
        HelmetColor::White => styled.white().bold(),
    }
    .to_string()
}
