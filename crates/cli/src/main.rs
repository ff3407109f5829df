//! Speedway CLI - Command-line interface for the match engine
//!
//! Usage:
//!   speedway fixture                         - Print the programme sheet
//!   speedway fixture --home vet --away dack  - Print a generated fixture
//!   speedway rules                           - Show the effective ruleset
//!   speedway play <script>                   - Replay a scripted match
//!
//! Every command takes `--league <file>` (YAML or JSON). Without it the
//! Elitserien defaults are used and no teams are known.

use clap::{Parser, Subcommand};
use cli::commands::{load_league, FixtureCommand, PlayCommand, RulesCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "speedway")]
#[command(about = "Speedway match engine - fixtures, substitutions, scoring and confirmation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// League configuration file
    #[arg(short, long, global = true)]
    league: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the programme sheet or a generated fixture
    Fixture(FixtureCommand),
    /// Show the ruleset new matches are created with
    Rules(RulesCommand),
    /// Replay a scripted match through the engine
    Play(PlayCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let league = load_league(cli.league.as_deref())?;
    match cli.command {
        Commands::Fixture(cmd) => cmd.run(&league),
        Commands::Rules(cmd) => cmd.run(&league),
        Commands::Play(cmd) => cmd.run(&league),
    }
}
