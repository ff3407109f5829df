//! speedway play command
//!
//! Replays a match script against in-memory stores. Each step is one
//! service request; rejected steps are reported and skipped unless
//! `--strict` is given.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use audit::AuditTrail;
use clap::Args;
use console::style;
use serde::{Deserialize, Serialize};
use speedway_adapter::{
    InMemoryMatchRepository, InMemoryRosterProvider, InMemorySnapshotRepository, LeagueConfig,
};
use speedway_domain::{
    Gate, HeatNomination, Match, MatchId, MatchSnapshot, Nominations, OfficialScore,
    ReportedResult, Resolution, RiderStanding, SubstitutionRequest, TeamId, Verification,
};
use speedway_usecase::{MatchService, ServiceError};
use tracing::info;

type Service = MatchService<InMemoryMatchRepository, InMemoryRosterProvider, InMemorySnapshotRepository>;

#[derive(Debug, Args)]
pub struct PlayCommand {
    /// Match script (.yaml, .yml or .json)
    pub script: PathBuf,

    /// Stop at the first rejected step
    #[arg(long)]
    pub strict: bool,

    /// Print the final match, snapshot and audit trail as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlayCommand {
    pub fn run(&self, league: &LeagueConfig) -> anyhow::Result<()> {
        let script = MatchScript::from_file(&self.script)?;
        let replay = replay(league, &script, self.strict)?;

        if self.json {
            let output = serde_json::json!({
                "match": replay.record,
                "snapshot": replay.snapshot,
                "standings": replay.standings,
                "rejections": replay.rejections,
                "audit": replay.audit,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        print_summary(&replay);
        Ok(())
    }
}

// ========== Script ==========

#[derive(Debug, Clone, Deserialize)]
pub struct MatchScript {
    /// Generated when absent
    #[serde(default)]
    pub match_id: Option<String>,
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptChange {
    pub gate: Gate,
    pub rider: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// `order` lists finishers first to last
    Score {
        heat: u8,
        order: Vec<String>,
        #[serde(default)]
        excluded: Vec<String>,
    },
    Substitute {
        heat: u8,
        changes: Vec<ScriptChange>,
    },
    Nominate {
        #[serde(default)]
        heat14: Option<HeatNomination>,
        #[serde(default)]
        heat15: Option<HeatNomination>,
    },
    Confirm {
        #[serde(default)]
        official: Option<OfficialScore>,
    },
    Resolve {
        resolution: Resolution,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Score { .. } => "score",
            Step::Substitute { .. } => "substitute",
            Step::Nominate { .. } => "nominate",
            Step::Confirm { .. } => "confirm",
            Step::Resolve { .. } => "resolve",
        }
    }

    fn apply(&self, service: &Service, id: &MatchId) -> Result<(), ServiceError> {
        match self {
            Step::Score {
                heat,
                order,
                excluded,
            } => {
                let reported: Vec<ReportedResult> = order
                    .iter()
                    .enumerate()
                    .map(|(idx, rider)| ReportedResult::finished(rider.as_str(), idx as u8 + 1))
                    .chain(excluded.iter().map(|r| ReportedResult::excluded(r.as_str())))
                    .collect();
                service.score_heat(id, *heat, &reported)?;
            }
            Step::Substitute { heat, changes } => {
                let request = changes
                    .iter()
                    .fold(SubstitutionRequest::new(*heat), |request, c| {
                        request.with_change(c.gate, c.rider.as_str())
                    });
                service.substitute(id, &request)?;
            }
            Step::Nominate { heat14, heat15 } => {
                let nominations = Nominations {
                    heat14: heat14.clone(),
                    heat15: heat15.clone(),
                };
                service.nominate(id, &nominations)?;
            }
            Step::Confirm { official } => {
                service.confirm(id, *official)?;
            }
            Step::Resolve { resolution } => {
                service.resolve_discrepancy(id, *resolution)?;
            }
        }
        Ok(())
    }
}

impl MatchScript {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => bail!(
                "Unsupported script format: {} (expected .yaml, .yml or .json)",
                path.display()
            ),
        }
    }
}

// ========== Replay ==========

#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub step: usize,
    pub action: &'static str,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct Replay {
    pub record: Match,
    pub snapshot: Option<MatchSnapshot>,
    pub standings: Vec<RiderStanding>,
    pub rejections: Vec<Rejection>,
    pub audit: serde_json::Value,
}

/// Run every step of `script` against a fresh engine
pub fn replay(league: &LeagueConfig, script: &MatchScript, strict: bool) -> anyhow::Result<Replay> {
    let trail = Arc::new(AuditTrail::default());
    let service = MatchService::new(
        InMemoryMatchRepository::new(),
        league.roster_provider(),
        InMemorySnapshotRepository::new(),
    )
    .with_rules(league.effective_rules())
    .with_schedule(league.schedule()?)
    .with_observer(trail.clone());

    let home = TeamId::new(&script.home);
    let away = TeamId::new(&script.away);
    let created = match &script.match_id {
        Some(id) => service.create_match_with_id(MatchId::new(id), &home, &away)?,
        None => service.create_match(&home, &away)?,
    };
    let id = created.id().clone();
    info!(match_id = %id, steps = script.steps.len(), "Replaying match script");

    let mut rejections = Vec::new();
    for (idx, step) in script.steps.iter().enumerate() {
        if let Err(e) = step.apply(&service, &id) {
            if strict {
                return Err(anyhow::Error::new(e)
                    .context(format!("Step {} ({}) was rejected", idx + 1, step.action())));
            }
            rejections.push(Rejection {
                step: idx + 1,
                action: step.action(),
                kind: e.kind(),
                message: e.to_string(),
            });
        }
    }

    let snapshot = match service.snapshot(&id) {
        Ok(snapshot) => Some(snapshot),
        Err(ServiceError::SnapshotNotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Replay {
        record: service.get_match(&id)?,
        snapshot,
        standings: service.standings(&id)?,
        rejections,
        audit: trail.export_json(),
    })
}

fn print_summary(replay: &Replay) {
    let record = &replay.record;
    println!(
        "{} {} - {} {}",
        style(record.home_team_id()).bold(),
        record.score().home,
        record.score().away,
        style(record.away_team_id()).bold()
    );
    println!(
        "{}/{} heats completed",
        record.completed_heats(),
        record.heats().len()
    );

    println!();
    println!("{:<24} {:>4} {:>5} {:>6}", "Rider", "Pts", "Bonus", "Heats");
    for standing in &replay.standings {
        println!(
            "{:<24} {:>4} {:>5} {:>6}",
            format!("{}. {}", standing.lineup_number, standing.rider_name),
            standing.points,
            standing.bonus_points,
            standing.heats
        );
    }

    if !replay.rejections.is_empty() {
        println!();
        println!("{}", style("Rejected steps").yellow().bold());
        for r in &replay.rejections {
            println!("  #{} {} [{}]: {}", r.step, r.action, r.kind, r.message);
        }
    }

    println!();
    match &replay.snapshot {
        None => println!("Not confirmed"),
        Some(snapshot) => match &snapshot.verification {
            Verification::Unverified => println!("Confirmed {} (no official result)", snapshot.score),
            Verification::Validated => {
                println!("Confirmed {} {}", snapshot.score, style("validated").green())
            }
            Verification::Disputed { discrepancies } => {
                println!("Confirmed {} {}", snapshot.score, style("disputed").red());
                for d in discrepancies {
                    println!(
                        "  {}: recorded {}, official {}",
                        d.side, d.user_value, d.official_value
                    );
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedway_domain::Score;
    use std::io::Write;

    const DEMO_LEAGUE: &str = include_str!("../../../../demos/league.yaml");
    const DEMO_MATCH: &str = include_str!("../../../../demos/match.yaml");

    fn demo() -> (LeagueConfig, MatchScript) {
        let league = LeagueConfig::from_yaml_str(DEMO_LEAGUE).unwrap();
        let script: MatchScript = serde_yaml::from_str(DEMO_MATCH).unwrap();
        (league, script)
    }

    #[test]
    fn test_parse_demo_script() {
        let (_, script) = demo();
        assert_eq!(script.match_id.as_deref(), Some("vetlanda-dackarna"));
        assert_eq!(script.steps[0].action(), "substitute");
        assert!(matches!(
            script.steps.last(),
            Some(Step::Resolve {
                resolution: Resolution::KeepUser
            })
        ));
    }

    #[test]
    fn test_replay_demo_match() {
        let (league, script) = demo();
        let replay = replay(&league, &script, false).unwrap();

        assert_eq!(replay.record.score(), Score::new(69, 21));
        assert_eq!(replay.record.completed_heats(), 15);

        let kinds: Vec<_> = replay.rejections.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["window", "nomination"]);
        assert_eq!(replay.rejections[0].step, 1);

        let snapshot = replay.snapshot.unwrap();
        assert_eq!(snapshot.verification, Verification::Validated);
        assert_eq!(snapshot.score, Score::new(69, 21));
        assert_eq!(snapshot.official, Some(Score::new(69, 20)));

        // accepted requests plus the two rejections
        let audit = replay.audit.as_array().unwrap();
        assert_eq!(audit.len(), 1 + 1 + 15 + 1 + 1 + 1 + 2);
    }

    #[test]
    fn test_strict_replay_stops_at_rejection() {
        let (league, script) = demo();
        let err = replay(&league, &script, true).unwrap_err();
        assert!(err.to_string().contains("Step 1 (substitute)"));
    }

    #[test]
    fn test_unknown_team_fails_replay() {
        let (league, mut script) = demo();
        script.away = "nobody".into();
        assert!(replay(&league, &script, false).is_err());
    }

    #[test]
    fn test_script_from_json_file() {
        let json = r#"{
            "home": "vetlanda",
            "away": "dackarna",
            "steps": [ { "action": "score", "heat": 1, "order": ["vet-2", "vet-1"], "excluded": ["dack-1"] } ]
        }"#;
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let script = MatchScript::from_file(file.path()).unwrap();
        assert!(script.match_id.is_none());

        let (league, _) = demo();
        let replay = replay(&league, &script, true).unwrap();
        assert!(replay.record.id().as_str().starts_with("match-"));
        assert_eq!(replay.record.score(), Score::new(5, 0));
        assert!(replay.snapshot.is_none());
    }

    #[test]
    fn test_script_unknown_format() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(MatchScript::from_file(file.path()).is_err());
    }
}
