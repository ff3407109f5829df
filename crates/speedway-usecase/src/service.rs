//! MatchService - Runs match requests end to end
//!
//! Every mutation follows the same cycle under the match's lock:
//! load, check it is still open, validate and apply on a copy, save with a
//! revision check, then log and notify. A rejected request is logged and
//! reported to observers but never written.

use std::sync::{Arc, PoisonError};

use speedway_domain::{
    Eligibility, FixtureGenerator, HeatScorer, Match, MatchAggregator, MatchError, MatchEvent,
    MatchId, MatchRepository, MatchSnapshot, NominationResolver, Nominations, OfficialScore,
    ReportedResult, Resolution, RiderStanding, RosterProvider, Rosters, Rules, Schedule, Side,
    SnapshotRepository, SubstitutionRequest, SubstitutionValidator, TeamId,
};
use tracing::{debug, error, info, warn};

use crate::error::ServiceError;
use crate::locks::MatchLocks;
use crate::observer::MatchObserver;

pub struct MatchService<M, R, S> {
    matches: M,
    rosters: R,
    snapshots: S,
    schedule: Schedule,
    rules: Rules,
    observers: Vec<Arc<dyn MatchObserver>>,
    locks: MatchLocks,
}

impl<M, R, S> MatchService<M, R, S>
where
    M: MatchRepository,
    R: RosterProvider,
    S: SnapshotRepository,
{
    /// Wire the service with the Elitserien schedule and rules
    pub fn new(matches: M, rosters: R, snapshots: S) -> Self {
        Self {
            matches,
            rosters,
            snapshots,
            schedule: Schedule::elitserien(),
            rules: Rules::elitserien(),
            observers: Vec::new(),
            locks: MatchLocks::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Rules copied into matches created from now on
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    // ========== Commands ==========

    pub fn create_match(&self, home: &TeamId, away: &TeamId) -> Result<Match, ServiceError> {
        let id = MatchId::new(format!("match-{}", uuid::Uuid::new_v4()));
        self.create_match_with_id(id, home, away)
    }

    /// Generate the fixture and store a new match under `id`
    pub fn create_match_with_id(
        &self,
        id: MatchId,
        home: &TeamId,
        away: &TeamId,
    ) -> Result<Match, ServiceError> {
        let result = self.try_create(&id, home, away);
        if let Err(e) = &result {
            // Nothing was stored, so the lock entry has nothing left to guard
            if matches!(self.matches.exists(&id), Ok(false)) {
                self.locks.forget(&id);
            }
            self.rejected(&id, "create_match", e);
        }
        result
    }

    fn try_create(&self, id: &MatchId, home: &TeamId, away: &TeamId) -> Result<Match, ServiceError> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let rosters = Rosters::new(self.team(home)?, self.team(away)?);
        let heats = FixtureGenerator::new().generate(&rosters, &self.schedule, &self.rules)?;
        let record = Match::new(id.clone(), home.clone(), away.clone(), heats, self.rules.clone());
        self.matches.save(&record)?;

        self.publish(&[MatchEvent::MatchCreated {
            match_id: id.as_str().to_string(),
            home_team_id: home.as_str().to_string(),
            away_team_id: away.as_str().to_string(),
            heats: record.heats().len(),
        }]);
        self.load(id)
    }

    pub fn substitute(
        &self,
        id: &MatchId,
        request: &SubstitutionRequest,
    ) -> Result<Match, ServiceError> {
        self.mutate(id, "substitute", |record, rosters| {
            let validator = SubstitutionValidator::new();
            let changes = validator.validate(record, rosters, request)?;
            validator.apply(record, request.heat, changes)
        })
    }

    pub fn score_heat(
        &self,
        id: &MatchId,
        heat: u8,
        reported: &[ReportedResult],
    ) -> Result<Match, ServiceError> {
        self.mutate(id, "score_heat", |record, _| {
            let scorer = HeatScorer::new();
            let target = record
                .heat(heat)
                .ok_or_else(|| MatchError::structural(format!("heat {} does not exist", heat)))?;
            let score = scorer.score(target, reported)?;
            Ok(vec![scorer.apply(record, score)?])
        })
    }

    pub fn nominate(&self, id: &MatchId, nominations: &Nominations) -> Result<Match, ServiceError> {
        self.mutate(id, "nominate", |record, rosters| {
            let resolver = NominationResolver::new();
            let heats = resolver.resolve(record, rosters, nominations)?;
            Ok(vec![resolver.apply(record, heats)?])
        })
    }

    /// Confirm a fully raced match and store its snapshot
    ///
    /// Confirming again overwrites the stored snapshot.
    pub fn confirm(
        &self,
        id: &MatchId,
        official: Option<OfficialScore>,
    ) -> Result<MatchSnapshot, ServiceError> {
        let result = self.try_confirm(id, official);
        if let Err(e) = &result {
            self.rejected(id, "confirm", e);
        }
        result
    }

    fn try_confirm(
        &self,
        id: &MatchId,
        official: Option<OfficialScore>,
    ) -> Result<MatchSnapshot, ServiceError> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let original = self.load(id)?;
        let mut record = original.clone();
        let snapshot = MatchAggregator::new().confirm(&mut record, official)?;
        self.matches.save(&record)?;

        if let Err(e) = self.snapshots.save_snapshot(&snapshot) {
            // Put the match back as it was, one revision on
            let mut restore = original;
            restore.advance_revision();
            if let Err(rollback) = self.matches.save(&restore) {
                error!(match_id = %id, error = %rollback, "Failed to roll back confirmation");
            }
            return Err(e.into());
        }

        self.publish(&[MatchEvent::confirmed(&snapshot)]);
        Ok(snapshot)
    }

    /// Settle a disputed snapshot
    pub fn resolve_discrepancy(
        &self,
        id: &MatchId,
        resolution: Resolution,
    ) -> Result<MatchSnapshot, ServiceError> {
        let result = self.try_resolve(id, resolution);
        if let Err(e) = &result {
            self.rejected(id, "resolve_discrepancy", e);
        }
        result
    }

    fn try_resolve(&self, id: &MatchId, resolution: Resolution) -> Result<MatchSnapshot, ServiceError> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut snapshot = self.snapshot(id)?;
        snapshot.resolve(resolution)?;
        self.snapshots.save_snapshot(&snapshot)?;

        self.publish(&[MatchEvent::resolved(&snapshot, resolution)]);
        Ok(snapshot)
    }

    pub fn delete_match(&self, id: &MatchId) -> Result<(), ServiceError> {
        {
            let lock = self.locks.lock_for(id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.load(id)?;
            self.matches.delete(id)?;
        }
        self.locks.forget(id);
        info!(match_id = %id, "Match deleted");
        Ok(())
    }

    // ========== Queries ==========

    pub fn get_match(&self, id: &MatchId) -> Result<Match, ServiceError> {
        self.load(id)
    }

    pub fn list_matches(&self) -> Result<Vec<Match>, ServiceError> {
        Ok(self.matches.list()?)
    }

    pub fn standings(&self, id: &MatchId) -> Result<Vec<RiderStanding>, ServiceError> {
        let record = self.load(id)?;
        let rosters = self.rosters_for(&record)?;
        Ok(MatchAggregator::new().rider_standings(&record, &rosters))
    }

    /// Riders a side may put into a top-3 restricted heat right now
    pub fn nomination_candidates(&self, id: &MatchId, side: Side) -> Result<Eligibility, ServiceError> {
        let record = self.load(id)?;
        let rosters = self.rosters_for(&record)?;
        Ok(NominationResolver::new().top_three(&record, &rosters, side))
    }

    pub fn snapshot(&self, id: &MatchId) -> Result<MatchSnapshot, ServiceError> {
        self.snapshots
            .find_snapshot(id)?
            .ok_or_else(|| ServiceError::SnapshotNotFound(id.clone()))
    }

    // ========== Internals ==========

    /// The shared read-validate-write cycle of every heat-level mutation
    fn mutate<F>(&self, id: &MatchId, operation: &'static str, change: F) -> Result<Match, ServiceError>
    where
        F: FnOnce(&mut Match, &Rosters) -> Result<Vec<MatchEvent>, MatchError>,
    {
        let result = self.try_mutate(id, change);
        if let Err(e) = &result {
            self.rejected(id, operation, e);
        }
        result
    }

    fn try_mutate<F>(&self, id: &MatchId, change: F) -> Result<Match, ServiceError>
    where
        F: FnOnce(&mut Match, &Rosters) -> Result<Vec<MatchEvent>, MatchError>,
    {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(match_id = %id, "Match lock acquired");

        let mut record = self.load(id)?;
        if record.is_confirmed() {
            return Err(ServiceError::AlreadyConfirmed(id.clone()));
        }
        let rosters = self.rosters_for(&record)?;

        let events = change(&mut record, &rosters)?;
        let revision = self.matches.save(&record)?;
        debug!(match_id = %id, revision, score = %record.score(), "Match saved");

        self.publish(&events);
        self.load(id)
    }

    fn load(&self, id: &MatchId) -> Result<Match, ServiceError> {
        self.matches
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::MatchNotFound(id.clone()))
    }

    fn team(&self, id: &TeamId) -> Result<speedway_domain::Team, ServiceError> {
        self.rosters
            .team(id)?
            .ok_or_else(|| ServiceError::TeamNotFound(id.clone()))
    }

    fn rosters_for(&self, record: &Match) -> Result<Rosters, ServiceError> {
        Ok(Rosters::new(
            self.team(record.home_team_id())?,
            self.team(record.away_team_id())?,
        ))
    }

    fn publish(&self, events: &[MatchEvent]) {
        for event in events {
            log_event(event);
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }

    fn rejected(&self, id: &MatchId, operation: &str, error: &ServiceError) {
        warn!(
            match_id = %id,
            operation,
            kind = error.kind(),
            error = %error,
            "Request rejected"
        );
        for observer in &self.observers {
            observer.on_rejected(id.as_str(), operation, error);
        }
    }
}

fn log_event(event: &MatchEvent) {
    match event {
        MatchEvent::MatchCreated {
            match_id,
            home_team_id,
            away_team_id,
            heats,
        } => info!(%match_id, %home_team_id, %away_team_id, heats, "Match created"),
        MatchEvent::SubstitutionApplied {
            match_id,
            heat,
            gate,
            outgoing,
            incoming,
        } => info!(
            %match_id,
            heat,
            gate,
            outgoing = outgoing.as_deref().unwrap_or("-"),
            %incoming,
            "Substitution applied"
        ),
        MatchEvent::HeatScored {
            match_id,
            heat,
            home_delta,
            away_delta,
            score,
        } => info!(%match_id, heat, home_delta, away_delta, %score, "Heat scored"),
        MatchEvent::NominationsResolved { match_id, heats } => {
            info!(%match_id, heats = ?heats, "Nominations resolved")
        }
        MatchEvent::MatchConfirmed {
            match_id,
            score,
            verification,
        } => info!(%match_id, %score, verification = ?verification, "Match confirmed"),
        MatchEvent::DiscrepancyResolved {
            match_id,
            resolution,
            score,
        } => info!(%match_id, resolution = ?resolution, %score, "Discrepancy resolved"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedway_domain::{
        check_revision, Gate, HeatNomination, MatchStatus, RepositoryError, Rider, Score, Team,
        Verification,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMatches {
        matches: Mutex<HashMap<MatchId, Match>>,
    }

    impl MatchRepository for FakeMatches {
        fn save(&self, record: &Match) -> Result<u64, RepositoryError> {
            let mut matches = self.matches.lock().unwrap();
            check_revision(
                record.id(),
                matches.get(record.id()).map(Match::revision),
                record.revision(),
            )?;
            let mut next = record.clone();
            next.advance_revision();
            let revision = next.revision();
            matches.insert(record.id().clone(), next);
            Ok(revision)
        }

        fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
            Ok(self.matches.lock().unwrap().get(id).cloned())
        }

        fn delete(&self, id: &MatchId) -> Result<(), RepositoryError> {
            self.matches.lock().unwrap().remove(id);
            Ok(())
        }

        fn list(&self) -> Result<Vec<Match>, RepositoryError> {
            Ok(self.matches.lock().unwrap().values().cloned().collect())
        }
    }

    #[derive(Default)]
    struct FakeSnapshots {
        snapshots: Mutex<HashMap<MatchId, MatchSnapshot>>,
        unavailable: bool,
    }

    impl SnapshotRepository for FakeSnapshots {
        fn save_snapshot(&self, snapshot: &MatchSnapshot) -> Result<(), RepositoryError> {
            if self.unavailable {
                return Err(RepositoryError::Persistence {
                    message: "snapshot store unavailable".into(),
                });
            }
            self.snapshots
                .lock()
                .unwrap()
                .insert(snapshot.match_id.clone(), snapshot.clone());
            Ok(())
        }

        fn find_snapshot(&self, id: &MatchId) -> Result<Option<MatchSnapshot>, RepositoryError> {
            Ok(self.snapshots.lock().unwrap().get(id).cloned())
        }
    }

    struct FakeRosters {
        teams: Vec<Team>,
    }

    impl RosterProvider for FakeRosters {
        fn team(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError> {
            Ok(self.teams.iter().find(|t| &t.id == id).cloned())
        }

        fn list_teams(&self) -> Result<Vec<Team>, RepositoryError> {
            Ok(self.teams.clone())
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
        rejections: Mutex<Vec<(String, String)>>,
    }

    impl MatchObserver for Recorder {
        fn on_event(&self, event: &MatchEvent) {
            self.events.lock().unwrap().push(event.name().to_string());
        }

        fn on_rejected(&self, _match_id: &str, operation: &str, error: &ServiceError) {
            self.rejections
                .lock()
                .unwrap()
                .push((operation.to_string(), error.kind().to_string()));
        }
    }

    fn team(id: &str) -> Team {
        let team_id = TeamId::new(id);
        (1..=7u8).fold(Team::new(team_id.clone(), id.to_uppercase()), |team, n| {
            team.with_rider(Rider::new(
                format!("{}{}", id, n),
                format!("{} rider {}", id, n),
                team_id.clone(),
                n,
            ))
        })
    }

    type Service = MatchService<FakeMatches, FakeRosters, FakeSnapshots>;

    fn service() -> (Service, Arc<Recorder>) {
        service_with(FakeSnapshots::default())
    }

    fn service_with(snapshots: FakeSnapshots) -> (Service, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let service = MatchService::new(
            FakeMatches::default(),
            FakeRosters {
                teams: vec![team("h"), team("a")],
            },
            snapshots,
        )
        .with_observer(recorder.clone());
        (service, recorder)
    }

    fn create(service: &Service) -> MatchId {
        service
            .create_match_with_id(MatchId::new("m-1"), &TeamId::new("h"), &TeamId::new("a"))
            .unwrap()
            .id()
            .clone()
    }

    /// Finishing order by gate, home taking first and second
    fn home_one_two(record: &Match, heat: u8) -> Vec<ReportedResult> {
        let heat = record.heat(heat).unwrap();
        [Gate::One, Gate::Three, Gate::Two, Gate::Four]
            .iter()
            .enumerate()
            .map(|(idx, gate)| {
                let id = heat.gate(*gate).rider_id().unwrap();
                ReportedResult::finished(id.as_str(), idx as u8 + 1)
            })
            .collect()
    }

    fn race(service: &Service, id: &MatchId, heats: std::ops::RangeInclusive<u8>) {
        for heat in heats {
            let record = service.get_match(id).unwrap();
            service
                .score_heat(id, heat, &home_one_two(&record, heat))
                .unwrap();
        }
    }

    fn play_full_match(service: &Service, id: &MatchId) {
        race(service, id, 1..=13);
        let nominations = Nominations {
            heat14: Some(HeatNomination::new(["h1", "h2"], ["a1", "a2"])),
            heat15: Some(HeatNomination::new(["h3", "h4"], ["a3", "a4"])),
        };
        service.nominate(id, &nominations).unwrap();
        race(service, id, 14..=15);
    }

    #[test]
    fn test_create_match() {
        let (service, recorder) = service();
        let id = create(&service);

        let record = service.get_match(&id).unwrap();
        assert_eq!(record.heats().len(), 15);
        assert_eq!(record.revision(), 1);
        assert_eq!(record.status(), MatchStatus::Upcoming);
        assert_eq!(*recorder.events.lock().unwrap(), vec!["match_created"]);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let (service, _) = service();
        let a = service.create_match(&TeamId::new("h"), &TeamId::new("a")).unwrap();
        let b = service.create_match(&TeamId::new("h"), &TeamId::new("a")).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.id().as_str().starts_with("match-"));
        assert_eq!(service.list_matches().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_team() {
        let (service, recorder) = service();
        let err = service
            .create_match(&TeamId::new("h"), &TeamId::new("nobody"))
            .unwrap_err();
        assert_eq!(err, ServiceError::TeamNotFound(TeamId::new("nobody")));
        assert_eq!(recorder.rejections.lock().unwrap()[0].0, "create_match");
    }

    #[test]
    fn test_failed_creates_release_locks() {
        let (service, _) = service();
        for n in 0..3 {
            let id = MatchId::new(format!("failed-{}", n));
            assert!(service
                .create_match_with_id(id, &TeamId::new("h"), &TeamId::new("nobody"))
                .is_err());
        }
        assert!(service.locks.is_empty());

        // A clash with a stored match keeps the stored match's lock
        let id = create(&service);
        assert!(service
            .create_match_with_id(id.clone(), &TeamId::new("h"), &TeamId::new("a"))
            .is_err());
        assert_eq!(service.locks.len(), 1);
        assert!(service.get_match(&id).is_ok());
    }

    #[test]
    fn test_create_rejects_fixture_over_ride_limits() {
        let (service, _) = service();
        let service = service.with_rules(Rules::elitserien().with_ride_limits(
            speedway_domain::RideLimits {
                main_max: 5,
                reserve_max: 2,
            },
        ));
        let err = service
            .create_match_with_id(MatchId::new("m-1"), &TeamId::new("h"), &TeamId::new("a"))
            .unwrap_err();
        assert_eq!(err.kind(), "limit");
        assert!(service.list_matches().unwrap().is_empty());
    }

    #[test]
    fn test_score_heat_updates_totals() {
        let (service, _) = service();
        let id = create(&service);
        race(&service, &id, 1..=2);

        let record = service.get_match(&id).unwrap();
        assert_eq!(record.score(), Score::new(10, 2));
        assert_eq!(record.revision(), 3);
    }

    #[test]
    fn test_rejection_leaves_match_untouched() {
        let (service, recorder) = service();
        let id = create(&service);
        let before = service.get_match(&id).unwrap();

        // Heat 1 is outside the tactical window
        let request = SubstitutionRequest::new(1).with_change(Gate::Two, "a5");
        let err = service.substitute(&id, &request).unwrap_err();
        assert_eq!(err.kind(), "window");

        assert_eq!(service.get_match(&id).unwrap(), before);
        assert_eq!(
            *recorder.rejections.lock().unwrap(),
            vec![("substitute".to_string(), "window".to_string())]
        );
    }

    #[test]
    fn test_substitution_for_trailing_side() {
        let (service, recorder) = service();
        let id = create(&service);
        race(&service, &id, 1..=4);

        // Heat 6 gate 2 carries a2
        let request = SubstitutionRequest::new(6).with_change(Gate::Two, "a5");
        let record = service.substitute(&id, &request).unwrap();
        assert_eq!(
            record.heat(6).unwrap().gate_of(&speedway_domain::RiderId::new("a5")),
            Some(Gate::Two)
        );
        assert!(recorder
            .events
            .lock()
            .unwrap()
            .contains(&"substitution_applied".to_string()));
    }

    #[test]
    fn test_full_match_and_confirmation() {
        let (service, _) = service();
        let id = create(&service);

        let err = service.confirm(&id, None).unwrap_err();
        assert_eq!(err.kind(), "incomplete");
        assert_eq!(
            service.snapshot(&id).unwrap_err(),
            ServiceError::SnapshotNotFound(id.clone())
        );

        play_full_match(&service, &id);
        let snapshot = service.confirm(&id, None).unwrap();
        assert_eq!(snapshot.score, Score::new(75, 15));
        assert!(service.get_match(&id).unwrap().is_confirmed());
        assert_eq!(service.snapshot(&id).unwrap(), snapshot);

        // Confirmed matches are read-only
        let record = service.get_match(&id).unwrap();
        let err = service
            .score_heat(&id, 1, &home_one_two(&record, 1))
            .unwrap_err();
        assert_eq!(err, ServiceError::AlreadyConfirmed(id.clone()));

        let standings = service.standings(&id).unwrap();
        assert_eq!(standings.len(), 14);
    }

    #[test]
    fn test_failed_snapshot_write_rolls_back_confirmation() {
        let (service, recorder) = service_with(FakeSnapshots {
            unavailable: true,
            ..FakeSnapshots::default()
        });
        let id = create(&service);
        play_full_match(&service, &id);
        let before = service.get_match(&id).unwrap();

        let err = service.confirm(&id, None).unwrap_err();
        assert_eq!(err.kind(), "repository");

        let after = service.get_match(&id).unwrap();
        assert!(!after.is_confirmed());
        assert_eq!(after.status(), before.status());
        assert_eq!(after.heats(), before.heats());
        assert_eq!(after.revision(), before.revision() + 2);
        assert_eq!(
            service.snapshot(&id).unwrap_err(),
            ServiceError::SnapshotNotFound(id.clone())
        );
        assert!(!recorder
            .events
            .lock()
            .unwrap()
            .contains(&"match_confirmed".to_string()));

        // The match stays open for further requests
        assert!(service
            .resolve_discrepancy(&id, Resolution::KeepUser)
            .is_err());
        let record = service.get_match(&id).unwrap();
        assert!(service
            .score_heat(&id, 15, &home_one_two(&record, 15))
            .is_ok());
    }

    #[test]
    fn test_reconfirm_overwrites_snapshot_and_resolves() {
        let (service, recorder) = service();
        let id = create(&service);
        play_full_match(&service, &id);

        service.confirm(&id, None).unwrap();
        let disputed = service.confirm(&id, Some(Score::new(74, 16))).unwrap();
        assert!(disputed.is_disputed());
        assert!(service.snapshot(&id).unwrap().is_disputed());

        let resolved = service
            .resolve_discrepancy(&id, Resolution::AcceptOfficial)
            .unwrap();
        assert_eq!(resolved.score, Score::new(74, 16));
        assert_eq!(resolved.verification, Verification::Validated);
        assert_eq!(service.snapshot(&id).unwrap(), resolved);

        let err = service
            .resolve_discrepancy(&id, Resolution::KeepUser)
            .unwrap_err();
        assert_eq!(err.kind(), "structural");
        assert!(recorder
            .events
            .lock()
            .unwrap()
            .contains(&"discrepancy_resolved".to_string()));
    }

    #[test]
    fn test_nomination_candidates() {
        let (service, _) = service();
        let id = create(&service);
        race(&service, &id, 1..=13);

        let eligible = service.nomination_candidates(&id, Side::Home).unwrap();
        assert_eq!(eligible.riders.len(), 5);
    }

    #[test]
    fn test_delete_match() {
        let (service, _) = service();
        let id = create(&service);
        service.delete_match(&id).unwrap();
        assert_eq!(
            service.get_match(&id).unwrap_err(),
            ServiceError::MatchNotFound(id.clone())
        );
        assert!(service.delete_match(&id).is_err());
    }
}
