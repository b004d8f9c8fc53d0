//! The engine handle collaborators talk to.
//!
//! An [`Engine`] is built once by the host and passed around explicitly. Each mutating
//! call runs the pure core (scheduler, selector, session machine) and then hands a fresh
//! snapshot to the configured [`SnapshotSink`].

use std::{sync::Arc, time::Duration};

use cadence_session::{
    AnswerFeedback, ProficiencyMap, Session, SessionError, SessionMachine, SessionPhase,
    SessionProgress, TickOutcome,
};
use cadence_srs::{ReviewOutcome, ReviewRating, SchedulerConfig};
use cadence_store::{
    ItemRepository, NewReviewItem, ReviewItem, ReviewStats, SessionHistory, SessionRecord,
    SessionType, Snapshot,
};
use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    clock::Clock, config::EngineConfig, error::EngineError, metrics, persistence::SnapshotSink,
};

/// Scheduling summary for one item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub item_id: Uuid,
    pub term: String,
    pub repetition: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review_date: DateTime<Utc>,
    pub is_due: bool,
    pub is_overdue: bool,
    pub is_mastered: bool,
}

pub struct Engine {
    repository: ItemRepository,
    sessions: SessionMachine,
    scheduler: SchedulerConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn SnapshotSink>,
    rng: StdRng,
}

impl Engine {
    /// Engine with an empty repository and history.
    pub fn new(config: &EngineConfig, clock: Arc<dyn Clock>, sink: Arc<dyn SnapshotSink>) -> Self {
        Self::from_parts(
            config,
            ItemRepository::new(),
            SessionHistory::new(config.history_capacity),
            clock,
            sink,
        )
    }

    /// Engine restored from a persisted snapshot. Fails if the snapshot is rejected.
    pub fn from_snapshot_json(
        config: &EngineConfig,
        json: &str,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<Self, EngineError> {
        let (repository, history) = Snapshot::from_json(json)?.restore(config.history_capacity)?;
        tracing::info!(
            items = repository.len(),
            sessions = history.len(),
            "Restored engine from snapshot"
        );
        Ok(Self::from_parts(config, repository, history, clock, sink))
    }

    /// Engine restored from `json` when it is a valid snapshot, empty otherwise.
    ///
    /// A rejected snapshot is logged and dropped: starting over is preferred to
    /// scheduling from corrupted intervals or ease factors.
    pub fn restore_or_empty(
        config: &EngineConfig,
        json: Option<&str>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        let Some(json) = json else {
            tracing::debug!("No snapshot found, starting with an empty repository");
            return Self::new(config, clock, sink);
        };

        match Snapshot::from_json(json).and_then(|s| s.restore(config.history_capacity)) {
            Ok((repository, history)) => {
                tracing::info!(
                    items = repository.len(),
                    sessions = history.len(),
                    "Restored engine from snapshot"
                );
                Self::from_parts(config, repository, history, clock, sink)
            }
            Err(e) => {
                tracing::error!(
                    "Rejected persisted snapshot, starting with an empty repository: {e}"
                );
                Self::new(config, clock, sink)
            }
        }
    }

    fn from_parts(
        config: &EngineConfig,
        repository: ItemRepository,
        history: SessionHistory,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            repository,
            sessions: SessionMachine::new(history),
            scheduler: config.scheduler(),
            clock,
            sink,
            rng,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // Items

    /// Add a new item. It is due immediately.
    pub fn add_item(&mut self, new_item: NewReviewItem) -> ReviewItem {
        let now = self.clock.now();
        let item = self.repository.add(new_item, now).clone();
        tracing::debug!(item_id = %item.id, term = %item.term, "Review item added");
        self.persist();
        item
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> Result<ReviewItem, EngineError> {
        let item = self.repository.remove(item_id)?;
        tracing::debug!(item_id = %item.id, "Review item removed");
        self.persist();
        Ok(item)
    }

    pub fn item(&self, item_id: Uuid) -> Result<&ReviewItem, EngineError> {
        Ok(self.repository.get(item_id)?)
    }

    pub fn items(&self) -> impl Iterator<Item = &ReviewItem> {
        self.repository.items()
    }

    // Reviews

    /// Rate one item and reschedule it.
    pub fn review_word(
        &mut self,
        item_id: Uuid,
        rating: ReviewRating,
    ) -> Result<ReviewOutcome, EngineError> {
        let now = self.clock.now();
        let outcome = self
            .repository
            .apply_review(item_id, rating, now, &self.scheduler)?;

        tracing::debug!(
            item_id = %item_id,
            rating = %rating,
            interval = outcome.state.interval,
            ease_factor = outcome.state.ease_factor,
            "Item reviewed"
        );
        if outcome.newly_mastered {
            tracing::info!(item_id = %item_id, "Item mastered");
        }
        metrics::record_review(rating, outcome.newly_mastered);

        self.persist();
        Ok(outcome)
    }

    /// Items due now, most urgent first.
    pub fn words_for_review(&self) -> Vec<&ReviewItem> {
        self.repository.due_words(self.clock.now())
    }

    pub fn due_word_count(&self) -> usize {
        self.repository.due_count(self.clock.now())
    }

    pub fn overdue_words(&self) -> Vec<&ReviewItem> {
        self.repository.overdue_words(self.clock.now())
    }

    pub fn mastered_words(&self) -> Vec<&ReviewItem> {
        self.repository.mastered_words()
    }

    pub fn word_progress(&self, item_id: Uuid) -> Result<WordProgress, EngineError> {
        let now = self.clock.now();
        let item = self.repository.get(item_id)?;

        Ok(WordProgress {
            item_id: item.id,
            term: item.term.clone(),
            repetition: item.srs.repetition,
            ease_factor: item.srs.ease_factor,
            interval: item.srs.interval,
            next_review_date: item.srs.next_review_date,
            is_due: item.srs.is_due(now),
            is_overdue: item.srs.is_overdue(now),
            is_mastered: item.srs.is_mastered(),
        })
    }

    pub const fn stats(&self) -> &ReviewStats {
        self.repository.stats()
    }

    // Sessions

    /// Start a timed session built from `pool`.
    ///
    /// Only one session may be live at a time: starting while one is active or paused
    /// is rejected.
    pub fn start_session(
        &mut self,
        session_type: SessionType,
        pool: &[ReviewItem],
        proficiency: &ProficiencyMap,
    ) -> Result<&Session, EngineError> {
        let phase = self.sessions.phase();
        if matches!(phase, SessionPhase::Active | SessionPhase::Paused) {
            tracing::warn!("Refusing to start a session while another one is {phase}");
            return Err(SessionError::InvalidTransition {
                operation: "start a session",
                phase,
            }
            .into());
        }

        let now = self.clock.now();
        Ok(self
            .sessions
            .start(session_type, pool, proficiency, now, &mut self.rng)?)
    }

    /// Start a timed session drawing from every item in the repository.
    pub fn start_session_from_repository(
        &mut self,
        session_type: SessionType,
        proficiency: &ProficiencyMap,
    ) -> Result<&Session, EngineError> {
        let pool: Vec<ReviewItem> = self.repository.items().cloned().collect();
        self.start_session(session_type, &pool, proficiency)
    }

    /// One second of the host's countdown driver.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.sessions.tick(self.clock.now());

        match &outcome {
            TickOutcome::Expired(record) => {
                metrics::record_session(record.session_type, "expired", Some(record.score));
                self.persist();
            }
            TickOutcome::Ignored { phase } => {
                tracing::trace!("Tick ignored while session is {phase}");
            }
            TickOutcome::Running { .. } => {}
        }

        outcome
    }

    pub fn pause_session(&mut self) -> Result<(), EngineError> {
        Ok(self.sessions.pause()?)
    }

    pub fn resume_session(&mut self) -> Result<(), EngineError> {
        Ok(self.sessions.resume()?)
    }

    pub fn record_answer(
        &mut self,
        item_id: Uuid,
        correct: bool,
        response_time: Option<Duration>,
    ) -> Result<AnswerFeedback, EngineError> {
        let now = self.clock.now();
        Ok(self
            .sessions
            .record_answer(item_id, correct, response_time, now)?)
    }

    pub fn next_expression(&mut self) -> Result<bool, EngineError> {
        Ok(self.sessions.next_expression()?)
    }

    pub fn end_session(&mut self) -> Result<SessionRecord, EngineError> {
        let record = self.sessions.end(self.clock.now())?;
        metrics::record_session(record.session_type, "completed", Some(record.score));
        self.persist();
        Ok(record)
    }

    pub fn cancel_session(&mut self) -> Result<(), EngineError> {
        let session_type = self.sessions.session().map(|s| s.session_type);
        self.sessions.cancel()?;
        if let Some(session_type) = session_type {
            metrics::record_session(session_type, "cancelled", None);
        }
        Ok(())
    }

    pub fn current_expression(&self) -> Option<&ReviewItem> {
        self.sessions.current_expression()
    }

    pub fn session_progress(&self) -> Option<SessionProgress> {
        self.sessions.progress()
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.sessions.time_remaining()
    }

    pub const fn session_phase(&self) -> SessionPhase {
        self.sessions.phase()
    }

    pub const fn history(&self) -> &SessionHistory {
        self.sessions.history()
    }

    // Persistence

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.repository, self.sessions.history())
    }

    fn persist(&self) {
        let result = self
            .snapshot()
            .to_json()
            .map_err(EngineError::from)
            .and_then(|json| Ok(self.sink.persist(&json)?));

        if let Err(e) = &result {
            tracing::error!("Failed to persist snapshot: {e}");
        }
        metrics::record_persist(result.is_ok());
    }
}
