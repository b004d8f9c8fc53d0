//! Session countdown state machine.
//!
//! ```text
//! idle ──start──▶ active ⇄ paused
//!   ▲               │  │      │
//!   └────cancel─────┘  └─end / countdown at 0──▶ completed ──start──▶ active
//! ```
//!
//! The machine owns no timer. The host calls [`SessionMachine::tick`] once per second
//! and each call takes exactly one second off the countdown, whatever the wall clock
//! says. Ticks that arrive while paused or with no live session are ignored.

use std::{fmt, time::Duration};

use cadence_store::{AnswerRecord, ReviewItem, SessionHistory, SessionRecord, SessionType};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::SessionError,
    recorder::finalize,
    selector::{ProficiencyMap, select_content},
};

/// A correct-answer streak hitting a multiple of this raises a milestone.
const STREAK_MILESTONE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    Paused,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        })
    }
}

/// The live session. Only reachable through [`SessionMachine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub session_type: SessionType,
    /// Expressions in presentation order
    pub expressions: Vec<ReviewItem>,
    pub current_index: usize,
    /// One entry per answered expression, in first-answer order
    pub answers: Vec<AnswerRecord>,
    pub time_remaining: u32,
    pub is_paused: bool,
    pub started_at: DateTime<Utc>,
    correct_streak: u32,
}

/// Outcome signals for the host's feedback channels (sound, haptics, badges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub is_correct: bool,
    /// Attempts on this expression so far, including this one
    pub attempts: u32,
    pub correct_streak: u32,
    /// The streak just reached a multiple of five
    pub streak_milestone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub current_index: usize,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub time_remaining: u32,
    pub is_paused: bool,
}

/// What a call to [`SessionMachine::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off the countdown
    Running { remaining: u32 },
    /// The countdown reached zero and the session was recorded
    Expired(SessionRecord),
    /// Nothing happened: the session is paused or there is none
    Ignored { phase: SessionPhase },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMachine {
    session: Option<Session>,
    completed: bool,
    history: SessionHistory,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(SessionHistory::default())
    }
}

impl SessionMachine {
    pub const fn new(history: SessionHistory) -> Self {
        Self {
            session: None,
            completed: false,
            history,
        }
    }

    pub const fn phase(&self) -> SessionPhase {
        match &self.session {
            Some(session) if session.is_paused => SessionPhase::Paused,
            Some(_) => SessionPhase::Active,
            None if self.completed => SessionPhase::Completed,
            None => SessionPhase::Idle,
        }
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub const fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Build content for `session_type` from `pool` and start the countdown.
    ///
    /// A live session is replaced without being recorded; callers that care must
    /// check [`Self::phase`] first.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        session_type: SessionType,
        pool: &[ReviewItem],
        proficiency: &ProficiencyMap,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<&Session, SessionError> {
        let content = select_content(pool, session_type.target_count(), proficiency, rng);
        if content.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        if let Some(previous) = self.session.take() {
            tracing::warn!(
                session_id = %previous.id,
                "Starting a new session replaces the live one without recording it"
            );
        }

        let session = Session {
            id: Uuid::new_v4(),
            session_type,
            expressions: content.into_shuffled(rng),
            current_index: 0,
            answers: Vec::new(),
            time_remaining: session_type.duration_secs(),
            is_paused: false,
            started_at: now,
            correct_streak: 0,
        };
        tracing::debug!(
            session_id = %session.id,
            session_type = %session_type,
            expressions = session.expressions.len(),
            "Session started"
        );

        self.completed = false;
        Ok(self.session.insert(session))
    }

    /// Take one second off the countdown, ending the session when it reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let phase = self.phase();
        let Some(session) = self.session.as_mut().filter(|s| !s.is_paused) else {
            return TickOutcome::Ignored { phase };
        };

        session.time_remaining = session.time_remaining.saturating_sub(1);
        if session.time_remaining > 0 {
            return TickOutcome::Running {
                remaining: session.time_remaining,
            };
        }

        match self.finish(now, true) {
            Some(record) => TickOutcome::Expired(record),
            None => TickOutcome::Ignored { phase },
        }
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        let session = self.active_mut("pause")?;
        session.is_paused = true;
        tracing::debug!(
            session_id = %session.id,
            remaining = session.time_remaining,
            "Session paused"
        );
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        match self.session.as_mut() {
            Some(session) if session.is_paused => {
                session.is_paused = false;
                tracing::debug!(session_id = %session.id, "Session resumed");
                Ok(())
            }
            _ => Err(SessionError::InvalidTransition {
                operation: "resume",
                phase,
            }),
        }
    }

    /// Record an answer for an expression of the live session.
    ///
    /// Answering the same expression again overwrites the result and bumps the attempt
    /// counter. The current index does not move.
    pub fn record_answer(
        &mut self,
        item_id: Uuid,
        correct: bool,
        response_time: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<AnswerFeedback, SessionError> {
        let session = self.active_mut("record an answer")?;
        if !session.expressions.iter().any(|e| e.id == item_id) {
            return Err(SessionError::InvalidReference(item_id));
        }

        let response_time_ms =
            response_time.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        let attempts = match session.answers.iter().position(|a| a.item_id == item_id) {
            Some(index) => {
                let answer = &mut session.answers[index];
                answer.attempts += 1;
                answer.correct = correct;
                answer.response_time_ms = response_time_ms;
                answer.answered_at = now;
                answer.attempts
            }
            None => {
                session.answers.push(AnswerRecord {
                    item_id,
                    correct,
                    attempts: 1,
                    response_time_ms,
                    answered_at: now,
                });
                1
            }
        };

        session.correct_streak = if correct { session.correct_streak + 1 } else { 0 };

        Ok(AnswerFeedback {
            is_correct: correct,
            attempts,
            correct_streak: session.correct_streak,
            streak_milestone: correct && session.correct_streak % STREAK_MILESTONE == 0,
        })
    }

    /// Move to the next expression. Returns `false`, changing nothing, when the current
    /// expression is the last one; the caller is expected to end the session then.
    pub fn next_expression(&mut self) -> Result<bool, SessionError> {
        let session = self.active_mut("advance")?;
        if session.current_index + 1 >= session.expressions.len() {
            return Ok(false);
        }
        session.current_index += 1;
        Ok(true)
    }

    /// Score the live session, add it to the history and mark the machine completed.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<SessionRecord, SessionError> {
        let phase = self.phase();
        self.finish(now, false)
            .ok_or(SessionError::InvalidTransition {
                operation: "end",
                phase,
            })
    }

    /// Drop the live session without recording it.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        let session = self.session.take().ok_or(SessionError::InvalidTransition {
            operation: "cancel",
            phase,
        })?;
        self.completed = false;
        tracing::debug!(session_id = %session.id, "Session cancelled");
        Ok(())
    }

    pub fn current_expression(&self) -> Option<&ReviewItem> {
        self.session
            .as_ref()
            .and_then(|s| s.expressions.get(s.current_index))
    }

    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(|s| SessionProgress {
            current_index: s.current_index,
            total: s.expressions.len(),
            answered: s.answers.len(),
            correct: s.answers.iter().filter(|a| a.correct).count(),
            time_remaining: s.time_remaining,
            is_paused: s.is_paused,
        })
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.time_remaining)
    }

    fn active_mut(&mut self, operation: &'static str) -> Result<&mut Session, SessionError> {
        let phase = self.phase();
        match self.session.as_mut() {
            Some(session) if !session.is_paused => Ok(session),
            _ => Err(SessionError::InvalidTransition { operation, phase }),
        }
    }

    fn finish(&mut self, now: DateTime<Utc>, expired: bool) -> Option<SessionRecord> {
        let session = self.session.take()?;
        let record = finalize(session, now, expired);

        tracing::info!(
            session_id = %record.id,
            session_type = %record.session_type,
            score = record.score,
            answered = record.total_count,
            expired,
            "Session completed"
        );

        self.history.push(record.clone());
        self.completed = true;
        Some(record)
    }
}
