use cadence_store::SessionRecord;
use chrono::{DateTime, Utc};

use crate::machine::Session;

/// Freeze a finished session into its history record.
///
/// `total_count` is the number of answered expressions and the score is the rounded
/// percentage of those answered correctly, 0 when nothing was answered.
pub fn finalize(session: Session, completed_at: DateTime<Utc>, expired: bool) -> SessionRecord {
    let total_count = session.answers.len() as u32;
    let correct_count = session.answers.iter().filter(|a| a.correct).count() as u32;

    SessionRecord {
        id: session.id,
        session_type: session.session_type,
        started_at: session.started_at,
        completed_at,
        answers: session.answers,
        total_count,
        correct_count,
        score: score(correct_count, total_count),
        expired,
    }
}

fn score(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u32
}
