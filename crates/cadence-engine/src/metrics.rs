//! Counters and histograms for reviews, sessions and snapshot writes.
//!
//! Only the `metrics` facade is used here. Without an installed recorder every call is
//! a no-op; hosts that want numbers install an exporter of their choice.

use cadence_srs::ReviewRating;
use cadence_store::SessionType;
use metrics::{counter, histogram};

/// Record one SRS review
pub fn record_review(rating: ReviewRating, newly_mastered: bool) {
    counter!("cadence_reviews_total", "rating" => rating.as_str()).increment(1);

    if newly_mastered {
        counter!("cadence_items_mastered_total").increment(1);
    }
}

/// Record a session leaving the live state
///
/// `outcome` is one of `completed`, `expired` or `cancelled`; cancelled sessions have
/// no score.
pub fn record_session(session_type: SessionType, outcome: &'static str, score: Option<u32>) {
    counter!(
        "cadence_sessions_total",
        "type" => session_type.as_str(),
        "outcome" => outcome
    )
    .increment(1);

    if let Some(score) = score {
        histogram!("cadence_session_score", "type" => session_type.as_str())
            .record(f64::from(score));
    }
}

/// Record a snapshot handed to the sink
pub fn record_persist(success: bool) {
    let status = if success { "success" } else { "error" };

    counter!("cadence_snapshot_persist_total", "status" => status).increment(1);
}
