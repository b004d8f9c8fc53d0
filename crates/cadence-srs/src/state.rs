use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lowest ease factor an item can reach.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor given to newly created items.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Items whose interval reaches this many days count as mastered.
pub const MASTERY_THRESHOLD_DAYS: u32 = 21;

/// Per-item scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
    /// Consecutive successful reviews since the last `again`
    pub repetition: u32,
    /// Interval multiplier, never below [`MIN_EASE_FACTOR`]
    pub ease_factor: f64,
    /// Current interval in days
    pub interval: u32,
    /// When the item is next due
    pub next_review_date: DateTime<Utc>,
    /// When the item was created
    pub created_at: DateTime<Utc>,
    /// When the state last changed
    pub updated_at: DateTime<Utc>,
}

impl SrsState {
    /// Fresh state for an item created at `now`. New items are due immediately.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            repetition: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            next_review_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Items with no successful repetition yet (new or just failed).
    pub const fn is_new(&self) -> bool {
        self.repetition == 0
    }

    /// Due items are new ones plus every item whose review date has been reached.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_new() || self.next_review_date <= now
    }

    /// Strictly past its review date. An item due exactly at `now` is not overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date < now
    }

    /// Derived from the interval on every call, never stored.
    pub const fn is_mastered(&self) -> bool {
        self.interval >= MASTERY_THRESHOLD_DAYS
    }

    /// How long past its review date the item is, zero if not yet reached.
    pub fn overdue_by(&self, now: DateTime<Utc>) -> Duration {
        (now - self.next_review_date).max(Duration::zero())
    }
}
