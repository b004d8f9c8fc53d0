//! SM-2 scheduling.
//!
//! Interval growth after a successful recall:
//!
//! * Repetition 1: 1 day
//! * Repetition 2: 6 days
//! * Repetition 3+: previous interval multiplied by the (already adjusted) ease factor,
//!   rounded half away from zero
//!
//! The result never shrinks below the previous interval and never exceeds
//! [`SchedulerConfig::max_interval_days`]. An `again` rating resets the item to
//! interval 0 and makes it due immediately.

use chrono::{DateTime, Duration, Utc};

use crate::{
    rating::ReviewRating,
    state::{MIN_EASE_FACTOR, SrsState},
};

/// Upper bound on intervals unless configured otherwise (one year).
pub const DEFAULT_MAX_INTERVAL_DAYS: u32 = 365;

/// Largest interval cap accepted, one hundred years.
pub const MAX_INTERVAL_CAP_DAYS: u32 = 36_500;

/// Tunables for [`review`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    max_interval_days: u32,
}

impl SchedulerConfig {
    /// Config capping intervals at `max_interval_days`, clamped to
    /// `1..=MAX_INTERVAL_CAP_DAYS`.
    pub const fn new(max_interval_days: u32) -> Self {
        let max_interval_days = if max_interval_days == 0 {
            1
        } else if max_interval_days > MAX_INTERVAL_CAP_DAYS {
            MAX_INTERVAL_CAP_DAYS
        } else {
            max_interval_days
        };
        Self { max_interval_days }
    }

    /// Longest interval, in days, the scheduler will ever produce
    pub const fn max_interval_days(&self) -> u32 {
        self.max_interval_days
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INTERVAL_DAYS)
    }
}

/// Result of reviewing one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    /// The new scheduling state
    pub state: SrsState,
    /// The review moved the item across the mastery threshold
    pub newly_mastered: bool,
}

/// Compute the next scheduling state for an item given the learner's rating.
///
/// # Arguments
///
/// * `state` - Current scheduling state of the item
/// * `rating` - How well the learner recalled it
/// * `now` - Review time, used for `nextReviewDate` and `updatedAt`
/// * `config` - Interval cap
///
/// # Returns
///
/// The new state plus a flag telling whether the item just became mastered.
pub fn review(
    state: &SrsState,
    rating: ReviewRating,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> ReviewOutcome {
    let ease_factor = (state.ease_factor + rating.ease_delta()).max(MIN_EASE_FACTOR);

    let (repetition, interval) = match rating {
        ReviewRating::Again => (0, 0),
        ReviewRating::Hard | ReviewRating::Good | ReviewRating::Easy => {
            let repetition = state.repetition.saturating_add(1);
            let interval = next_interval(
                state.interval,
                repetition,
                ease_factor,
                config.max_interval_days,
            );
            (repetition, interval)
        }
    };

    let next = SrsState {
        repetition,
        ease_factor,
        interval,
        next_review_date: due_after(now, interval),
        created_at: state.created_at,
        updated_at: now,
    };

    ReviewOutcome {
        newly_mastered: !state.is_mastered() && next.is_mastered(),
        state: next,
    }
}

fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn next_interval(previous: u32, repetition: u32, ease_factor: f64, max_days: u32) -> u32 {
    let grown = match repetition {
        1 => 1,
        2 => 6,
        _ => scale_interval(previous, ease_factor),
    };

    grown.max(previous).max(1).min(max_days)
}

fn scale_interval(previous: u32, ease_factor: f64) -> u32 {
    let scaled = (f64::from(previous) * ease_factor).round();
    // float to int casts saturate, so a huge product lands on u32::MAX before the cap applies
    scaled as u32
}
