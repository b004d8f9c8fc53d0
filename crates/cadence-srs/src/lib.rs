//! SRS (Spaced Repetition System) library for Cadence
//!
//! This crate provides the SM-2 scheduling algorithm and the due-queue ranking
//! used to decide which review items the learner should see next.
//!
//! Everything here is pure: callers pass the current time in, nothing reads a
//! clock or touches storage.

pub mod queue;
pub mod rating;
pub mod scheduler;
pub mod state;

pub use queue::{Scheduled, due_count, due_words, mastered_words, overdue_words};
pub use rating::{ParseRatingError, ReviewRating};
pub use scheduler::{
    DEFAULT_MAX_INTERVAL_DAYS, MAX_INTERVAL_CAP_DAYS, ReviewOutcome, SchedulerConfig, review,
};
pub use state::{DEFAULT_EASE_FACTOR, MASTERY_THRESHOLD_DAYS, MIN_EASE_FACTOR, SrsState};
