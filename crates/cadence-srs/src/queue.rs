//! Due-queue ranking.
//!
//! Items are ordered most urgent first: the longer an item has been waiting past its
//! review date the earlier it comes, and among equally overdue items the ones with a
//! lower ease factor (the ones the learner struggles with) come first. Remaining ties
//! fall back to creation time and then id, so the order is total and stable across calls.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::state::SrsState;

/// Anything that carries scheduling state and an id the queue can rank by.
pub trait Scheduled {
    /// Identifier used as the last tie-breaker
    type Id: Ord;

    /// Stable identifier of the item
    fn id(&self) -> &Self::Id;

    /// Current scheduling state
    fn srs(&self) -> &SrsState;
}

/// Items due at `now`, most urgent first.
pub fn due_words<'a, T, I>(items: I, now: DateTime<Utc>) -> Vec<&'a T>
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    ranked(items, now, |state| state.is_due(now))
}

/// Items whose review date is strictly before `now`, most urgent first.
pub fn overdue_words<'a, T, I>(items: I, now: DateTime<Utc>) -> Vec<&'a T>
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    ranked(items, now, |state| state.is_overdue(now))
}

/// Number of items due at `now`.
pub fn due_count<'a, T, I>(items: I, now: DateTime<Utc>) -> usize
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| item.srs().is_due(now))
        .count()
}

/// Mastered items, longest interval first.
pub fn mastered_words<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut mastered: Vec<&T> = items
        .into_iter()
        .filter(|item| item.srs().is_mastered())
        .collect();
    mastered.sort_by(|a, b| {
        b.srs()
            .interval
            .cmp(&a.srs().interval)
            .then_with(|| a.id().cmp(b.id()))
    });
    mastered
}

fn ranked<'a, T, I, F>(items: I, now: DateTime<Utc>, keep: F) -> Vec<&'a T>
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&SrsState) -> bool,
{
    let mut selected: Vec<&T> = items.into_iter().filter(|item| keep(item.srs())).collect();
    selected.sort_by(|a, b| compare_urgency(*a, *b, now));
    selected
}

fn compare_urgency<T: Scheduled>(a: &T, b: &T, now: DateTime<Utc>) -> Ordering {
    let (left, right) = (a.srs(), b.srs());

    right
        .overdue_by(now)
        .cmp(&left.overdue_by(now))
        .then_with(|| left.ease_factor.total_cmp(&right.ease_factor))
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| a.id().cmp(b.id()))
}
