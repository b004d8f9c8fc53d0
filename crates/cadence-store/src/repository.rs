use std::collections::BTreeMap;

use cadence_srs::{
    ReviewOutcome, ReviewRating, SchedulerConfig, due_count, due_words, mastered_words,
    overdue_words, review,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{NewReviewItem, ReviewItem, ReviewStats},
};

/// Review items keyed by id, plus the aggregate statistics derived from them.
///
/// Items are kept in id order so every query iterates them deterministically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemRepository {
    items: BTreeMap<Uuid, ReviewItem>,
    stats: ReviewStats,
}

impl ItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from persisted parts. Counters in `stats` are kept, the
    /// item-derived fields are recomputed.
    pub fn from_parts(items: Vec<ReviewItem>, stats: ReviewStats) -> Result<Self, StoreError> {
        let mut repository = Self {
            items: BTreeMap::new(),
            stats,
        };
        for item in items {
            if repository.items.contains_key(&item.id) {
                return Err(StoreError::DuplicateItem(item.id));
            }
            repository.items.insert(item.id, item);
        }
        repository.stats.refresh(repository.items.values());
        Ok(repository)
    }

    /// Create a fresh item, due immediately.
    pub fn add(&mut self, new_item: NewReviewItem, now: DateTime<Utc>) -> &ReviewItem {
        let item = ReviewItem::new(new_item, now);
        let id = item.id;
        self.items.insert(id, item);
        self.stats.refresh(self.items.values());
        &self.items[&id]
    }

    /// Insert an existing item as-is.
    pub fn insert(&mut self, item: ReviewItem) -> Result<(), StoreError> {
        if self.items.contains_key(&item.id) {
            return Err(StoreError::DuplicateItem(item.id));
        }
        self.items.insert(item.id, item);
        self.stats.refresh(self.items.values());
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<ReviewItem, StoreError> {
        let item = self
            .items
            .remove(&id)
            .ok_or(StoreError::InvalidReference(id))?;
        self.stats.refresh(self.items.values());
        Ok(item)
    }

    pub fn get(&self, id: Uuid) -> Result<&ReviewItem, StoreError> {
        self.items.get(&id).ok_or(StoreError::InvalidReference(id))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.items.contains_key(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn stats(&self) -> &ReviewStats {
        &self.stats
    }

    /// Run the scheduler on one item and store the result.
    pub fn apply_review(
        &mut self,
        id: Uuid,
        rating: ReviewRating,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Result<ReviewOutcome, StoreError> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(StoreError::InvalidReference(id))?;

        let outcome = review(&item.srs, rating, now, config);
        item.srs = outcome.state.clone();

        self.stats.record_review(rating, &outcome.state, now);
        self.stats.refresh(self.items.values());
        Ok(outcome)
    }

    /// Items due at `now`, most urgent first.
    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        due_words(self.items.values(), now)
    }

    /// Items strictly past their review date, most urgent first.
    pub fn overdue_words(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        overdue_words(self.items.values(), now)
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        due_count(self.items.values(), now)
    }

    pub fn mastered_words(&self) -> Vec<&ReviewItem> {
        mastered_words(self.items.values())
    }
}
