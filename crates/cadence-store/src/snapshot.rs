//! Persisted form of the repository and the session history.
//!
//! A snapshot is either accepted whole or rejected whole. Scheduling state that looks
//! corrupted (ease factors below the floor, duplicate ids, impossible session scores)
//! rejects the snapshot rather than being repaired.

use std::collections::HashSet;

use cadence_srs::MIN_EASE_FACTOR;
use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    history::SessionHistory,
    models::{ReviewItem, ReviewStats, SessionRecord},
    repository::ItemRepository,
};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub items: Vec<ReviewItem>,
    pub stats: ReviewStats,
    /// Most recent first
    pub history: Vec<SessionRecord>,
}

impl Snapshot {
    /// Capture the current repository and history.
    pub fn capture(repository: &ItemRepository, history: &SessionHistory) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            items: repository.items().cloned().collect(),
            stats: repository.stats().clone(),
            history: history.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::Serialization)
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Self = serde_json::from_str(json).map_err(StoreError::Deserialization)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Split back into a repository and a history capped at `history_capacity`.
    pub fn restore(
        self,
        history_capacity: usize,
    ) -> Result<(ItemRepository, SessionHistory), StoreError> {
        self.validate()?;
        let repository = ItemRepository::from_parts(self.items, self.stats)?;
        let history = SessionHistory::from_records(history_capacity, self.history);
        Ok((repository, history))
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(StoreError::CorruptSnapshot(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
            let ease = item.srs.ease_factor;
            if !ease.is_finite() || ease < MIN_EASE_FACTOR {
                return Err(StoreError::CorruptSnapshot(format!(
                    "item {} has ease factor {ease}",
                    item.id
                )));
            }
        }

        if !self.stats.average_ease_factor.is_finite() {
            return Err(StoreError::CorruptSnapshot(
                "average ease factor is not finite".to_string(),
            ));
        }

        for record in &self.history {
            if record.correct_count > record.total_count || record.score > 100 {
                return Err(StoreError::CorruptSnapshot(format!(
                    "session {} has inconsistent counts",
                    record.id
                )));
            }
        }

        Ok(())
    }
}
