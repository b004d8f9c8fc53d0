use std::collections::VecDeque;

use crate::models::SessionRecord;

/// Number of finished sessions kept unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Finished sessions, most recent first, capped at `capacity` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHistory {
    capacity: usize,
    records: VecDeque<SessionRecord>,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuild from records ordered most recent first, dropping the oldest ones
    /// beyond `capacity`.
    pub fn from_records(capacity: usize, records: Vec<SessionRecord>) -> Self {
        let mut history = Self::new(capacity);
        if records.len() > history.capacity {
            tracing::warn!(
                "Dropping {} session records beyond history capacity {}",
                records.len() - history.capacity,
                history.capacity
            );
        }
        history
            .records
            .extend(records.into_iter().take(history.capacity));
        history
    }

    /// Add a finished session at the front, evicting the oldest record when full.
    pub fn push(&mut self, record: SessionRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records as a vector, most recent first.
    pub fn to_vec(&self) -> Vec<SessionRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::SessionType;

    fn record(score: u32) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            id: Uuid::new_v4(),
            session_type: SessionType::Sprint,
            started_at: now,
            completed_at: now,
            answers: Vec::new(),
            total_count: 0,
            correct_count: 0,
            score,
            expired: false,
        }
    }

    #[test]
    fn test_push_is_most_recent_first() {
        let mut history = SessionHistory::new(10);
        history.push(record(10));
        history.push(record(20));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|r| r.score), Some(20));
        let scores: Vec<u32> = history.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![20, 10]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = SessionHistory::new(100);
        for score in 0..105 {
            history.push(record(score));
        }

        assert_eq!(history.len(), 100);
        assert_eq!(history.latest().map(|r| r.score), Some(104));
        assert_eq!(history.iter().last().map(|r| r.score), Some(5));
    }

    #[test]
    fn test_from_records_truncates() {
        let records: Vec<SessionRecord> = (0..5).rev().map(record).collect();
        let history = SessionHistory::from_records(3, records);

        let scores: Vec<u32> = history.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![4, 3, 2]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = SessionHistory::new(0);
        history.push(record(1));
        history.push(record(2));

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }
}
