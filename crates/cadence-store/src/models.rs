use std::{fmt, str::FromStr};

use cadence_srs::{DEFAULT_EASE_FACTOR, ReviewRating, Scheduled, SrsState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review item - a vocabulary expression together with its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Unique item identifier
    pub id: Uuid,
    /// Expression being learned
    pub term: String,
    /// Expected answer
    pub translation: String,
    /// Deck the expression comes from, if any
    pub deck_id: Option<Uuid>,
    /// SM-2 scheduling state
    pub srs: SrsState,
}

impl ReviewItem {
    /// Create a new, immediately due item.
    pub fn new(new_item: NewReviewItem, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            term: new_item.term,
            translation: new_item.translation,
            deck_id: new_item.deck_id,
            srs: SrsState::new(now),
        }
    }
}

impl Scheduled for ReviewItem {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn srs(&self) -> &SrsState {
        &self.srs
    }
}

/// Insert struct for [`ReviewItem`], the scheduling state is always fresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReviewItem {
    pub term: String,
    pub translation: String,
    pub deck_id: Option<Uuid>,
}

impl NewReviewItem {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
            deck_id: None,
        }
    }
}

/// Aggregate review statistics.
///
/// Derived data: individual items stay authoritative. The counters and the longest
/// interval are updated on each review, the average ease factor is recomputed from
/// the items whenever the repository changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Reviews recorded since the repository was created
    pub total_reviews: u64,
    /// Reviews rated anything but `again`
    pub correct_reviews: u64,
    /// Mean ease factor over the current items
    pub average_ease_factor: f64,
    /// Longest interval any review has produced, in days
    pub longest_interval: u32,
    /// Time of the most recent review
    pub last_review_date: Option<DateTime<Utc>>,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            total_reviews: 0,
            correct_reviews: 0,
            average_ease_factor: DEFAULT_EASE_FACTOR,
            longest_interval: 0,
            last_review_date: None,
        }
    }
}

impl ReviewStats {
    /// Count one review producing `state`.
    pub fn record_review(&mut self, rating: ReviewRating, state: &SrsState, now: DateTime<Utc>) {
        self.total_reviews += 1;
        if rating.is_correct() {
            self.correct_reviews += 1;
        }
        self.longest_interval = self.longest_interval.max(state.interval);
        self.last_review_date = Some(now);
    }

    /// Recompute the item-derived fields.
    pub fn refresh<'a>(&mut self, items: impl IntoIterator<Item = &'a ReviewItem>) {
        let (count, sum) = items
            .into_iter()
            .fold((0_u32, 0.0_f64), |(count, sum), item| {
                (count + 1, sum + item.srs.ease_factor)
            });

        self.average_ease_factor = if count == 0 {
            DEFAULT_EASE_FACTOR
        } else {
            sum / f64::from(count)
        };
    }

    /// Share of correct reviews in `[0, 1]`, zero before the first review.
    pub fn accuracy(&self) -> f64 {
        if self.total_reviews == 0 {
            0.0
        } else {
            self.correct_reviews as f64 / self.total_reviews as f64
        }
    }
}

/// Session length, which also fixes how many expressions a session asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "30s")]
    Sprint,
    #[serde(rename = "60s")]
    Standard,
    #[serde(rename = "300s")]
    Extended,
}

impl SessionType {
    /// Countdown length in seconds.
    pub const fn duration_secs(self) -> u32 {
        match self {
            Self::Sprint => 30,
            Self::Standard => 60,
            Self::Extended => 300,
        }
    }

    /// Number of expressions the content selector is asked for.
    pub const fn target_count(self) -> usize {
        match self {
            Self::Sprint => 5,
            Self::Standard => 10,
            Self::Extended => 30,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sprint => "30s",
            Self::Standard => "60s",
            Self::Extended => "300s",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "30s" => Ok(Self::Sprint),
            "60s" => Ok(Self::Standard),
            "300s" => Ok(Self::Extended),
            other => Err(format!(
                "Invalid session type: '{other}'. Must be one of '30s', '60s', '300s'"
            )),
        }
    }
}

/// Answer given to one expression during a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// Expression answered
    pub item_id: Uuid,
    /// Whether the latest attempt was correct
    pub correct: bool,
    /// Number of attempts on this expression, at least 1
    pub attempts: u32,
    /// Time the latest attempt took, if the host measured it
    pub response_time_ms: Option<u64>,
    /// When the latest attempt was recorded
    pub answered_at: DateTime<Utc>,
}

/// Finished session, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<AnswerRecord>,
    /// Number of answered expressions
    pub total_count: u32,
    pub correct_count: u32,
    /// `round(correct / total * 100)`, 0 when nothing was answered
    pub score: u32,
    /// The countdown ran out before the session was ended
    pub expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_type_parameters() {
        assert_eq!(SessionType::Sprint.duration_secs(), 30);
        assert_eq!(SessionType::Standard.duration_secs(), 60);
        assert_eq!(SessionType::Extended.duration_secs(), 300);
        assert_eq!(SessionType::Sprint.target_count(), 5);
    }

    #[test]
    fn test_session_type_names() {
        assert_eq!("30s".parse::<SessionType>(), Ok(SessionType::Sprint));
        assert_eq!("300s".parse::<SessionType>(), Ok(SessionType::Extended));
        assert!("45s".parse::<SessionType>().is_err());

        let json = serde_json::to_string(&SessionType::Standard).unwrap();
        assert_eq!(json, "\"60s\"");
    }

    #[test]
    fn test_stats_record_and_refresh() {
        let now = Utc::now();
        let mut stats = ReviewStats::default();
        let mut item = ReviewItem::new(NewReviewItem::new("hola", "hello"), now);

        item.srs.interval = 6;
        stats.record_review(ReviewRating::Good, &item.srs, now);
        item.srs.interval = 0;
        item.srs.ease_factor = 2.3;
        stats.record_review(ReviewRating::Again, &item.srs, now);

        assert_eq!(stats.total_reviews, 2);
        assert_eq!(stats.correct_reviews, 1);
        assert_eq!(stats.longest_interval, 6);
        assert_eq!(stats.last_review_date, Some(now));
        assert!((stats.accuracy() - 0.5).abs() < f64::EPSILON);

        let other = ReviewItem::new(NewReviewItem::new("adiós", "goodbye"), now);
        stats.refresh([&item, &other]);
        assert!((stats.average_ease_factor - 2.4).abs() < 1e-9);

        stats.refresh(std::iter::empty());
        assert_eq!(stats.average_ease_factor, DEFAULT_EASE_FACTOR);
    }
}
