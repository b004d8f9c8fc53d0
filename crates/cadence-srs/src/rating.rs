use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recall quality reported by the learner after reviewing an item.
///
/// The variants are ordered from worst to best recall, so `Again < Easy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewRating {
    /// Forgot the item, progress is reset
    Again,
    /// Recalled with serious difficulty
    Hard,
    /// Recalled after some hesitation
    Good,
    /// Recalled immediately
    Easy,
}

impl ReviewRating {
    /// All ratings, worst first.
    pub const ALL: [Self; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Whether the rating counts as a successful recall.
    pub const fn is_correct(self) -> bool {
        !matches!(self, Self::Again)
    }

    /// Change applied to the ease factor before the floor is enforced.
    pub const fn ease_delta(self) -> f64 {
        match self {
            Self::Again => -0.2,
            Self::Hard => -0.15,
            Self::Good => 0.0,
            Self::Easy => 0.15,
        }
    }

    /// Lowercase name, as stored in snapshots.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for ReviewRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `again`, `hard`, `good` or `easy`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown review rating: '{0}'")]
pub struct ParseRatingError(pub String);

impl FromStr for ReviewRating {
    type Err = ParseRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            _ => Err(ParseRatingError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!("again".parse::<ReviewRating>(), Ok(ReviewRating::Again));
        assert_eq!(" Good ".parse::<ReviewRating>(), Ok(ReviewRating::Good));
        assert_eq!("EASY".parse::<ReviewRating>(), Ok(ReviewRating::Easy));
        assert!("perfect".parse::<ReviewRating>().is_err());
        assert!("".parse::<ReviewRating>().is_err());
    }

    #[test]
    fn test_rating_serializes_lowercase() {
        let json = serde_json::to_string(&ReviewRating::Hard).unwrap();
        assert_eq!(json, "\"hard\"");

        let back: ReviewRating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(back, ReviewRating::Easy);
    }

    #[test]
    fn test_only_again_is_incorrect() {
        for rating in ReviewRating::ALL {
            assert_eq!(rating.is_correct(), rating != ReviewRating::Again);
        }
    }
}
