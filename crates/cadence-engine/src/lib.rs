pub mod clock;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod tracing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, Environment};
pub use driver::{TICK_PERIOD, drive_countdown};
pub use engine::{Engine, WordProgress};
pub use error::{ConfigError, EngineError};
pub use persistence::{JsonFileSink, NoopSink, SnapshotSink};

pub use cadence_session::{
    AnswerFeedback, ProficiencyMap, SessionPhase, SessionProgress, TickOutcome,
};
pub use cadence_srs::{ReviewOutcome, ReviewRating};
pub use cadence_store::{
    NewReviewItem, ReviewItem, ReviewStats, SessionHistory, SessionRecord, SessionType, Snapshot,
};
