//! In-memory storage for Cadence: the review item repository, the session history
//! and the JSON snapshot both are persisted through.
//!
//! The store performs no I/O. Snapshots are handed to the caller as strings and read
//! back from strings; where they end up is the caller's business.

pub mod error;
pub mod history;
pub mod models;
pub mod repository;
pub mod snapshot;

pub use error::StoreError;
pub use history::{DEFAULT_HISTORY_CAPACITY, SessionHistory};
pub use models::{
    AnswerRecord, NewReviewItem, ReviewItem, ReviewStats, SessionRecord, SessionType,
};
pub use repository::ItemRepository;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
