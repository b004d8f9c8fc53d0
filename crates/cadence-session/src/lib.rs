//! Session engine for Cadence.
//!
//! # Components
//! - `selector.rs`: splits a candidate pool into success/weakness/expansion buckets (30/50/20)
//! - `machine.rs`: the countdown state machine, driven by external `tick` calls
//! - `recorder.rs`: turns a finished session into an immutable `SessionRecord`

pub mod error;
pub mod machine;
pub mod recorder;
pub mod selector;

pub use error::SessionError;
pub use machine::{
    AnswerFeedback, Session, SessionMachine, SessionPhase, SessionProgress, TickOutcome,
};
pub use recorder::finalize;
pub use selector::{
    BucketTargets, Candidate, ContentBucket, ProficiencyMap, SessionContent, select_content,
};
