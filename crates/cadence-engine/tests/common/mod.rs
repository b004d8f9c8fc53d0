use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use cadence_engine::{Engine, EngineConfig, ManualClock, NewReviewItem, SnapshotSink};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Monday 2026-01-05 09:00 UTC, the start of every test clock
pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Sink keeping every snapshot it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn latest(&self) -> Option<String> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl SnapshotSink for RecordingSink {
    fn persist(&self, snapshot_json: &str) -> io::Result<()> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot_json.to_string());
        Ok(())
    }
}

/// Sink that always fails, like a full disk
#[derive(Debug, Default)]
pub struct FailingSink;

impl SnapshotSink for FailingSink {
    fn persist(&self, _snapshot_json: &str) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

/// Test engine builder with a manual clock and a recording sink
pub struct TestEngineBuilder {
    config: EngineConfig,
    sink: Arc<dyn SnapshotSink>,
}

impl TestEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                rng_seed: Some(42),
                ..EngineConfig::default()
            },
            sink: Arc::new(RecordingSink::default()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn build(self) -> TestEngine {
        let clock = ManualClock::new(fixed_start());
        let engine = Engine::new(&self.config, Arc::new(clock.clone()), self.sink);
        TestEngine { engine, clock }
    }
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestEngine {
    pub engine: Engine,
    pub clock: ManualClock,
}

impl TestEngine {
    /// Add `n` items named `word 0`, `word 1`, ...
    pub fn seed_items(&mut self, n: usize) -> Vec<Uuid> {
        (0..n)
            .map(|i| {
                self.engine
                    .add_item(NewReviewItem::new(format!("word {i}"), format!("meaning {i}")))
                    .id
            })
            .collect()
    }
}
