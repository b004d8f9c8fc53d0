//! Async countdown driver for hosts running on tokio.

use std::{sync::Arc, time::Duration};

use cadence_session::{SessionPhase, TickOutcome};
use cadence_store::SessionRecord;
use tokio::{
    sync::Mutex,
    time::{self, MissedTickBehavior},
};

use crate::engine::Engine;

/// Real-time length of one countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick `engine` once per `period` until its session leaves the live state.
///
/// Keeps ticking through pauses. Returns the record when the countdown runs out, `None`
/// when the session was ended, cancelled or never started.
pub async fn drive_countdown(
    engine: Arc<Mutex<Engine>>,
    period: Duration,
) -> Option<SessionRecord> {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match engine.lock().await.tick() {
            TickOutcome::Running { .. }
            | TickOutcome::Ignored {
                phase: SessionPhase::Paused,
            } => {}
            TickOutcome::Expired(record) => return Some(record),
            TickOutcome::Ignored { phase } => {
                tracing::debug!("Countdown stopped, session is {phase}");
                return None;
            }
        }
    }
}
