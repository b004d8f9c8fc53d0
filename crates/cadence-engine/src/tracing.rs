//! Log subscriber setup for hosts embedding the engine.
//!
//! The cadence crates only emit `tracing` events. Nothing is printed until the host
//! installs a subscriber, usually by calling [`init_tracing`] once at startup.
//!
//! Filter directives are picked in this order:
//! 1. `CADENCE_LOG_FILTER` ([`EngineConfig::log_filter`])
//! 2. `RUST_LOG`
//! 3. the per-environment default, which keeps dependencies at `warn` and raises the
//!    cadence crates to `debug` (development) or `info` (production)

use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::Uptime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{EngineConfig, Environment};

const DEVELOPMENT_DIRECTIVES: &str =
    "warn,cadence=debug,cadence_engine=debug,cadence_session=debug,cadence_store=debug";
const PRODUCTION_DIRECTIVES: &str =
    "warn,cadence=info,cadence_engine=info,cadence_session=info,cadence_store=info";

/// Default directives for `env`.
pub const fn default_directives(env: Environment) -> &'static str {
    match env {
        Environment::Development => DEVELOPMENT_DIRECTIVES,
        Environment::Production => PRODUCTION_DIRECTIVES,
    }
}

/// Directives for `config`, given the value of `RUST_LOG` if set.
pub fn filter_directives(config: &EngineConfig, rust_log: Option<&str>) -> String {
    config
        .log_filter
        .as_deref()
        .or(rust_log)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| default_directives(config.environment))
        .to_string()
}

/// Install the global subscriber: compact human-readable lines in development, one
/// JSON object per event in production.
///
/// Panics if a global subscriber is already set.
pub fn init_tracing(config: &EngineConfig) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(config, rust_log.as_deref());

    let (filter, rejected) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(default_directives(config.environment)),
            Some(e),
        ),
    };

    let layer = if config.environment.is_development() {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_timer(Uptime::default())
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_target(true)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();

    if let Some(e) = rejected {
        tracing::warn!("Ignoring invalid log filter '{directives}': {e}");
    }
    tracing::debug!(environment = ?config.environment, "Tracing initialized");
}
