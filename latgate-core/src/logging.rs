//! Structured logging setup for simulation runs.
//!
//! Runs log through `tracing`: component construction details at debug
//! level, the verbose progress line at info level, recording anomalies at
//! warn level. `RUST_LOG` overrides everything, so module-level filters like
//! `RUST_LOG=latgate_components=debug` work the usual way.

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at the default (info) level.
pub fn init_logging() {
    init_logging_with_level("info")
}

/// Initialize logging at a specific level.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "latgate_core={level},latgate_metrics={level},latgate_components={level},latgate_cli={level}"
        )
        .into()
    });

    // Repeated initialization is a no-op so tests may call this freely.
    let initialized = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init()
        .is_ok();

    if initialized {
        info!("simulation logging initialized at level: {}", level);
    }
}
