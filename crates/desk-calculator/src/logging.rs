//! Diagnostic tracing for the `desk-calc` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job.

use crate::config::Verbosity;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter: `RUST_LOG` if set, otherwise the verbosity default.
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Initialize the tracing subscriber.
///
/// Output: stderr, in the given format. A second call is a no-op.
///
/// # Example
/// ```bash
/// RUST_LOG=desk_calculator=debug desk-calc keys 1 / 0 =
/// desk-calc --log-json -v keys 1 / 0 = wait:2000
/// ```
pub fn init(verbosity: Verbosity, format: LogFormat) {
    let (compact, json) = match format {
        LogFormat::Compact => (
            Some(fmt::layer().with_writer(std::io::stderr).compact()),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().with_writer(std::io::stderr).json()),
        ),
    };
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(compact)
        .with(json)
        .try_init();
}
