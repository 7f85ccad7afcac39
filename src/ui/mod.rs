//! User interface module - terminal output and log setup.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Logging initialisation for the binary

use anyhow::Result;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_replacements, display_status,
    display_success, display_version_change,
};

/// Default log filter when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the log filter.
///
/// An explicit level wins, then `RUST_LOG`, then [DEFAULT_LOG_LEVEL].
/// A bare level such as `debug` is scoped to this crate.
pub fn log_filter(level: Option<&str>) -> Result<EnvFilter> {
    let filter = match level {
        Some(level) if level.contains('=') => EnvFilter::try_new(level),
        Some(level) => EnvFilter::try_new(format!("magikarp={}", level)),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(format!("magikarp={}", DEFAULT_LOG_LEVEL))),
    };
    filter.map_err(|e| anyhow::anyhow!("Invalid log filter: {}", e))
}

/// Initialise `tracing` output on stderr.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = log_filter(level)?;
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Cannot initialise logging: {}", e))
}
