//! Structured logging setup shared by SIS binaries.
//!
//! Trimmed down from a broader telemetry crate: the engine itself is a
//! library with no process lifecycle of its own (`spec.md` §4.5 non-goals
//! exclude metrics/tracing export), so this crate only carries the one piece
//! every binary consuming `sis-engine` still needs — turning its
//! `tracing::instrument`/`debug!`/`warn!` calls into actual output.

#![deny(unsafe_code)]

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Errors initialising the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("a global tracing subscriber is already set")]
    AlreadyInitialized,
}

/// Install a JSON-formatted `tracing` subscriber for the current process.
///
/// Honours `RUST_LOG` (e.g. `"info,sis_engine=debug"`), defaulting to
/// `"info"` when unset.
///
/// # Errors
///
/// [`TelemetryError::AlreadyInitialized`] if a global subscriber is already
/// installed.
pub fn init_json_logging() -> Result<(), TelemetryError> {
    let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| TelemetryError::AlreadyInitialized)
}
