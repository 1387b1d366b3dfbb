//! # Logging
//!
//! `tracing` setup for the binary and the bridge that lets the core log
//! through it.
//!
//! ## Environment
//!
//! - `NOMNOM_LOG`: filter directives (falls back to `RUST_LOG`, then `nomnom=info`)
//! - `NOMNOM_LOG_FORMAT=json`: machine-parseable output
//!
//! All output goes to stderr so the REPL keeps stdout to itself.

use nomnom_core::{LogLevel, LogSink};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "nomnom=info,nomnom_core=info";

/// Install the global subscriber. `verbose` raises the default to debug.
pub fn init_tracing(verbose: bool) {
    let log_format = std::env::var("NOMNOM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = EnvFilter::try_from_env("NOMNOM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            if verbose {
                "nomnom=debug,nomnom_core=debug".into()
            } else {
                DEFAULT_FILTER.into()
            }
        });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match log_format.as_str() {
        "json" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

/// Forwards core log records to `tracing`.
///
/// The core's own target travels as the `origin` field, since tracing
/// targets must be static.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "nomnom_core", origin = target, "{}", message),
            LogLevel::Info => tracing::info!(target: "nomnom_core", origin = target, "{}", message),
            LogLevel::Warn => tracing::warn!(target: "nomnom_core", origin = target, "{}", message),
            LogLevel::Error => {
                tracing::error!(target: "nomnom_core", origin = target, "{}", message)
            }
        }
    }
}
