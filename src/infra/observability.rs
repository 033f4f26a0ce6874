//! Tracing subscriber setup for binaries embedding the SDK.
//!
//! The library only emits spans, events and `metrics` counters; installing a
//! subscriber or recorder is left to the host application.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over the `verbose` default. With `json` set, events are
/// written as JSON lines.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    json: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let default_filter = if verbose {
        "kinetic_sdk=debug,kinetic=debug,info"
    } else {
        "kinetic_sdk=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    }
}
