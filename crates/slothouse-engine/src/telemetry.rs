//! Tracing subscriber setup for hosts embedding the auction house.
//!
//! The engine itself only emits `tracing` events. Hosts call
//! [`init_tracing`] once at startup to get them on stdout.

use slothouse_types::{AuctionError, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber with an `EnvFilter` and a human or JSON formatter.
///
/// # Errors
/// `Configuration` if the filter is malformed or a subscriber is already set.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| AuctionError::Configuration(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    installed.map_err(|e| AuctionError::Configuration(format!("tracing init failed: {e}")))?;

    tracing::info!(
        engine = slothouse_types::constants::ENGINE_NAME,
        version = slothouse_types::constants::VERSION,
        json,
        "tracing initialized"
    );
    Ok(())
}
