//! Logging initialization
//!
//! One `tracing-subscriber` entry point for hosts embedding the harness.
//! The core itself only emits `tracing` events; installing a subscriber
//! is a host decision, which is why this is never called implicitly.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber. `RUST_LOG` wins when set; otherwise
/// `verbose` selects debug over info. `json` switches to structured
/// line-delimited output for log collectors.
pub fn init(verbose: bool, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_target(false))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()?;
    }
    Ok(())
}
