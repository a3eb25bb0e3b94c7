//! Tracing setup for the driver.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so frames own stdout.
///
/// `RUST_LOG` overrides the default filter; `CAVE_LOG_JSON=1` switches to JSON lines.
pub fn init_telemetry() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,cave_world=debug,cave_driver=debug".into());

    let json = std::env::var("CAVE_LOG_JSON")
        .map(|v| v == "1")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    info!("Telemetry initialized");
    Ok(())
}
