//! Sentinel Console
//!
//! Desktop administration client for the Sentinel security backend.
//!
//! This is the main entry point for the Dioxus Desktop application.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sentinel_client::ConsoleConfig;
use sentinel_ui::Services;

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .pretty()
        .init();

    let config = ConsoleConfig::load().context("failed to load configuration")?;
    let services = Services::build(config).context("failed to initialize services")?;

    // Launch the Dioxus desktop application
    sentinel_ui::launch(services);
    Ok(())
}
