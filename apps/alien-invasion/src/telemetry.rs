//! File-backed tracing for the terminal front-end.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a subscriber that appends to `path`. The terminal itself is the
/// game screen, so nothing is ever written to stdout or stderr.
pub fn init_file_telemetry(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,alien_invasion=debug,campus_invasion=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    tracing::info!(path = %path.display(), "Telemetry initialized");
    Ok(())
}
