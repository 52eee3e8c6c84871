pub mod config;
pub mod error;

pub use config::{CalendarConfig, Config, DataConfig, ValidationResult};
pub use error::{AuthError, DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() -> Result<()> {
    // stdout carries command output such as `export`
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("DateTrack core initialized");
    Ok(())
}
