//! Logging setup for the binary

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppError;

/// Install the global subscriber. The level comes from `RUST_LOG` (default
/// `info`); `LOG_FORMAT=json` switches from pretty to JSON output. Logs go to
/// stderr so stdout stays a clean CSV report.
pub fn setup_logging() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = if format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Telemetry(e.to_string()))?;
    debug!(format, "Logging initialised");
    Ok(())
}
