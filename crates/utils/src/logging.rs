use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, thiserror::Error)]
#[error("failed to initialise tracing: {0}")]
pub struct LoggingInitError(String);

/// Install the global subscriber. `RUST_LOG` wins; otherwise `default_filter` is used.
pub fn init(default_filter: &str) -> Result<(), LoggingInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| LoggingInitError(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| LoggingInitError(e.to_string()))
}
