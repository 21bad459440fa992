//! tracing-subscriber initialisation.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::errors::RateflowError;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if the filter does
/// not parse or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), RateflowError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| RateflowError::Config(format!("invalid log filter {:?}: {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init()
    };

    installed.map_err(|e| RateflowError::Config(format!("failed to install subscriber: {e}")))
}
