//! Structured logging setup using tracing.
//!
//! # Example
//!
//! ```no_run
//! use strata::config::LoggingConfig;
//! use strata::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! init_logging(&config).expect("Failed to initialize logging");
//!
//! tracing::info!(collection = "profiles", "Repository ready");
//! ```

use crate::config::LoggingConfig;
use crate::domain::errors::StrataError;
use crate::domain::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Honors `RUST_LOG` when set, otherwise filters to `strata=<level>` from
/// the configuration. With `json` enabled, events are emitted as structured
/// JSON for log aggregation.
///
/// # Errors
///
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strata={}", config.level)));

    let result = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    };

    result.map_err(|e| StrataError::Configuration(format!("Failed to initialize logging: {e}")))
}
