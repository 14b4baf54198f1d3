//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process subscriber
//! - Attach the notice layer next to local log output
//! - Configure the local log level at runtime
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - The level filter applies to local output only; the notice layer keeps its own WARN filter
//! - JSON format for production, pretty format for development

use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::state::NotifierState;

/// Install the global subscriber: local output plus notice reporting.
pub fn init_logging(config: &ObservabilityConfig, state: &NotifierState) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let output: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Pretty => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .with(state.layer().with_level_filter())
        .try_init()
}
