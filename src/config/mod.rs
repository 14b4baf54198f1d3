//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or AB_* environment variables
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → NotifierState::from_config (built once at startup)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - Credentials have no defaults; everything else does
//! - Validation separates syntactic (serde) from semantic checks
//! - Missing configuration is an error value, the caller picks the exit policy

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::BridgeConfig;
pub use schema::DeliveryConfig;
pub use schema::LogFormat;
pub use schema::NotifierConfig;
pub use schema::ObservabilityConfig;
pub use validation::ValidationError;
