//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// Project credentials and notice tagging.
    pub notifier: NotifierConfig,

    /// Delivery queue and transport settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Local logging settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl BridgeConfig {
    /// Build a config with default delivery and observability settings.
    pub fn new(notifier: NotifierConfig) -> Self {
        Self {
            notifier,
            delivery: DeliveryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Project credentials and notice tagging.
///
/// `project_id`, `project_key` and `environment` are required; there are no
/// defaults for them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Numeric project identifier.
    pub project_id: i64,

    /// Project secret key.
    pub project_key: String,

    /// Environment tag attached to every notice (e.g. "production").
    pub environment: String,

    /// Repository path prepended to captured source files.
    #[serde(default)]
    pub source_path_prefix: Option<String>,

    /// Build directory stripped from captured source files.
    #[serde(default = "default_build_root")]
    pub build_root: String,

    /// Attach the event call site as a single backtrace frame.
    #[serde(default = "default_report_caller")]
    pub report_caller: bool,
}

impl NotifierConfig {
    /// Create a config with the required fields and default options.
    pub fn new(project_id: i64, project_key: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            project_id,
            project_key: project_key.into(),
            environment: environment.into(),
            source_path_prefix: None,
            build_root: default_build_root(),
            report_caller: default_report_caller(),
        }
    }

    /// Set the repository path used to rewrite captured source files.
    pub fn with_source_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.source_path_prefix = Some(prefix.into());
        self
    }
}

fn default_build_root() -> String {
    "/src/".to_string()
}

fn default_report_caller() -> bool {
    true
}

/// Delivery settings for the HTTP notifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Base URL of the incident-tracking API.
    pub host: String,

    /// Maximum number of queued notices and metrics (backpressure).
    pub queue_capacity: usize,

    /// Maximum concurrent in-flight requests.
    pub max_in_flight: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of attempts per payload (1 disables retries).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            host: "https://api.airbrake.io".to_string(),
            queue_capacity: 1000,
            max_in_flight: 10,
            timeout_secs: 10,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Output format of the local fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Local log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
