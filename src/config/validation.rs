//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject unusable credentials before any notice is built
//! - Validate value ranges (capacities > 0, host is a URL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("project_id must be positive, got {0}")]
    InvalidProjectId(i64),

    #[error("project_key must not be empty")]
    EmptyProjectKey,

    #[error("environment must not be empty")]
    EmptyEnvironment,

    #[error("delivery host '{host}' is not a valid URL: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let notifier = &config.notifier;
    let delivery = &config.delivery;

    if notifier.project_id <= 0 {
        errors.push(ValidationError::InvalidProjectId(notifier.project_id));
    }
    if notifier.project_key.trim().is_empty() {
        errors.push(ValidationError::EmptyProjectKey);
    }
    if notifier.environment.trim().is_empty() {
        errors.push(ValidationError::EmptyEnvironment);
    }

    match Url::parse(&delivery.host) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidHost {
            host: delivery.host.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidHost {
            host: delivery.host.clone(),
            reason: e.to_string(),
        }),
    }

    if delivery.queue_capacity == 0 {
        errors.push(ValidationError::ZeroValue("delivery.queue_capacity"));
    }
    if delivery.max_in_flight == 0 {
        errors.push(ValidationError::ZeroValue("delivery.max_in_flight"));
    }
    if delivery.max_attempts == 0 {
        errors.push(ValidationError::ZeroValue("delivery.max_attempts"));
    }
    if delivery.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("delivery.timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::NotifierConfig;

    #[test]
    fn test_valid_config() {
        let config = BridgeConfig::new(NotifierConfig::new(1, "key", "prod"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BridgeConfig::new(NotifierConfig::new(0, " ", ""));
        config.delivery.host = "not a url".to_string();
        config.delivery.queue_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidProjectId(0)));
        assert!(errors.contains(&ValidationError::EmptyProjectKey));
        assert!(errors.contains(&ValidationError::EmptyEnvironment));
        assert!(errors.contains(&ValidationError::ZeroValue("delivery.queue_capacity")));
    }

    #[test]
    fn test_rejects_non_http_host() {
        let mut config = BridgeConfig::new(NotifierConfig::new(1, "key", "prod"));
        config.delivery.host = "ftp://example.com".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidHost { .. }));
    }
}
