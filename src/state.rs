//! Shared notifier state.
//!
//! Built once at startup and cloned into every logging and job call site.
//! Nothing in it changes after construction.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::validation::validate_config;
use crate::config::{BridgeConfig, ConfigError, NotifierConfig};
use crate::hook::{NoticeHook, NoticeLayer};
use crate::jobs::JobInstrumentation;
use crate::notice::NoticeBuilder;
use crate::notifier::{AsyncNotifier, HttpNotifier, NotifierError};

/// Startup failures.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("notifier error: {0}")]
    Notifier(#[from] NotifierError),
}

struct Inner {
    config: NotifierConfig,
    notifier: Arc<dyn AsyncNotifier>,
    builder: NoticeBuilder,
}

/// The configured notifier client plus the config it was built from.
#[derive(Clone)]
pub struct NotifierState {
    inner: Arc<Inner>,
}

impl NotifierState {
    pub fn new(config: NotifierConfig, notifier: Arc<dyn AsyncNotifier>) -> Self {
        let builder = NoticeBuilder::from_config(&config);
        Self {
            inner: Arc::new(Inner {
                config,
                notifier,
                builder,
            }),
        }
    }

    /// Validate `config` and start an `HttpNotifier` for it.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let notifier = HttpNotifier::new(&config.notifier, &config.delivery)?;
        Ok(Self::new(config.notifier.clone(), Arc::new(notifier)))
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.inner.config
    }

    pub fn notifier(&self) -> &Arc<dyn AsyncNotifier> {
        &self.inner.notifier
    }

    pub fn hook(&self) -> NoticeHook {
        NoticeHook::new(self.inner.notifier.clone(), self.inner.builder.clone())
    }

    /// Layer honoring the configured caller-capture option.
    pub fn layer(&self) -> NoticeLayer {
        NoticeLayer::new(self.hook(), self.inner.config.report_caller)
    }

    pub fn jobs(&self) -> JobInstrumentation {
        JobInstrumentation::new(self.inner.notifier.clone(), self.inner.builder.clone())
    }
}

impl fmt::Debug for NotifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.inner.config;
        f.debug_struct("NotifierState")
            .field("project_id", &config.project_id)
            .field("environment", &config.environment)
            .field("source_path_prefix", &config.source_path_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{LogEvent, Severity};
    use crate::notifier::MemoryNotifier;

    #[test]
    fn test_hook_and_jobs_share_notifier() {
        let memory = Arc::new(MemoryNotifier::new());
        let state = NotifierState::new(NotifierConfig::new(1, "key", "prod"), memory.clone());

        state.hook().fire(&LogEvent::new(Severity::Error, "from hook"));
        let jobs = state.jobs();
        let ctx = jobs.start_job(Default::default(), "q");
        jobs.end_job::<std::io::Error>(ctx, "q", None);

        assert_eq!(memory.notice_count(), 1);
        assert_eq!(memory.metric_count(), 1);
    }

    #[test]
    fn test_debug_hides_key() {
        let state = NotifierState::new(
            NotifierConfig::new(1, "super-secret", "prod"),
            Arc::new(MemoryNotifier::new()),
        );
        let debug = format!("{:?}", state);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("prod"));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = BridgeConfig::new(NotifierConfig::new(0, "", "prod"));
        let err = NotifierState::from_config(&config).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NotifierState>();
    }
}
