//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::DeliveryConfig;

/// Backoff schedule for delivery retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.base_delay_ms, config.max_delay_ms)
    }

    /// Delay before retry number `attempt` (1-based; 0 means no delay).
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u64.saturating_pow(attempt - 1);
        let capped = self.base_ms.saturating_mul(factor).min(self.max_ms);

        // Jitter: up to 10% on top of the capped delay
        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_growth() {
        let backoff = Backoff::new(100, 2000);
        assert_eq!(backoff.delay(0), Duration::ZERO);

        let d1 = backoff.delay(1).as_millis();
        assert!((100..110).contains(&d1));

        let d2 = backoff.delay(2).as_millis();
        assert!((200..220).contains(&d2));
    }

    #[test]
    fn test_backoff_capped() {
        let backoff = Backoff::new(100, 1000);
        let d = backoff.delay(10).as_millis();
        assert!((1000..1100).contains(&d));

        // Saturates instead of overflowing
        assert!(backoff.delay(u32::MAX).as_millis() < 1100);
    }
}
