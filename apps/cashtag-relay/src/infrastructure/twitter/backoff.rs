//! Retry Pacing
//!
//! Fixed-delay retry policy for rate-limited connection attempts and for the
//! reconnect cool-down after a dropped stream. Streaming connections to
//! third-party real-time APIs drop routinely, so reconnects are paced but
//! unbounded; rate-limited connects are bounded to a small fixed number of
//! attempts before the consumer gives up.

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay inserted between attempts.
    pub delay: Duration,
    /// Maximum number of attempts (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(10),
            max_attempts: 5,
        }
    }
}

/// Fixed-delay retry policy.
///
/// `next_delay` is called after a failed attempt; it counts that attempt and
/// returns the pause before the next one, or `None` once the attempt budget
/// is spent.
#[derive(Debug)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt_count: u32,
}

impl RetryPolicy {
    /// Create a new retry policy.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self {
            config,
            attempt_count: 0,
        }
    }

    /// Record a failed attempt and get the delay before the next one.
    ///
    /// Returns `None` when the failed attempt was the last one allowed.
    #[must_use]
    pub const fn next_delay(&mut self) -> Option<Duration> {
        self.attempt_count += 1;
        if self.config.max_attempts > 0 && self.attempt_count >= self.config.max_attempts {
            return None;
        }
        Some(self.config.delay)
    }

    /// Number of failed attempts recorded so far.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = RetryConfig::default();
        assert_eq!(config.delay, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn bounded_policy_spends_attempt_budget() {
        let mut policy = RetryPolicy::new(RetryConfig {
            delay: Duration::from_millis(100),
            max_attempts: 3,
        });

        // Two failures leave one attempt in the budget.
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        // The third failure exhausts it.
        assert_eq!(policy.next_delay(), None);
        assert_eq!(policy.attempt_count(), 3);
    }

    #[test]
    fn unlimited_policy_always_retries() {
        let mut policy = RetryPolicy::new(RetryConfig {
            delay: Duration::from_millis(10),
            max_attempts: 0,
        });
        for _ in 0..1000 {
            assert!(policy.next_delay().is_some());
        }
    }

    #[test]
    fn fresh_policy_starts_with_a_full_budget() {
        // Each connection cycle builds its own policy, so a new instance
        // must always carry the whole attempt budget.
        let policy = RetryPolicy::new(RetryConfig::default());
        assert_eq!(policy.attempt_count(), 0);
    }
}
