//! Exponential backoff for adapter retries.

use std::time::Duration;

/// Retry policy with exponential backoff.
///
/// The delay before retry `n` (1-based) is `initial_backoff * multiplier^(n-1)`.
/// With the defaults a fetch is attempted at most 5 times, waiting
/// 300ms, 600ms, 1.2s and 2.4s in between.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: u32,
    /// Total attempts including the first one.
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(initial_backoff: Duration, multiplier: u32, max_attempts: u32) -> Self {
        Self {
            initial_backoff,
            multiplier,
            max_attempts: max_attempts.max(1),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(Duration::ZERO, 1, 1)
    }

    /// Delay to wait after `failed_attempts` failures, or `None` when the
    /// attempt budget is exhausted.
    pub fn delay_after(&self, failed_attempts: u32) -> Option<Duration> {
        if failed_attempts == 0 || failed_attempts >= self.max_attempts {
            return None;
        }
        let factor = self.multiplier.saturating_pow(failed_attempts - 1);
        Some(self.initial_backoff.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 2, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(300)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_millis(600)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_millis(1200)));
        assert_eq!(policy.delay_after(4), Some(Duration::from_millis(2400)));
        assert_eq!(policy.delay_after(5), None);
    }

    #[test]
    fn test_no_retry() {
        assert_eq!(RetryPolicy::no_retry().delay_after(1), None);
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::new(Duration::from_secs(1), 2, 0).max_attempts, 1);
    }
}
