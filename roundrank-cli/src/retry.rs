/// Retry policy for transient oracle failures.
///
/// Backoff grows geometrically by 1.5× in integer milliseconds
/// (`wait += wait / 2`): 1000, 1500, 2250, 3375, 5062, ...
use std::time::Duration;

pub const DEFAULT_INITIAL_WAIT_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the first retry.
    pub initial_wait_ms: u64,
    /// Retry ceiling. `None` retries until the call succeeds.
    pub max_retries: Option<usize>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_wait_ms: DEFAULT_INITIAL_WAIT_MS,
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(initial_wait_ms: u64, max_retries: Option<usize>) -> Self {
        assert!(initial_wait_ms > 0, "initial_wait_ms must be greater than 0");
        RetryPolicy {
            initial_wait_ms,
            max_retries,
        }
    }

    /// Wait before retry number `retry` (0-indexed).
    pub fn wait_for(&self, retry: usize) -> Duration {
        let mut wait = self.initial_wait_ms;
        for _ in 0..retry {
            wait = wait.saturating_add(wait / 2);
        }
        Duration::from_millis(wait)
    }

    /// Whether another retry is allowed after `retries_so_far` retries.
    pub fn allows_retry(&self, retries_so_far: usize) -> bool {
        self.max_retries.is_none_or(|max| retries_so_far < max)
    }
}
