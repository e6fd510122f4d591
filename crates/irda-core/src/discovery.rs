//! Retry policy for the kernel device-enumeration query.
//!
//! # How IrDA discovery works (for beginners)
//!
//! IrDA devices do not answer broadcasts on demand.  Instead the kernel runs
//! periodic discovery slots in the background and keeps a log of the
//! devices it heard.  Asking for that log with the `IRLMP_ENUMDEVICES`
//! socket option either returns the list or reports "would block" while a
//! discovery cycle is still running.
//!
//! The socket layer therefore polls: query, and on "would block" pause and
//! try again.  After [`DiscoveryPolicy::max_retries`] retries it gives up
//! and reports *no devices*, not an error: discovery is best-effort, and
//! an empty neighbourhood looks exactly like an enumeration that never
//! became ready.  Any other query failure is reported immediately.

use std::time::Duration;

/// Capacity of the device-list buffer handed to the kernel.
pub const DISCOVER_MAX_DEVICES: usize = 16;

/// Retries after the first "would block" before giving up.
pub const DISCOVER_MAX_RETRIES: u32 = 4;

/// Pause between two enumeration queries.
pub const DISCOVER_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// How long and how often to poll for the device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Pause before each retry.
    pub retry_interval: Duration,
}

impl DiscoveryPolicy {
    /// Returns `true` if another query may follow `retries_done` retries.
    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Total number of queries this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for DiscoveryPolicy {
    /// Four retries, one second apart.
    fn default() -> Self {
        Self {
            max_retries: DISCOVER_MAX_RETRIES,
            retry_interval: DISCOVER_RETRY_INTERVAL,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_four_retries_one_second_apart() {
        let policy = DiscoveryPolicy::default();
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.retry_interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 5);
    }

    #[test]
    fn test_should_retry_stops_at_budget() {
        let policy = DiscoveryPolicy::default();
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_zero_retry_policy_queries_once() {
        let policy = DiscoveryPolicy {
            max_retries: 0,
            retry_interval: Duration::ZERO,
        };
        assert!(!policy.should_retry(0));
        assert_eq!(policy.max_attempts(), 1);
    }
}
