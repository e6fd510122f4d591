//! The per-wait read timeout.
//!
//! The timeout is a signed millisecond count.  Any negative value means
//! "wait without limit"; zero means "poll once and return".  It only gates
//! the readiness wait in front of each receive and never bounds connect or
//! write.

use std::fmt;
use std::time::Duration;

/// Read timeout in milliseconds; negative means block indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadTimeout(i64);

impl ReadTimeout {
    /// Block until data arrives or the stream ends.
    pub const INFINITE: ReadTimeout = ReadTimeout(-1);

    /// Stores `millis` verbatim, including negative values.
    pub fn from_millis(millis: i64) -> Self {
        ReadTimeout(millis)
    }

    /// The raw value as it was configured.
    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0 < 0
    }

    /// The wait budget for one readiness wait, or `None` for no limit.
    pub fn as_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_millis)
    }
}

impl Default for ReadTimeout {
    fn default() -> Self {
        ReadTimeout::INFINITE
    }
}

impl fmt::Display for ReadTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            f.write_str("infinite")
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

/// Converts an optional wait budget into a `poll`-style millisecond argument.
///
/// `None` becomes `-1` (no limit).  Budgets beyond `i32::MAX` milliseconds
/// are clamped; sub-millisecond remainders round up so a non-zero budget
/// never turns into a non-blocking poll.
pub fn poll_timeout_millis(budget: Option<Duration>) -> i32 {
    match budget {
        None => -1,
        Some(d) => {
            let mut millis = d.as_millis();
            if d.subsec_nanos() % 1_000_000 != 0 {
                millis += 1;
            }
            i32::try_from(millis).unwrap_or(i32::MAX)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_infinite() {
        assert!(ReadTimeout::default().is_infinite());
        assert_eq!(ReadTimeout::default().as_duration(), None);
    }

    #[test]
    fn test_any_negative_value_is_infinite() {
        let t = ReadTimeout::from_millis(-250);
        assert!(t.is_infinite());
        assert_eq!(t.millis(), -250, "value must be stored verbatim");
    }

    #[test]
    fn test_zero_timeout_is_a_zero_duration() {
        assert_eq!(
            ReadTimeout::from_millis(0).as_duration(),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_positive_timeout_converts_to_duration() {
        assert_eq!(
            ReadTimeout::from_millis(1500).as_duration(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_poll_timeout_millis_infinite_is_minus_one() {
        assert_eq!(poll_timeout_millis(None), -1);
    }

    #[test]
    fn test_poll_timeout_millis_rounds_sub_millisecond_up() {
        assert_eq!(poll_timeout_millis(Some(Duration::from_micros(1500))), 2);
        assert_eq!(poll_timeout_millis(Some(Duration::from_micros(1))), 1);
    }

    #[test]
    fn test_poll_timeout_millis_clamps_huge_budget() {
        assert_eq!(
            poll_timeout_millis(Some(Duration::from_secs(u64::MAX / 2))),
            i32::MAX
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ReadTimeout::INFINITE.to_string(), "infinite");
        assert_eq!(ReadTimeout::from_millis(500).to_string(), "500ms");
    }
}
