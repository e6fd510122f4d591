//! The device-enumeration polling loop.
//!
//! The kernel answers `IRLMP_ENUMDEVICES` with "would block" while a
//! discovery cycle is still running.  [`query_with_retry`] re-issues the
//! query after a pause until it succeeds, fails for another reason, or the
//! [`DiscoveryPolicy`] runs out of retries.
//!
//! The pause goes through the [`Pause`] trait so tests can count the
//! sleeps instead of spending four real seconds on them.

use std::io;
use std::time::Duration;

use irda_core::DiscoveryPolicy;
use tracing::{debug, warn};

use crate::sys::{is_not_ready, RawSocket};

/// Blocks the calling thread between two enumeration queries.
#[cfg_attr(test, mockall::automock)]
pub trait Pause {
    fn pause(&self, duration: Duration);
}

/// [`Pause`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Runs the enumeration query into `buf` under `policy`.
///
/// Returns `Ok(Some(len))` with the number of bytes the kernel wrote, or
/// `Ok(None)` if every attempt reported "not ready".  Any other error is
/// returned as soon as it happens.
pub(crate) fn query_with_retry<S, P>(
    raw: &S,
    buf: &mut [u8],
    policy: &DiscoveryPolicy,
    pause: &P,
) -> io::Result<Option<usize>>
where
    S: RawSocket,
    P: Pause + ?Sized,
{
    let mut retries = 0;
    loop {
        match raw.query_device_list(buf) {
            Ok(len) => {
                debug!(attempt = retries + 1, len, "device list ready");
                return Ok(Some(len));
            }
            Err(e) if is_not_ready(&e) => {
                if !policy.should_retry(retries) {
                    warn!(
                        attempts = policy.max_attempts(),
                        "device list never became ready; reporting no devices"
                    );
                    return Ok(None);
                }
                debug!(
                    attempt = retries + 1,
                    wait = ?policy.retry_interval,
                    "device list not ready, retrying"
                );
                pause.pause(policy.retry_interval);
                retries += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
