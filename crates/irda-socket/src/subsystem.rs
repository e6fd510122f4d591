//! Process-wide network subsystem start-up and tear-down.
//!
//! Winsock has to be started once before the first socket is opened and
//! stopped once after the last one is closed.  Linux has no such step, so
//! both calls succeed immediately there.
//!
//! The socket handle never calls these itself.  Call [`init`] / [`cleanup`]
//! directly, or hold a [`Subsystem`] guard for the lifetime of all sockets:
//!
//! ```rust
//! let _subsystem = irda_socket::subsystem::Subsystem::start().unwrap();
//! // open, use and close sockets here
//! ```

use irda_core::IrdaError;
#[cfg(target_os = "windows")]
use irda_core::Operation;
use tracing::{debug, warn};

/// Winsock version requested by [`init`]: 2.2.
pub const WINSOCK_VERSION: u16 = 0x0202;

/// Starts the network subsystem.
///
/// On Windows this is `WSAStartup(2.2)`.  If the DLL cannot provide
/// version 2.2 the subsystem is stopped again and an error is returned.
#[cfg(target_os = "windows")]
pub fn init() -> Result<(), IrdaError> {
    use windows::Win32::Networking::WinSock::{WSACleanup, WSAStartup, WSADATA};

    let mut data = WSADATA::default();
    let rc = unsafe { WSAStartup(WINSOCK_VERSION, &mut data) };
    if rc != 0 {
        let err = IrdaError::from_io(Operation::Startup, &std::io::Error::from_raw_os_error(rc));
        tracing::error!("{err}");
        crate::last_error::record(&err);
        return Err(err);
    }

    if data.wVersion != WINSOCK_VERSION {
        unsafe { WSACleanup() };
        let err = IrdaError::platform(
            Operation::Startup,
            0,
            &format!("Winsock version 0x{:04X} is not 2.2", data.wVersion),
        );
        tracing::error!("{err}");
        crate::last_error::record(&err);
        return Err(err);
    }

    debug!("Winsock 2.2 started");
    Ok(())
}

/// Starts the network subsystem (nothing to do on this platform).
#[cfg(not(target_os = "windows"))]
pub fn init() -> Result<(), IrdaError> {
    debug!("network subsystem needs no start-up");
    Ok(())
}

/// Stops the network subsystem.
#[cfg(target_os = "windows")]
pub fn cleanup() -> Result<(), IrdaError> {
    use windows::Win32::Networking::WinSock::WSACleanup;

    if unsafe { WSACleanup() } != 0 {
        let err = crate::last_error::os_failure(
            Operation::Cleanup,
            &std::io::Error::from_raw_os_error(unsafe {
                windows::Win32::Networking::WinSock::WSAGetLastError()
            }
            .0),
        );
        return Err(err);
    }
    debug!("Winsock stopped");
    Ok(())
}

/// Stops the network subsystem (nothing to do on this platform).
#[cfg(not(target_os = "windows"))]
pub fn cleanup() -> Result<(), IrdaError> {
    Ok(())
}

/// Keeps the network subsystem started while it is alive.
///
/// Dropping the guard runs [`cleanup`]; a failure there is logged.
#[derive(Debug)]
#[must_use = "the subsystem stops as soon as the guard is dropped"]
pub struct Subsystem {
    _private: (),
}

impl Subsystem {
    /// Runs [`init`] and returns the guard.
    pub fn start() -> Result<Self, IrdaError> {
        init()?;
        Ok(Self { _private: () })
    }
}

impl Drop for Subsystem {
    fn drop(&mut self) {
        if let Err(e) = cleanup() {
            warn!(error = %e, "network subsystem cleanup failed");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
