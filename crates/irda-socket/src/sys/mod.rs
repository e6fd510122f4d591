//! OS adapters for one IrDA socket descriptor.
//!
//! Each platform implements [`RawSocket`]; the correct one is selected at
//! compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeSocket`:
//!
//! | Module    | OS      | Primitives used                                          |
//! |-----------|---------|----------------------------------------------------------|
//! | `linux`   | Linux   | `socket`, `getsockopt`, `connect`, `poll`, `recv`, `send`, `ioctl` via `libc` |
//! | `windows` | Windows | the same calls from Winsock, with `WSAPoll` and `ioctlsocket` |
//!
//! A [`mock::MockSocket`] is always compiled (not guarded by `#[cfg]`) so
//! tests on any platform can drive the handle without an infrared port.
//!
//! Adapters report raw [`std::io::Error`]s.  Turning those into
//! [`irda_core::IrdaError`]s, logging them and recording the last error is
//! the handle's job, so it happens in exactly one place.

use std::io;
use std::time::Duration;

use irda_core::{AddressLayout, PeerAddress};

/// One OS socket descriptor in the IrDA address family.
///
/// Implementors own their descriptor exclusively.  [`RawSocket::close`]
/// consumes the value, so a released descriptor cannot be reused.
pub trait RawSocket: Sized {
    /// Binary layout of this platform's address and device-list records.
    type Layout: AddressLayout;

    /// Creates a stream socket in the IrDA address family.
    fn open() -> io::Result<Self>;

    /// Runs the device-enumeration socket option into `buf`.
    ///
    /// Returns the number of bytes the OS wrote.  A "not ready yet" answer
    /// surfaces as [`io::ErrorKind::WouldBlock`].
    fn query_device_list(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Connects to the peer described by a native address record.
    fn connect(&self, peer: &PeerAddress) -> io::Result<()>;

    /// Waits until the descriptor is readable.
    ///
    /// `None` waits without limit.  Returns `false` if the budget expired.
    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool>;

    /// One receive call; `Ok(0)` means the peer closed the stream.
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// One send call; may send fewer bytes than offered.
    fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Bytes that can be received without blocking.
    fn available(&self) -> io::Result<usize>;

    /// Shuts down both directions.
    fn shutdown(&self) -> io::Result<()>;

    /// Releases the descriptor, reporting the OS result.
    fn close(self) -> io::Result<()>;
}

/// Returns `true` for the enumeration query's "not ready yet" answer.
pub fn is_not_ready(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
}

/// Returns `true` if socket creation failed for lack of memory or descriptors.
pub fn is_exhaustion(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::OutOfMemory || err.raw_os_error().is_some_and(is_exhaustion_code)
}

#[cfg(unix)]
fn is_exhaustion_code(code: i32) -> bool {
    matches!(
        code,
        libc::ENOMEM | libc::ENOBUFS | libc::EMFILE | libc::ENFILE
    )
}

#[cfg(windows)]
fn is_exhaustion_code(code: i32) -> bool {
    use ::windows::Win32::Foundation::ERROR_NOT_ENOUGH_MEMORY;
    use ::windows::Win32::Networking::WinSock::{WSAEMFILE, WSAENOBUFS};

    code == WSAEMFILE.0 || code == WSAENOBUFS.0 || code as u32 == ERROR_NOT_ENOUGH_MEMORY.0
}

#[cfg(not(any(unix, windows)))]
fn is_exhaustion_code(_code: i32) -> bool {
    false
}

pub mod mock;

// ── Linux implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
pub mod linux;

/// Re-export the Linux socket as `NativeSocket` on Linux.
#[cfg(target_os = "linux")]
pub use linux::LinuxSocket as NativeSocket;

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

/// Re-export the Winsock socket as `NativeSocket` on Windows.
#[cfg(target_os = "windows")]
pub use windows::WinsockSocket as NativeSocket;
