//! irda-socket library entry point.
//!
//! # What does irda-socket do? (for beginners)
//!
//! IrDA (infrared) links show up in the OS as an extra socket address
//! family, `AF_IRDA`.  Once connected, an IrDA socket is a reliable byte
//! stream like TCP, but getting there is different:
//!
//! 1. **Discovery** – ask the kernel which devices it has seen through the
//!    `IRLMP_ENUMDEVICES` socket option.  The answer may not be ready yet,
//!    so the query is retried a few times, one second apart.
//! 2. **Connect** – address the peer by its 32-bit device address plus a
//!    service name (`"OBEX"`) or a numeric LSAP selector.
//! 3. **Timed I/O** – read with a per-wait timeout, write until everything
//!    is sent.
//!
//! Linux and Windows lay out the addresses and device lists differently.
//! The byte-level differences live in `irda_core::layout`; the syscall
//! differences live behind the [`sys::RawSocket`] trait in this crate.  The
//! [`IrdaSocket`] handle is written once against that trait.
//!
//! # Preconditions
//!
//! On Windows, [`subsystem::init`] must succeed before the first socket is
//! opened and [`subsystem::cleanup`] must run after the last one is closed.
//! Handle operations do not check this.

/// Discovery polling loop and its pause seam.
pub mod discovery;

/// Thread-local record of the most recent platform failure.
pub mod last_error;

/// The platform-neutral socket handle.
pub mod socket;

/// Network-subsystem start-up and tear-down.
pub mod subsystem;

/// OS adapters behind the [`sys::RawSocket`] trait.
pub mod sys;

pub use discovery::{Pause, ThreadSleep};
pub use socket::IrdaSocket;
pub use sys::RawSocket;

#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use sys::NativeSocket;

/// An [`IrdaSocket`] over the native backend for the compile target.
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub type NativeIrdaSocket = IrdaSocket<NativeSocket>;
