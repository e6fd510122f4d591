//! Linux IrDA sockets via raw `libc` syscalls.
//!
//! The kernel IrDA stack (`CONFIG_IRDA`) was removed from mainline Linux in
//! 4.17.  On newer kernels [`RawSocket::open`] fails with `EAFNOSUPPORT`;
//! every other call works on any stream descriptor, which is how the tests
//! exercise this module over a `socketpair`.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd};
use std::time::Duration;

use irda_core::timeout::poll_timeout_millis;
use irda_core::{AddressLayout, LinuxLayout, PeerAddress};

use super::RawSocket;

/// `SOL_IRLMP` from `<linux/irda.h>`.
const SOL_IRLMP: libc::c_int = 266;
/// `IRLMP_ENUMDEVICES` from `<linux/irda.h>`.
const IRLMP_ENUMDEVICES: libc::c_int = 1;

/// Turn a C failure (-1 is returned) into a rust Result
fn cerr(t: libc::c_int) -> io::Result<libc::c_int> {
    match t {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(t),
    }
}

/// Same as [`cerr`] for the `ssize_t` results of `recv` / `send`.
fn cerr_size(t: libc::ssize_t) -> io::Result<usize> {
    match t {
        -1 => Err(io::Error::last_os_error()),
        n => Ok(n as usize),
    }
}

/// Linux implementation of [`RawSocket`].
#[derive(Debug)]
pub struct LinuxSocket {
    fd: OwnedFd,
}

impl LinuxSocket {
    /// Wraps an already open stream descriptor.
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

impl AsRawFd for LinuxSocket {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl RawSocket for LinuxSocket {
    type Layout = LinuxLayout;

    fn open() -> io::Result<Self> {
        let family = libc::c_int::from(LinuxLayout::ADDRESS_FAMILY);
        let fd = cerr(unsafe { libc::socket(family, libc::SOCK_STREAM | libc::SOCK_CLOEXEC, 0) })?;
        // Safety: socket() just returned this descriptor and nothing else owns it.
        Ok(Self::from_fd(unsafe { OwnedFd::from_raw_fd(fd) }))
    }

    fn query_device_list(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut len = buf.len() as libc::socklen_t;
        // Safety: buf is valid for writes of `len` bytes for the duration of
        // the call and the kernel never writes past `len`.
        cerr(unsafe {
            libc::getsockopt(
                self.fd.as_raw_fd(),
                SOL_IRLMP,
                IRLMP_ENUMDEVICES,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                &mut len,
            )
        })?;
        Ok((len as usize).min(buf.len()))
    }

    fn connect(&self, peer: &PeerAddress) -> io::Result<()> {
        let bytes = peer.as_bytes();
        // Safety: the record is `bytes.len()` bytes long and laid out as a
        // `sockaddr_irda`; the kernel copies it before returning.
        cerr(unsafe {
            libc::connect(
                self.fd.as_raw_fd(),
                bytes.as_ptr().cast::<libc::sockaddr>(),
                bytes.len() as libc::socklen_t,
            )
        })?;
        Ok(())
    }

    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = cerr(unsafe { libc::poll(&mut pfd, 1, poll_timeout_millis(timeout)) })?;
        Ok(ready > 0)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        cerr_size(unsafe {
            libc::recv(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
                0,
            )
        })
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        // MSG_NOSIGNAL: a vanished peer is an EPIPE error, not a SIGPIPE.
        cerr_size(unsafe {
            libc::send(
                self.fd.as_raw_fd(),
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
                libc::MSG_NOSIGNAL,
            )
        })
    }

    fn available(&self) -> io::Result<usize> {
        let mut bytes: libc::c_int = 0;
        cerr(unsafe { libc::ioctl(self.fd.as_raw_fd(), libc::FIONREAD, &mut bytes as *mut libc::c_int) })?;
        Ok(bytes.max(0) as usize)
    }

    fn shutdown(&self) -> io::Result<()> {
        cerr(unsafe { libc::shutdown(self.fd.as_raw_fd(), libc::SHUT_RDWR) })?;
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        // OwnedFd's Drop ignores close errors; take the descriptor back so
        // the result can be reported.
        let fd = self.fd.into_raw_fd();
        cerr(unsafe { libc::close(fd) })?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
