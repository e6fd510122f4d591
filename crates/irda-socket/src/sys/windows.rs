//! Windows IrDA sockets via Winsock.
//!
//! Uses the `windows` crate's WinSock bindings.  Every failing call is
//! reported through `WSAGetLastError`, converted to an [`io::Error`] so the
//! handle can treat both platforms alike (`WSAEWOULDBLOCK` maps to
//! [`io::ErrorKind::WouldBlock`]).
//!
//! Winsock must be started ([`crate::subsystem::init`]) before
//! [`RawSocket::open`] is called.

use std::io;
use std::time::Duration;

use irda_core::timeout::poll_timeout_millis;
use irda_core::{AddressLayout, PeerAddress, WinsockLayout};
use windows::core::PSTR;
use windows::Win32::Networking::WinSock::{
    closesocket, connect, getsockopt, ioctlsocket, recv, send, shutdown, socket, WSAGetLastError,
    WSAPoll, FIONREAD, INVALID_SOCKET, POLLRDNORM, SD_BOTH, SEND_RECV_FLAGS, SOCKADDR, SOCKET,
    SOCKET_ERROR, SOCK_STREAM, WSAPOLLFD,
};

use super::RawSocket;

/// `SOL_IRLMP` from `<af_irda.h>`.
const SOL_IRLMP: i32 = 0x00FF;
/// `IRLMP_ENUMDEVICES` from `<af_irda.h>`.
const IRLMP_ENUMDEVICES: i32 = 0x0010;

fn last_wsa_error() -> io::Error {
    io::Error::from_raw_os_error(unsafe { WSAGetLastError() }.0)
}

/// Turn a Winsock failure (`SOCKET_ERROR` is returned) into a rust Result
fn wsa_check(rc: i32) -> io::Result<i32> {
    if rc == SOCKET_ERROR {
        Err(last_wsa_error())
    } else {
        Ok(rc)
    }
}

/// Windows implementation of [`RawSocket`].
///
/// Dropping an unclosed socket releases it without reporting the result.
#[derive(Debug)]
pub struct WinsockSocket {
    socket: SOCKET,
}

impl RawSocket for WinsockSocket {
    type Layout = WinsockLayout;

    fn open() -> io::Result<Self> {
        let family = i32::from(WinsockLayout::ADDRESS_FAMILY);
        let socket = unsafe { socket(family, SOCK_STREAM, 0) }.map_err(|_| last_wsa_error())?;
        Ok(Self { socket })
    }

    fn query_device_list(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut len = buf.len() as i32;
        wsa_check(unsafe {
            getsockopt(
                self.socket,
                SOL_IRLMP,
                IRLMP_ENUMDEVICES,
                PSTR(buf.as_mut_ptr()),
                &mut len,
            )
        })?;
        Ok((len.max(0) as usize).min(buf.len()))
    }

    fn connect(&self, peer: &PeerAddress) -> io::Result<()> {
        let bytes = peer.as_bytes();
        wsa_check(unsafe {
            connect(
                self.socket,
                bytes.as_ptr().cast::<SOCKADDR>(),
                bytes.len() as i32,
            )
        })?;
        Ok(())
    }

    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut pfd = WSAPOLLFD {
            fd: self.socket,
            events: POLLRDNORM,
            revents: Default::default(),
        };
        let ready = wsa_check(unsafe { WSAPoll(&mut pfd, 1, poll_timeout_millis(timeout)) })?;
        Ok(ready > 0)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = wsa_check(unsafe { recv(self.socket, buf, SEND_RECV_FLAGS(0)) })?;
        Ok(n as usize)
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        let n = wsa_check(unsafe { send(self.socket, buf, SEND_RECV_FLAGS(0)) })?;
        Ok(n as usize)
    }

    fn available(&self) -> io::Result<usize> {
        let mut bytes: u32 = 0;
        wsa_check(unsafe { ioctlsocket(self.socket, FIONREAD, &mut bytes) })?;
        Ok(bytes as usize)
    }

    fn shutdown(&self) -> io::Result<()> {
        wsa_check(unsafe { shutdown(self.socket, SD_BOTH) })?;
        Ok(())
    }

    fn close(mut self) -> io::Result<()> {
        let socket = std::mem::replace(&mut self.socket, INVALID_SOCKET);
        wsa_check(unsafe { closesocket(socket) })?;
        Ok(())
    }
}

impl Drop for WinsockSocket {
    fn drop(&mut self) {
        if self.socket != INVALID_SOCKET {
            unsafe { closesocket(self.socket) };
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystem::Subsystem;

    #[test]
    fn test_released_socket_is_not_closed_again_on_drop() {
        let released = WinsockSocket {
            socket: INVALID_SOCKET,
        };
        drop(released);
    }

    #[test]
    fn test_open_then_close_or_drop_releases_descriptor() {
        let _subsystem = Subsystem::start().expect("winsock");
        // Recent Windows releases no longer ship the IrDA stack.
        let Ok(closed) = WinsockSocket::open() else {
            return;
        };
        let dropped = WinsockSocket::open().expect("second socket");

        closed.close().expect("close");
        drop(dropped);
    }
}
