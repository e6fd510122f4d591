//! Mock IrDA socket for tests.
//!
//! [`MockSocket`] never touches the OS.  Tests script what the "kernel"
//! answers (enumeration results, incoming data, failures) and inspect what
//! the handle did (connect records, sent bytes, waits, shutdown and close).
//!
//! The script and the records live in a shared [`MockState`].  Cloning a
//! `MockSocket` clones the handle to that state, so a test can keep one
//! clone for inspection after moving the other into an `IrdaSocket`.
//!
//! # Example
//!
//! ```rust
//! use irda_socket::sys::mock::{Incoming, MockSocket};
//! use irda_socket::IrdaSocket;
//! use irda_core::LinuxLayout;
//!
//! let raw = MockSocket::<LinuxLayout>::new();
//! raw.state().push_incoming(Incoming::Data(b"hello".to_vec()));
//! let observer = raw.clone();
//!
//! let mut socket = IrdaSocket::from_raw(raw);
//! let mut buf = [0u8; 5];
//! assert_eq!(socket.read(&mut buf).unwrap(), 5);
//! assert_eq!(&buf, b"hello");
//!
//! socket.close().unwrap();
//! assert!(observer.state().closed);
//! ```

use std::collections::VecDeque;
use std::io;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use irda_core::{AddressLayout, DiscoveredDevice, LinuxLayout, PeerAddress};

use super::RawSocket;

/// One scripted answer to the enumeration query.
#[derive(Debug, Clone, PartialEq)]
pub enum Enumeration {
    /// "Would block": a discovery cycle is still running.
    NotReady,
    /// The list is ready and holds these devices.
    Devices(Vec<DiscoveredDevice>),
    /// The query fails with this OS error code.
    Fail(i32),
}

/// One scripted event on the receive side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// Bytes that become readable, possibly over several receives.
    Data(Vec<u8>),
    /// A bounded readiness wait that expires.  Skipped by unbounded waits.
    Silence,
    /// The peer closes the stream.
    Eof,
    /// The readiness wait itself fails with this code.
    WaitFail(i32),
    /// The receive call fails with this code.
    RecvFail(i32),
}

/// Script and records shared by all clones of one [`MockSocket`].
#[derive(Debug, Default)]
pub struct MockState {
    enumerations: VecDeque<Enumeration>,
    incoming: VecDeque<Incoming>,
    /// Number of enumeration queries issued.
    pub query_calls: usize,
    /// Every peer record passed to `connect`, in order.
    pub connects: Vec<PeerAddress>,
    /// When set, `connect` fails with this code.
    pub connect_error: Option<i32>,
    /// Every byte accepted by `send`, in order.
    pub sent: Vec<u8>,
    /// Upper bound on bytes accepted per `send`; `Some(0)` makes no progress.
    pub send_chunk: Option<usize>,
    /// When set, `send` fails with this code.
    pub send_error: Option<i32>,
    /// Budget of every readiness wait, in order.
    pub waits: Vec<Option<Duration>>,
    /// Number of `shutdown` calls.
    pub shutdown_calls: usize,
    /// When set, `shutdown` fails with this code.
    pub shutdown_error: Option<i32>,
    /// Set once `close` has run.
    pub closed: bool,
    /// When set, `close` fails with this code.
    pub close_error: Option<i32>,
}

impl MockState {
    /// Queues the answer to the next enumeration query.
    ///
    /// Once the queue is empty every query returns an empty device list.
    pub fn push_enumeration(&mut self, answer: Enumeration) {
        self.enumerations.push_back(answer);
    }

    /// Queues a receive-side event.
    ///
    /// Once the queue is empty, bounded waits time out and unbounded waits
    /// see the end of the stream.
    pub fn push_incoming(&mut self, event: Incoming) {
        self.incoming.push_back(event);
    }

    /// Bytes readable before the next non-data event.
    fn pending_bytes(&self) -> usize {
        self.incoming
            .iter()
            .map_while(|event| match event {
                Incoming::Data(bytes) => Some(bytes.len()),
                _ => None,
            })
            .sum()
    }
}

/// Scripted [`RawSocket`] for tests on any platform.
///
/// `L` picks the native layout the handle encodes peers and decodes device
/// lists with; it defaults to the Linux layout.
pub struct MockSocket<L: AddressLayout = LinuxLayout> {
    state: Arc<Mutex<MockState>>,
    _layout: PhantomData<fn() -> L>,
}

impl<L: AddressLayout> MockSocket<L> {
    /// Creates a socket with an empty script.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            _layout: PhantomData,
        }
    }

    /// Locks the shared script and records.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<L: AddressLayout> Default for MockSocket<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: AddressLayout> Clone for MockSocket<L> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _layout: PhantomData,
        }
    }
}

impl<L: AddressLayout> std::fmt::Debug for MockSocket<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSocket").finish_non_exhaustive()
    }
}

fn os_error(code: i32) -> io::Error {
    io::Error::from_raw_os_error(code)
}

impl<L: AddressLayout> RawSocket for MockSocket<L> {
    type Layout = L;

    fn open() -> io::Result<Self> {
        Ok(Self::new())
    }

    fn query_device_list(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        state.query_calls += 1;
        let devices = match state.enumerations.pop_front() {
            Some(Enumeration::NotReady) => {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "device list not ready",
                ))
            }
            Some(Enumeration::Fail(code)) => return Err(os_error(code)),
            Some(Enumeration::Devices(devices)) => devices,
            None => Vec::new(),
        };
        let encoded = L::encode_device_list(&devices);
        let len = encoded.len().min(buf.len());
        buf[..len].copy_from_slice(&encoded[..len]);
        Ok(len)
    }

    fn connect(&self, peer: &PeerAddress) -> io::Result<()> {
        let mut state = self.state();
        state.connects.push(peer.clone());
        match state.connect_error {
            Some(code) => Err(os_error(code)),
            None => Ok(()),
        }
    }

    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut state = self.state();
        state.waits.push(timeout);
        loop {
            match state.incoming.front().cloned() {
                None => return Ok(timeout.is_none()),
                Some(Incoming::Silence) => {
                    state.incoming.pop_front();
                    if timeout.is_some() {
                        return Ok(false);
                    }
                }
                Some(Incoming::WaitFail(code)) => {
                    state.incoming.pop_front();
                    return Err(os_error(code));
                }
                Some(_) => return Ok(true),
            }
        }
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        loop {
            match state.incoming.pop_front() {
                None | Some(Incoming::Eof) => return Ok(0),
                Some(Incoming::Silence) | Some(Incoming::WaitFail(_)) => continue,
                Some(Incoming::RecvFail(code)) => return Err(os_error(code)),
                Some(Incoming::Data(mut bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    if n < bytes.len() {
                        state.incoming.push_front(Incoming::Data(bytes.split_off(n)));
                    }
                    return Ok(n);
                }
            }
        }
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state();
        if let Some(code) = state.send_error {
            return Err(os_error(code));
        }
        let n = state.send_chunk.map_or(buf.len(), |chunk| chunk.min(buf.len()));
        state.sent.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn available(&self) -> io::Result<usize> {
        Ok(self.state().pending_bytes())
    }

    fn shutdown(&self) -> io::Result<()> {
        let mut state = self.state();
        state.shutdown_calls += 1;
        match state.shutdown_error {
            Some(code) => Err(os_error(code)),
            None => Ok(()),
        }
    }

    fn close(self) -> io::Result<()> {
        let mut state = self.state();
        state.closed = true;
        match state.close_error {
            Some(code) => Err(os_error(code)),
            None => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_is_split_across_short_receives() {
        let raw = MockSocket::<LinuxLayout>::new();
        raw.state().push_incoming(Incoming::Data(b"abcdef".to_vec()));

        let mut buf = [0u8; 4];
        assert_eq!(raw.recv(&mut buf).expect("recv"), 4);
        assert_eq!(raw.available().expect("available"), 2);
        assert_eq!(raw.recv(&mut buf).expect("recv"), 2);
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn test_silence_expires_bounded_wait_only() {
        let raw = MockSocket::<LinuxLayout>::new();
        raw.state().push_incoming(Incoming::Silence);
        raw.state().push_incoming(Incoming::Silence);
        raw.state().push_incoming(Incoming::Data(vec![1]));

        assert!(!raw.wait_readable(Some(Duration::from_millis(5))).expect("wait"));
        assert!(raw.wait_readable(None).expect("wait"));
        assert_eq!(raw.state().waits.len(), 2);
    }

    #[test]
    fn test_empty_script_means_timeout_or_end_of_stream() {
        let raw = MockSocket::<LinuxLayout>::new();
        assert!(!raw.wait_readable(Some(Duration::ZERO)).expect("wait"));
        assert!(raw.wait_readable(None).expect("wait"));
        assert_eq!(raw.recv(&mut [0u8; 1]).expect("recv"), 0);
    }

    #[test]
    fn test_send_chunk_limits_progress() {
        let raw = MockSocket::<LinuxLayout>::new();
        raw.state().send_chunk = Some(3);

        assert_eq!(raw.send(b"abcdef").expect("send"), 3);
        assert_eq!(raw.state().sent, b"abc");
    }

    #[test]
    fn test_close_is_recorded_on_clones() {
        let raw = MockSocket::<LinuxLayout>::new();
        let observer = raw.clone();

        raw.close().expect("close");

        assert!(observer.state().closed);
    }
}
