//! The platform-neutral IrDA socket handle.
//!
//! [`IrdaSocket`] owns one OS descriptor (through a [`RawSocket`]) plus the
//! per-wait read timeout.  Every operation is written once here; the
//! platform only shows up through `S` and its associated layout.
//!
//! # Failure reporting
//!
//! Every operation returns `Result<_, IrdaError>`.  Platform failures are
//! additionally logged at `error!` and recorded in [`crate::last_error`] for
//! the calling thread.  Operations on a closed handle fail with
//! [`IrdaError::InvalidArgument`] and touch nothing.

use std::fmt;
use std::io;

use irda_core::{
    AddressLayout, DiscoveredDevice, DiscoveryPolicy, IrdaError, Operation, ReadCursor,
    ReadReport, ReadStop, ReadTimeout, ServiceSelector, WriteCursor, SERVICE_NAME_CAPACITY,
};
use tracing::{debug, error, trace, warn};

use crate::discovery::{query_with_retry, Pause, ThreadSleep};
use crate::last_error::{self, open_failure, os_failure};
use crate::sys::RawSocket;

const CLOSED: &str = "socket is closed";

/// A blocking IrDA stream socket with a per-wait read timeout.
///
/// Not safe for concurrent use: reads, writes, timeout changes and close
/// must be serialized by the caller, which `&mut self` enforces for the
/// mutating operations.
pub struct IrdaSocket<S: RawSocket> {
    raw: Option<S>,
    timeout: ReadTimeout,
    policy: DiscoveryPolicy,
    pause: Box<dyn Pause + Send>,
}

impl<S: RawSocket> IrdaSocket<S> {
    /// Creates a stream socket in the IrDA address family.
    ///
    /// The new handle blocks without limit on reads until
    /// [`IrdaSocket::set_timeout`] says otherwise.
    ///
    /// # Errors
    ///
    /// [`IrdaError::ResourceExhausted`] if the OS is out of descriptors or
    /// memory, [`IrdaError::Platform`] for any other creation failure.
    pub fn open() -> Result<Self, IrdaError> {
        let raw = S::open().map_err(|e| open_failure(&e))?;
        debug!(family = S::Layout::ADDRESS_FAMILY, "opened IrDA socket");
        Ok(Self::from_raw(raw))
    }

    /// Wraps an already open descriptor with the default settings.
    pub fn from_raw(raw: S) -> Self {
        Self {
            raw: Some(raw),
            timeout: ReadTimeout::INFINITE,
            policy: DiscoveryPolicy::default(),
            pause: Box::new(ThreadSleep),
        }
    }

    /// Replaces the discovery retry schedule.
    pub fn with_discovery_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces how discovery waits between retries.
    pub fn with_pause<P: Pause + Send + 'static>(mut self, pause: P) -> Self {
        self.pause = Box::new(pause);
        self
    }

    fn raw(&self) -> Result<&S, IrdaError> {
        self.raw.as_ref().ok_or(IrdaError::InvalidArgument(CLOSED))
    }

    /// Returns `true` until [`IrdaSocket::close`] has run.
    pub fn is_open(&self) -> bool {
        self.raw.is_some()
    }

    /// Sets the read timeout in milliseconds; negative blocks indefinitely.
    ///
    /// The value is stored verbatim.  It bounds each readiness wait inside
    /// [`IrdaSocket::read`] and nothing else.
    pub fn set_timeout(&mut self, millis: i64) -> Result<(), IrdaError> {
        self.raw()?;
        self.timeout = ReadTimeout::from_millis(millis);
        debug!(timeout = %self.timeout, "read timeout set");
        Ok(())
    }

    /// The current read timeout.
    pub fn timeout(&self) -> ReadTimeout {
        self.timeout
    }

    /// The discovery retry schedule in use.
    pub fn discovery_policy(&self) -> DiscoveryPolicy {
        self.policy
    }

    // ── Discovery ─────────────────────────────────────────────────────────

    /// Enumerates nearby devices and calls `on_device` once per device.
    ///
    /// Devices are reported in the order the kernel listed them.  If the
    /// list never becomes ready within the retry budget, the call succeeds
    /// without invoking `on_device`.
    ///
    /// Returns the number of devices reported.
    ///
    /// # Errors
    ///
    /// Any enumeration failure other than "not ready yet" is returned
    /// immediately, as is a device list that does not fit its own header.
    pub fn discover<F>(&self, mut on_device: F) -> Result<usize, IrdaError>
    where
        F: FnMut(&DiscoveredDevice),
    {
        let raw = self.raw()?;
        let mut buf = vec![0u8; S::Layout::DEVICE_LIST_LEN];

        let len = match query_with_retry(raw, &mut buf, &self.policy, self.pause.as_ref()) {
            Ok(Some(len)) => len,
            Ok(None) => return Ok(0),
            Err(e) => return Err(os_failure(Operation::Discover, &e)),
        };

        let devices = S::Layout::decode_device_list(&buf[..len]).map_err(|e| {
            error!(len, "{e}");
            e
        })?;
        debug!(count = devices.len(), "discovery finished");

        for device in &devices {
            trace!(%device, "discovered");
            on_device(device);
        }
        Ok(devices.len())
    }

    /// Runs [`IrdaSocket::discover`] and collects the devices in order.
    pub fn discover_devices(&self) -> Result<Vec<DiscoveredDevice>, IrdaError> {
        let mut devices = Vec::new();
        self.discover(|device| devices.push(device.clone()))?;
        Ok(devices)
    }

    // ── Connection ────────────────────────────────────────────────────────

    /// Connects to the service `name` on the device at `address`.
    ///
    /// Names longer than the 24-byte field are truncated.  `None` connects
    /// with an all-zero name field.
    pub fn connect_by_name(&self, address: u32, name: Option<&str>) -> Result<(), IrdaError> {
        if let Some(name) = name.filter(|n| n.len() > SERVICE_NAME_CAPACITY) {
            warn!(
                name,
                capacity = SERVICE_NAME_CAPACITY,
                "service name truncated to field width"
            );
        }
        self.connect(address, ServiceSelector::Name(name))
    }

    /// Connects to LSAP selector `lsap` on the device at `address`.
    pub fn connect_by_lsap(&self, address: u32, lsap: u8) -> Result<(), IrdaError> {
        self.connect(address, ServiceSelector::Lsap(lsap))
    }

    fn connect(&self, address: u32, selector: ServiceSelector<'_>) -> Result<(), IrdaError> {
        let raw = self.raw()?;
        let peer = S::Layout::build_peer_address(address, selector);
        debug!(address = format_args!("0x{address:08X}"), %selector, "connecting");
        raw.connect(&peer)
            .map_err(|e| os_failure(Operation::Connect, &e))?;
        debug!(address = format_args!("0x{address:08X}"), "connected");
        Ok(())
    }

    // ── Timed I/O ─────────────────────────────────────────────────────────

    /// Reads until `buf` is full, the timeout expires or the peer closes.
    ///
    /// Returns the number of bytes received.  A count below `buf.len()` is
    /// a timeout or end of stream, not an error.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, IrdaError> {
        self.read_report(buf).map(|report| report.bytes)
    }

    /// Like [`IrdaSocket::read`], but also says why the read stopped.
    pub fn read_report(&mut self, buf: &mut [u8]) -> Result<ReadReport, IrdaError> {
        let raw = self.raw()?;
        let budget = self.timeout.as_duration();
        let mut cursor = ReadCursor::new(buf);

        while !cursor.is_full() {
            let ready = raw
                .wait_readable(budget)
                .map_err(|e| os_failure(Operation::Wait, &e))?;
            if !ready {
                debug!(received = cursor.filled(), timeout = %self.timeout, "read timed out");
                return Ok(cursor.finish(ReadStop::TimedOut));
            }

            let n = raw
                .recv(cursor.unfilled_mut())
                .map_err(|e| os_failure(Operation::Receive, &e))?;
            if n == 0 {
                debug!(received = cursor.filled(), "peer closed the stream");
                return Ok(cursor.finish(ReadStop::EndOfStream));
            }
            cursor.advance(n);
            trace!(n, filled = cursor.filled(), wanted = cursor.remaining(), "received");
        }

        Ok(cursor.finish(ReadStop::Filled))
    }

    /// Sends all of `data`, looping over partial sends.
    ///
    /// Returns `data.len()` on success.  There is no write timeout.
    ///
    /// # Errors
    ///
    /// [`IrdaError::Platform`] if a send fails, or if the OS accepts zero
    /// bytes of a non-empty remainder (the loop would otherwise spin).
    pub fn write(&mut self, data: &[u8]) -> Result<usize, IrdaError> {
        let raw = self.raw()?;
        let mut cursor = WriteCursor::new(data);

        while !cursor.is_done() {
            let n = raw
                .send(cursor.unsent())
                .map_err(|e| os_failure(Operation::Send, &e))?;
            if n == 0 {
                let err = IrdaError::platform(Operation::Send, 0, "send made no progress");
                error!(sent = cursor.sent(), total = data.len(), "{err}");
                last_error::record(&err);
                return Err(err);
            }
            cursor.advance(n);
            trace!(n, sent = cursor.sent(), total = data.len(), "sent");
        }

        Ok(cursor.sent())
    }

    /// Bytes that can be read right now without blocking.
    pub fn available(&self) -> Result<usize, IrdaError> {
        self.raw()?
            .available()
            .map_err(|e| os_failure(Operation::Available, &e))
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Shuts down both directions and releases the descriptor.
    ///
    /// Shutdown is best-effort.  The descriptor is released even if
    /// closing it reports an error; the handle is closed either way.
    ///
    /// # Errors
    ///
    /// [`IrdaError::InvalidArgument`] if the handle is already closed,
    /// [`IrdaError::Platform`] if the OS close call failed.
    pub fn close(&mut self) -> Result<(), IrdaError> {
        let raw = self.raw.take().ok_or(IrdaError::InvalidArgument(CLOSED))?;
        if let Err(e) = raw.shutdown() {
            let err = IrdaError::from_io(Operation::Shutdown, &e);
            debug!("{err}; closing anyway");
        }
        raw.close().map_err(|e| os_failure(Operation::Close, &e))?;
        debug!("closed IrDA socket");
        Ok(())
    }
}

impl<S: RawSocket> Drop for IrdaSocket<S> {
    fn drop(&mut self) {
        if self.raw.is_some() {
            if let Err(e) = self.close() {
                warn!(error = %e, "closing IrDA socket on drop failed");
            }
        }
    }
}

impl<S: RawSocket> fmt::Debug for IrdaSocket<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrdaSocket")
            .field("open", &self.is_open())
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn to_io(err: IrdaError) -> io::Error {
    io::Error::other(err)
}

/// Byte-stream access for code written against [`std::io`].
///
/// Each `read` call is one timed read.  `Ok(0)` means end of stream only:
/// a timeout that delivered nothing is an [`io::ErrorKind::TimedOut`]
/// error, and the socket can be read again afterwards.
impl<S: RawSocket> io::Read for IrdaSocket<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let report = self.read_report(buf).map_err(to_io)?;
        if report.stop == ReadStop::TimedOut && report.bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no data within {}", self.timeout),
            ));
        }
        Ok(report.bytes)
    }
}

impl<S: RawSocket> io::Write for IrdaSocket<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        IrdaSocket::write(self, buf).map_err(to_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
