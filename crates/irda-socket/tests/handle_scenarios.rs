//! Integration tests for `IrdaSocket` driven by the scripted mock socket.
//!
//! # Purpose
//!
//! These tests use only the public API, the way an application would, and
//! script the "kernel" side with `MockSocket`.  They verify:
//!
//! - Discovery: retry schedule, swallowed "not ready" exhaustion, callback
//!   order, fail-fast on other errors, malformed lists.
//! - Connect: the peer record handed to the OS for names and LSAPs on both
//!   native layouts, and the last-error side channel on failure.
//! - Timed I/O: per-wait timeouts, partial reads, end of stream, partial
//!   sends and the no-progress guard.
//! - Lifecycle: double close.
//!
//! Real descriptors are exercised in `linux_loopback.rs`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use irda_core::{
    AddressLayout, DiscoveredDevice, DiscoveryPolicy, ErrorKind, HintFlags, IrdaError,
    LinuxLayout, Operation, ReadStop, WinsockLayout,
};
use irda_socket::last_error;
use irda_socket::sys::mock::{Enumeration, Incoming, MockSocket};
use irda_socket::{IrdaSocket, Pause};

/// Records every pause instead of sleeping.
#[derive(Clone, Default)]
struct RecordingPause(Arc<Mutex<Vec<Duration>>>);

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.0.lock().unwrap().push(duration);
    }
}

fn socket_with_pause<L: AddressLayout>(
    raw: MockSocket<L>,
) -> (IrdaSocket<MockSocket<L>>, RecordingPause) {
    let pause = RecordingPause::default();
    let socket = IrdaSocket::from_raw(raw).with_pause(pause.clone());
    (socket, pause)
}

fn nokia() -> DiscoveredDevice {
    DiscoveredDevice {
        address: 0x0102_0304,
        name: "Nokia 6310i".into(),
        charset: 0,
        hints: HintFlags(HintFlags::TELEPHONY | HintFlags::OBEX),
    }
}

fn printer() -> DiscoveredDevice {
    DiscoveredDevice {
        address: 0xCAFE_0042,
        name: "HP LaserJet".into(),
        charset: 0,
        hints: HintFlags(HintFlags::PRINTER),
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// The list never becomes ready: discovery succeeds with zero callbacks
/// after four one-second pauses.
#[test]
fn test_discover_not_ready_for_every_retry_succeeds_with_no_devices() {
    // Arrange
    let raw = MockSocket::<LinuxLayout>::new();
    for _ in 0..10 {
        raw.state().push_enumeration(Enumeration::NotReady);
    }
    let observer = raw.clone();
    let (socket, pause) = socket_with_pause(raw);
    let mut calls = 0;

    // Act
    let count = socket.discover(|_| calls += 1).expect("discover succeeds");

    // Assert
    assert_eq!(count, 0);
    assert_eq!(calls, 0);
    assert_eq!(observer.state().query_calls, 5);
    assert_eq!(*pause.0.lock().unwrap(), vec![Duration::from_secs(1); 4]);
}

#[test]
fn test_discover_reports_devices_in_kernel_order() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_enumeration(Enumeration::NotReady);
    raw.state()
        .push_enumeration(Enumeration::Devices(vec![nokia(), printer()]));
    let (socket, pause) = socket_with_pause(raw);
    let mut seen = Vec::new();

    let count = socket
        .discover(|device| seen.push(device.clone()))
        .expect("discover");

    assert_eq!(count, 2);
    assert_eq!(seen, vec![nokia(), printer()]);
    assert_eq!(pause.0.lock().unwrap().len(), 1);
}

#[test]
fn test_discover_devices_on_winsock_layout_assembles_big_endian_address() {
    let raw = MockSocket::<WinsockLayout>::new();
    raw.state().push_enumeration(Enumeration::Devices(vec![nokia()]));
    let (socket, _pause) = socket_with_pause(raw);

    let devices = socket.discover_devices().expect("discover");

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].address, 0x0102_0304);
    assert!(devices[0].hints.contains(HintFlags::OBEX));
}

#[test]
fn test_discover_with_empty_list_invokes_nothing() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_enumeration(Enumeration::Devices(Vec::new()));
    let (socket, pause) = socket_with_pause(raw);

    assert!(socket.discover_devices().expect("discover").is_empty());
    assert!(pause.0.lock().unwrap().is_empty());
}

#[test]
fn test_discover_fails_fast_on_other_errors() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_enumeration(Enumeration::Fail(19));
    let observer = raw.clone();
    let (socket, pause) = socket_with_pause(raw);

    let err = socket.discover(|_| {}).expect_err("discover fails");

    assert_eq!(err.kind(), ErrorKind::PlatformError);
    assert_eq!(err.operation(), Some(Operation::Discover));
    assert_eq!(err.code(), Some(19));
    assert_eq!(observer.state().query_calls, 1);
    assert!(pause.0.lock().unwrap().is_empty());
}

#[test]
fn test_discover_honours_custom_policy() {
    let raw = MockSocket::<LinuxLayout>::new();
    for _ in 0..3 {
        raw.state().push_enumeration(Enumeration::NotReady);
    }
    let observer = raw.clone();
    let pause = RecordingPause::default();
    let socket = IrdaSocket::from_raw(raw)
        .with_pause(pause.clone())
        .with_discovery_policy(DiscoveryPolicy {
            max_retries: 2,
            retry_interval: Duration::from_millis(250),
        });

    assert!(socket.discover_devices().expect("discover").is_empty());
    assert_eq!(observer.state().query_calls, 3);
    assert_eq!(
        *pause.0.lock().unwrap(),
        vec![Duration::from_millis(250); 2]
    );
}

// ── Connect ───────────────────────────────────────────────────────────────────

/// Connect to "OBEX" on 0x01020304, then write 10 bytes: the OS sees the
/// native record and the peer receives exactly those bytes.
#[test]
fn test_connect_by_name_then_write_ten_bytes() {
    // Arrange
    let raw = MockSocket::<LinuxLayout>::new();
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    let payload = *b"0123456789";

    // Act
    socket
        .connect_by_name(0x0102_0304, Some("OBEX"))
        .expect("connect");
    let written = socket.write(&payload).expect("write");

    // Assert
    let state = observer.state();
    assert_eq!(written, 10);
    assert_eq!(state.sent, payload);
    assert_eq!(
        state.connects,
        vec![LinuxLayout::build_peer_address(
            0x0102_0304,
            irda_core::ServiceSelector::Name(Some("OBEX"))
        )]
    );
}

#[test]
fn test_connect_by_lsap_on_winsock_synthesizes_service_name() {
    let raw = MockSocket::<WinsockLayout>::new();
    let observer = raw.clone();
    let socket = IrdaSocket::from_raw(raw);

    socket.connect_by_lsap(0x0102_0304, 7).expect("connect");

    let state = observer.state();
    let record = state.connects[0].as_bytes();
    assert_eq!(&record[2..6], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(&record[6..15], b"LSAP-SEL7");
    assert!(record[15..31].iter().all(|&b| b == 0));
}

#[test]
fn test_connect_failure_is_reported_and_recorded() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().connect_error = Some(111);
    let socket = IrdaSocket::from_raw(raw);
    last_error::clear();

    let err = socket
        .connect_by_name(0x0102_0304, Some("OBEX"))
        .expect_err("connect fails");

    assert_eq!(err.operation(), Some(Operation::Connect));
    assert_eq!(err.code(), Some(111));
    assert_eq!(last_error::error_code(), 111);
    assert_eq!(last_error::error_message().as_deref(), err.message());
}

// ── Timed read ────────────────────────────────────────────────────────────────

#[test]
fn test_read_with_timeout_and_silent_peer_returns_zero() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_incoming(Incoming::Silence);
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    socket.set_timeout(500).expect("set timeout");
    let mut buf = [0u8; 16];

    let report = socket.read_report(&mut buf).expect("read");

    assert_eq!(report.bytes, 0);
    assert_eq!(report.stop, ReadStop::TimedOut);
    assert_eq!(observer.state().waits, vec![Some(Duration::from_millis(500))]);
}

/// Each wait gets the full timeout, not the remainder of one deadline.
#[test]
fn test_read_applies_timeout_to_every_wait() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_incoming(Incoming::Data(b"abc".to_vec()));
    raw.state().push_incoming(Incoming::Data(b"def".to_vec()));
    raw.state().push_incoming(Incoming::Silence);
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    socket.set_timeout(200).expect("set timeout");
    let mut buf = [0u8; 10];

    let read = socket.read(&mut buf).expect("read");

    assert_eq!(read, 6);
    assert_eq!(&buf[..6], b"abcdef");
    assert_eq!(
        observer.state().waits,
        vec![Some(Duration::from_millis(200)); 3]
    );
}

#[test]
fn test_read_never_returns_more_than_requested() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_incoming(Incoming::Data(vec![7; 32]));
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    let mut buf = [0u8; 8];

    let report = socket.read_report(&mut buf).expect("read");

    assert_eq!(report.bytes, 8);
    assert_eq!(report.stop, ReadStop::Filled);
    assert_eq!(socket.available().expect("available"), 24);
    drop(socket);
    assert!(observer.state().closed);
}

#[test]
fn test_infinite_read_waits_through_silence_until_end_of_stream() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_incoming(Incoming::Silence);
    raw.state().push_incoming(Incoming::Data(b"hi".to_vec()));
    raw.state().push_incoming(Incoming::Eof);
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    let mut buf = [0u8; 8];

    let report = socket.read_report(&mut buf).expect("read");

    assert_eq!(report.bytes, 2);
    assert_eq!(report.stop, ReadStop::EndOfStream);
    assert!(observer.state().waits.iter().all(Option::is_none));
}

#[test]
fn test_read_wait_and_receive_failures_are_errors() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().push_incoming(Incoming::WaitFail(4));
    raw.state().push_incoming(Incoming::RecvFail(104));
    let mut socket = IrdaSocket::from_raw(raw);
    let mut buf = [0u8; 4];

    let wait = socket.read(&mut buf).expect_err("wait fails");
    let receive = socket.read(&mut buf).expect_err("recv fails");

    assert_eq!(wait.operation(), Some(Operation::Wait));
    assert_eq!(receive.operation(), Some(Operation::Receive));
    assert_eq!(receive.code(), Some(104));
}

// ── Timed write ───────────────────────────────────────────────────────────────

#[test]
fn test_write_accumulates_partial_sends() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().send_chunk = Some(3);
    let observer = raw.clone();
    let mut socket = IrdaSocket::from_raw(raw);
    let data: Vec<u8> = (0..=99).collect();

    let written = socket.write(&data).expect("write");

    assert_eq!(written, data.len());
    assert_eq!(observer.state().sent, data);
}

#[test]
fn test_write_without_progress_fails_instead_of_spinning() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().send_chunk = Some(0);
    let mut socket = IrdaSocket::from_raw(raw);

    let err = socket.write(b"stuck").expect_err("no progress");

    assert!(matches!(
        err,
        IrdaError::Platform {
            operation: Operation::Send,
            ..
        }
    ));
}

#[test]
fn test_write_failure_is_platform_error() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().send_error = Some(32);
    let mut socket = IrdaSocket::from_raw(raw);

    let err = socket.write(b"data").expect_err("send fails");

    assert_eq!(err.kind(), ErrorKind::PlatformError);
    assert_eq!(err.code(), Some(32));
}

/// Buffer exhaustion during a send is still a platform error; only socket
/// creation reports resource exhaustion.
#[cfg(unix)]
#[test]
fn test_write_failing_with_enobufs_is_platform_error() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().send_error = Some(libc::ENOBUFS);
    let mut socket = IrdaSocket::from_raw(raw);

    let err = socket.write(b"x").expect_err("send fails");

    assert_eq!(err.kind(), ErrorKind::PlatformError);
    assert_eq!(err.code(), Some(libc::ENOBUFS));
}

#[cfg(unix)]
#[test]
fn test_receive_and_connect_failing_with_enomem_are_platform_errors() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().connect_error = Some(libc::ENOMEM);
    raw.state().push_incoming(Incoming::RecvFail(libc::ENOMEM));
    let mut socket = IrdaSocket::from_raw(raw);

    let connect = socket.connect_by_lsap(1, 2).expect_err("connect fails");
    let receive = socket.read(&mut [0u8; 4]).expect_err("recv fails");

    assert_eq!(connect.kind(), ErrorKind::PlatformError);
    assert_eq!(receive.kind(), ErrorKind::PlatformError);
}

#[test]
fn test_write_of_nothing_sends_nothing() {
    let raw = MockSocket::<LinuxLayout>::new();
    raw.state().send_error = Some(32);
    let mut socket = IrdaSocket::from_raw(raw);

    assert_eq!(socket.write(&[]).expect("empty write"), 0);
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_second_close_is_invalid_argument() {
    let mut socket = IrdaSocket::<MockSocket>::open().expect("open");

    socket.close().expect("first close");
    let err = socket.close().expect_err("second close");

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
