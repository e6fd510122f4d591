//! Error taxonomy shared by every IrDA socket operation.
//!
//! Every failing operation returns an [`IrdaError`] that carries the
//! platform cause with it: the error code the OS reported and a
//! human-readable message.  Callers never have to race to read a global
//! "last error" slot before another call overwrites it.
//!
//! # Errors that are not errors
//!
//! A read that stops because its timeout elapsed, or because the peer
//! closed the stream, is a valid partial result and is reported through the
//! returned byte count, not through this type.

use std::fmt;

use thiserror::Error;

/// The OS-facing step that failed.
///
/// Used to label [`IrdaError::Platform`] so logs and error messages name
/// the primitive that reported the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Network subsystem start-up (`WSAStartup` on Windows).
    Startup,
    /// Network subsystem tear-down (`WSACleanup` on Windows).
    Cleanup,
    /// Socket creation.
    Open,
    /// Directional shutdown before close.
    Shutdown,
    /// Releasing the OS descriptor.
    Close,
    /// The device enumeration socket option.
    Discover,
    /// The connect primitive.
    Connect,
    /// The readiness wait that gates each receive.
    Wait,
    /// A receive call.
    Receive,
    /// A send call.
    Send,
    /// The pending-bytes query (`FIONREAD`).
    Available,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Startup => "startup",
            Operation::Cleanup => "cleanup",
            Operation::Open => "socket",
            Operation::Shutdown => "shutdown",
            Operation::Close => "close",
            Operation::Discover => "getsockopt(IRLMP_ENUMDEVICES)",
            Operation::Connect => "connect",
            Operation::Wait => "poll",
            Operation::Receive => "recv",
            Operation::Send => "send",
            Operation::Available => "ioctl(FIONREAD)",
        };
        f.write_str(name)
    }
}

/// Coarse classification of an [`IrdaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A closed handle or an out-of-range argument was supplied.
    InvalidArgument,
    /// Memory or descriptors could not be allocated.
    ResourceExhausted,
    /// An OS call failed; the platform code is available on the error.
    PlatformError,
}

/// Errors returned by IrDA socket operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IrdaError {
    /// The handle was already closed, or an argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The OS refused to allocate a resource (descriptors, buffers).
    #[error("resource exhausted during {operation}: {message} ({code})")]
    ResourceExhausted {
        operation: Operation,
        code: i32,
        message: String,
    },

    /// An OS call failed.
    ///
    /// `code` is the raw platform error (`errno` or `WSAGetLastError`).
    #[error("{operation} failed: {message} ({code})")]
    Platform {
        operation: Operation,
        code: i32,
        message: String,
    },

    /// The kernel returned a device list that does not fit its own header.
    #[error("malformed device list: {0}")]
    MalformedDeviceList(String),
}

impl IrdaError {
    /// Builds a [`IrdaError::Platform`] from a raw code and message.
    ///
    /// The message has trailing line breaks and periods stripped.
    pub fn platform(operation: Operation, code: i32, message: &str) -> Self {
        IrdaError::Platform {
            operation,
            code,
            message: trim_error_message(message).to_string(),
        }
    }

    /// Converts an [`std::io::Error`] reported by `operation`.
    ///
    /// Always a platform error; exhaustion is only classified by the caller
    /// that knows the platform codes (see [`IrdaError::resource_exhausted`]).
    pub fn from_io(operation: Operation, err: &std::io::Error) -> Self {
        IrdaError::Platform {
            operation,
            code: err.raw_os_error().unwrap_or(-1),
            message: describe_io_error(err),
        }
    }

    /// Converts an [`std::io::Error`] that the caller has classified as
    /// memory or descriptor exhaustion.
    pub fn resource_exhausted(operation: Operation, err: &std::io::Error) -> Self {
        IrdaError::ResourceExhausted {
            operation,
            code: err.raw_os_error().unwrap_or(-1),
            message: describe_io_error(err),
        }
    }

    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IrdaError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            IrdaError::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
            IrdaError::Platform { .. } | IrdaError::MalformedDeviceList(_) => {
                ErrorKind::PlatformError
            }
        }
    }

    /// Returns the raw platform error code, if the OS reported one.
    pub fn code(&self) -> Option<i32> {
        match self {
            IrdaError::Platform { code, .. } | IrdaError::ResourceExhausted { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }

    /// Returns the human-readable platform message, if the OS reported one.
    pub fn message(&self) -> Option<&str> {
        match self {
            IrdaError::Platform { message, .. }
            | IrdaError::ResourceExhausted { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the OS step that failed, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            IrdaError::Platform { operation, .. }
            | IrdaError::ResourceExhausted { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Strips trailing `'\r'`, `'\n'` and `'.'` characters from an OS message.
///
/// Windows' `FormatMessage` terminates every message with `".\r\n"`, which
/// reads badly once embedded in a log line.
///
/// # Example
///
/// ```rust
/// use irda_core::error::trim_error_message;
///
/// assert_eq!(trim_error_message("No such device.\r\n"), "No such device");
/// ```
pub fn trim_error_message(message: &str) -> &str {
    message.trim_end_matches(['\r', '\n', '.'])
}

/// Renders an I/O error without the `" (os error N)"` suffix std appends.
fn describe_io_error(err: &std::io::Error) -> String {
    let text = err.to_string();
    let without_code = match err.raw_os_error() {
        Some(code) => {
            let suffix = format!(" (os error {code})");
            text.strip_suffix(&suffix).unwrap_or(&text).to_string()
        }
        None => text,
    };
    trim_error_message(&without_code).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
