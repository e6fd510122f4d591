//! Per-thread record of the most recent platform failure.
//!
//! Every failing operation already returns its cause inside the
//! [`IrdaError`].  This module additionally keeps the code and message of
//! the last platform failure on the calling thread, for callers that report
//! errors in a separate step (the `irda-tool` exit path, C-style wrappers).
//!
//! The record is thread-local, so one thread's failure never shows up in
//! another thread's query.  Successful operations leave it untouched.

use std::cell::RefCell;
use std::io;

use irda_core::{IrdaError, Operation};

thread_local! {
    static LAST_ERROR: RefCell<Option<(i32, String)>> = const { RefCell::new(None) };
}

/// Platform code of the last failure on this thread, or `0` if none.
pub fn error_code() -> i32 {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(0, |(code, _)| *code))
}

/// Message of the last failure on this thread.
///
/// Trailing line breaks and periods are already stripped.
pub fn error_message() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map(|(_, message)| message.clone()))
}

/// Forgets the recorded failure.
pub fn clear() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

/// Stores the code and message of `err` if it carries a platform cause.
pub(crate) fn record(err: &IrdaError) {
    if let (Some(code), Some(message)) = (err.code(), err.message()) {
        let message = message.to_string();
        LAST_ERROR.with(|slot| *slot.borrow_mut() = Some((code, message)));
    }
}

/// Converts an adapter failure into an [`IrdaError`], logs it and records it.
pub(crate) fn os_failure(operation: Operation, err: &io::Error) -> IrdaError {
    report(IrdaError::from_io(operation, err))
}

/// Like [`os_failure`] for socket creation, where running out of memory or
/// descriptors is reported as [`IrdaError::ResourceExhausted`].
pub(crate) fn open_failure(err: &io::Error) -> IrdaError {
    if crate::sys::is_exhaustion(err) {
        report(IrdaError::resource_exhausted(Operation::Open, err))
    } else {
        os_failure(Operation::Open, err)
    }
}

fn report(error: IrdaError) -> IrdaError {
    tracing::error!(
        operation = ?error.operation(),
        code = error.code().unwrap_or(-1),
        "{error}"
    );
    record(&error);
    error
}

// ── Tests ─────────────────────────────────────────────────────────────────────
