//! Accumulating cursors for the partial read and write loops.
//!
//! A single `recv` or `send` may move fewer bytes than asked for.  The socket
//! layer loops until the request is satisfied, and these cursors track how
//! far it got.  The filled / sent count can never pass the end of the
//! buffer: `advance` clamps to the buffer length, so the loops never do
//! offset arithmetic themselves.

/// Why a read loop stopped.
///
/// Only [`ReadStop::Filled`] returns the full requested count; the other
/// two are valid partial results, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStop {
    /// Every requested byte arrived.
    Filled,
    /// The readiness wait expired before the buffer was full.
    TimedOut,
    /// The peer closed the stream (zero-length receive).
    EndOfStream,
}

/// Result of a timed read: how many bytes arrived and why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadReport {
    pub bytes: usize,
    pub stop: ReadStop,
}

/// Tracks the filled prefix of a caller-supplied receive buffer.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    buf: &'a mut [u8],
    filled: usize,
}

impl<'a> ReadCursor<'a> {
    /// Starts an empty cursor over `buf`; the whole buffer is requested.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, filled: 0 }
    }

    /// The unfilled tail, where the next receive should land.
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..]
    }

    /// Marks `n` more bytes as received.
    ///
    /// A count larger than the unfilled tail is clamped.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining(), "advanced past the end of the buffer");
        self.filled = (self.filled + n).min(self.buf.len());
    }

    /// Bytes received so far.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Bytes still wanted.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// Finishes the read with the given stop reason.
    pub fn finish(self, stop: ReadStop) -> ReadReport {
        ReadReport {
            bytes: self.filled,
            stop,
        }
    }
}

/// Tracks the sent prefix of an outbound buffer.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    data: &'a [u8],
    sent: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, sent: 0 }
    }

    /// The bytes not yet handed to the OS.
    pub fn unsent(&self) -> &'a [u8] {
        &self.data[self.sent..]
    }

    /// Marks `n` more bytes as sent, clamped to the unsent remainder.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.unsent().len(), "advanced past the end of the data");
        self.sent = (self.sent + n).min(self.data.len());
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn is_done(&self) -> bool {
        self.sent == self.data.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
