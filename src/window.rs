//! Sliding window over the compressed byte stream.
//!
//! Holds the tail of previously read compressed bytes plus freshly read
//! bytes, so the frame pump can always see at least one whole frame.

use std::io::{self, Read};

use log::warn;

/// Window capacity. Several worst-case frames, so resynchronization
/// always has slack to scan past garbage.
pub(crate) const WINDOW_CAPACITY: usize = 16 * 1024;

/// Fixed-capacity byte buffer with a read cursor. Unread stream bytes
/// live at `pos..pos + len`; everything past them is zero after a short
/// refill, so a stale byte pattern from an earlier fill can never be
/// matched as a sync word.
#[derive(Debug)]
pub(crate) struct Window {
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
}

impl Window {
    pub fn new() -> Self {
        Window {
            buf: vec![0u8; WINDOW_CAPACITY].into_boxed_slice(),
            pos: 0,
            len: 0,
        }
    }

    /// Unread bytes currently buffered.
    pub fn bytes_remaining(&self) -> usize {
        self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    /// The unread region.
    pub fn remaining(&self) -> &[u8] {
        &self.buf[self.pos..self.pos + self.len]
    }

    /// Drop `n` unread bytes: a resync skip or a consumed frame.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        let n = n.min(self.len);
        self.pos += n;
        self.len -= n;
    }

    /// Compact unread bytes to the buffer start, then read from `reader`
    /// until the window is full or the stream has no more bytes. The
    /// unfilled tail is zeroed. Returns the count of newly read bytes.
    ///
    /// A read error here is steady-state decoding, not initialization:
    /// it is logged and treated as end of stream.
    pub fn refill<R: Read>(&mut self, reader: &mut R) -> usize {
        self.buf.copy_within(self.pos..self.pos + self.len, 0);
        self.pos = 0;

        let mut filled = self.len;
        while filled < self.buf.len() {
            match reader.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("read error mid-stream, treating as end of stream: {e}");
                    break;
                }
            }
        }
        self.buf[filled..].fill(0);

        let newly_read = filled - self.len;
        self.len = filled;
        newly_read
    }
}
