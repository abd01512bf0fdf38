// SPDX-License-Identifier: MIT
//
// Terminal input queue and literal-text decoder.
//
// The editor reads the device in small fixed-size chunks and appends them to
// an `InputQueue`. Key bindings are matched against the front of the queue
// first; whatever no binding claims is classified here by [`decode`]:
//
// - Unbound escape sequences (`ESC [ … final`) are discarded whole, so an
//   unknown function key never leaks garbage into the line.
// - Other control bytes below 0x20 are discarded.
// - Everything else must be one UTF-8 encoded code point.
//
// # Design
//
// Sequences can span multiple `read()` calls. The decoder never guesses: if
// the queue ends inside an escape sequence or a multi-byte character it
// reports `Incomplete` and the caller reads more before trying again.
// Malformed UTF-8 is reported as `Invalid`, with the number of bytes that
// make up the bad sequence.

use std::io::{self, Read};

use crate::ansi::ESC;

/// Default number of bytes requested per device read.
pub const READ_CHUNK: usize = 64;

// ─── InputQueue ─────────────────────────────────────────────────────────────

/// A growable FIFO of raw input bytes.
#[derive(Debug, Default)]
pub struct InputQueue {
    buf: Vec<u8>,
}

impl InputQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(READ_CHUNK),
        }
    }

    /// The queued bytes, oldest first.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of queued bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the queue is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append bytes at the back.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Drop `n` bytes from the front (clamped to the queue length).
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.buf.len());
        self.buf.drain(..n);
    }

    /// Perform one blocking read of up to `chunk` bytes from `reader` and
    /// append the result. Returns the number of bytes read; `0` means the
    /// reader hit end-of-input.
    ///
    /// Reads interrupted by a signal (`EINTR`) are retried.
    ///
    /// # Errors
    ///
    /// Any other read error is returned unchanged.
    pub fn fill_from(&mut self, reader: &mut impl Read, chunk: usize) -> io::Result<usize> {
        let mut tmp = vec![0u8; chunk.max(1)];
        loop {
            match reader.read(&mut tmp) {
                Ok(n) => {
                    self.buf.extend_from_slice(&tmp[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// What the front of the queue holds, once no key binding has claimed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// One literal code point, encoded in `usize` bytes.
    Text(char, usize),
    /// `usize` bytes of unbound control input to drop silently.
    Discard(usize),
    /// The queue ends mid-sequence. Read more and retry.
    Incomplete,
    /// `usize` bytes that are not valid UTF-8.
    Invalid(usize),
}

/// Classify the bytes at the front of `input`.
#[must_use]
pub fn decode(input: &[u8]) -> Decoded {
    let Some(&first) = input.first() else {
        return Decoded::Incomplete;
    };

    match first {
        ESC => skip_escape(input),
        0x00..=0x1F => Decoded::Discard(1),
        _ => decode_utf8(input),
    }
}

/// Consume an unbound escape sequence.
///
/// `ESC [` runs through the first final byte in `@`..=`~`. `ESC` followed
/// by anything else swallows that one byte too.
fn skip_escape(input: &[u8]) -> Decoded {
    debug_assert_eq!(input[0], ESC);

    match input.get(1) {
        None => Decoded::Incomplete,
        Some(b'[') => input[2..]
            .iter()
            .position(|b| (b'@'..=b'~').contains(b))
            .map_or(Decoded::Incomplete, |end| Decoded::Discard(end + 3)),
        Some(_) => Decoded::Discard(2),
    }
}

fn decode_utf8(input: &[u8]) -> Decoded {
    let expected = utf8_char_len(input[0]);
    if expected == 0 {
        return Decoded::Invalid(1);
    }

    // A bad continuation byte is invalid even before the sequence completes.
    let available = input.len().min(expected);
    if let Some(bad) = input[1..available].iter().position(|b| b & 0xC0 != 0x80) {
        return Decoded::Invalid(bad + 1);
    }

    if input.len() < expected {
        return Decoded::Incomplete;
    }

    std::str::from_utf8(&input[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Decoded::Invalid(expected), |ch| Decoded::Text(ch, expected))
}

/// Expected UTF-8 sequence length from a lead byte (0 if not a lead byte).
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
