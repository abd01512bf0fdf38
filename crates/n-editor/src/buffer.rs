//! Line buffer — the text being edited plus its cursor.
//!
//! A `LineBuffer` wraps a [`ropey::Rope`] holding a single line and a cursor
//! `pos` counted in chars (Unicode scalar values), never bytes. The invariant
//! `0 <= pos <= len()` holds after every operation.
//!
//! # Design choices
//!
//! - **ropey** gives char-indexed insert and remove, so splicing multi-byte
//!   text in the middle of the line needs no byte-offset bookkeeping.
//!
//! - **Seeks clamp.** A seek past either end lands on that end instead of
//!   failing, so cursor motions at the edges of the line are harmless no-ops.
//!
//! - **No display logic.** Keeping the terminal in sync with the buffer is
//!   the [`Screen`](crate::screen::Screen)'s job.

use std::fmt;
use std::io::SeekFrom;

use ropey::Rope;

/// An editable line with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: Rope,
    pos: usize,
}

impl LineBuffer {
    /// Create an empty buffer with the cursor at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the cursor at the end.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let text = Rope::from_str(text);
        let pos = text.len_chars();
        Self { text, pos }
    }

    /// Cursor position in chars.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Length in chars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len_chars()
    }

    /// True if the line holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    /// Move the cursor and return its new position.
    ///
    /// Targets outside `0..=len()` are clamped to the nearest end.
    pub fn seek(&mut self, from: SeekFrom) -> usize {
        let len = self.len();
        let target = match from {
            SeekFrom::Start(offset) => usize::try_from(offset).unwrap_or(usize::MAX),
            SeekFrom::Current(delta) => offset_by(self.pos, delta),
            SeekFrom::End(delta) => offset_by(len, delta),
        };
        self.pos = target.min(len);
        self.pos
    }

    /// Splice `text` in at the cursor and move the cursor past it.
    pub fn insert(&mut self, text: &str) {
        self.text.insert(self.pos, text);
        self.pos += text.chars().count();
    }

    /// Remove up to `n` chars before the cursor and return them.
    ///
    /// Never deletes past the start of the line; the cursor moves back by
    /// the number of chars actually removed.
    pub fn delete(&mut self, n: usize) -> String {
        let n = n.min(self.pos);
        let start = self.pos - n;

        let removed = self.text.slice(start..self.pos).to_string();
        self.text.remove(start..self.pos);
        self.pos = start;
        removed
    }

    /// Text from the cursor to the end of the line.
    #[must_use]
    pub fn after(&self) -> String {
        self.text.slice(self.pos..).to_string()
    }

    /// Number of chars after the cursor.
    #[inline]
    #[must_use]
    pub fn after_len(&self) -> usize {
        self.len() - self.pos
    }

    /// The word ending at the cursor: everything back to the nearest
    /// whitespace char, or to the start of the line.
    #[must_use]
    pub fn previous_word(&self) -> String {
        let head = self.text.slice(..self.pos).to_string();
        head.rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .to_owned()
    }

    /// Take the whole line, leaving the buffer empty with the cursor at 0.
    pub fn flush(&mut self) -> String {
        let out = self.text.to_string();
        self.text = Rope::new();
        self.pos = 0;
        out
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// `base + delta`, floored at zero.
fn offset_by(base: usize, delta: i64) -> usize {
    let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
    if delta < 0 {
        base.saturating_sub(magnitude)
    } else {
        base.saturating_add(magnitude)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
