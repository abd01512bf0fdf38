//! Screen — keeps the terminal's cursor and text in step with the buffer.
//!
//! The `Screen` owns the [`LineBuffer`] and the output sink. Every edit goes
//! through it so the logical change and its escape sequences happen together:
//!
//! - **insert** erases to end of line, writes the new text followed by the
//!   old tail, then walks the cursor back over the tail.
//! - **delete** walks the cursor back over the removed chars, erases, then
//!   redraws the tail and walks back over it again.
//! - **seek** moves the logical cursor and emits the motion for the distance
//!   actually travelled, so clamped seeks stay in sync.
//!
//! All widths are counted in chars: one code point, one column.
//!
//! The sink is flushed at the end of each operation so an interactive
//! terminal shows every keystroke immediately.

use std::fmt;
use std::io::{self, SeekFrom, Write};

use n_term::ansi;
use n_term::terminal::{Device, TerminalSession};

use crate::buffer::LineBuffer;

/// The visible edit line: prompt, buffer and the sink they are drawn on.
pub struct Screen<W> {
    out: W,
    line: LineBuffer,
    prompt: String,
}

impl<W: Write> Screen<W> {
    /// Create a screen drawing `prompt` and an empty line on `out`.
    pub fn new(out: W, prompt: impl Into<String>) -> Self {
        Self {
            out,
            line: LineBuffer::new(),
            prompt: prompt.into(),
        }
    }

    /// The line being edited.
    #[inline]
    #[must_use]
    pub const fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// The prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt. Takes effect at the next redraw.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// The output sink.
    #[inline]
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// The output sink, mutably.
    #[inline]
    pub const fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Write the prompt at the current terminal position.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink.
    pub fn write_prompt(&mut self) -> io::Result<()> {
        self.out.write_all(self.prompt.as_bytes())?;
        self.out.flush()
    }

    /// Move the terminal cursor `diff` columns (positive is right).
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink.
    pub fn seek_out(&mut self, diff: isize) -> io::Result<()> {
        ansi::move_columns(&mut self.out, diff)
    }

    /// Move the cursor and mirror the move on screen. Returns the new
    /// position; out-of-range targets are clamped.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink.
    pub fn seek(&mut self, from: SeekFrom) -> io::Result<usize> {
        let start = self.line.pos();
        let end = self.line.seek(from);

        self.seek_out(signed_delta(start, end))?;
        self.out.flush()?;
        Ok(end)
    }

    /// Insert `text` at the cursor.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink. The buffer is only changed
    /// once the escape output has been written.
    pub fn insert(&mut self, text: &str) -> io::Result<()> {
        // The tail must be read before the buffer changes: afterwards the
        // cursor sits past `text` and `after()` no longer covers it.
        let tail = self.line.after();
        let tail_width = self.line.after_len();

        ansi::erase_to_eol(&mut self.out)?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(tail.as_bytes())?;
        self.seek_out(-signed(tail_width))?;
        self.out.flush()?;

        self.line.insert(text);
        Ok(())
    }

    /// Delete up to `n` chars before the cursor and return them.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink.
    pub fn delete(&mut self, n: usize) -> io::Result<String> {
        let n = n.min(self.line.pos());
        let tail = self.line.after();
        let tail_width = self.line.after_len();

        self.seek_out(-signed(n))?;
        ansi::erase_to_eol(&mut self.out)?;
        if tail_width > 0 {
            self.out.write_all(tail.as_bytes())?;
            self.seek_out(-signed(tail_width))?;
        }
        self.out.flush()?;

        Ok(self.line.delete(n))
    }

    /// Write formatted output above the edit line, then redraw it.
    ///
    /// The current line is erased, raw mode is released while `args` is
    /// written (so the terminal's normal output processing applies to it),
    /// raw mode is re-entered, and the prompt and buffer are redrawn with
    /// the cursor back at its logical position. A session that is not
    /// attached is left alone.
    ///
    /// Output is expected to end with a newline; text spanning several rows
    /// is written as-is with no further cursor bookkeeping.
    ///
    /// # Errors
    ///
    /// Propagates sink write errors and attribute errors from `session`.
    pub fn print<D: Device>(
        &mut self,
        session: &mut TerminalSession<D>,
        args: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        ansi::clear_line(&mut self.out)?;
        self.out.flush()?;

        let raw = session.is_attached();
        if raw {
            session.detach()?;
        }
        self.out.write_fmt(args)?;
        self.out.flush()?;
        if raw {
            session.attach()?;
        }

        self.out.write_all(self.prompt.as_bytes())?;
        write!(self.out, "{}", self.line)?;
        self.seek_out(-signed(self.line.after_len()))?;
        self.out.flush()
    }

    /// Finish the line: move to a fresh line on screen and hand back the
    /// buffer's contents, leaving it empty.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the sink. The buffer is left untouched
    /// if the write fails.
    pub fn flush(&mut self) -> io::Result<String> {
        ansi::next_line(&mut self.out)?;
        self.out.flush()?;
        Ok(self.line.flush())
    }
}

impl<W> fmt::Debug for Screen<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("line", &self.line)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// A column count as a signed motion.
#[allow(clippy::cast_possible_wrap)] // Line widths are far below isize::MAX.
const fn signed(width: usize) -> isize {
    width as isize
}

/// Signed distance from `from` to `to`.
const fn signed_delta(from: usize, to: usize) -> isize {
    signed(to) - signed(from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
