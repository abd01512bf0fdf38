// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; the screen synchronizer makes those.
// This module just knows the byte-level encoding of the handful of commands
// a single-line editor needs.
//
// Cursor motion is always relative and bounded: each CUF/CUB command moves
// at most nine columns, so the parameter is a single digit and the editor
// never needs to know the terminal width.
//
// All functions return `io::Result` propagated from the underlying writer.
use std::io::{self, Write};

/// Largest column count carried by one cursor-motion command.
pub const MAX_STEP: u8 = 9;

/// Escape byte (`ESC`, 0x1B).
pub const ESC: u8 = 0x1B;

/// SGR bold.
pub const BOLD: &str = "\x1b[1m";

/// SGR reset.
pub const RESET: &str = "\x1b[0m";

// ─── Line ────────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_to_eol(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Return to column zero and erase the whole line.
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\x1b[K")
}

/// Move to the start of the next line and erase it.
///
/// Written as `\n\r` so the cursor reaches column zero whether or not the
/// terminal translates NL on output.
#[inline]
pub fn next_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\n\r\x1b[K")
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor `n` columns right (CUF). `n` must be `1..=9`.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u8) -> io::Result<()> {
    debug_assert!((1..=MAX_STEP).contains(&n));
    w.write_all(&[ESC, b'[', b'0' + n, b'C'])
}

/// Move the cursor `n` columns left (CUB). `n` must be `1..=9`.
#[inline]
pub fn cursor_back(w: &mut impl Write, n: u8) -> io::Result<()> {
    debug_assert!((1..=MAX_STEP).contains(&n));
    w.write_all(&[ESC, b'[', b'0' + n, b'D'])
}

/// Move the cursor `diff` columns: positive is right, negative is left.
///
/// Emitted as full nine-column steps followed by one remainder step, e.g.
/// `-20` becomes `CUB 9, CUB 9, CUB 2`. Zero emits nothing.
pub fn move_columns(w: &mut impl Write, diff: isize) -> io::Result<()> {
    let forward = diff > 0;
    let mut remaining = diff.unsigned_abs();
    let max = usize::from(MAX_STEP);

    while remaining > max {
        step(w, forward, MAX_STEP)?;
        remaining -= max;
    }

    if remaining > 0 {
        #[allow(clippy::cast_possible_truncation)] // remaining <= 9.
        step(w, forward, remaining as u8)?;
    }

    Ok(())
}

#[inline]
fn step(w: &mut impl Write, forward: bool, n: u8) -> io::Result<()> {
    if forward {
        cursor_forward(w, n)
    } else {
        cursor_back(w, n)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
