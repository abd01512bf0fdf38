// SPDX-License-Identifier: MIT
//
// n-term — Terminal control for n-line.
//
// The terminal-facing half of the line editor: raw-mode entry and restore
// over termios, the byte encodings of bound keys, the handful of ANSI
// sequences a single-line editor emits, and the decoder that turns unbound
// input bytes into literal text.
//
// Everything is done with raw termios and hand-written escape sequences,
// no TUI framework underneath.

pub mod ansi;
pub mod input;
pub mod key;
pub mod terminal;
