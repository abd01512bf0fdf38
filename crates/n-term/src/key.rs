// SPDX-License-Identifier: MIT
//
// Key codes — the byte encodings a key binding matches against.
//
// A line editor in raw mode sees keys as byte strings. Three shapes cover
// everything the default bindings need:
//
//   Char(b)    a literal byte            Tab = 0x09, Backspace = 0x7F
//   Ctrl(c)    c & 0x1F                  C-a = 0x01, C-j = 0x0A
//   Csi(p)     ESC [ followed by p       Left = ESC [ D, Delete = ESC [ 3 ~
//
// Matching is a plain byte-prefix test against the queued input. Nothing
// here knows about actions; the editor pairs key codes with them.

use std::borrow::Cow;
use std::fmt;

use crate::ansi::ESC;

/// Horizontal tab (0x09).
pub const TAB: u8 = 0x09;

/// DEL (0x7F), sent by the Backspace key on most terminals.
pub const BACKSPACE: u8 = 0x7F;

/// Mask that maps a letter to its control code.
const CTRL_MASK: u8 = 0x1F;

/// The raw encoding of one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A literal byte.
    Char(u8),
    /// A control key, named by its letter (`Ctrl(b'a')` is C-a, byte 0x01).
    Ctrl(u8),
    /// A CSI sequence: `ESC [` followed by the payload.
    Csi(Cow<'static, str>),
}

impl KeyCode {
    /// Control key for `letter`.
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::Ctrl(letter)
    }

    /// CSI sequence with the given payload (`"D"`, `"3~"`, …).
    #[must_use]
    pub fn csi(payload: impl Into<Cow<'static, str>>) -> Self {
        Self::Csi(payload.into())
    }

    /// The bytes a terminal sends for this key.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Char(b) => vec![*b],
            Self::Ctrl(c) => vec![c & CTRL_MASK],
            Self::Csi(payload) => {
                let mut bytes = Vec::with_capacity(2 + payload.len());
                bytes.extend_from_slice(&[ESC, b'[']);
                bytes.extend_from_slice(payload.as_bytes());
                bytes
            }
        }
    }

    /// If `input` starts with this key's encoding, the encoding's length.
    ///
    /// Input shorter than the encoding never matches.
    #[must_use]
    pub fn match_len(&self, input: &[u8]) -> Option<usize> {
        match self {
            Self::Char(b) => (input.first() == Some(b)).then_some(1),
            Self::Ctrl(c) => (input.first() == Some(&(c & CTRL_MASK))).then_some(1),
            Self::Csi(payload) => {
                let rest = input.strip_prefix(&[ESC, b'['])?;
                rest.starts_with(payload.as_bytes())
                    .then_some(2 + payload.len())
            }
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(BACKSPACE) => f.write_str("Backspace"),
            Self::Char(TAB) => f.write_str("Tab"),
            Self::Char(b) => write!(f, "{}", char::from(*b)),
            Self::Ctrl(c) => write!(f, "C-{}", char::from(*c)),
            Self::Csi(payload) => write!(f, "CSI-{payload}"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
