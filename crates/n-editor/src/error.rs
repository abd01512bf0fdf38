//! Errors returned by the line editor.
//!
//! End-of-line and end-of-input are not errors: they are
//! [`Signal`](crate::binding::Signal)s returned by actions and surface as a
//! [`Termination`](crate::editor::Termination) on the finished line.

use std::io;

/// Everything that can stop an [`Editor`](crate::editor::Editor).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input device is not an interactive terminal; raw mode is
    /// meaningless, so no editor is constructed.
    #[error("input is not an interactive terminal")]
    NotATerminal,

    /// A byte sequence where a character was expected is not valid UTF-8.
    #[error("input is not valid UTF-8: {bytes:02x?}")]
    InvalidUtf8 {
        /// The offending bytes, already removed from the input queue.
        bytes: Vec<u8>,
    },

    /// Reading the device or writing the terminal failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Shorthand for results carrying an editor [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::NotATerminal.to_string(),
            "input is not an interactive terminal"
        );
        assert_eq!(
            Error::InvalidUtf8 { bytes: vec![0xff, 0x41] }.to_string(),
            "input is not valid UTF-8: [ff, 41]"
        );
    }

    #[test]
    fn io_error_is_transparent() {
        let err = Error::from(io::Error::other("device gone"));
        assert_eq!(err.to_string(), "device gone");
        assert!(matches!(err, Error::Io(_)));
    }
}
