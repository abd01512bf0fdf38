//! Editor options.
//!
//! The line editor has no configuration file. Everything tunable lives in
//! [`Options`], passed to [`Editor::with_options`](crate::editor::Editor::with_options):
//!
//! | Option       | Default | Meaning                                   |
//! |--------------|---------|-------------------------------------------|
//! | `prompt`     | `""`    | Written before the line on every redraw   |
//! | `read_chunk` | `64`    | Bytes requested per blocking device read  |

use n_term::input::READ_CHUNK;

/// Tunables for an [`Editor`](crate::editor::Editor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Prompt written at the start of each read and after interleaved output.
    pub prompt: String,
    /// Bytes requested per device read. Zero is treated as one.
    pub read_chunk: usize,
}

impl Options {
    /// Builder-style prompt override.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder-style read chunk override.
    #[must_use]
    pub const fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            read_chunk: READ_CHUNK,
        }
    }
}
