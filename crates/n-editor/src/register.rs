//! Kill register — storage for the last killed span.
//!
//! `C-k` kills from the cursor to the end of the line into the register,
//! replacing whatever was there. `C-y` yanks it back at the cursor. Yanking
//! reads the register without clearing it, so repeated yanks insert the same
//! text again. The register outlives individual lines.

/// A single-slot register holding killed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillRegister {
    /// The stored text. Empty until something is killed.
    content: String,
}

impl KillRegister {
    /// Create an empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Store text, replacing any previous content.
    pub fn kill(&mut self, text: String) {
        self.content = text;
    }

    /// The stored text. Empty if nothing has been killed.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if there is nothing to yank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
