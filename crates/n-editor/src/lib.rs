//! # n-editor — Line editing core for n-line
//!
//! This crate turns a raw-mode terminal into a single-line editor:
//!
//! - **[`buffer`]** — `LineBuffer`, the text and its char-indexed cursor
//! - **[`screen`]** — keeps the terminal display in step with the buffer
//! - **[`binding`]** — key bindings, their actions, and the default set
//! - **[`complete`]** — Tab completion and candidate listing
//! - **[`register`]** — the kill register behind `C-k` / `C-y`
//! - **[`editor`]** — `Editor`, the read loop tying it all together
//! - **[`options`]** / **[`error`]** — configuration and error types
//!
//! Terminal attributes, key encodings and input decoding come from n-term.

pub mod binding;
pub mod buffer;
pub mod complete;
pub mod editor;
pub mod error;
pub mod options;
pub mod register;
pub mod screen;
