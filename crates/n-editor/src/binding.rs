//! Key bindings — what each bound key does to the line.
//!
//! A [`Binding`] pairs a [`KeyCode`] with an [`Action`]. The editor keeps its
//! bindings in registration order and runs the first one whose key matches
//! the front of the input, so an earlier binding for a key always wins over
//! a later one.
//!
//! Actions are plain functions over the editor. They report how reading
//! should go on through a [`Signal`]; real failures are `Err`.
//!
//! # Default bindings
//!
//! | Key            | Action         |
//! |----------------|----------------|
//! | C-a            | `start`        |
//! | C-b, Left      | `back`         |
//! | C-e            | `end`          |
//! | C-f, Right     | `forward`      |
//! | C-d            | `end_of_input` |
//! | C-j, C-m       | `end_of_line`  |
//! | C-k            | `kill`         |
//! | C-y            | `yank`         |
//! | C-h, Backspace | `backspace`    |
//! | Delete         | `delete`       |
//! | Tab            | `complete`     |

use std::fmt;
use std::io::{SeekFrom, Write};

use n_term::key::{BACKSPACE, KeyCode, TAB};
use n_term::terminal::Device;

use crate::complete::{common_extension, format_candidates};
use crate::editor::Editor;
use crate::error::Result;

/// How the read loop continues after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep reading keys.
    Continue,
    /// The line is finished.
    Submit,
    /// The user asked to stop reading altogether.
    EndOfInput,
}

/// A key handler. Receives the key that triggered it.
pub type Action<D, W> = fn(&KeyCode, &mut Editor<D, W>) -> Result<Signal>;

/// A key code and the action it runs.
pub struct Binding<D, W> {
    pub key: KeyCode,
    /// Action name, for logs.
    pub name: &'static str,
    pub action: Action<D, W>,
}

impl<D, W> Binding<D, W> {
    pub const fn new(key: KeyCode, name: &'static str, action: Action<D, W>) -> Self {
        Self { key, name, action }
    }
}

impl<D, W> Clone for Binding<D, W> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            name: self.name,
            action: self.action,
        }
    }
}

impl<D, W> fmt::Debug for Binding<D, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The standard emacs-style set, in match order.
#[must_use]
pub fn default_bindings<D: Device, W: Write>() -> Vec<Binding<D, W>> {
    vec![
        Binding::new(KeyCode::ctrl(b'a'), "start", start),
        Binding::new(KeyCode::ctrl(b'b'), "back", back),
        Binding::new(KeyCode::csi("D"), "back", back),
        Binding::new(KeyCode::ctrl(b'e'), "end", end),
        Binding::new(KeyCode::ctrl(b'f'), "forward", forward),
        Binding::new(KeyCode::csi("C"), "forward", forward),
        Binding::new(KeyCode::ctrl(b'd'), "end_of_input", end_of_input),
        Binding::new(KeyCode::ctrl(b'j'), "end_of_line", end_of_line),
        Binding::new(KeyCode::ctrl(b'm'), "end_of_line", end_of_line),
        Binding::new(KeyCode::ctrl(b'k'), "kill", kill),
        Binding::new(KeyCode::ctrl(b'y'), "yank", yank),
        Binding::new(KeyCode::ctrl(b'h'), "backspace", backspace),
        Binding::new(KeyCode::Char(BACKSPACE), "backspace", backspace),
        Binding::new(KeyCode::csi("3~"), "delete", delete),
        Binding::new(KeyCode::Char(TAB), "complete", complete),
    ]
}

// ─── Motion ─────────────────────────────────────────────────────────────────

/// Move to the start of the line.
///
/// # Errors
///
/// Terminal write failures.
pub fn start<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    ed.seek(SeekFrom::Start(0))?;
    Ok(Signal::Continue)
}

/// Move one char left.
///
/// # Errors
///
/// Terminal write failures.
pub fn back<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    ed.seek(SeekFrom::Current(-1))?;
    Ok(Signal::Continue)
}

/// Move to the end of the line.
///
/// # Errors
///
/// Terminal write failures.
pub fn end<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    ed.seek(SeekFrom::End(0))?;
    Ok(Signal::Continue)
}

/// Move one char right.
///
/// # Errors
///
/// Terminal write failures.
pub fn forward<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    ed.seek(SeekFrom::Current(1))?;
    Ok(Signal::Continue)
}

// ─── Termination ────────────────────────────────────────────────────────────

/// Stop reading; the line ends with [`Signal::EndOfInput`].
///
/// # Errors
///
/// Never fails.
pub fn end_of_input<D: Device, W: Write>(_: &KeyCode, _: &mut Editor<D, W>) -> Result<Signal> {
    Ok(Signal::EndOfInput)
}

/// Submit the line.
///
/// # Errors
///
/// Never fails.
pub fn end_of_line<D: Device, W: Write>(_: &KeyCode, _: &mut Editor<D, W>) -> Result<Signal> {
    Ok(Signal::Submit)
}

// ─── Editing ────────────────────────────────────────────────────────────────

/// Cut from the cursor to the end of the line into the kill register.
///
/// # Errors
///
/// Terminal write failures.
pub fn kill<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    let width = ed.line().after_len();
    ed.seek(SeekFrom::End(0))?;
    let killed = ed.delete(width)?;
    ed.kill_register_mut().kill(killed);
    Ok(Signal::Continue)
}

/// Insert the kill register at the cursor.
///
/// # Errors
///
/// Terminal write failures.
pub fn yank<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    if !ed.kill_register().is_empty() {
        let text = ed.kill_register().content().to_owned();
        ed.insert(&text)?;
    }
    Ok(Signal::Continue)
}

/// Delete the char before the cursor.
///
/// # Errors
///
/// Terminal write failures.
pub fn backspace<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    ed.delete(1)?;
    Ok(Signal::Continue)
}

/// Delete the char under the cursor. Does nothing at the end of the line.
///
/// # Errors
///
/// Terminal write failures.
pub fn delete<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    let pos = ed.line().pos();
    if ed.seek(SeekFrom::Current(1))? != pos {
        ed.delete(1)?;
    }
    Ok(Signal::Continue)
}

/// Complete the word before the cursor.
///
/// Inserts the extension all candidates share; if there is none, lists the
/// candidates above the line. No completer, no effect.
///
/// # Errors
///
/// Terminal write and attribute failures.
pub fn complete<D: Device, W: Write>(_: &KeyCode, ed: &mut Editor<D, W>) -> Result<Signal> {
    let Some(completer) = ed.completer() else {
        return Ok(Signal::Continue);
    };
    let completion = completer.complete(ed.line());

    let extension = common_extension(&completion.word, &completion.candidates);
    if !extension.is_empty() {
        ed.insert(&extension)?;
    } else if !completion.candidates.is_empty() {
        let listing = format_candidates(&completion.word, &completion.candidates);
        ed.print(format_args!("{listing}"))?;
    }
    Ok(Signal::Continue)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
