//! The line editor.
//!
//! An [`Editor`] ties together the terminal session, the screen and the
//! input queue. [`Editor::read_line`] enters raw mode, writes the prompt and
//! runs the dispatch loop until an action submits the line or input ends:
//!
//! ```text
//!   queue empty ──► read(device) ──► 0 bytes ──► EndOfInput
//!        │
//!        ▼
//!   binding match? ──yes──► consume, run action ──► Signal
//!        │ no
//!        ▼
//!   decode ──► Text     insert on screen
//!          ──► Discard  drop unbound control input
//!          ──► Incomplete  read more
//!          ──► Invalid  Error::InvalidUtf8
//! ```
//!
//! Raw mode is scoped to the call. The terminal is restored on every exit
//! path, including errors and unwinding. Bytes typed ahead of a submitted
//! line stay queued for the next call.

use std::fmt;
use std::io::{SeekFrom, Write};

use n_term::input::{Decoded, InputQueue, decode};
use n_term::key::KeyCode;
use n_term::terminal::{Device, TerminalSession};
use tracing::{debug, trace, warn};

use crate::binding::{Action, Binding, Signal, default_bindings};
use crate::buffer::LineBuffer;
use crate::complete::Completer;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::register::KillRegister;
use crate::screen::Screen;

/// Why [`Editor::read_line`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The user submitted the line.
    Submitted,
    /// The device reached end-of-input, or the user asked to stop.
    EndOfInput,
}

/// A finished line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub end: Termination,
}

/// An interactive line editor reading from `D` and drawing on `W`.
pub struct Editor<D, W> {
    session: TerminalSession<D>,
    screen: Screen<W>,
    input: InputQueue,
    bindings: Vec<Binding<D, W>>,
    kill: KillRegister,
    completer: Option<Box<dyn Completer>>,
    read_chunk: usize,
}

impl<D: Device, W: Write> Editor<D, W> {
    /// Create an editor with default options and the default bindings.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if `device` is not an interactive terminal.
    pub fn new(device: D, out: W) -> Result<Self> {
        Self::with_options(device, out, Options::default())
    }

    /// Create an editor with the given options and the default bindings.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if `device` is not an interactive terminal.
    pub fn with_options(device: D, out: W, options: Options) -> Result<Self> {
        if !device.is_interactive() {
            return Err(Error::NotATerminal);
        }

        let mut editor = Self {
            session: TerminalSession::new(device),
            screen: Screen::new(out, options.prompt),
            input: InputQueue::new(),
            bindings: Vec::new(),
            kill: KillRegister::new(),
            completer: None,
            read_chunk: options.read_chunk.max(1),
        };
        editor.bind_set(default_bindings());
        Ok(editor)
    }

    // ── Configuration ───────────────────────────────────────────────

    /// Bind `key` to `action`, after every existing binding.
    pub fn bind(&mut self, key: KeyCode, name: &'static str, action: Action<D, W>) {
        debug!(key = %key, action = name, "binding registered");
        self.bindings.push(Binding::new(key, name, action));
    }

    /// Append a list of bindings, keeping their order.
    pub fn bind_set(&mut self, bindings: impl IntoIterator<Item = Binding<D, W>>) {
        for binding in bindings {
            self.bind(binding.key, binding.name, binding.action);
        }
    }

    /// Registered bindings, in match order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding<D, W>] {
        &self.bindings
    }

    /// Replace the prompt.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.screen.set_prompt(prompt);
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.screen.prompt()
    }

    /// Install the completer used by the Tab action.
    pub fn set_completer(&mut self, completer: impl Completer + 'static) {
        self.completer = Some(Box::new(completer));
    }

    #[must_use]
    pub fn completer(&self) -> Option<&dyn Completer> {
        self.completer.as_deref()
    }

    // ── Line access for actions ─────────────────────────────────────

    /// The line being edited.
    #[must_use]
    pub const fn line(&self) -> &LineBuffer {
        self.screen.line()
    }

    /// Move the cursor, clamped to the line. Returns the new position.
    ///
    /// # Errors
    ///
    /// Terminal write failures.
    pub fn seek(&mut self, from: SeekFrom) -> Result<usize> {
        Ok(self.screen.seek(from)?)
    }

    /// Insert `text` at the cursor.
    ///
    /// # Errors
    ///
    /// Terminal write failures.
    pub fn insert(&mut self, text: &str) -> Result<()> {
        Ok(self.screen.insert(text)?)
    }

    /// Delete up to `n` chars before the cursor and return them.
    ///
    /// # Errors
    ///
    /// Terminal write failures.
    pub fn delete(&mut self, n: usize) -> Result<String> {
        Ok(self.screen.delete(n)?)
    }

    /// Write formatted output above the edit line and redraw the line.
    ///
    /// # Errors
    ///
    /// Terminal write and attribute failures.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        Ok(self.screen.print(&mut self.session, args)?)
    }

    #[must_use]
    pub const fn kill_register(&self) -> &KillRegister {
        &self.kill
    }

    pub const fn kill_register_mut(&mut self) -> &mut KillRegister {
        &mut self.kill
    }

    /// The terminal session wrapping the input device.
    #[must_use]
    pub const fn session(&self) -> &TerminalSession<D> {
        &self.session
    }

    /// The output sink.
    #[must_use]
    pub const fn writer(&self) -> &W {
        self.screen.writer()
    }

    pub const fn writer_mut(&mut self) -> &mut W {
        self.screen.writer_mut()
    }

    // ── Reading ─────────────────────────────────────────────────────

    /// Read one line.
    ///
    /// The terminal is in raw mode for the duration of the call. Whatever
    /// ends the loop, the cursor moves to a fresh line and the buffer is
    /// emptied before returning.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUtf8`] for malformed input, [`Error::Io`] for device
    /// and terminal failures. The terminal is restored first.
    pub fn read_line(&mut self) -> Result<Line> {
        let mut raw = RawMode::enter(self)?;

        let end = raw
            .editor
            .screen
            .write_prompt()
            .map_err(Error::from)
            .and_then(|()| raw.editor.run());
        let text = raw.editor.screen.flush();
        let restored = raw.leave();

        let end = end?;
        let text = text?;
        restored?;
        Ok(Line { text, end })
    }

    fn run(&mut self) -> Result<Termination> {
        loop {
            match self.step()? {
                Step::Done(Signal::Continue) => {}
                Step::Done(Signal::Submit) => return Ok(Termination::Submitted),
                Step::Done(Signal::EndOfInput) => return Ok(Termination::EndOfInput),
                Step::NeedInput => {
                    let n = self
                        .input
                        .fill_from(self.session.device_mut(), self.read_chunk)?;
                    if n == 0 {
                        return Ok(Termination::EndOfInput);
                    }
                }
            }
        }
    }

    /// Handle the key or char at the front of the queue.
    fn step(&mut self) -> Result<Step> {
        if self.input.is_empty() {
            return Ok(Step::NeedInput);
        }

        let input = self.input.bytes();
        let matched = self
            .bindings
            .iter()
            .find_map(|b| b.key.match_len(input).map(|len| (len, b.clone())));

        if let Some((len, binding)) = matched {
            self.input.consume(len);
            trace!(key = %binding.key, action = binding.name, "dispatch");
            return (binding.action)(&binding.key, self).map(Step::Done);
        }

        match decode(self.input.bytes()) {
            Decoded::Incomplete => Ok(Step::NeedInput),
            Decoded::Discard(len) => {
                self.input.consume(len);
                Ok(Step::Done(Signal::Continue))
            }
            Decoded::Text(ch, len) => {
                self.input.consume(len);
                let mut utf8 = [0u8; 4];
                self.screen.insert(ch.encode_utf8(&mut utf8))?;
                Ok(Step::Done(Signal::Continue))
            }
            Decoded::Invalid(len) => {
                let bytes = self.input.bytes()[..len].to_vec();
                self.input.consume(len);
                warn!(?bytes, "invalid UTF-8 in input");
                Err(Error::InvalidUtf8 { bytes })
            }
        }
    }
}

impl<D, W> fmt::Debug for Editor<D, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("session", &self.session)
            .field("screen", &self.screen)
            .field("queued", &self.input.len())
            .field("bindings", &self.bindings.len())
            .field("kill", &self.kill)
            .field("completer", &self.completer.is_some())
            .finish_non_exhaustive()
    }
}

/// Outcome of one dispatch step.
enum Step {
    /// The queue holds no complete key or char.
    NeedInput,
    Done(Signal),
}

// ─── Raw mode guard ─────────────────────────────────────────────────────────

/// Holds the terminal in raw mode while alive.
struct RawMode<'a, D: Device, W: Write> {
    editor: &'a mut Editor<D, W>,
    active: bool,
}

impl<'a, D: Device, W: Write> RawMode<'a, D, W> {
    fn enter(editor: &'a mut Editor<D, W>) -> Result<Self> {
        editor.session.attach()?;
        Ok(Self {
            editor,
            active: true,
        })
    }

    /// Restore the terminal and report whether that worked.
    fn leave(mut self) -> Result<()> {
        self.active = false;
        Ok(self.editor.session.detach()?)
    }
}

impl<D: Device, W: Write> Drop for RawMode<'_, D, W> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.editor.session.detach();
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::{self, Read};

    use n_term::terminal::Attributes;

    use crate::complete::ListCompleter;

    /// Terminal fake: scripted reads, recorded attribute changes.
    struct FakeTty {
        reads: VecDeque<io::Result<Vec<u8>>>,
        current: RefCell<Attributes>,
        applied: RefCell<Vec<Attributes>>,
        interactive: bool,
    }

    impl FakeTty {
        fn new(reads: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                reads: reads.into(),
                current: RefCell::new(cooked()),
                applied: RefCell::new(Vec::new()),
                interactive: true,
            }
        }
    }

    impl Read for FakeTty {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.reads.push_front(Ok(chunk.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }

    impl Device for FakeTty {
        fn attributes(&self) -> io::Result<Attributes> {
            if self.interactive {
                Ok(*self.current.borrow())
            } else {
                Err(io::Error::from_raw_os_error(libc::ENOTTY))
            }
        }

        fn set_attributes(&self, attrs: &Attributes) -> io::Result<()> {
            self.applied.borrow_mut().push(*attrs);
            *self.current.borrow_mut() = *attrs;
            Ok(())
        }
    }

    fn cooked() -> Attributes {
        Attributes::from_flags(
            libc::ICRNL | libc::IXON,
            libc::OPOST,
            libc::CS8,
            libc::ECHO | libc::ICANON | libc::ISIG,
        )
    }

    fn editor(reads: &[&[u8]]) -> Editor<FakeTty, Vec<u8>> {
        let reads = reads.iter().map(|r| Ok(r.to_vec())).collect();
        Editor::with_options(
            FakeTty::new(reads),
            Vec::new(),
            Options::default().with_prompt("> "),
        )
        .unwrap()
    }

    fn output(ed: &Editor<FakeTty, Vec<u8>>) -> String {
        String::from_utf8(ed.writer().clone()).unwrap()
    }

    fn restored(ed: &Editor<FakeTty, Vec<u8>>) -> bool {
        !ed.session().is_attached() && *ed.session().device().current.borrow() == cooked()
    }

    fn submitted(text: &str) -> Line {
        Line {
            text: text.into(),
            end: Termination::Submitted,
        }
    }

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn refuses_non_terminal() {
        let mut tty = FakeTty::new(Vec::new());
        tty.interactive = false;
        assert!(matches!(
            Editor::new(tty, Vec::new()),
            Err(Error::NotATerminal)
        ));
    }

    #[test]
    fn construction_leaves_terminal_alone() {
        let ed = editor(&[]);
        assert!(ed.session().device().applied.borrow().is_empty());
        assert_eq!(ed.prompt(), "> ");
        assert_eq!(ed.bindings().len(), 15);
    }

    // ── Reading ─────────────────────────────────────────────────────

    #[test]
    fn typing_with_cursor_motion_exact_output() {
        let mut ed = editor(&[b"ab\x02c\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("acb"));
        assert_eq!(
            output(&ed),
            "> \x1b[Ka\x1b[Kb\x1b[1D\x1b[Kcb\x1b[1D\n\r\x1b[K"
        );
    }

    #[test]
    fn raw_mode_only_during_read() {
        let mut ed = editor(&[b"x\r"]);
        assert_eq!(ed.read_line().unwrap(), submitted("x"));

        let applied = ed.session().device().applied.borrow().clone();
        assert_eq!(applied, vec![cooked().raw(), cooked()]);
        assert!(restored(&ed));
    }

    #[test]
    fn end_of_input_on_eof() {
        let mut ed = editor(&[b"ab"]);
        let line = ed.read_line().unwrap();
        assert_eq!(line.text, "ab");
        assert_eq!(line.end, Termination::EndOfInput);
        assert!(restored(&ed));
    }

    #[test]
    fn end_of_input_on_ctrl_d() {
        let mut ed = editor(&[b"ab\x04cd\n"]);
        let line = ed.read_line().unwrap();
        assert_eq!(line.end, Termination::EndOfInput);
        assert_eq!(line.text, "ab");

        assert_eq!(ed.read_line().unwrap(), submitted("cd"));
    }

    #[test]
    fn kill_and_yank_across_lines() {
        let mut ed = editor(&[b"hello world\x01\x06\x06\x06\x06\x06\x0b\n\x19\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("hello"));
        assert_eq!(ed.kill_register().content(), " world");
        assert_eq!(ed.read_line().unwrap(), submitted(" world"));
    }

    #[test]
    fn forward_delete_sequence() {
        let mut ed = editor(&[b"abc\x02\x02\x1b[3~\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("ac"));
    }

    #[test]
    fn backspace_keys() {
        let mut ed = editor(&[b"abc\x7f\x08\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("a"));
    }

    #[test]
    fn arrow_keys_move_cursor() {
        let mut ed = editor(&[b"ac\x1b[Db\x1b[C!\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("abc!"));
    }

    #[test]
    fn unbound_input_is_skipped() {
        let mut ed = editor(&[b"a\x1b[1;5C\x07\x1bxb\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("ab"));
    }

    #[test]
    fn multibyte_text() {
        let mut ed = editor(&["åäö\x02x\n".as_bytes()]);
        assert_eq!(ed.read_line().unwrap(), submitted("åäxö"));
    }

    // ── Split input ─────────────────────────────────────────────────

    #[test]
    fn escape_sequence_split_across_reads() {
        let mut ed = editor(&[b"ab", b"\x1b", b"[", b"D", b"c\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("acb"));
    }

    #[test]
    fn utf8_split_across_reads() {
        let mut ed = editor(&[b"\xc3", b"\xa5\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("å"));
    }

    #[test]
    fn tiny_read_chunk() {
        let tty = FakeTty::new(vec![Ok("hé\x1b[3~\x02\x1b[3~\n".as_bytes().to_vec())]);
        let mut ed =
            Editor::with_options(tty, Vec::new(), Options::default().with_read_chunk(1)).unwrap();
        assert_eq!(ed.read_line().unwrap(), submitted("h"));
    }

    #[test]
    fn typed_ahead_bytes_kept_for_next_line() {
        let mut ed = editor(&[b"one\ntwo\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("one"));
        assert_eq!(ed.read_line().unwrap(), submitted("two"));
        let line = ed.read_line().unwrap();
        assert_eq!(line.end, Termination::EndOfInput);
        assert_eq!(line.text, "");
    }

    // ── Failures ────────────────────────────────────────────────────

    #[test]
    fn invalid_utf8_restores_terminal() {
        let mut ed = editor(&[b"a\xff"]);
        match ed.read_line() {
            Err(Error::InvalidUtf8 { bytes }) => assert_eq!(bytes, vec![0xff]),
            other => panic!("expected invalid UTF-8, got {other:?}"),
        }
        assert!(restored(&ed));
        assert!(ed.line().is_empty());
    }

    #[test]
    fn read_error_restores_terminal() {
        let tty = FakeTty::new(vec![Ok(b"a".to_vec()), Err(io::Error::other("hangup"))]);
        let mut ed = Editor::new(tty, Vec::new()).unwrap();
        assert!(matches!(ed.read_line(), Err(Error::Io(_))));
        assert!(restored(&ed));
    }

    #[test]
    fn interrupted_read_is_retried() {
        let tty = FakeTty::new(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(b"ok\n".to_vec()),
        ]);
        let mut ed = Editor::new(tty, Vec::new()).unwrap();
        assert_eq!(ed.read_line().unwrap(), submitted("ok"));
    }

    // ── Bindings ────────────────────────────────────────────────────

    fn shout(_: &KeyCode, ed: &mut Editor<FakeTty, Vec<u8>>) -> Result<Signal> {
        ed.insert("!")?;
        Ok(Signal::Continue)
    }

    #[test]
    fn custom_binding_runs() {
        let mut ed = editor(&[b"hi\x15\n"]);
        ed.bind(KeyCode::ctrl(b'u'), "shout", shout);
        assert_eq!(ed.read_line().unwrap(), submitted("hi!"));
    }

    #[test]
    fn later_binding_does_not_shadow_earlier() {
        let mut ed = editor(&[b"hi\x01x\n"]);
        ed.bind(KeyCode::ctrl(b'a'), "shout", shout);
        assert_eq!(ed.read_line().unwrap(), submitted("xhi"));
    }

    // ── Completion and printing ─────────────────────────────────────

    #[test]
    fn tab_completes_then_lists() {
        let mut ed = editor(&[b"fo\t\t\n"]);
        ed.set_completer(ListCompleter::new(["foo", "food", "fool"]));

        assert_eq!(ed.read_line().unwrap(), submitted("foo"));
        let out = output(&ed);
        assert!(out.contains("\r\x1b[Kfoo\x1b[1m \x1b[0m\nfoo\x1b[1md\x1b[0m \n"));
        assert!(out.contains("foo\x1b[1ml\x1b[0m \n> foo"));
        // attach, detach and attach around the listing, final detach.
        assert_eq!(ed.session().device().applied.borrow().len(), 4);
        assert!(restored(&ed));
    }

    #[test]
    fn tab_without_completer_is_ignored() {
        let mut ed = editor(&[b"a\tb\n"]);
        assert_eq!(ed.read_line().unwrap(), submitted("ab"));
    }

    #[test]
    fn print_outside_read_line() {
        let mut ed = editor(&[]);
        ed.print(format_args!("note {}\n", 1)).unwrap();
        assert_eq!(output(&ed), "\r\x1b[Knote 1\n> ");
        assert!(ed.session().device().applied.borrow().is_empty());
    }
}
