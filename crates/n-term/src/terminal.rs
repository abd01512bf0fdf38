// SPDX-License-Identifier: MIT
//
// Terminal control — line-discipline attributes, raw mode, and restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and isatty. These are the standard POSIX interfaces for
// terminal control; there is no safe alternative. Each unsafe block is
// minimal and documented.
#![allow(unsafe_code)]
//
// A line editor only needs one thing from the terminal: byte-at-a-time
// input with no local echo, no line buffering and no signal generation.
// `TerminalSession` snapshots the device's attributes on `attach()`, applies
// the cfmakeraw equivalent, and puts the snapshot back on `detach()`.
//
// Output processing (OPOST) stays on. Text written while attached still
// gets the terminal's usual newline translation, so anything printed between
// edits lands at column zero.
//
// The device is abstracted behind [`Device`] so the session (and everything
// above it) can run against an in-memory fake in tests. Real implementations
// exist for `std::fs::File` (e.g. `/dev/tty`) and `std::io::Stdin`.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};

use tracing::debug;

// ─── Attributes ─────────────────────────────────────────────────────────────

/// A snapshot of a terminal's line-discipline settings (`struct termios`).
#[derive(Clone, Copy)]
pub struct Attributes(libc::termios);

impl Attributes {
    /// Build an attribute set from the four flag words, with every control
    /// character zeroed.
    ///
    /// Real attribute sets come from [`Device::attributes`]; this exists for
    /// devices that are not backed by a file descriptor.
    #[must_use]
    pub fn from_flags(
        input: libc::tcflag_t,
        output: libc::tcflag_t,
        control: libc::tcflag_t,
        local: libc::tcflag_t,
    ) -> Self {
        // SAFETY: termios is a plain C struct of integers and arrays; the
        // all-zero bit pattern is a valid value.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        termios.c_iflag = input;
        termios.c_oflag = output;
        termios.c_cflag = control;
        termios.c_lflag = local;
        Self(termios)
    }

    /// Input mode flags (`c_iflag`).
    #[inline]
    #[must_use]
    pub const fn input_flags(&self) -> libc::tcflag_t {
        self.0.c_iflag
    }

    /// Output mode flags (`c_oflag`).
    #[inline]
    #[must_use]
    pub const fn output_flags(&self) -> libc::tcflag_t {
        self.0.c_oflag
    }

    /// Control mode flags (`c_cflag`).
    #[inline]
    #[must_use]
    pub const fn control_flags(&self) -> libc::tcflag_t {
        self.0.c_cflag
    }

    /// Local mode flags (`c_lflag`).
    #[inline]
    #[must_use]
    pub const fn local_flags(&self) -> libc::tcflag_t {
        self.0.c_lflag
    }

    /// Derive the raw-mode variant of these attributes.
    ///
    /// cfmakeraw equivalent, minus the output-processing change: break,
    /// parity, strip, CR/NL translation and flow control off on input; echo,
    /// canonical mode, signals and extended processing off locally; 8-bit
    /// characters with no parity. `VMIN=1, VTIME=0` makes `read()` block until
    /// at least one byte is available.
    #[must_use]
    pub fn raw(&self) -> Self {
        let mut termios = self.0;

        termios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
        termios.c_cflag |= libc::CS8;

        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        Self(termios)
    }

    /// The underlying `termios` value.
    #[inline]
    #[must_use]
    pub const fn as_termios(&self) -> &libc::termios {
        &self.0
    }
}

impl From<libc::termios> for Attributes {
    fn from(termios: libc::termios) -> Self {
        Self(termios)
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.0.c_iflag == other.0.c_iflag
            && self.0.c_oflag == other.0.c_oflag
            && self.0.c_cflag == other.0.c_cflag
            && self.0.c_lflag == other.0.c_lflag
            && self.0.c_cc == other.0.c_cc
    }
}

impl Eq for Attributes {}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("iflag", &format_args!("{:#o}", self.0.c_iflag))
            .field("oflag", &format_args!("{:#o}", self.0.c_oflag))
            .field("cflag", &format_args!("{:#o}", self.0.c_cflag))
            .field("lflag", &format_args!("{:#o}", self.0.c_lflag))
            .finish_non_exhaustive()
    }
}

// ─── File Descriptor Queries ────────────────────────────────────────────────

/// Read the line-discipline attributes of `fd` via `tcgetattr`.
///
/// # Errors
///
/// Fails with the OS error (typically `ENOTTY`) if `fd` is not a terminal.
pub fn get_attributes(fd: RawFd) -> io::Result<Attributes> {
    // SAFETY: zeroed termios is a valid out-parameter; tcgetattr fills it.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(Attributes(termios))
}

/// Apply `attrs` to `fd` immediately (`TCSANOW`).
///
/// Pending input is not flushed, so keys typed ahead of the switch are
/// still read afterwards.
///
/// # Errors
///
/// Returns the OS error if `tcsetattr` fails.
pub fn set_attributes(fd: RawFd, attrs: &Attributes) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, attrs.as_termios()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Check whether `fd` is connected to a terminal (TTY).
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

// ─── Device ─────────────────────────────────────────────────────────────────

/// An input device whose line discipline can be queried and changed.
///
/// Reads are blocking. A read returning `Ok(0)` means the peer hung up.
pub trait Device: Read {
    /// Current line-discipline attributes.
    ///
    /// # Errors
    ///
    /// Fails if the device does not support the query (not a terminal).
    fn attributes(&self) -> io::Result<Attributes>;

    /// Replace the line-discipline attributes.
    ///
    /// # Errors
    ///
    /// Fails if the device rejects the new attributes.
    fn set_attributes(&self, attrs: &Attributes) -> io::Result<()>;

    /// Whether this device is an interactive terminal.
    fn is_interactive(&self) -> bool {
        self.attributes().is_ok()
    }
}

impl Device for File {
    fn attributes(&self) -> io::Result<Attributes> {
        get_attributes(self.as_raw_fd())
    }

    fn set_attributes(&self, attrs: &Attributes) -> io::Result<()> {
        set_attributes(self.as_raw_fd(), attrs)
    }
}

impl Device for io::Stdin {
    fn attributes(&self) -> io::Result<Attributes> {
        get_attributes(self.as_raw_fd())
    }

    fn set_attributes(&self, attrs: &Attributes) -> io::Result<()> {
        set_attributes(self.as_raw_fd(), attrs)
    }
}

// ─── TerminalSession ────────────────────────────────────────────────────────

/// Owns an input [`Device`] and switches it in and out of raw mode.
///
/// [`attach`](Self::attach) saves the current attributes and enters raw
/// mode. [`detach`](Self::detach) re-applies the saved snapshot; it can be
/// called any number of times and is a no-op before the first attach.
///
/// The session does not restore on drop. Scoping raw mode to a unit of work
/// is the caller's job (the editor ties it to one `read_line`).
pub struct TerminalSession<D> {
    device: D,
    /// Attributes captured by the most recent successful `attach()`.
    saved: Option<Attributes>,
    /// Whether raw mode is currently applied.
    attached: bool,
}

impl<D: Device> TerminalSession<D> {
    /// Wrap `device`. Does not touch its attributes.
    pub const fn new(device: D) -> Self {
        Self {
            device,
            saved: None,
            attached: false,
        }
    }

    /// Snapshot the device attributes and enter raw mode.
    ///
    /// # Errors
    ///
    /// Fails if the attributes cannot be read (not a terminal) or the raw
    /// set cannot be applied. A failed query leaves any earlier snapshot in
    /// place.
    pub fn attach(&mut self) -> io::Result<()> {
        let original = self.device.attributes()?;
        self.saved = Some(original);

        self.device.set_attributes(&original.raw())?;
        self.attached = true;
        debug!("terminal attached (raw mode)");
        Ok(())
    }

    /// Re-apply the snapshot from the most recent `attach()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects the saved attributes.
    pub fn detach(&mut self) -> io::Result<()> {
        if let Some(ref saved) = self.saved {
            self.device.set_attributes(saved)?;
            debug!("terminal detached (restored)");
        }
        self.attached = false;
        Ok(())
    }

    /// Whether raw mode is currently applied.
    #[inline]
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// The snapshot taken by the last successful `attach()`, if any.
    #[inline]
    #[must_use]
    pub const fn saved(&self) -> Option<&Attributes> {
        self.saved.as_ref()
    }

    /// The wrapped device.
    #[inline]
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// The wrapped device, mutably (for reading).
    #[inline]
    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give the device back without restoring anything.
    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D> fmt::Debug for TerminalSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalSession")
            .field("saved", &self.saved)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
