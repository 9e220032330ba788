//! Unix terminal plumbing
//!
//! Raw mode via termios, window size via `TIOCGWINSZ`, and an unbuffered
//! reader over the stdin file descriptor.

use std::io::{self, Read};
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use nix::libc::{self, STDIN_FILENO};
use nix::sys::termios::{self, SetArg, Termios};

use super::{TermError, TermResult, WindowSize};

/// RAII guard for raw terminal mode on stdin
///
/// Restores the captured termios settings when dropped, unless they were
/// already restored explicitly.
pub struct RawModeGuard {
    original: Termios,
    active: bool,
}

impl RawModeGuard {
    /// Put stdin into raw mode, remembering the previous settings
    pub fn new() -> TermResult<Self> {
        let original = termios::tcgetattr(io::stdin()).map_err(TermError::RawMode)?;

        let mut raw = original.clone();
        raw.input_flags &= !(termios::InputFlags::IGNBRK
            | termios::InputFlags::BRKINT
            | termios::InputFlags::PARMRK
            | termios::InputFlags::ISTRIP
            | termios::InputFlags::INLCR
            | termios::InputFlags::IGNCR
            | termios::InputFlags::ICRNL
            | termios::InputFlags::IXON);
        raw.local_flags &= !(termios::LocalFlags::ECHO
            | termios::LocalFlags::ECHONL
            | termios::LocalFlags::ICANON
            | termios::LocalFlags::ISIG
            | termios::LocalFlags::IEXTEN);
        raw.control_flags &= !(termios::ControlFlags::CSIZE | termios::ControlFlags::PARENB);
        raw.control_flags |= termios::ControlFlags::CS8;
        raw.control_chars[termios::SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[termios::SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &raw).map_err(TermError::RawMode)?;

        tracing::debug!("stdin switched to raw mode");
        Ok(Self {
            original,
            active: true,
        })
    }

    /// Restore the settings captured by [`RawModeGuard::new`]
    pub fn restore(mut self) -> TermResult<()> {
        self.active = false;
        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original)
            .map_err(TermError::RawMode)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(e) = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original) {
            tracing::warn!("failed to restore terminal mode: {}", e);
        }
    }
}

/// Get the window size of the terminal behind a file descriptor
pub fn window_size(fd: RawFd) -> TermResult<WindowSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(TermError::WindowSize(Errno::last()))
    } else if winsize.ws_col == 0 || winsize.ws_row == 0 {
        Err(TermError::WindowSize(Errno::ENOTTY))
    } else {
        Ok(WindowSize::new(winsize.ws_col, winsize.ws_row))
    }
}

/// Unbuffered reader over stdin
///
/// Each `read` is a single `read(2)` on the descriptor, so a key press that
/// arrives as one escape sequence comes back as one chunk.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinReader;

impl Read for StdinReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match nix::unistd::read(STDIN_FILENO, buf) {
                Ok(n) => return Ok(n),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(io::Error::from(e)),
            }
        }
    }
}
