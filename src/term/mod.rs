//! Terminal session
//!
//! Owns the terminal for the lifetime of a reading session: raw mode, the
//! alternate screen, cursor visibility and the window title. The session is
//! released exactly once, either explicitly through [`Terminal::restore`] or
//! when the [`Terminal`] is dropped (including during a panic unwind).
//!
//! All output goes through a generic writer so frames can be captured in
//! memory by tests.

#[cfg(unix)]
mod unix;

use std::io::{self, BufWriter, Stdout, Write};

#[cfg(unix)]
pub use unix::{window_size, RawModeGuard, StdinReader};

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("Failed to switch terminal mode: {0}")]
    RawMode(#[source] nix::Error),

    #[error("Failed to get window size: {0}")]
    WindowSize(#[source] nix::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for terminal operations
pub type TermResult<T> = Result<T, TermError>;

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub cols: u16,
    pub rows: u16,
}

impl WindowSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Where the terminal size comes from
#[derive(Debug, Clone, Copy)]
enum SizeSource {
    /// Queried from the descriptor on every call
    #[cfg(unix)]
    Descriptor(std::os::unix::io::RawFd),
    Fixed(WindowSize),
}

/// A terminal session writing to `W`
pub struct Terminal<W: Write> {
    out: W,
    #[cfg(unix)]
    raw: Option<RawModeGuard>,
    size: SizeSource,
    /// Set once the screen has been handed back
    restored: bool,
}

#[cfg(unix)]
impl Terminal<BufWriter<Stdout>> {
    /// Acquire the controlling terminal: stdin goes into raw mode and
    /// output is written to stdout
    pub fn acquire() -> TermResult<Self> {
        let raw = RawModeGuard::new()?;
        tracing::info!("terminal session acquired");

        Ok(Self {
            out: BufWriter::new(io::stdout()),
            raw: Some(raw),
            size: SizeSource::Descriptor(nix::libc::STDOUT_FILENO),
            restored: false,
        })
    }
}

impl<W: Write> Terminal<W> {
    /// A terminal that writes to `out` and reports a fixed size, without
    /// touching the real terminal mode
    pub fn headless(out: W, size: WindowSize) -> Self {
        Self {
            out,
            #[cfg(unix)]
            raw: None,
            size: SizeSource::Fixed(size),
            restored: false,
        }
    }

    /// Change the size reported by a headless terminal
    pub fn set_fixed_size(&mut self, size: WindowSize) {
        self.size = SizeSource::Fixed(size);
    }

    /// Current size in columns and rows, 80x24 if it cannot be queried
    pub fn size(&self) -> WindowSize {
        match self.size {
            #[cfg(unix)]
            SizeSource::Descriptor(fd) => window_size(fd).unwrap_or_else(|e| {
                tracing::debug!("{}, using default size", e);
                WindowSize::default()
            }),
            SizeSource::Fixed(size) => size,
        }
    }

    /// The underlying writer
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Prepare the screen for a session: hide the cursor, switch to the
    /// alternate screen, clear it, home the cursor and set the title
    pub fn enter(&mut self, title: &str) -> TermResult<()> {
        self.hide_cursor()?;
        self.alt_screen()?;
        self.clear_screen()?;
        self.move_cursor(0, 0)?;
        self.set_title(title)?;
        self.flush()
    }

    /// Hand the terminal back in the state it was found
    ///
    /// Resets attributes, shows the cursor, leaves the alternate screen,
    /// clears it, homes the cursor, removes the title and finally restores
    /// the terminal mode. Calling it again is a no-op.
    pub fn restore(&mut self) -> TermResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let screen = self.restore_screen();

        #[cfg(unix)]
        let mode = match self.raw.take() {
            Some(raw) => raw.restore(),
            None => Ok(()),
        };
        #[cfg(not(unix))]
        let mode = Ok(());

        tracing::info!("terminal session restored");
        first_failure(mode, screen)
    }

    fn restore_screen(&mut self) -> TermResult<()> {
        self.reset()?;
        self.show_cursor()?;
        self.exit_alt_screen()?;
        self.clear_screen()?;
        self.move_cursor(0, 0)?;
        self.remove_title()?;
        self.flush()
    }

    /// Write raw bytes
    pub fn write(&mut self, bytes: &[u8]) -> TermResult<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    /// Write a string
    pub fn write_str(&mut self, s: &str) -> TermResult<()> {
        self.write(s.as_bytes())
    }

    /// Write `n` copies of `bytes`
    pub fn write_repeat(&mut self, bytes: &[u8], n: usize) -> TermResult<()> {
        self.write(&bytes.repeat(n))
    }

    /// Write `n` copies of `s`
    pub fn write_str_repeat(&mut self, s: &str, n: usize) -> TermResult<()> {
        self.write_repeat(s.as_bytes(), n)
    }

    /// Move to the start of the next line
    pub fn newline(&mut self) -> TermResult<()> {
        self.write(b"\r\n")
    }

    /// Clear the whole screen
    pub fn clear_screen(&mut self) -> TermResult<()> {
        self.write(b"\x1b[2J")
    }

    /// Move the cursor to column `x`, row `y` (0-indexed)
    pub fn move_cursor(&mut self, x: u16, y: u16) -> TermResult<()> {
        write!(self.out, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)?;
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> TermResult<()> {
        self.write(b"\x1b[?25l")
    }

    pub fn show_cursor(&mut self) -> TermResult<()> {
        self.write(b"\x1b[?25h")
    }

    /// Switch to the alternate screen buffer
    pub fn alt_screen(&mut self) -> TermResult<()> {
        self.write(b"\x1b[?1049h")
    }

    /// Leave the alternate screen buffer
    pub fn exit_alt_screen(&mut self) -> TermResult<()> {
        self.write(b"\x1b[?1049l")
    }

    /// Set the window title (OSC 0)
    pub fn set_title(&mut self, title: &str) -> TermResult<()> {
        // Control characters would terminate the OSC early
        let title: String = title.chars().filter(|c| !c.is_control()).collect();
        write!(self.out, "\x1b]0;{}\x07", title)?;
        Ok(())
    }

    /// Clear the window title
    pub fn remove_title(&mut self) -> TermResult<()> {
        self.write(b"\x1b]0;\x07")
    }

    /// Reset all text attributes
    pub fn reset(&mut self) -> TermResult<()> {
        self.write(b"\x1b[0m")
    }

    /// Swap foreground and background colors
    pub fn reverse(&mut self) -> TermResult<()> {
        self.write(b"\x1b[7m")
    }

    pub fn bold(&mut self) -> TermResult<()> {
        self.write(b"\x1b[1m")
    }

    pub fn flush(&mut self) -> TermResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Combine the two restore steps, preferring the terminal mode error
///
/// A screen error that loses out is still logged.
fn first_failure(mode: TermResult<()>, screen: TermResult<()>) -> TermResult<()> {
    match (mode, screen) {
        (Err(mode), Err(screen)) => {
            tracing::warn!("failed to restore screen: {}", screen);
            Err(mode)
        },
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!("failed to restore terminal: {}", e);
        }
    }
}
