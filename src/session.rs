//! Reading session
//!
//! Ties the terminal, the pager and the input decoder together. The calling
//! thread sets up the screen and draws the first frame, then hands the pager
//! and the terminal to an input thread and waits on a one-shot channel. From
//! then on the input thread is the only one touching pager state or the
//! terminal, so nothing is locked.
//!
//! The session ends on `q`/`Esc`, end of input, or an input error. The
//! terminal is restored on every one of those paths before returning.

use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::thread;

use crate::app::Config;
use crate::compose::DisplayMode;
use crate::corpus::Document;
use crate::input::{Command, InputReader};
use crate::pager::Pager;
use crate::term::{TermError, Terminal};

/// Error type for a reading session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] TermError),

    #[error("Failed to read input: {0}")]
    Input(#[source] io::Error),

    #[error("Input thread panicked")]
    InputThreadPanicked,
}

/// Result type for a reading session
pub type SessionResult<T> = Result<T, SessionError>;

/// Read a document interactively on the controlling terminal
#[cfg(unix)]
pub fn run(document: &Document, mode: DisplayMode, config: &Config) -> SessionResult<()> {
    let mut term = Terminal::acquire()?;
    let pager = Pager::new(document, mode)
        .with_style(config.style())
        .with_options(config.compose_options());

    run_with(&mut term, crate::term::StdinReader, pager, &config.title)
}

/// Drive a session on `term`, reading keys from `input`
///
/// Returns `Ok(())` on quit or end of input. The terminal is restored before
/// returning; a failure to restore is logged and never replaces the
/// session's own result.
pub fn run_with<W, R>(
    term: &mut Terminal<W>,
    input: R,
    pager: Pager<'_>,
    title: &str,
) -> SessionResult<()>
where
    W: Write + Send,
    R: Read + Send,
{
    let result = drive(term, input, pager, title);

    if let Err(e) = term.restore() {
        tracing::warn!("failed to restore terminal: {}", e);
    }

    match &result {
        Ok(()) => tracing::info!("session finished"),
        Err(e) => tracing::info!("session ended with error: {}", e),
    }
    result
}

fn drive<W, R>(
    term: &mut Terminal<W>,
    input: R,
    pager: Pager<'_>,
    title: &str,
) -> SessionResult<()>
where
    W: Write + Send,
    R: Read + Send,
{
    term.enter(title)?;
    pager.render(term)?;

    let (done_tx, done_rx) = mpsc::sync_channel(1);

    thread::scope(|scope| {
        let handle = scope.spawn(move || {
            let result = input_loop(pager, term, input);
            // The receiver outlives this thread
            let _ = done_tx.send(result);
        });

        let outcome = done_rx.recv();
        if handle.join().is_err() {
            return Err(SessionError::InputThreadPanicked);
        }
        match outcome {
            Ok(result) => result,
            Err(_) => Err(SessionError::InputThreadPanicked),
        }
    })
}

/// Owns the pager for the rest of the session
fn input_loop<W: Write, R: Read>(
    mut pager: Pager<'_>,
    term: &mut Terminal<W>,
    input: R,
) -> SessionResult<()> {
    for command in InputReader::new(input) {
        let command = command.map_err(SessionError::Input)?;
        if command == Command::Quit {
            tracing::debug!("quit requested");
            return Ok(());
        }
        pager.handle(command, term)?;
    }

    tracing::debug!("input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Chapter, Verse};
    use crate::term::WindowSize;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn document() -> Document {
        let chapter = Chapter {
            id: 108,
            name: "الكوثر".to_string(),
            transliteration: "Al-Kawthar".to_string(),
            translation: "The Abundance".to_string(),
            kind: "meccan".to_string(),
            total_verses: 3,
        };
        let verses = vec![
            Verse::new(1, "إِنَّآ أَعْطَيْنَٰكَ ٱلْكَوْثَرَ", "Indeed, We have granted you al-Kawthar"),
            Verse::new(2, "فَصَلِّ لِرَبِّكَ وَٱنْحَرْ", "So pray to your Lord and sacrifice"),
            Verse::new(3, "إِنَّ شَانِئَكَ هُوَ ٱلْأَبْتَرُ", "Indeed, your enemy is the one cut off"),
        ];
        Document::new(chapter, verses).unwrap()
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "stdin closed"))
        }
    }

    /// Writer that starts failing once `broken` is set
    struct BreakableWriter {
        out: Vec<u8>,
        broken: Arc<AtomicBool>,
    }

    impl Write for BreakableWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Reader that breaks the output before failing
    struct HangupReader {
        broken: Arc<AtomicBool>,
    }

    impl Read for HangupReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.broken.store(true, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin hung up"))
        }
    }

    struct PanickingReader;

    impl Read for PanickingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("reader exploded");
        }
    }

    fn restored(out: &[u8]) -> bool {
        String::from_utf8_lossy(out).ends_with("\x1b[?1049l\x1b[2J\x1b[1;1H\x1b]0;\x07")
    }

    #[test]
    fn test_session_quit() {
        let doc = document();
        let mut term = Terminal::headless(Vec::new(), WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Translation);

        run_with(&mut term, &b"q"[..], pager, "Quran CLI").unwrap();

        let out = String::from_utf8_lossy(term.output()).into_owned();
        assert!(out.starts_with("\x1b[?25l\x1b[?1049h"));
        assert!(out.contains("\x1b]0;Quran CLI\x07"));
        assert!(out.contains("|1. Indeed, We have granted you al-Kawthar"));
        assert!(restored(term.output()));
    }

    #[test]
    fn test_session_eof_is_success() {
        let doc = document();
        let mut term = Terminal::headless(Vec::new(), WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Both);

        run_with(&mut term, io::empty(), pager, "t").unwrap();
        assert!(restored(term.output()));
    }

    #[test]
    fn test_session_read_error_restores() {
        let doc = document();
        let mut term = Terminal::headless(Vec::new(), WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Both);

        let err = run_with(&mut term, FailingReader, pager, "t").unwrap_err();
        assert!(matches!(err, SessionError::Input(_)));
        assert!(restored(term.output()));
    }

    #[test]
    fn test_session_panic_restores() {
        let doc = document();
        let mut term = Terminal::headless(Vec::new(), WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Both);

        let err = run_with(&mut term, PanickingReader, pager, "t").unwrap_err();
        assert!(matches!(err, SessionError::InputThreadPanicked));
        assert!(restored(term.output()));
    }

    #[test]
    fn test_session_restore_failure_keeps_input_error() {
        let doc = document();
        let broken = Arc::new(AtomicBool::new(false));
        let writer = BreakableWriter {
            out: Vec::new(),
            broken: Arc::clone(&broken),
        };
        let mut term = Terminal::headless(writer, WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Both);

        let err = run_with(&mut term, HangupReader { broken }, pager, "t").unwrap_err();
        match err {
            SessionError::Input(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {}", other),
        }
        // The first frame made it out before the hangup
        assert!(String::from_utf8_lossy(&term.output().out).contains("Verse 1/3"));
    }

    #[test]
    fn test_session_write_failure_is_terminal_error() {
        let doc = document();
        let writer = BreakableWriter {
            out: Vec::new(),
            broken: Arc::new(AtomicBool::new(true)),
        };
        let mut term = Terminal::headless(writer, WindowSize::new(80, 24));
        let pager = Pager::new(&doc, DisplayMode::Both);

        let err = run_with(&mut term, io::empty(), pager, "t").unwrap_err();
        match err {
            SessionError::Terminal(TermError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::BrokenPipe)
            },
            other => panic!("unexpected error: {}", other),
        }
    }
}
