//! Input decoding
//!
//! Translates raw, unbuffered keyboard bytes into pager commands.
//!
//! # Key bindings
//!
//! | Bytes                 | Command  |
//! |-----------------------|----------|
//! | `j`, `ESC [ B` (down) | `Down`   |
//! | `k`, `ESC [ A` (up)   | `Up`     |
//! | `g`                   | `Top`    |
//! | `G`                   | `Bottom` |
//! | `q`, bare `ESC`       | `Quit`   |
//!
//! Input is read in chunks of at most [`CHUNK_SIZE`] bytes and each chunk
//! is decoded as a whole. Anything else is ignored.

use std::io::{self, Read};

/// Maximum number of bytes decoded at once (the length of a CSI arrow key)
pub const CHUNK_SIZE: usize = 3;

const ESC: u8 = 0x1b;

/// A decoded user command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Top,
    Bottom,
    Quit,
}

/// Decode one chunk of input
pub fn decode(chunk: &[u8]) -> Option<Command> {
    match chunk {
        [b'j'] => Some(Command::Down),
        [b'k'] => Some(Command::Up),
        [b'g'] => Some(Command::Top),
        [b'G'] => Some(Command::Bottom),
        [b'q'] | [ESC] => Some(Command::Quit),
        [ESC, b'[', b'A'] => Some(Command::Up),
        [ESC, b'[', b'B'] => Some(Command::Down),
        _ => None,
    }
}

/// Blocking command source over a byte stream
pub struct InputReader<R> {
    input: R,
}

impl<R: Read> InputReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Block until the next recognized command
    ///
    /// Returns `Ok(None)` on end of input. Unrecognized chunks are skipped.
    pub fn next_command(&mut self) -> io::Result<Option<Command>> {
        let mut buf = [0u8; CHUNK_SIZE];

        loop {
            let n = match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            match decode(&buf[..n]) {
                Some(command) => {
                    tracing::debug!(?command, "decoded input");
                    return Ok(Some(command));
                },
                None => tracing::trace!(bytes = ?&buf[..n], "ignored input"),
            }
        }
    }
}

impl<R: Read> Iterator for InputReader<R> {
    type Item = io::Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_command().transpose()
    }
}
