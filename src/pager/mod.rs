//! Verse pager
//!
//! Keeps the selection and the top of the viewport over a document's verses
//! and draws full frames to a [`Terminal`]. Every frame samples the terminal
//! size, so a resize shows up on the next redraw.
//!
//! # Frame layout
//!
//! ```text
//! row 0 .. h-3   verse blocks, each followed by a blank row, then `~` filler
//! row h-2        status bar with " Verse n/total " right-aligned
//! row h-1        chapter metadata
//! ```

use std::io::Write;

use unicode_width::UnicodeWidthChar;

use crate::compose::{compose_verse, ComposeOptions, DisplayMode};
use crate::corpus::Document;
use crate::input::Command;
use crate::term::{TermResult, Terminal};

/// Rows taken by the status bar and metadata line
const STATUS_ROWS: usize = 2;

/// Selection and viewport over `total` verses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    selected: usize,
    viewport_top: usize,
    total: usize,
}

impl PagerState {
    /// Start at the first of `total` verses, `None` when there are none
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then(|| Self::at_start(total))
    }

    /// Callers guarantee `total > 0`
    fn at_start(total: usize) -> Self {
        Self {
            selected: 0,
            viewport_top: 0,
            total,
        }
    }

    /// Index of the selected verse
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Index of the first verse drawn
    pub fn viewport_top(&self) -> usize {
        self.viewport_top
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move the selection up one verse
    ///
    /// The viewport moves with it, keeping the selection near the top.
    pub fn up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.viewport_top = self.viewport_top.saturating_sub(1);
        true
    }

    /// Move the selection down one verse
    ///
    /// The viewport trails the selection by one verse block and scrolls
    /// once the selection is two blocks below its top. This counts verses,
    /// not rendered rows.
    pub fn down(&mut self) -> bool {
        if self.selected + 1 >= self.total {
            return false;
        }
        self.selected += 1;
        if self.selected >= self.viewport_top + 2 {
            self.viewport_top += 1;
        }
        true
    }

    /// Jump to the first verse
    pub fn top(&mut self) {
        self.selected = 0;
        self.viewport_top = 0;
    }

    /// Jump to the last verse
    pub fn bottom(&mut self) {
        self.selected = self.total.saturating_sub(1);
        self.viewport_top = self.total.saturating_sub(2);
    }

    /// Apply a movement command, returning whether a redraw is needed
    ///
    /// Up and down only redraw when they moved; top and bottom always do.
    /// `Quit` is not a pager transition and never redraws.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Up => self.up(),
            Command::Down => self.down(),
            Command::Top => {
                self.top();
                true
            },
            Command::Bottom => {
                self.bottom();
                true
            },
            Command::Quit => false,
        }
    }
}

/// Glyphs used when drawing frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Drawn before the first line of the selected verse
    pub marker: String,
    /// Drawn on each unused body row
    pub filler: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            marker: "|".to_string(),
            filler: "~".to_string(),
        }
    }
}

/// Draws a document to a terminal
pub struct Pager<'a> {
    document: &'a Document,
    mode: DisplayMode,
    style: Style,
    options: ComposeOptions,
    state: PagerState,
}

impl<'a> Pager<'a> {
    pub fn new(document: &'a Document, mode: DisplayMode) -> Self {
        Self {
            document,
            mode,
            style: Style::default(),
            options: ComposeOptions::default(),
            state: PagerState::at_start(document.total()),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// Apply a command and redraw if it changed what is shown
    pub fn handle<W: Write>(
        &mut self,
        command: Command,
        term: &mut Terminal<W>,
    ) -> TermResult<()> {
        if self.state.apply(command) {
            tracing::debug!(
                selected = self.state.selected,
                top = self.state.viewport_top,
                "redraw"
            );
            self.render(term)?;
        }
        Ok(())
    }

    /// Draw a full frame
    pub fn render<W: Write>(&self, term: &mut Terminal<W>) -> TermResult<()> {
        let size = term.size();
        let width = usize::from(size.cols);
        let height = usize::from(size.rows);
        let body_rows = height.saturating_sub(STATUS_ROWS);
        let line_width = width.saturating_sub(1).max(1);

        term.clear_screen()?;
        term.reset()?;
        term.move_cursor(0, 0)?;

        let mut printed = 0;
        for (index, verse) in self
            .document
            .verses()
            .iter()
            .enumerate()
            .skip(self.state.viewport_top)
        {
            if printed >= body_rows {
                break;
            }

            let selected = index == self.state.selected;
            let lines = compose_verse(verse, self.mode, line_width, self.options);

            for (i, line) in lines.iter().enumerate() {
                if printed >= body_rows {
                    break;
                }
                if selected {
                    term.reverse()?;
                    if i == 0 {
                        term.write_str(&self.style.marker)?;
                    }
                }
                term.write_str(line)?;
                term.reset()?;
                term.newline()?;
                printed += 1;
            }

            if printed < body_rows {
                term.newline()?;
                printed += 1;
            }
        }

        for _ in printed..body_rows {
            term.write_str(&self.style.filler)?;
            term.newline()?;
        }

        if height >= STATUS_ROWS {
            self.render_status(term, width)?;
        }

        term.flush()
    }

    fn render_status<W: Write>(&self, term: &mut Terminal<W>, width: usize) -> TermResult<()> {
        let position = format!(
            " Verse {}/{} ",
            self.state.selected + 1,
            self.state.total
        );
        let position = truncate_to_width(&position, width);

        term.reverse()?;
        term.bold()?;
        term.write_str_repeat(" ", width)?;
        // Back up from the last column so the counter ends at the right edge
        term.write_str_repeat("\x08", position.chars().count().saturating_sub(1))?;
        term.write_str(&position)?;
        term.newline()?;

        let chapter = self.document.chapter();
        let metadata = format!(
            " #{} {} ({}) - {} ({}) ",
            chapter.id, chapter.name, chapter.transliteration, chapter.translation, chapter.kind
        );
        term.write_str_repeat(" ", width)?;
        term.write_str("\r")?;
        term.write_str(&truncate_to_width(&metadata, width.saturating_sub(1)))?;
        term.reset()
    }
}

/// Cut a string to at most `width` display columns
fn truncate_to_width(s: &str, width: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}
