//! Line composition
//!
//! Turns a verse into the physical lines shown by the pager. Which fields
//! are shown, and how the verse number is written, depends on the
//! [`DisplayMode`]. Lines are word-wrapped on whitespace to a column width
//! measured with Unicode display widths, so Arabic combining marks take no
//! room.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::arabic;
use crate::corpus::Verse;

/// Which verse fields to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Original text only, numbered in Arabic-Indic digits
    Arabic,
    /// Translation only, numbered in ASCII digits
    Translation,
    /// Translation followed by the original text
    #[default]
    Both,
}

impl FromStr for DisplayMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arabic" | "ar" => Ok(Self::Arabic),
            "translation" | "tr" => Ok(Self::Translation),
            "both" | "bo" => Ok(Self::Both),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Arabic => "arabic",
            Self::Translation => "translation",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// Error returned for an unknown display mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported mode: {0:?} (expected arabic, translation or both)")]
pub struct ParseModeError(String);

/// Options that shape composed lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Cut words wider than the line by display width, keeping marks with
    /// their letter, instead of letting them overflow
    pub split_long_words: bool,
}

/// Compose the display lines for a verse at the given column width
pub fn compose_verse(
    verse: &Verse,
    mode: DisplayMode,
    width: usize,
    options: ComposeOptions,
) -> Vec<String> {
    logical_lines(verse, mode)
        .iter()
        .flat_map(|line| word_wrap(line, width, options))
        .collect()
}

/// The unwrapped lines for a verse
pub fn logical_lines(verse: &Verse, mode: DisplayMode) -> Vec<String> {
    let arabic_line = || {
        format!(
            "{}. {}",
            arabic::to_arabic(u64::from(verse.id)),
            verse.text
        )
    };
    let translation_line = || format!("{}. {}", verse.id, verse.translation);

    match mode {
        DisplayMode::Arabic => vec![arabic_line()],
        DisplayMode::Translation => vec![translation_line()],
        DisplayMode::Both if verse.translation.is_empty() => vec![arabic_line()],
        DisplayMode::Both => vec![translation_line(), arabic_line()],
    }
}

/// Greedy word wrap on whitespace
///
/// Runs of whitespace collapse to a single space. A word wider than `width`
/// sits alone on its line unless `split_long_words` is set, in which case it
/// is chunked by display width without separating letters from their marks.
/// Always returns at least one (possibly empty) line.
pub fn word_wrap(text: &str, width: usize, options: ComposeOptions) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
        }

        if word_width > width && options.split_long_words {
            let mut chunks = split_by_width(word, width);
            let last = chunks.pop().unwrap_or_default();
            lines.extend(chunks);
            current_width = last.width();
            current = last;
        } else {
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Cut a single word into chunks of at most `width` columns
///
/// Zero-width characters stay in the chunk of the glyph before them. A lone
/// glyph wider than `width` still gets a chunk of its own.
fn split_by_width(word: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for c in word.chars() {
        let w = if arabic::is_mark(c) {
            0
        } else {
            c.width().unwrap_or(0)
        };
        if w > 0 && used > 0 && used + w > width {
            chunks.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
