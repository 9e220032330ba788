//! Arabic script helpers
//!
//! Classifies code points of the Arabic script into base letters and
//! non-spacing combining marks (harakat, shadda, sukun, Quranic annotation
//! signs). A base letter and the marks that follow it form one visual glyph,
//! so wrapping and counting here work in glyphs rather than code points.

mod numerals;

pub use numerals::{to_arabic, to_ascii};

/// Check whether a character is a non-spacing Arabic combining mark
///
/// Covers the honorific signs, the harakat block (fathatan through the
/// wavy hamza), the superscript alef and the Quranic annotation marks.
pub fn is_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E4}'
            | '\u{06E7}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}'
    )
}

/// Wrap a string so that each line holds at most `limit` base characters
///
/// A newline is only ever inserted before a base character; marks stay on
/// the line of the letter they decorate. A `limit` of 0 behaves like 1:
/// the wrap column is reached on the first character, so every base
/// character gets its own line and no leading newline is produced.
pub fn wrap(s: &str, limit: usize) -> String {
    let limit = limit.max(1);
    let mut wrapped = String::with_capacity(s.len() + s.len() / limit);
    let mut count = 0;

    for c in s.chars() {
        if is_mark(c) {
            wrapped.push(c);
            continue;
        }

        if count == limit {
            wrapped.push('\n');
            count = 0;
        }

        wrapped.push(c);
        count += 1;
    }

    wrapped
}

/// Wrap a string and split the result into lines
pub fn wrap_to_lines(s: &str, limit: usize) -> Vec<String> {
    wrap(s, limit).split('\n').map(str::to_string).collect()
}

/// Count the base characters in a string, ignoring combining marks
pub fn count(s: &str) -> usize {
    s.chars().filter(|&c| !is_mark(c)).count()
}
