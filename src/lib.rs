//! Quran Pager Library
//!
//! A raw-mode terminal pager for reading a surah verse by verse. This crate
//! provides:
//!
//! - `arabic`: combining-mark aware wrapping and Arabic-Indic numerals
//! - `corpus`: chapters and verses, loaded from a JSON corpus
//! - `compose`: display modes and word-wrapped verse lines
//! - `term`: raw terminal session and output primitives
//! - `pager`: selection/viewport state and frame rendering
//! - `input`: decoding raw key bytes into commands
//! - `session`: the interactive loop tying it all together

pub mod app;
pub mod arabic;
pub mod compose;
pub mod corpus;
pub mod input;
pub mod pager;
pub mod session;
pub mod term;
