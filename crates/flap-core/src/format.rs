#![forbid(unsafe_code)]

//! Value formatting: turning a display value into per-cell targets.
//!
//! A character board shows one glyph per cell, so a value is split into
//! grapheme clusters, upper-cased, and optionally truncated and padded to a
//! fixed length. A word board shows the whole value in a single cell.
//!
//! Padding direction defaults to [`PadMode::Auto`]: values that look numeric
//! (only digits and `.,+-`) are right-aligned, everything else left-aligned.

use unicode_segmentation::UnicodeSegmentation;

use crate::alphabet::{Alphabet, Glyph};

/// What kind of content a board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Digits and symbols only.
    Numeric,
    /// At least one letter.
    Alphanumeric,
    /// Whole words per cell.
    Words,
}

impl DisplayMode {
    /// Classify a board by its alphabet.
    #[must_use]
    pub fn detect(alphabet: &Alphabet, words: bool) -> Self {
        if words {
            Self::Words
        } else if alphabet.has_letters() {
            Self::Alphanumeric
        } else {
            Self::Numeric
        }
    }

    /// Short lowercase name, for logs and renderer tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "num",
            Self::Alphanumeric => "alpha",
            Self::Words => "words",
        }
    }
}

/// Which side receives padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PadMode {
    /// Start for numeric-looking values, end otherwise.
    #[default]
    Auto,
    /// Pad before the value (right-align).
    Start,
    /// Pad after the value (left-align).
    End,
}

/// How a value is laid out across cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Fixed cell count. `None` keeps the value's own length.
    /// Default: None
    pub length: Option<usize>,

    /// Fill glyph for padding.
    /// Default: ' '
    pub pad_char: char,

    /// Padding side.
    /// Default: Auto
    pub pad_mode: PadMode,

    /// Show the whole value in one cell.
    /// Default: false
    pub words: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            length: None,
            pad_char: ' ',
            pad_mode: PadMode::Auto,
            words: false,
        }
    }
}

impl FormatOptions {
    /// Set a fixed length (builder).
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the pad character (builder).
    #[must_use]
    pub fn pad_char(mut self, pad_char: char) -> Self {
        self.pad_char = pad_char;
        self
    }

    /// Set the pad side (builder).
    #[must_use]
    pub fn pad_mode(mut self, pad_mode: PadMode) -> Self {
        self.pad_mode = pad_mode;
        self
    }

    /// Switch to word mode (builder).
    #[must_use]
    pub fn words(mut self, words: bool) -> Self {
        self.words = words;
        self
    }
}

/// Split into grapheme clusters, upper-cased.
#[must_use]
pub fn split_chars(value: &str) -> Vec<Glyph> {
    value
        .graphemes(true)
        .map(|g| Glyph::from(g.to_uppercase()))
        .collect()
}

/// Whether `value` would be padded at the start under `mode`.
#[must_use]
pub fn pads_at_start(value: &str, mode: PadMode) -> bool {
    match mode {
        PadMode::Start => true,
        PadMode::End => false,
        PadMode::Auto => value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '-')),
    }
}

/// Truncate to `length` graphemes, then pad with `pad_char` to exactly
/// `length`.
#[must_use]
pub fn pad_value(value: &str, length: usize, pad_char: char, pad_start: bool) -> String {
    let kept: Vec<&str> = value.graphemes(true).take(length).collect();
    let fill: String = std::iter::repeat_n(pad_char, length - kept.len()).collect();
    let body = kept.concat();
    if pad_start {
        fill + &body
    } else {
        body + &fill
    }
}

/// Per-cell targets for `value`.
#[must_use]
pub fn format_value(value: &str, options: &FormatOptions) -> Vec<Glyph> {
    if options.words {
        return vec![Glyph::from(value)];
    }
    match options.length {
        Some(length) if length > 0 => {
            let start = pads_at_start(value, options.pad_mode);
            split_chars(&pad_value(value, length, options.pad_char, start))
        }
        _ => split_chars(value),
    }
}
