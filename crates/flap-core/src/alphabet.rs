#![forbid(unsafe_code)]

//! Alphabets: the ordered, cyclic glyph sets a cell flips through.
//!
//! # Invariants
//!
//! 1. An [`Alphabet`] is never empty.
//! 2. Glyphs are distinct and non-empty.
//! 3. Order is exactly the order supplied; it defines wrap-around order and
//!    is never re-sorted.
//!
//! Cloning an alphabet is cheap (shared slice). Two alphabets are the same
//! alphabet when their glyphs compare equal in order.

use std::collections::HashSet;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::FlapError;

/// One renderable unit: usually a single character, occasionally a word.
pub type Glyph = Arc<str>;

/// Digits with a leading blank.
pub const NUM: &str = " 0123456789";

/// Blank, upper-case Latin letters, then digits.
pub const ALPHANUM: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// An ordered, non-empty set of distinct glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    glyphs: Arc<[Glyph]>,
}

impl Alphabet {
    /// Build an alphabet from glyphs in display order.
    ///
    /// # Errors
    ///
    /// [`FlapError::EmptyAlphabet`] for no glyphs, [`FlapError::EmptyGlyph`]
    /// for an empty string, [`FlapError::DuplicateGlyph`] for repeats.
    pub fn new<I, S>(glyphs: I) -> Result<Self, FlapError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out: Vec<Glyph> = Vec::new();
        for glyph in glyphs {
            let glyph = glyph.as_ref();
            if glyph.is_empty() {
                return Err(FlapError::EmptyGlyph);
            }
            if !seen.insert(glyph.to_owned()) {
                return Err(FlapError::DuplicateGlyph(glyph.to_owned()));
            }
            out.push(Glyph::from(glyph));
        }
        if out.is_empty() {
            return Err(FlapError::EmptyAlphabet);
        }
        Ok(Self {
            glyphs: out.into(),
        })
    }

    /// Build a character alphabet: one glyph per grapheme cluster, upper-cased.
    ///
    /// # Errors
    ///
    /// Same as [`Alphabet::new`]; upper-casing can introduce duplicates
    /// (`"aA"`).
    pub fn from_chars(chars: &str) -> Result<Self, FlapError> {
        Self::new(chars.graphemes(true).map(str::to_uppercase))
    }

    /// Build a word alphabet: each word is one glyph, kept verbatim.
    ///
    /// # Errors
    ///
    /// Same as [`Alphabet::new`].
    pub fn from_words<I, S>(words: I) -> Result<Self, FlapError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(words)
    }

    /// Number of glyphs (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The glyphs in display order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyph at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    /// The glyph at index 0, where every cursor starts.
    #[must_use]
    pub fn first(&self) -> &Glyph {
        // Non-empty by construction.
        &self.glyphs[0]
    }

    /// Position of `glyph`, if it is a member.
    #[must_use]
    pub fn index_of(&self, glyph: &str) -> Option<usize> {
        self.glyphs.iter().position(|g| &**g == glyph)
    }

    /// Whether `glyph` is a member.
    #[must_use]
    pub fn contains(&self, glyph: &str) -> bool {
        self.index_of(glyph).is_some()
    }

    /// The member equal to `glyph`, sharing the alphabet's allocation.
    #[must_use]
    pub fn lookup(&self, glyph: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| &***g == glyph)
    }

    /// Terminal display width of the widest glyph.
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.glyphs
            .iter()
            .map(|g| UnicodeWidthStr::width(&**g))
            .max()
            .unwrap_or(0)
    }

    /// Whether any glyph contains an ASCII letter.
    #[must_use]
    pub fn has_letters(&self) -> bool {
        self.glyphs
            .iter()
            .any(|g| g.chars().any(|c| c.is_ascii_alphabetic()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_supplied_order() {
        let alphabet = Alphabet::new(["Z", "A", "M"]).unwrap();
        let glyphs: Vec<&str> = alphabet.glyphs().iter().map(|g| &**g).collect();
        assert_eq!(glyphs, vec!["Z", "A", "M"]);
        assert_eq!(alphabet.index_of("A"), Some(1));
        assert_eq!(&**alphabet.first(), "Z");
    }

    #[test]
    fn empty_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(Alphabet::new(empty), Err(FlapError::EmptyAlphabet));
        assert_eq!(Alphabet::from_chars(""), Err(FlapError::EmptyAlphabet));
    }

    #[test]
    fn duplicates_are_rejected() {
        assert_eq!(
            Alphabet::new(["A", "B", "A"]),
            Err(FlapError::DuplicateGlyph("A".into()))
        );
        assert_eq!(
            Alphabet::from_chars("aA"),
            Err(FlapError::DuplicateGlyph("A".into()))
        );
    }

    #[test]
    fn empty_glyph_is_rejected() {
        assert_eq!(Alphabet::new(["A", ""]), Err(FlapError::EmptyGlyph));
    }

    #[test]
    fn from_chars_uppercases_graphemes() {
        let alphabet = Alphabet::from_chars(" ab1").unwrap();
        assert_eq!(alphabet.len(), 4);
        assert!(alphabet.contains("A"));
        assert!(alphabet.contains("B"));
        assert!(!alphabet.contains("a"));

        // A combining sequence stays one glyph.
        let accented = Alphabet::from_chars("e\u{301}x").unwrap();
        assert_eq!(accented.len(), 2);
    }

    #[test]
    fn presets_are_valid() {
        let num = Alphabet::from_chars(NUM).unwrap();
        assert_eq!(num.len(), 11);
        assert!(!num.has_letters());

        let alnum = Alphabet::from_chars(ALPHANUM).unwrap();
        assert_eq!(alnum.len(), 37);
        assert!(alnum.has_letters());
    }

    #[test]
    fn words_width() {
        let words = Alphabet::from_words(["ON TIME", "DELAYED", "GO"]).unwrap();
        assert_eq!(words.max_width(), 7);
        assert_eq!(words.lookup("GO").map(|g| &**g), Some("GO"));
    }

    #[test]
    fn equality_is_by_content() {
        let a = Alphabet::from_chars(NUM).unwrap();
        let b = Alphabet::from_chars(NUM).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Alphabet::from_chars(ALPHANUM).unwrap());
    }
}
