#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Only construction can fail. Once an animator exists, every input it
//! receives (unknown targets, repeated targets, calls after disposal) is a
//! defined state rather than an error.

/// Errors returned when building an alphabet or an animator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlapError {
    /// The alphabet has no glyphs, so there is no index-0 starting state.
    EmptyAlphabet,
    /// The same glyph appears twice; wrap-around order would be ambiguous.
    DuplicateGlyph(String),
    /// A glyph is the empty string.
    EmptyGlyph,
    /// The step timing is zero.
    ZeroStepTiming,
}

impl std::fmt::Display for FlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAlphabet => write!(f, "alphabet must contain at least one glyph"),
            Self::DuplicateGlyph(glyph) => write!(f, "duplicate glyph in alphabet: {glyph:?}"),
            Self::EmptyGlyph => write!(f, "alphabet glyphs must not be empty"),
            Self::ZeroStepTiming => write!(f, "step timing must be greater than zero"),
        }
    }
}

impl std::error::Error for FlapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FlapError::EmptyAlphabet.to_string(),
            "alphabet must contain at least one glyph"
        );
        assert_eq!(
            FlapError::DuplicateGlyph("A".into()).to_string(),
            "duplicate glyph in alphabet: \"A\""
        );
        assert!(FlapError::ZeroStepTiming.to_string().contains("step timing"));
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(FlapError::EmptyGlyph);
        assert!(err.to_string().contains("empty"));
    }
}
