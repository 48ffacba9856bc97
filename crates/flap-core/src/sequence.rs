#![forbid(unsafe_code)]

//! Glyph sequencing: the path a cell flips through between two glyphs.
//!
//! Traversal is forward-only and circular, like the drum of a mechanical
//! split-flap unit: going from the last entry to the first wraps once, going
//! from the first entry to the last visits every glyph in between.
//!
//! # Invariants
//!
//! 1. `build_sequence(a, x, x)` is empty.
//! 2. For members `x != y` the result ends with `y`, never contains `x`, and
//!    has length `forward_distance(a.len(), index(x), index(y))`.
//! 3. A non-member `from` or `to` yields an empty sequence.

/// Forward circular distance from `from` to `to` in a ring of `len` slots.
///
/// Returns 0 when `len == 0` or the indices are equal.
#[must_use]
pub fn forward_distance(len: usize, from: usize, to: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let (from, to) = (from % len, to % len);
    if to >= from { to - from } else { len - from + to }
}

/// Indices visited walking forward from `from` (exclusive) to `to` (inclusive).
#[must_use]
pub fn sequence_indices(len: usize, from: usize, to: usize) -> Vec<usize> {
    let steps = forward_distance(len, from, to);
    (1..=steps).map(|i| (from + i) % len).collect()
}

/// Glyphs to step through to go from `from` to `to` along `alphabet`.
///
/// Empty when either glyph is missing from `alphabet` or they are equal.
#[must_use]
pub fn build_sequence<G>(alphabet: &[G], from: &G, to: &G) -> Vec<G>
where
    G: PartialEq + Clone,
{
    let (Some(from_idx), Some(to_idx)) = (
        alphabet.iter().position(|g| g == from),
        alphabet.iter().position(|g| g == to),
    ) else {
        return Vec::new();
    };

    sequence_indices(alphabet.len(), from_idx, to_idx)
        .into_iter()
        .map(|i| alphabet[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: [&str; 3] = ["A", "B", "C"];

    #[test]
    fn same_glyph_is_empty() {
        for g in ABC {
            assert!(build_sequence(&ABC, &g, &g).is_empty());
        }
    }

    #[test]
    fn forward_path_excludes_start() {
        assert_eq!(build_sequence(&ABC, &"A", &"C"), vec!["B", "C"]);
        assert_eq!(build_sequence(&ABC, &"A", &"B"), vec!["B"]);
    }

    #[test]
    fn wraps_past_the_end() {
        assert_eq!(build_sequence(&ABC, &"C", &"A"), vec!["A"]);
        assert_eq!(build_sequence(&ABC, &"C", &"B"), vec!["A", "B"]);
    }

    #[test]
    fn never_steps_backward() {
        // From the first to the last entry walks the whole ring.
        assert_eq!(build_sequence(&ABC, &"B", &"A"), vec!["C", "A"]);
    }

    #[test]
    fn non_members_are_empty() {
        assert!(build_sequence(&ABC, &"X", &"A").is_empty());
        assert!(build_sequence(&ABC, &"A", &"X").is_empty());
        assert!(build_sequence(&ABC, &"X", &"Y").is_empty());
    }

    #[test]
    fn empty_alphabet_is_empty() {
        let empty: [&str; 0] = [];
        assert!(build_sequence(&empty, &"A", &"B").is_empty());
    }

    #[test]
    fn distance_matches_ring() {
        assert_eq!(forward_distance(3, 0, 2), 2);
        assert_eq!(forward_distance(3, 2, 0), 1);
        assert_eq!(forward_distance(3, 1, 1), 0);
        assert_eq!(forward_distance(0, 1, 2), 0);
        assert_eq!(forward_distance(11, 10, 0), 1);
    }

    #[test]
    fn indices_wrap() {
        assert_eq!(sequence_indices(4, 2, 1), vec![3, 0, 1]);
        assert!(sequence_indices(4, 2, 2).is_empty());
    }
}
