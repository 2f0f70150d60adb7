//! The suffix/prefix overlap computation that drives the pattern-family
//! automata. This is the automaton-theoretic generalization of the prefix
//! function from linear-time substring search, evaluated per (state, symbol)
//! pair instead of being precomputed as a failure-link table. That costs O(L)
//! per transition rather than amortized O(1), which is fine for the short
//! patterns this crate deals with.

/// Computes the length of the longest prefix of `pattern` that is also a
/// suffix of `stem`. Candidate lengths are tried longest-first, so the
/// greatest match always wins.
pub fn overlap(pattern: &[char], stem: &[char]) -> usize {
    let upper = pattern.len().min(stem.len());
    (0..=upper)
        .rev()
        .find(|&k| pattern[..k] == stem[stem.len() - k..])
        .unwrap_or(0)
}

/// The longest proper overlap of `pattern` with itself: the greatest `k`
/// strictly below the pattern length for which the first `k` symbols equal
/// the last `k`. This is the match length a pattern automaton falls back to
/// after recognizing a complete occurrence, which is what makes overlapping
/// occurrences countable.
pub fn self_overlap(pattern: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    (1..pattern.len())
        .rev()
        .find(|&k| pattern[..k] == pattern[pattern.len() - k..])
        .unwrap_or(0)
}
