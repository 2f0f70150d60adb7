//! Constructors for single-pattern properties, all driven by the overlap
//! engine. States `q0..qL` track the length of the longest suffix of the
//! consumed input that is a prefix of the pattern.

use tracing::debug;

use crate::alphabet::CharAlphabet;
use crate::builder::DfaBuilder;
use crate::dfa::{Dfa, StateId};
use crate::overlap::overlap;
use crate::synthesis::{parse_pattern, ConfigError};

fn render(pattern: &[char]) -> String {
    pattern.iter().collect()
}

/// Interns the `q0..qL` overlap chain and wires the overlap-driven
/// transitions for states `q0..q(upper-1)`.
fn overlap_chain(
    builder: &mut DfaBuilder,
    alphabet: &CharAlphabet,
    pattern: &[char],
    upper: usize,
) -> Vec<StateId> {
    let states: Vec<StateId> = (0..=pattern.len())
        .map(|i| builder.state(format!("q{i}")))
        .collect();
    for (i, &from) in states.iter().enumerate().take(upper) {
        for symbol in alphabet.symbols() {
            let mut stem: Vec<char> = pattern[..i].to_vec();
            stem.push(symbol);
            let next = overlap(pattern, &stem);
            builder.transition(from, symbol, states[next]);
        }
    }
    states
}

/// Accepts strings that end with `pattern`.
pub fn ends_with(pattern: &str, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let pattern = parse_pattern(pattern, alphabet)?;
    debug!(pattern = %render(&pattern), "building ends-with automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states = overlap_chain(&mut b, alphabet, &pattern, pattern.len() + 1);
    b.initial(states[0]);
    b.accept(states[pattern.len()]);
    Ok(b.into_dfa(format!(
        "Accepts strings ending with \"{}\".",
        render(&pattern)
    )))
}

/// Accepts strings that contain `pattern` anywhere. Identical to
/// [`ends_with`] except that the full-match state absorbs, so a match once
/// found is never lost.
pub fn contains(pattern: &str, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let pattern = parse_pattern(pattern, alphabet)?;
    debug!(pattern = %render(&pattern), "building contains automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states = overlap_chain(&mut b, alphabet, &pattern, pattern.len());
    let full = states[pattern.len()];
    for symbol in alphabet.symbols() {
        b.transition(full, symbol, full);
    }
    b.initial(states[0]);
    b.accept(full);
    Ok(b.into_dfa(format!(
        "Accepts strings containing \"{}\".",
        render(&pattern)
    )))
}

/// Accepts strings that do not contain `pattern`: the [`contains`] table
/// with the full-match state turned into a reject sink and every other state
/// accepting.
pub fn not_contains(pattern: &str, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let pattern = parse_pattern(pattern, alphabet)?;
    debug!(pattern = %render(&pattern), "building not-contains automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states = overlap_chain(&mut b, alphabet, &pattern, pattern.len());
    let full = states[pattern.len()];
    for symbol in alphabet.symbols() {
        b.transition(full, symbol, full);
    }
    b.initial(states[0]);
    for &q in &states[..pattern.len()] {
        b.accept(q);
    }
    Ok(b.into_dfa(format!(
        "Accepts strings that do NOT contain \"{}\".",
        render(&pattern)
    )))
}

/// Accepts strings that start with `pattern`: a positional chain that traps
/// on the first mismatch and self-loops once the prefix is committed.
pub fn starts_with(pattern: &str, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let pattern = parse_pattern(pattern, alphabet)?;
    debug!(pattern = %render(&pattern), "building starts-with automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..=pattern.len())
        .map(|i| b.state(format!("q{i}")))
        .collect();
    let trap = b.state("qTrap");
    for (i, &expected) in pattern.iter().enumerate() {
        for symbol in alphabet.symbols() {
            let next = if symbol == expected { states[i + 1] } else { trap };
            b.transition(states[i], symbol, next);
        }
    }
    for symbol in alphabet.symbols() {
        b.transition(states[pattern.len()], symbol, states[pattern.len()]);
        b.transition(trap, symbol, trap);
    }
    b.initial(states[0]);
    b.accept(states[pattern.len()]);
    Ok(b.into_dfa(format!(
        "Accepts strings starting with \"{}\".",
        render(&pattern)
    )))
}

/// Accepts exactly the string `pattern` and nothing else. A positional chain
/// where divergence is fatal and any symbol after the full match is fatal
/// too.
pub fn exact_match(pattern: &str, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let pattern = parse_pattern(pattern, alphabet)?;
    debug!(pattern = %render(&pattern), "building exact-match automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..=pattern.len())
        .map(|i| b.state(format!("q{i}")))
        .collect();
    let reject = b.state("qReject");
    for (i, &expected) in pattern.iter().enumerate() {
        for symbol in alphabet.symbols() {
            let next = if symbol == expected {
                states[i + 1]
            } else {
                reject
            };
            b.transition(states[i], symbol, next);
        }
    }
    for symbol in alphabet.symbols() {
        b.transition(states[pattern.len()], symbol, reject);
        b.transition(reject, symbol, reject);
    }
    b.initial(states[0]);
    b.accept(states[pattern.len()]);
    Ok(b.into_dfa(format!(
        "Accepts strings that exactly match \"{}\".",
        render(&pattern)
    )))
}

/// Accepts strings that start with `start` and end with `end`: a strict
/// prefix chain for the start pattern, handing over to an ends-with suffix
/// automaton for the end pattern. The handover seeds the suffix match with
/// the overlap of the final start symbol against the end pattern.
pub fn start_end_pattern(
    start: &str,
    end: &str,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    let start = parse_pattern(start, alphabet)?;
    let end = parse_pattern(end, alphabet)?;
    debug!(
        start = %render(&start),
        end = %render(&end),
        "building start-end automaton"
    );
    let mut b = DfaBuilder::new(alphabet.clone());
    let prefix: Vec<StateId> = (0..start.len())
        .map(|i| b.state(format!("qS{i}")))
        .collect();
    let suffix: Vec<StateId> = (0..=end.len())
        .map(|i| b.state(format!("qM{i}")))
        .collect();
    let reject = b.state("qReject");

    for (i, &expected) in start.iter().enumerate().take(start.len() - 1) {
        for symbol in alphabet.symbols() {
            let next = if symbol == expected {
                prefix[i + 1]
            } else {
                reject
            };
            b.transition(prefix[i], symbol, next);
        }
    }
    let last = start.len() - 1;
    for symbol in alphabet.symbols() {
        let next = if symbol == start[last] {
            suffix[overlap(&end, &[symbol])]
        } else {
            reject
        };
        b.transition(prefix[last], symbol, next);
    }
    for (i, &from) in suffix.iter().enumerate() {
        for symbol in alphabet.symbols() {
            let mut stem: Vec<char> = end[..i].to_vec();
            stem.push(symbol);
            b.transition(from, symbol, suffix[overlap(&end, &stem)]);
        }
    }
    for symbol in alphabet.symbols() {
        b.transition(reject, symbol, reject);
    }
    b.initial(prefix[0]);
    b.accept(suffix[end.len()]);
    Ok(b.into_dfa(format!(
        "Accepts strings starting with \"{}\" and ending with \"{}\".",
        render(&start),
        render(&end)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn binary() -> CharAlphabet {
        CharAlphabet::parse("01").unwrap()
    }

    #[test]
    fn ends_with_tracks_overlapping_suffixes() {
        let dfa = ends_with("01", &binary()).unwrap();
        let outcome = dfa.run("1001");
        assert!(outcome.is_accepted());
        assert_eq!(outcome.path().len(), 5);
        assert!(!dfa.run("010").is_accepted());
        assert!(!dfa.run("").is_accepted());
    }

    #[test_log::test]
    fn contains_absorbs_once_matched() {
        let dfa = contains("11", &binary()).unwrap();
        assert!(dfa.run("1100").is_accepted());
        assert!(dfa.run("0110").is_accepted());
        assert!(!dfa.run("1010").is_accepted());
        // once in the match state, every continuation stays accepted
        let reached = dfa.run("11").reached();
        for symbol in ['0', '1'] {
            assert_eq!(dfa.successor(reached, symbol), Some(reached));
        }
    }

    #[test]
    fn not_contains_inverts_the_accept_set() {
        let dfa = not_contains("11", &binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("1010").is_accepted());
        assert!(!dfa.run("0110").is_accepted());
        assert!(!dfa.run("1101").is_accepted());
    }

    #[test]
    fn starts_with_commits_to_the_prefix() {
        let dfa = starts_with("10", &binary()).unwrap();
        assert!(dfa.run("10").is_accepted());
        assert!(dfa.run("1011111").is_accepted());
        assert!(!dfa.run("01").is_accepted());
        assert!(!dfa.run("1").is_accepted());
        assert!(!dfa.run("11").is_accepted());
    }

    #[test]
    fn exact_match_rejects_everything_else() {
        let dfa = exact_match("101", &binary()).unwrap();
        assert!(dfa.run("101").is_accepted());
        assert!(!dfa.run("1010").is_accepted());
        assert!(!dfa.run("10").is_accepted());
        assert!(!dfa.run("001").is_accepted());
    }

    #[test]
    fn start_end_requires_both_patterns() {
        let dfa = start_end_pattern("11", "01", &binary()).unwrap();
        assert!(dfa.run("1101").is_accepted());
        assert!(dfa.run("11001").is_accepted());
        assert!(!dfa.run("1110").is_accepted());
        assert!(!dfa.run("0101").is_accepted());
        assert!(!dfa.run("11").is_accepted());
    }

    #[test]
    fn single_symbol_start_pattern_hands_over_immediately() {
        let dfa = start_end_pattern("0", "01", &binary()).unwrap();
        assert!(dfa.run("001").is_accepted());
        assert!(dfa.run("01").is_accepted());
        assert!(!dfa.run("101").is_accepted());
    }

    #[test]
    fn empty_patterns_are_refused() {
        assert_eq!(
            ends_with("", &binary()).unwrap_err(),
            ConfigError::EmptyPattern
        );
        assert_eq!(
            contains("", &binary()).unwrap_err(),
            ConfigError::EmptyPattern
        );
        assert_eq!(
            not_contains("", &binary()).unwrap_err(),
            ConfigError::EmptyPattern
        );
    }

    #[test]
    fn foreign_pattern_symbols_are_refused() {
        assert!(matches!(
            ends_with("0a1", &binary()).unwrap_err(),
            ConfigError::PatternSymbolNotInAlphabet { symbol: 'a', .. }
        ));
    }
}
