//! Constructors for counting properties: occurrence parity, bounded counts,
//! remainders and length limits. State spaces are fixed or linear in the
//! requested bound, with saturating or fatal overshoot depending on the
//! property.

use tracing::debug;

use crate::alphabet::CharAlphabet;
use crate::builder::DfaBuilder;
use crate::dfa::{Dfa, StateId};
use crate::synthesis::{require_distinct, require_symbol, ConfigError, Parity};

/// Accepts strings with an even number of `symbol` (zero included).
pub fn even_count(symbol: char, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    occurrence_parity(symbol, alphabet, Parity::Even)
}

/// Accepts strings with an odd number of `symbol`.
pub fn odd_count(symbol: char, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    occurrence_parity(symbol, alphabet, Parity::Odd)
}

fn occurrence_parity(
    symbol: char,
    alphabet: &CharAlphabet,
    parity: Parity,
) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let mut b = DfaBuilder::new(alphabet.clone());
    let even = b.state("q0");
    let odd = b.state("q1");
    for s in alphabet.symbols() {
        if s == symbol {
            b.transition(even, s, odd);
            b.transition(odd, s, even);
        } else {
            b.transition(even, s, even);
            b.transition(odd, s, odd);
        }
    }
    b.initial(even);
    let description = match parity {
        Parity::Even => {
            b.accept(even);
            format!("Accepts strings with an even number of '{symbol}' (including zero).")
        }
        Parity::Odd => {
            b.accept(odd);
            format!("Accepts strings with an odd number of '{symbol}'.")
        }
    };
    Ok(b.into_dfa(description))
}

/// Accepts strings with at least `count` occurrences of `symbol`. The
/// counter saturates at `count`; additional occurrences are harmless.
pub fn at_least_count(
    symbol: char,
    count: u32,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let count = count as usize;
    debug!(%symbol, count, "building at-least automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..=count).map(|i| b.state(format!("q{i}"))).collect();
    for (i, &from) in states.iter().enumerate() {
        for s in alphabet.symbols() {
            let next = if s == symbol {
                states[(i + 1).min(count)]
            } else {
                from
            };
            b.transition(from, s, next);
        }
    }
    b.initial(states[0]);
    b.accept(states[count]);
    Ok(b.into_dfa(format!(
        "Accepts strings with at least {count} '{symbol}'."
    )))
}

/// Accepts strings with exactly `count` occurrences of `symbol`. Unlike
/// [`at_least_count`], any occurrence past the target is fatal.
pub fn exact_count(symbol: char, count: u32, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let count = count as usize;
    debug!(%symbol, count, "building exact-count automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..=count).map(|i| b.state(format!("q{i}"))).collect();
    let reject = b.state("qReject");
    for (i, &from) in states.iter().enumerate() {
        for s in alphabet.symbols() {
            let next = if s == symbol {
                if i < count {
                    states[i + 1]
                } else {
                    reject
                }
            } else {
                from
            };
            b.transition(from, s, next);
        }
    }
    for s in alphabet.symbols() {
        b.transition(reject, s, reject);
    }
    b.initial(states[0]);
    b.accept(states[count]);
    Ok(b.into_dfa(format!(
        "Accepts strings with exactly {count} '{symbol}'."
    )))
}

/// Accepts strings in which `symbol` never occurs twice in a row.
pub fn no_consecutive(symbol: char, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let mut b = DfaBuilder::new(alphabet.clone());
    let clear = b.state("q0");
    let pending = b.state("q1");
    let reject = b.state("qReject");
    for s in alphabet.symbols() {
        if s == symbol {
            b.transition(clear, s, pending);
            b.transition(pending, s, reject);
        } else {
            b.transition(clear, s, clear);
            b.transition(pending, s, clear);
        }
        b.transition(reject, s, reject);
    }
    b.initial(clear);
    b.accept(clear);
    b.accept(pending);
    Ok(b.into_dfa(format!(
        "Accepts strings with no consecutive '{symbol}'."
    )))
}

/// Accepts strings carrying `symbol` at every position of the given 1-based
/// parity. Positions of the other parity are unconstrained.
pub fn position_parity(
    symbol: char,
    parity: Parity,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let mut b = DfaBuilder::new(alphabet.clone());
    let at_odd = b.state("q0");
    let at_even = b.state("q1");
    let reject = b.state("qReject");
    for s in alphabet.symbols() {
        let from_odd = match parity {
            Parity::Odd if s != symbol => reject,
            _ => at_even,
        };
        let from_even = match parity {
            Parity::Even if s != symbol => reject,
            _ => at_odd,
        };
        b.transition(at_odd, s, from_odd);
        b.transition(at_even, s, from_even);
        b.transition(reject, s, reject);
    }
    b.initial(at_odd);
    b.accept(at_odd);
    b.accept(at_even);
    let parity_name = match parity {
        Parity::Odd => "odd",
        Parity::Even => "even",
    };
    Ok(b.into_dfa(format!(
        "Accepts strings with '{symbol}' at all {parity_name} positions (1-based)."
    )))
}

/// Accepts strings that, read as a base-`alphabet.size()` numeral with the
/// symbol order giving digit values, denote a multiple of `divisor`. States
/// track the running remainder.
pub fn divisible_by(divisor: u32, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    if divisor < 2 {
        return Err(ConfigError::DivisorTooSmall(divisor));
    }
    let n = divisor as usize;
    let base = alphabet.size();
    debug!(divisor = n, base, "building divisibility automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..n).map(|i| b.state(format!("q{i}"))).collect();
    for (i, &from) in states.iter().enumerate() {
        for (digit, s) in alphabet.symbols().enumerate() {
            b.transition(from, s, states[(i * base + digit) % n]);
        }
    }
    b.initial(states[0]);
    b.accept(states[0]);
    Ok(b.into_dfa(format!(
        "Accepts base-{base} numbers divisible by {n}."
    )))
}

/// Accepts strings of length at most `limit`. One state per consumed symbol
/// up to the limit, then an absorbing overflow sink.
pub fn length_at_most(limit: u32, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    let limit = limit as usize;
    let mut b = DfaBuilder::new(alphabet.clone());
    let states: Vec<StateId> = (0..=limit).map(|i| b.state(format!("q{i}"))).collect();
    let over = b.state("qOver");
    for (i, &from) in states.iter().enumerate() {
        let next = if i < limit { states[i + 1] } else { over };
        for s in alphabet.symbols() {
            b.transition(from, s, next);
        }
    }
    for s in alphabet.symbols() {
        b.transition(over, s, over);
    }
    b.initial(states[0]);
    for &q in &states {
        b.accept(q);
    }
    Ok(b.into_dfa(format!("Accepts strings of length at most {limit}.")))
}

/// Accepts strings with exactly `exact_count` occurrences of `exact_symbol`
/// and at least `min_count` occurrences of `min_symbol`. A grid of two
/// counters: the exact counter overshoots fatally, the minimum counter
/// saturates.
pub fn exact_and_minimum(
    exact_symbol: char,
    exact_count: u32,
    min_symbol: char,
    min_count: u32,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(exact_symbol, alphabet)?;
    require_symbol(min_symbol, alphabet)?;
    require_distinct(exact_symbol, min_symbol)?;
    let n = exact_count as usize;
    let m = min_count as usize;
    debug!(%exact_symbol, n, %min_symbol, m, "building two-counter automaton");
    let mut b = DfaBuilder::new(alphabet.clone());
    // row-major over the saturating counter, matching discovery order
    let mut grid = vec![vec![0 as StateId; n + 1]; m + 1];
    for (have_min, row) in grid.iter_mut().enumerate() {
        for (have_exact, slot) in row.iter_mut().enumerate() {
            *slot = b.state(format!("q{}", have_min * (n + 1) + have_exact));
        }
    }
    let trap = b.state("qTrap");
    for have_min in 0..=m {
        for have_exact in 0..=n {
            let from = grid[have_min][have_exact];
            for s in alphabet.symbols() {
                let next = if s == exact_symbol {
                    if have_exact < n {
                        grid[have_min][have_exact + 1]
                    } else {
                        trap
                    }
                } else if s == min_symbol {
                    grid[(have_min + 1).min(m)][have_exact]
                } else {
                    from
                };
                b.transition(from, s, next);
            }
        }
    }
    for s in alphabet.symbols() {
        b.transition(trap, s, trap);
    }
    b.initial(grid[0][0]);
    b.accept(grid[m][n]);
    Ok(b.into_dfa(format!(
        "Accepts strings with exactly {n} '{exact_symbol}' and at least {m} '{min_symbol}'."
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
    fn parity_counters_toggle_on_the_tracked_symbol() {
        let even = even_count('0', &binary()).unwrap();
        assert!(even.run("").is_accepted());
        assert!(even.run("0110").is_accepted());
        assert!(!even.run("010").is_accepted());

        let odd = odd_count('0', &binary()).unwrap();
        assert!(!odd.run("").is_accepted());
        assert!(odd.run("010").is_accepted());
    }

    #[test]
    fn at_least_saturates_but_exactly_overshoots() {
        let at_least = at_least_count('1', 2, &binary()).unwrap();
        assert!(at_least.run("111").is_accepted());
        assert!(at_least.run("0101").is_accepted());
        assert!(!at_least.run("10").is_accepted());

        let exact = exact_count('1', 2, &binary()).unwrap();
        assert!(exact.run("0101").is_accepted());
        assert!(!exact.run("111").is_accepted());
        assert!(!exact.run("1").is_accepted());
    }

    #[test]
    fn exact_zero_forbids_the_symbol_entirely() {
        let dfa = exact_count('1', 0, &binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("000").is_accepted());
        assert!(!dfa.run("010").is_accepted());
    }

    #[test]
    fn no_consecutive_rejects_adjacent_pairs_only() {
        let dfa = no_consecutive('1', &binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("10101").is_accepted());
        assert!(dfa.run("1").is_accepted());
        assert!(!dfa.run("0110").is_accepted());
        assert!(!dfa.run("1100").is_accepted());
    }

    #[test]
    fn position_parity_constrains_one_parity_only() {
        let odd = position_parity('1', Parity::Odd, &binary()).unwrap();
        assert!(odd.run("").is_accepted());
        assert!(odd.run("10").is_accepted());
        assert!(odd.run("1011").is_accepted());
        assert!(!odd.run("01").is_accepted());

        let even = position_parity('0', Parity::Even, &binary()).unwrap();
        assert!(even.run("10").is_accepted());
        assert!(even.run("1").is_accepted());
        assert!(!even.run("11").is_accepted());
    }

    #[test]
    fn position_parity_over_a_unary_alphabet_never_needs_the_sink() {
        let unary = CharAlphabet::parse("1").unwrap();
        let dfa = position_parity('1', Parity::Odd, &unary).unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.run("111").is_accepted());
        assert!(dfa.invariants_hold());
    }

    #[test_log::test]
    fn divisibility_tracks_the_remainder() {
        let dfa = divisible_by(3, &binary()).unwrap();
        assert!(dfa.run("110").is_accepted());
        assert!(!dfa.run("101").is_accepted());
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("0").is_accepted());
        assert_eq!(
            divisible_by(1, &binary()).unwrap_err(),
            ConfigError::DivisorTooSmall(1)
        );
    }

    #[test]
    fn length_limit_overflows_into_the_sink() {
        let dfa = length_at_most(2, &binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("01").is_accepted());
        assert!(!dfa.run("010").is_accepted());
        assert!(!dfa.run("0101").is_accepted());
    }

    #[test]
    fn two_counter_grid_combines_both_policies() {
        let dfa = exact_and_minimum('0', 2, '1', 2, &binary()).unwrap();
        assert!(dfa.run("0011").is_accepted());
        assert!(dfa.run("00111").is_accepted());
        assert!(!dfa.run("00011").is_accepted());
        assert!(!dfa.run("001").is_accepted());
        assert_eq!(
            exact_and_minimum('0', 2, '0', 2, &binary()).unwrap_err(),
            ConfigError::IndistinctSymbols('0')
        );
    }

    #[test]
    fn missing_symbols_are_refused() {
        assert!(matches!(
            even_count('x', &binary()).unwrap_err(),
            ConfigError::SymbolNotInAlphabet { symbol: 'x', .. }
        ));
    }
}
