//! Hand-shaped automata for properties that only need a handful of states
//! tracking the role of recently seen symbols.
//!
//! These constructors share no single algorithm, but they all follow the
//! same shape: a small copyable state type, a pure step function classifying
//! each symbol against one or two designated role symbols, and the
//! [`assemble`] driver that discovers the reachable states breadth-first and
//! tabulates the transitions. Symbols outside the designated roles either
//! hold the current state, mirror a role, or route to a reject sink; the
//! policy is each property's own and is recorded in its description.

use std::collections::VecDeque;
use std::hash::Hash;

use tracing::trace;

use crate::alphabet::CharAlphabet;
use crate::builder::DfaBuilder;
use crate::dfa::{Dfa, StateId};
use crate::math::Map;
use crate::synthesis::{parse_pattern, require_distinct, require_symbol, ConfigError};

/// Discovers the states reachable from `start` under `step` breadth-first
/// and assembles the resulting automaton. Only reachable states are ever
/// created, in discovery order.
fn assemble<S>(
    alphabet: &CharAlphabet,
    start: S,
    step: impl Fn(S, char) -> S,
    label: impl Fn(S) -> String,
    accepting: impl Fn(S) -> bool,
    description: String,
) -> Dfa
where
    S: Copy + Eq + Hash,
{
    let mut b = DfaBuilder::new(alphabet.clone());
    let mut ids: Map<S, StateId> = Map::default();
    let mut worklist = VecDeque::from([start]);
    let start_id = b.state(label(start));
    if accepting(start) {
        b.accept(start_id);
    }
    ids.insert(start, start_id);
    b.initial(start_id);
    while let Some(state) = worklist.pop_front() {
        let from = ids[&state];
        for symbol in alphabet.symbols() {
            let successor = step(state, symbol);
            let to = match ids.get(&successor) {
                Some(&id) => id,
                None => {
                    let id = b.state(label(successor));
                    trace!(id, "discovered state");
                    if accepting(successor) {
                        b.accept(id);
                    }
                    ids.insert(successor, id);
                    worklist.push_back(successor);
                    id
                }
            };
            b.transition(from, symbol, to);
        }
    }
    b.into_dfa(description)
}

/// Accepts strings of length at least two that start and end with the same
/// character. Single characters do not count as their own bracket.
pub fn same_start_end(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Anchor {
        Fresh,
        Track { first: char, matching: bool },
    }
    Ok(assemble(
        alphabet,
        Anchor::Fresh,
        |state, symbol| match state {
            Anchor::Fresh => Anchor::Track {
                first: symbol,
                matching: false,
            },
            Anchor::Track { first, .. } => Anchor::Track {
                first,
                matching: symbol == first,
            },
        },
        |state| match state {
            Anchor::Fresh => "qStart".to_string(),
            Anchor::Track {
                first,
                matching: false,
            } => format!("q{first}_start"),
            Anchor::Track { first, .. } => format!("q{first}_accept"),
        },
        |state| matches!(state, Anchor::Track { matching: true, .. }),
        "Accepts strings that start and end with the same character.".to_string(),
    ))
}

/// Accepts strings that strictly alternate between '0' and '1'. The empty
/// string and single symbols count as alternating; any symbol outside the
/// two roles is fatal.
pub fn alternating(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    require_symbol('0', alphabet)?;
    require_symbol('1', alphabet)?;
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Alt {
        Fresh,
        LastZero,
        LastOne,
        Dead,
    }
    Ok(assemble(
        alphabet,
        Alt::Fresh,
        |state, symbol| match (state, symbol) {
            (Alt::Fresh, '0') | (Alt::LastOne, '0') => Alt::LastZero,
            (Alt::Fresh, '1') | (Alt::LastZero, '1') => Alt::LastOne,
            _ => Alt::Dead,
        },
        |state| {
            match state {
                Alt::Fresh => "qStart",
                Alt::LastZero => "q0",
                Alt::LastOne => "q1",
                Alt::Dead => "qReject",
            }
            .to_string()
        },
        |state| !matches!(state, Alt::Dead),
        "Accepts strings with alternating 0s and 1s.".to_string(),
    ))
}

/// Accepts strings that end with `end_symbol`, or whose run of
/// `count_symbol` occurrences since the last `end_symbol` has the length the
/// original table deems balanced. Symbols outside both roles hold the
/// current state; if both roles name the same symbol, the end role wins.
pub fn end_with_or_even_after(
    end_symbol: char,
    count_symbol: char,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(end_symbol, alphabet)?;
    require_symbol(count_symbol, alphabet)?;
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Tail {
        Fresh,
        AfterEnd,
        EvenRun,
        OddRun,
    }
    Ok(assemble(
        alphabet,
        Tail::Fresh,
        move |state, symbol| {
            if symbol == end_symbol {
                Tail::AfterEnd
            } else if symbol == count_symbol {
                match state {
                    Tail::Fresh | Tail::AfterEnd | Tail::OddRun => Tail::EvenRun,
                    Tail::EvenRun => Tail::OddRun,
                }
            } else {
                state
            }
        },
        |state| {
            match state {
                Tail::Fresh => "qStart",
                Tail::AfterEnd => "qAfterEnd",
                Tail::EvenRun => "qEvenCount",
                Tail::OddRun => "qOddCount",
            }
            .to_string()
        },
        |state| matches!(state, Tail::AfterEnd | Tail::EvenRun),
        format!(
            "Accepts strings ending with '{end_symbol}' or with even '{count_symbol}' count after the last '{end_symbol}'."
        ),
    ))
}

/// Preset of [`end_with_or_even_after`] for ending with '1' or an even
/// number of '0's after the last '1'.
pub fn end_one_or_even_zeros(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    end_with_or_even_after('1', '0', alphabet)
}

/// Accepts strings in which every `inner` is immediately preceded and
/// followed by `outer`. Symbols outside both roles act like `outer`. When
/// both roles name the same symbol the property collapses to "no `inner` at
/// all", which gets its own two-state machine.
pub fn each_surrounded(
    inner: char,
    outer: char,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(inner, alphabet)?;
    require_symbol(outer, alphabet)?;

    if inner == outer {
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        enum Pure {
            Clean,
            Broken,
        }
        return Ok(assemble(
            alphabet,
            Pure::Clean,
            move |state, symbol| {
                if symbol == inner {
                    Pure::Broken
                } else {
                    state
                }
            },
            |state| {
                match state {
                    Pure::Clean => "qAccept",
                    Pure::Broken => "qReject",
                }
                .to_string()
            },
            |state| matches!(state, Pure::Clean),
            format!("Accepts strings with no '{inner}' (special case)."),
        ));
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Surround {
        Fresh,
        Shielded,
        Exposed,
        Dead,
    }
    Ok(assemble(
        alphabet,
        Surround::Fresh,
        move |state, symbol| match state {
            Surround::Dead => Surround::Dead,
            _ if symbol == inner => match state {
                Surround::Shielded => Surround::Exposed,
                _ => Surround::Dead,
            },
            _ => Surround::Shielded,
        },
        |state| {
            match state {
                Surround::Fresh => "qStart",
                Surround::Shielded => "qAfterSurrounding",
                Surround::Exposed => "qAfterSurrounded",
                Surround::Dead => "qReject",
            }
            .to_string()
        },
        |state| matches!(state, Surround::Fresh | Surround::Shielded),
        format!(
            "Accepts strings where each '{inner}' is immediately preceded and followed by '{outer}'."
        ),
    ))
}

/// Preset of [`each_surrounded`] for '0' surrounded by '1's.
pub fn zero_surrounded(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    each_surrounded('0', '1', alphabet)
}

/// Accepts strings in which every occurrence of `symbol` is immediately
/// followed by `pattern`. Divergence while the pattern is being checked is
/// fatal; strings ending mid-check are rejected.
pub fn symbol_followed_by_pattern(
    symbol: char,
    pattern: &str,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    let pattern = parse_pattern(pattern, alphabet)?;
    let expected = pattern.clone();
    let len = pattern.len();

    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Follow {
        Idle,
        // 1-based progress through the required pattern
        Matching(usize),
        Dead,
    }
    Ok(assemble(
        alphabet,
        Follow::Idle,
        move |state, s| match state {
            Follow::Idle => {
                if s == symbol {
                    Follow::Matching(1)
                } else {
                    Follow::Idle
                }
            }
            Follow::Matching(i) => {
                if s == expected[i - 1] {
                    if i == len {
                        Follow::Idle
                    } else {
                        Follow::Matching(i + 1)
                    }
                } else {
                    Follow::Dead
                }
            }
            Follow::Dead => Follow::Dead,
        },
        |state| match state {
            Follow::Idle => "q0".to_string(),
            Follow::Matching(i) => format!("q{i}"),
            Follow::Dead => "qTrap".to_string(),
        },
        |state| matches!(state, Follow::Idle),
        format!(
            "Accepts strings where every '{symbol}' is immediately followed by \"{}\".",
            pattern.iter().collect::<String>()
        ),
    ))
}

/// Preset of [`symbol_followed_by_pattern`] for every '0' followed by "11".
pub fn zero_followed_by_ones(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    symbol_followed_by_pattern('0', "11", alphabet)
}

/// Accepts nonempty strings consisting solely of `symbol`.
pub fn only_one_symbol(symbol: char, alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    require_symbol(symbol, alphabet)?;
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Uniform {
        Fresh,
        Seen,
        Dead,
    }
    Ok(assemble(
        alphabet,
        Uniform::Fresh,
        move |state, s| match state {
            Uniform::Dead => Uniform::Dead,
            _ if s == symbol => Uniform::Seen,
            _ => Uniform::Dead,
        },
        |state| {
            match state {
                Uniform::Fresh => "Q0",
                Uniform::Seen => "Q1",
                Uniform::Dead => "QTrap",
            }
            .to_string()
        },
        |state| matches!(state, Uniform::Seen),
        format!("Accepts strings consisting only of '{symbol}'."),
    ))
}

/// Accepts nonempty strings consisting solely of `first` or solely of
/// `second`: the two-symbol mirror of [`only_one_symbol`], with the state
/// machine duplicated per role.
pub fn all_one_symbol_or_another(
    first: char,
    second: char,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(first, alphabet)?;
    require_symbol(second, alphabet)?;
    require_distinct(first, second)?;
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Either {
        Fresh,
        OnlyFirst,
        OnlySecond,
        Dead,
    }
    Ok(assemble(
        alphabet,
        Either::Fresh,
        move |state, s| match state {
            Either::Fresh => {
                if s == first {
                    Either::OnlyFirst
                } else if s == second {
                    Either::OnlySecond
                } else {
                    Either::Dead
                }
            }
            Either::OnlyFirst if s == first => Either::OnlyFirst,
            Either::OnlySecond if s == second => Either::OnlySecond,
            _ => Either::Dead,
        },
        move |state| match state {
            Either::Fresh => "qStart".to_string(),
            Either::OnlyFirst => format!("q{first}"),
            Either::OnlySecond => format!("q{second}"),
            Either::Dead => "qTrap".to_string(),
        },
        |state| matches!(state, Either::OnlyFirst | Either::OnlySecond),
        format!(
            "Accepts nonempty strings consisting only of '{first}' or only of '{second}'."
        ),
    ))
}

/// Accepts strings whose first designated symbol decides the required length
/// parity: `odd_start` demands odd length, `even_start` demands even length.
/// Symbols outside both roles hold in the start state; once tracking, every
/// symbol flips the parity.
pub fn start_parity_length(
    odd_start: char,
    even_start: char,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    require_symbol(odd_start, alphabet)?;
    require_symbol(even_start, alphabet)?;
    require_distinct(odd_start, even_start)?;
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum ParityTrack {
        Fresh,
        Counting { odd_entry: bool, odd_len: bool },
    }
    Ok(assemble(
        alphabet,
        ParityTrack::Fresh,
        move |state, s| match state {
            ParityTrack::Fresh => {
                if s == odd_start {
                    ParityTrack::Counting {
                        odd_entry: true,
                        odd_len: true,
                    }
                } else if s == even_start {
                    ParityTrack::Counting {
                        odd_entry: false,
                        odd_len: true,
                    }
                } else {
                    ParityTrack::Fresh
                }
            }
            ParityTrack::Counting { odd_entry, odd_len } => ParityTrack::Counting {
                odd_entry,
                odd_len: !odd_len,
            },
        },
        move |state| match state {
            ParityTrack::Fresh => "qStart".to_string(),
            ParityTrack::Counting { odd_entry, odd_len } => {
                let entry = if odd_entry { odd_start } else { even_start };
                let parity = if odd_len { "odd" } else { "even" };
                format!("q{entry}_{parity}")
            }
        },
        |state| {
            matches!(
                state,
                ParityTrack::Counting {
                    odd_entry: true,
                    odd_len: true,
                } | ParityTrack::Counting {
                    odd_entry: false,
                    odd_len: false,
                }
            )
        },
        format!(
            "Accepts: starts with '{odd_start}' and odd length, or starts with '{even_start}' and even length."
        ),
    ))
}

/// Accepts strings that start with "10", or end with '0' and have odd
/// length. A hand-tabulated seven-state machine defined only over the
/// binary alphabet.
pub fn start_ten_or_end_zero_odd(alphabet: &CharAlphabet) -> Result<Dfa, ConfigError> {
    if alphabet.size() != 2 || !alphabet.contains('0') || !alphabet.contains('1') {
        return Err(ConfigError::BinaryAlphabetRequired);
    }
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    enum Tab {
        Q0,
        Q1,
        Q2,
        Q3,
        Q4,
        Q5,
        Q6,
    }
    Ok(assemble(
        alphabet,
        Tab::Q0,
        |state, symbol| {
            if symbol == '0' {
                match state {
                    Tab::Q0 => Tab::Q2,
                    Tab::Q1 => Tab::Q3,
                    Tab::Q2 => Tab::Q5,
                    Tab::Q3 => Tab::Q3,
                    Tab::Q4 => Tab::Q2,
                    Tab::Q5 => Tab::Q2,
                    Tab::Q6 => Tab::Q5,
                }
            } else {
                match state {
                    Tab::Q0 => Tab::Q1,
                    Tab::Q1 => Tab::Q4,
                    Tab::Q2 => Tab::Q4,
                    Tab::Q3 => Tab::Q3,
                    Tab::Q4 => Tab::Q6,
                    Tab::Q5 => Tab::Q6,
                    Tab::Q6 => Tab::Q4,
                }
            }
        },
        |state| {
            match state {
                Tab::Q0 => "Q0",
                Tab::Q1 => "Q1",
                Tab::Q2 => "Q2",
                Tab::Q3 => "Q3",
                Tab::Q4 => "Q4",
                Tab::Q5 => "Q5",
                Tab::Q6 => "Q6",
            }
            .to_string()
        },
        |state| matches!(state, Tab::Q2 | Tab::Q3),
        "Accepts strings starting with 10 or ending with 0 and having odd length.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn binary() -> CharAlphabet {
        CharAlphabet::parse("01").unwrap()
    }

    fn ternary() -> CharAlphabet {
        CharAlphabet::parse("01a").unwrap()
    }

    #[test]
    fn same_start_end_needs_a_real_bracket() {
        let dfa = same_start_end(&binary()).unwrap();
        assert!(dfa.run("00").is_accepted());
        assert!(dfa.run("010").is_accepted());
        assert!(dfa.run("1011").is_accepted());
        assert!(!dfa.run("01").is_accepted());
        assert!(!dfa.run("0").is_accepted());
        assert!(!dfa.run("").is_accepted());
    }

    #[test]
    fn alternating_breaks_on_repeats_and_foreign_symbols() {
        let dfa = alternating(&ternary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("0").is_accepted());
        assert!(dfa.run("0101").is_accepted());
        assert!(dfa.run("10").is_accepted());
        assert!(!dfa.run("110").is_accepted());
        assert!(!dfa.run("0a1").is_accepted());
        assert!(matches!(
            alternating(&CharAlphabet::parse("ab").unwrap()).unwrap_err(),
            ConfigError::SymbolNotInAlphabet { symbol: '0', .. }
        ));
    }

    #[test_log::test]
    fn end_with_or_even_after_follows_the_original_table() {
        let dfa = end_one_or_even_zeros(&binary()).unwrap();
        assert!(dfa.run("1").is_accepted());
        assert!(dfa.run("10").is_accepted());
        assert!(dfa.run("001").is_accepted());
        assert!(!dfa.run("").is_accepted());
        assert!(!dfa.run("100").is_accepted());
        assert!(dfa.run("1000").is_accepted());
    }

    #[test]
    fn each_surrounded_requires_shielding_on_both_sides() {
        let dfa = zero_surrounded(&binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("1").is_accepted());
        assert!(dfa.run("101").is_accepted());
        assert!(dfa.run("10101").is_accepted());
        assert!(!dfa.run("010").is_accepted());
        assert!(!dfa.run("10").is_accepted());
        assert!(!dfa.run("1001").is_accepted());
    }

    #[test]
    fn each_surrounded_collapses_when_roles_coincide() {
        let dfa = each_surrounded('0', '0', &binary()).unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("111").is_accepted());
        assert!(!dfa.run("010").is_accepted());
    }

    #[test]
    fn followed_by_pattern_checks_the_full_suffix() {
        let dfa = zero_followed_by_ones(&binary()).unwrap();
        assert!(dfa.run("").is_accepted());
        assert!(dfa.run("1").is_accepted());
        assert!(dfa.run("011").is_accepted());
        assert!(dfa.run("0111").is_accepted());
        assert!(!dfa.run("01").is_accepted());
        assert!(!dfa.run("010").is_accepted());
        assert!(!dfa.run("0110").is_accepted());
    }

    #[test]
    fn uniform_strings_must_be_nonempty() {
        let only = only_one_symbol('0', &binary()).unwrap();
        assert!(only.run("000").is_accepted());
        assert!(!only.run("").is_accepted());
        assert!(!only.run("01").is_accepted());

        let either = all_one_symbol_or_another('0', '1', &binary()).unwrap();
        assert!(either.run("000").is_accepted());
        assert!(either.run("11").is_accepted());
        assert!(!either.run("").is_accepted());
        assert!(!either.run("01").is_accepted());
        assert_eq!(
            all_one_symbol_or_another('0', '0', &binary()).unwrap_err(),
            ConfigError::IndistinctSymbols('0')
        );
    }

    #[test]
    fn start_symbol_decides_the_required_parity() {
        let dfa = start_parity_length('0', '1', &binary()).unwrap();
        assert!(dfa.run("0").is_accepted());
        assert!(dfa.run("011").is_accepted());
        assert!(dfa.run("10").is_accepted());
        assert!(!dfa.run("01").is_accepted());
        assert!(!dfa.run("1").is_accepted());
        assert!(!dfa.run("").is_accepted());
        // symbols outside both roles hold in the start state
        let loose = start_parity_length('0', '1', &ternary()).unwrap();
        assert!(loose.run("a0").is_accepted());
    }

    #[test]
    fn tabulated_disjunction_matches_its_table() {
        let dfa = start_ten_or_end_zero_odd(&binary()).unwrap();
        assert!(dfa.run("10").is_accepted());
        assert!(dfa.run("100").is_accepted());
        assert!(dfa.run("0").is_accepted());
        assert!(dfa.run("010").is_accepted());
        assert!(!dfa.run("1").is_accepted());
        assert!(!dfa.run("00").is_accepted());
        assert!(!dfa.run("").is_accepted());
        assert_eq!(
            start_ten_or_end_zero_odd(&ternary()).unwrap_err(),
            ConfigError::BinaryAlphabetRequired
        );
    }
}
