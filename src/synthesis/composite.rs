//! Constructor for properties over two interacting pattern automata,
//! realized as a lazily discovered product state space.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::alphabet::CharAlphabet;
use crate::builder::DfaBuilder;
use crate::dfa::{Dfa, StateId};
use crate::math::Map;
use crate::overlap::{overlap, self_overlap};
use crate::synthesis::{parse_pattern, ConfigError};

/// A product state: how far each pattern's suffix match has progressed, and
/// the clamped difference between completed occurrences of the two patterns.
type Signature = (usize, usize, i64);

/// Advances one pattern's suffix-match length by `symbol`. Completing the
/// pattern falls back to its self-overlap, so overlapping occurrences are
/// recognized rather than just disjoint ones.
fn advance(pattern: &[char], matched: usize, symbol: char) -> (usize, bool) {
    if matched == pattern.len() - 1 && pattern[matched] == symbol {
        (self_overlap(pattern), true)
    } else {
        let mut stem: Vec<char> = pattern[..matched].to_vec();
        stem.push(symbol);
        (overlap(pattern, &stem), false)
    }
}

/// Accepts strings containing equally many occurrences of `pattern1` and
/// `pattern2` (overlapping occurrences included).
///
/// States are signatures `(match1, match2, difference)` discovered
/// breadth-first from `(0, 0, 0)` with an explicit worklist and a memoized
/// signature map, so construction terminates without recursion. The
/// occurrence difference is clamped to `±imbalance_bound`: strings whose
/// true imbalance exceeds the bound share the boundary state and may be
/// misclassified, which is the price for a finite state space.
pub fn equal_count_patterns(
    pattern1: &str,
    pattern2: &str,
    imbalance_bound: u32,
    alphabet: &CharAlphabet,
) -> Result<Dfa, ConfigError> {
    let p1 = parse_pattern(pattern1, alphabet)?;
    let p2 = parse_pattern(pattern2, alphabet)?;
    if imbalance_bound == 0 {
        return Err(ConfigError::ZeroImbalanceBound);
    }
    let bound = i64::from(imbalance_bound);
    debug!(
        pattern1, pattern2, bound,
        "discovering product states breadth-first"
    );

    let mut b = DfaBuilder::new(alphabet.clone());
    let mut ids: Map<Signature, StateId> = Map::default();
    let mut worklist = VecDeque::new();

    let label = |(m1, m2, diff): Signature| format!("s{m1}_{m2}_{diff}");
    let start: Signature = (0, 0, 0);
    let start_id = b.state(label(start));
    ids.insert(start, start_id);
    worklist.push_back(start);

    while let Some(signature) = worklist.pop_front() {
        let (m1, m2, diff) = signature;
        let from = ids[&signature];
        for symbol in alphabet.symbols() {
            let (n1, complete1) = advance(&p1, m1, symbol);
            let (n2, complete2) = advance(&p2, m2, symbol);
            let shifted = diff + i64::from(complete1) - i64::from(complete2);
            let next = (n1, n2, shifted.clamp(-bound, bound));
            let to = match ids.get(&next) {
                Some(&id) => id,
                None => {
                    let id = b.state(label(next));
                    trace!(?next, id, "discovered product state");
                    ids.insert(next, id);
                    worklist.push_back(next);
                    id
                }
            };
            b.transition(from, symbol, to);
        }
    }

    for (&(_, _, diff), &id) in ids.iter() {
        if diff == 0 {
            b.accept(id);
        }
    }
    b.initial(start_id);
    Ok(b.into_dfa(format!(
        "Accepts strings with equal counts of \"{pattern1}\" and \"{pattern2}\"."
    )))
}
