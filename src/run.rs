//! Running automata against finite inputs.

use itertools::Itertools;
use tracing::trace;

use crate::dfa::{Dfa, StateId};

/// The result of running a [`Dfa`] on a finite input string.
///
/// A run either consumes the whole input and yields a verdict, or stops at
/// the first symbol that is not part of the automaton's alphabet. The latter
/// is an input-validity failure, deliberately distinct from a rejection: the
/// automaton never saw a full word, so it has no verdict to give.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every symbol was consumed; `accepted` tells whether the reached state
    /// is accepting. The path includes the initial state, so its length is
    /// the input length plus one.
    Decided {
        /// Whether the final state is accepting.
        accepted: bool,
        /// All visited states, starting with the initial state.
        path: Vec<StateId>,
    },
    /// The input contained a symbol outside the alphabet. The run stops on
    /// the spot; the path covers the initial state plus one entry per symbol
    /// consumed before the offender.
    InvalidSymbol {
        /// The offending symbol.
        symbol: char,
        /// Position of the offender within the input, counted in symbols.
        position: usize,
        /// The partial path walked before the run stopped.
        path: Vec<StateId>,
    },
}

impl RunOutcome {
    /// True if the run consumed the whole input and ended in an accepting
    /// state.
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Decided { accepted: true, .. })
    }

    /// The visited states, partial if the run stopped on an invalid symbol.
    pub fn path(&self) -> &[StateId] {
        match self {
            RunOutcome::Decided { path, .. } | RunOutcome::InvalidSymbol { path, .. } => path,
        }
    }

    /// The last state the run visited.
    pub fn reached(&self) -> StateId {
        *self
            .path()
            .last()
            .expect("every path contains the initial state")
    }

    /// Formats the visited states as a readable arrow-separated chain, using
    /// the labels of the automaton the run was produced by.
    pub fn display_path(&self, dfa: &Dfa) -> String {
        self.path().iter().map(|&q| dfa.label(q)).join(" → ")
    }
}

impl Dfa {
    /// Runs the automaton on `input`, starting from the initial state.
    ///
    /// Takes time linear in the input length and never mutates the
    /// automaton. See [`RunOutcome`] for the two ways a run can end.
    pub fn run(&self, input: &str) -> RunOutcome {
        let mut current = self.initial();
        let mut path = Vec::with_capacity(input.len() + 1);
        path.push(current);
        for (position, symbol) in input.chars().enumerate() {
            match self.successor(current, symbol) {
                Some(next) => {
                    trace!(from = current, %symbol, to = next, "step");
                    current = next;
                    path.push(next);
                }
                None => return RunOutcome::InvalidSymbol {
                    symbol,
                    position,
                    path,
                },
            }
        }
        RunOutcome::Decided {
            accepted: self.is_accepting(current),
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::DfaBuilder;
    use crate::prelude::*;

    fn ends_with_b() -> Dfa {
        let mut b = DfaBuilder::new(CharAlphabet::parse("ab").unwrap());
        let no = b.state("no");
        let yes = b.state("yes");
        for q in [no, yes] {
            b.transition(q, 'a', no);
            b.transition(q, 'b', yes);
        }
        b.initial(no);
        b.accept(yes);
        b.into_dfa("ends with b")
    }

    #[test]
    fn verdict_follows_final_state() {
        let dfa = ends_with_b();
        assert!(dfa.run("aab").is_accepted());
        assert!(!dfa.run("aba").is_accepted());
        assert!(!dfa.run("").is_accepted());
    }

    #[test]
    fn path_covers_start_and_every_step() {
        let dfa = ends_with_b();
        let outcome = dfa.run("abb");
        assert_eq!(outcome.path().len(), 4);
        assert_eq!(outcome.reached(), 1);
        assert_eq!(outcome.display_path(&dfa), "no → no → yes → yes");
    }

    #[test]
    fn invalid_symbol_stops_the_run() {
        let dfa = ends_with_b();
        let outcome = dfa.run("abxa");
        assert_eq!(
            outcome,
            RunOutcome::InvalidSymbol {
                symbol: 'x',
                position: 2,
                path: vec![0, 0, 1],
            }
        );
        assert!(!outcome.is_accepted());
    }
}
