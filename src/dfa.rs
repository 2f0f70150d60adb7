//! The central automaton value type.

use std::fmt;

use bit_set::BitSet;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::alphabet::CharAlphabet;
use crate::math::Bijection;

/// Index of a state within a [`Dfa`]. States are numbered in the order in
/// which their constructor discovered them.
pub type StateId = usize;

/// A complete deterministic finite automaton over a [`CharAlphabet`].
///
/// Every `Dfa` satisfies four structural invariants, enforced at construction
/// time by [`DfaBuilder`](crate::builder::DfaBuilder):
///
/// 1. the transition table is total and closed over the state set,
/// 2. the initial state and all accepting states are members of the state set,
/// 3. the alphabet is duplicate- and whitespace-free,
/// 4. every state is reachable from the initial state.
///
/// Values are immutable once built; the canonical relabeling in
/// [`Dfa::normalized`] produces a fresh value rather than mutating in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: CharAlphabet,
    pub(crate) labels: Vec<String>,
    pub(crate) edges: Vec<Vec<StateId>>,
    pub(crate) initial: StateId,
    pub(crate) accepting: BitSet,
    pub(crate) description: String,
}

impl Dfa {
    /// The alphabet this automaton reads.
    pub fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Iterates over all state ids in discovery order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        0..self.labels.len()
    }

    /// The display label of the given state.
    pub fn label(&self, state: StateId) -> &str {
        &self.labels[state]
    }

    /// Iterates over the state labels in discovery order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// The designated initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Returns true if the given state is accepting.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state)
    }

    /// Iterates over the accepting states in ascending id order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter()
    }

    /// Human-readable description of the recognized property. Informational
    /// only, never consulted during simulation.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The successor of `state` under `symbol`, or `None` if the symbol is
    /// not part of the alphabet.
    pub fn successor(&self, state: StateId, symbol: char) -> Option<StateId> {
        let column = self.alphabet.index_of(symbol)?;
        Some(self.edges[state][column])
    }

    /// Returns a structurally identical automaton whose states carry the
    /// canonical labels `q0, q1, ...`, assigned in state order. Transitions,
    /// the initial state, the accepting set, the alphabet and the description
    /// are untouched, so simulation results are preserved exactly.
    pub fn normalized(&self) -> Dfa {
        let renaming: Bijection<String, String> = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, old)| (old.clone(), format!("q{i}")))
            .collect();
        trace!(states = self.size(), "relabeling states canonically");
        let labels = self
            .labels
            .iter()
            .map(|old| {
                renaming
                    .get_by_left(old)
                    .expect("every state label is renamed")
                    .clone()
            })
            .collect();
        Dfa {
            labels,
            ..self.clone()
        }
    }

    /// Renders the transition table as text, one row per state and one column
    /// per alphabet symbol. The initial state is marked with an arrow and
    /// accepting states are highlighted.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("state".to_string())
                .chain(self.alphabet.symbols().map(|s| s.to_string())),
        );
        for state in self.state_ids() {
            let mut name = self.label(state).to_string();
            if state == self.initial {
                name = format!("→ {name}");
            }
            if self.is_accepting(state) {
                name = name.green().to_string();
            }
            let mut row = vec![name];
            for column in 0..self.alphabet.size() {
                row.push(self.labels[self.edges[state][column]].clone());
            }
            builder.push_record(row);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    /// Verifies the structural invariants. Construction guarantees these, so
    /// this only serves tests and debugging.
    #[cfg(test)]
    pub(crate) fn invariants_hold(&self) -> bool {
        let n = self.size();
        let total = self
            .edges
            .iter()
            .all(|row| row.len() == self.alphabet.size() && row.iter().all(|&q| q < n));
        let anchored = self.initial < n && self.accepting.iter().all(|q| q < n);

        let mut reachable = BitSet::with_capacity(n);
        reachable.insert(self.initial);
        let mut queue = std::collections::VecDeque::from([self.initial]);
        while let Some(q) = queue.pop_front() {
            for &p in &self.edges[q] {
                if reachable.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        total && anchored && reachable.len() == n
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.description)?;
        write!(f, "{}", self.transition_table())
    }
}
