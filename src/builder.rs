//! Incremental construction of [`Dfa`] values.

use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::debug;

use crate::alphabet::CharAlphabet;
use crate::dfa::{Dfa, StateId};
use crate::math::Bijection;

/// Builds a [`Dfa`] state by state and transition by transition.
///
/// Labels are interned: asking for a state with a label that already exists
/// returns the existing id, so constructors can refer to states by name
/// without bookkeeping. Finishing the build checks totality and trims states
/// that are not reachable from the initial state, which keeps the
/// reachability invariant intact even for configurations where an eagerly
/// tabulated sink never gets a predecessor (a starts-with trap over a unary
/// alphabet, for instance).
pub struct DfaBuilder {
    alphabet: CharAlphabet,
    index: Bijection<String, StateId>,
    edges: Vec<Vec<Option<StateId>>>,
    accepting: BitSet,
    initial: Option<StateId>,
}

impl DfaBuilder {
    /// Creates an empty builder over the given alphabet.
    pub fn new(alphabet: CharAlphabet) -> Self {
        Self {
            alphabet,
            index: Bijection::new(),
            edges: Vec::new(),
            accepting: BitSet::new(),
            initial: None,
        }
    }

    /// Returns the id of the state with the given label, creating the state
    /// if it does not exist yet. Creation order determines state ids.
    pub fn state(&mut self, label: impl Into<String>) -> StateId {
        let label = label.into();
        if let Some(&id) = self.index.get_by_left(&label) {
            return id;
        }
        let id = self.edges.len();
        self.index.insert(label, id);
        self.edges.push(vec![None; self.alphabet.size()]);
        id
    }

    /// Records the transition `from --symbol--> to`.
    ///
    /// Panics if `symbol` is not part of the alphabet; constructors only ever
    /// iterate the alphabet itself, so hitting this is a programming error.
    pub fn transition(&mut self, from: StateId, symbol: char, to: StateId) {
        let column = self
            .alphabet
            .index_of(symbol)
            .unwrap_or_else(|| panic!("symbol '{symbol}' is not part of the alphabet"));
        self.edges[from][column] = Some(to);
    }

    /// Marks `state` as accepting.
    pub fn accept(&mut self, state: StateId) {
        self.accepting.insert(state);
    }

    /// Designates the initial state.
    pub fn initial(&mut self, state: StateId) {
        self.initial = Some(state);
    }

    /// Finalizes the build into an immutable [`Dfa`] carrying `description`.
    ///
    /// Panics if no initial state was designated or the transition table is
    /// incomplete. States unreachable from the initial state are dropped,
    /// preserving the creation order of the survivors.
    pub fn into_dfa(self, description: impl Into<String>) -> Dfa {
        let initial = self
            .initial
            .expect("initial state must be designated before finishing");
        let n = self.edges.len();
        for (q, row) in self.edges.iter().enumerate() {
            for (column, slot) in row.iter().enumerate() {
                if slot.is_none() {
                    panic!(
                        "state '{}' has no transition on '{}'",
                        self.index
                            .get_by_right(&q)
                            .expect("every state is labeled"),
                        self.alphabet[column]
                    );
                }
            }
        }

        let mut reachable = BitSet::with_capacity(n);
        reachable.insert(initial);
        let mut queue = VecDeque::from([initial]);
        while let Some(q) = queue.pop_front() {
            for slot in &self.edges[q] {
                let p = slot.expect("transition table verified total");
                if reachable.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        if reachable.len() < n {
            debug!(
                dropped = n - reachable.len(),
                "trimming unreachable states"
            );
        }

        let mut remap = vec![StateId::MAX; n];
        let mut labels = Vec::with_capacity(reachable.len());
        for q in 0..n {
            if reachable.contains(q) {
                remap[q] = labels.len();
                labels.push(
                    self.index
                        .get_by_right(&q)
                        .expect("every state is labeled")
                        .clone(),
                );
            }
        }
        let edges = (0..n)
            .filter(|&q| reachable.contains(q))
            .map(|q| {
                self.edges[q]
                    .iter()
                    .map(|slot| remap[slot.expect("transition table verified total")])
                    .collect()
            })
            .collect();
        let mut accepting = BitSet::with_capacity(labels.len());
        for q in self.accepting.iter() {
            if reachable.contains(q) {
                accepting.insert(remap[q]);
            }
        }

        Dfa {
            alphabet: self.alphabet,
            labels,
            edges,
            initial: remap[initial],
            accepting,
            description: description.into(),
        }
    }
}
