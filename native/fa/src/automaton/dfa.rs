//! Deterministic Finite Automaton (DFA) over named states.

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use indexmap::IndexSet;
use std::collections::{HashMap, VecDeque};

/// The narrow interface subset construction emits a DFA through.
///
/// Implementors own their representation; the NFA side only ever calls these
/// four operations.
pub trait DfaBuilder {
    /// Add a non-final state.
    fn add_state(&mut self, name: &str);

    /// Add a final (accepting) state.
    fn add_final_state(&mut self, name: &str);

    /// Designate the start state, creating it if absent.
    fn add_start_state(&mut self, name: &str);

    /// Add the transition `source --symbol--> destination`.
    fn add_transition(&mut self, source: &str, symbol: Symbol, destination: &str);
}

/// A Deterministic Finite Automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    /// State names; the set index is the state's `StateId`
    states: IndexSet<String>,
    /// Start state (None if empty)
    start_state: Option<StateId>,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> destination
    transitions: HashMap<(StateId, Symbol), StateId>,
    /// All symbols used, in first-use order
    alphabet: IndexSet<Symbol>,
}

impl DFA {
    /// Create a new empty DFA.
    pub fn new() -> Self {
        Self {
            states: IndexSet::new(),
            start_state: None,
            final_states: StateSet::with_capacity(16),
            transitions: HashMap::new(),
            alphabet: IndexSet::new(),
        }
    }

    fn ensure_state(&mut self, name: &str) -> StateId {
        match self.states.get_index_of(name) {
            Some(idx) => idx as StateId,
            None => self.states.insert_full(name.to_owned()).0 as StateId,
        }
    }

    fn name(&self, id: StateId) -> &str {
        &self.states[id as usize]
    }

    /// Get the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get all state names in insertion order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.states.iter().map(String::as_str)
    }

    /// Get the start state.
    pub fn start_state(&self) -> Option<&str> {
        self.start_state.map(|id| self.name(id))
    }

    /// Get the final states in insertion order.
    pub fn final_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.final_states.iter().map(|id| self.name(id))
    }

    pub fn is_final(&self, name: &str) -> bool {
        self.states
            .get_index_of(name)
            .is_some_and(|idx| self.final_states.contains(idx as StateId))
    }

    /// Get the alphabet.
    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    /// Get the transition from a state on a symbol.
    pub fn transition(&self, source: &str, symbol: Symbol) -> Option<&str> {
        let source = self.states.get_index_of(source)? as StateId;
        self.transitions
            .get(&(source, symbol))
            .map(|&dest| self.name(dest))
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, Symbol, &str)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (self.name(src), sym, self.name(dst)))
    }

    /// Run the DFA on `input`. A missing transition rejects.
    pub fn accepts(&self, input: &str) -> bool {
        let Some(mut state) = self.start_state else {
            return false;
        };

        for symbol in input.chars() {
            match self.transitions.get(&(state, symbol)) {
                Some(&next) => state = next,
                None => return false,
            }
        }

        self.final_states.contains(state)
    }

    /// Check that every state has exactly one transition on every symbol.
    pub fn is_complete(&self) -> bool {
        (0..self.states.len() as StateId).all(|state| {
            self.alphabet
                .iter()
                .all(|&symbol| self.transitions.contains_key(&(state, symbol)))
        })
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        let Some(start) = self.start_state else {
            return true;
        };

        if self.final_states.is_empty() {
            return true;
        }

        // BFS to find if any final state is reachable
        let mut visited = StateSet::with_capacity(self.states.len());
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(state) = queue.pop_front() {
            if visited.contains(state) {
                continue;
            }
            visited.insert(state);

            if self.final_states.contains(state) {
                return false;
            }

            for &symbol in &self.alphabet {
                if let Some(&next) = self.transitions.get(&(state, symbol)) {
                    if !visited.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        true
    }
}

impl DfaBuilder for DFA {
    fn add_state(&mut self, name: &str) {
        self.ensure_state(name);
    }

    fn add_final_state(&mut self, name: &str) {
        let id = self.ensure_state(name);
        self.final_states.insert(id);
    }

    fn add_start_state(&mut self, name: &str) {
        let id = self.ensure_state(name);
        self.start_state = Some(id);
    }

    fn add_transition(&mut self, source: &str, symbol: Symbol, destination: &str) {
        let source = self.ensure_state(source);
        let destination = self.ensure_state(destination);
        self.alphabet.insert(symbol);
        self.transitions.insert((source, symbol), destination);
    }
}

impl Default for DFA {
    fn default() -> Self {
        Self::new()
    }
}
