//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use crate::automaton::config::Config;
use crate::automaton::dfa::DFA;
use crate::automaton::error::{AutomatonError, Result};
use crate::automaton::state::{NfaState, StateId, StateSet};
use crate::automaton::subset_construction::subset_construction;
use crate::automaton::symbol::Symbol;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// An Epsilon Non-deterministic Finite Automaton over named states.
///
/// States are identified by name. Internally each name is given a dense
/// [`StateId`] in insertion order, which is also the iteration order of
/// [`NFA::states`].
#[derive(Debug, Clone)]
pub struct NFA {
    config: Config,
    /// States keyed by name; the map index is the state's `StateId`
    states: IndexMap<String, NfaState>,
    start_state: Option<StateId>,
    /// Transitions: (source, symbol) -> set of destination states.
    /// Epsilon transitions are keyed by the configured marker.
    transitions: HashMap<(StateId, Symbol), StateSet>,
    /// All symbols used (excluding epsilon)
    alphabet: IndexSet<Symbol>,
}

impl NFA {
    /// Create a new empty NFA with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            states: IndexMap::new(),
            start_state: None,
            transitions: HashMap::new(),
            alphabet: IndexSet::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add a non-final state. Adding an existing name is a no-op.
    pub fn add_state(&mut self, name: &str) -> Result<()> {
        self.intern(name, false).map(|_| ())
    }

    /// Add a final state. An existing state of that name becomes final.
    pub fn add_final_state(&mut self, name: &str) -> Result<()> {
        self.intern(name, true).map(|_| ())
    }

    /// Designate the start state, creating it as a non-final state if absent.
    ///
    /// A later call replaces the designation.
    pub fn add_start_state(&mut self, name: &str) -> Result<()> {
        let id = self.intern(name, false)?;
        self.start_state = Some(id);
        Ok(())
    }

    /// Add a transition from `source` to `destination` on `symbol`.
    ///
    /// Destinations accumulate: adding another destination for the same
    /// `(source, symbol)` pair extends the set. Both states must exist.
    pub fn add_transition(&mut self, source: &str, symbol: Symbol, destination: &str) -> Result<()> {
        let source = self.id_of(source)?;
        let destination = self.id_of(destination)?;

        if !self.is_epsilon(symbol) {
            self.alphabet.insert(symbol);
        }

        let capacity = self.states.len();
        self.transitions
            .entry((source, symbol))
            .or_insert_with(|| StateSet::with_capacity(capacity))
            .insert(destination);
        Ok(())
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(&mut self, source: &str, destination: &str) -> Result<()> {
        self.add_transition(source, self.config.epsilon, destination)
    }

    /// Get all states in insertion order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &NfaState> + '_ {
        self.states.values()
    }

    /// Get the final states, recomputed from the state list on every call.
    pub fn final_states(&self) -> impl Iterator<Item = &NfaState> + '_ {
        self.states.values().filter(|state| state.is_final())
    }

    pub fn start_state(&self) -> Option<&NfaState> {
        self.start_state.map(|id| self.state_at(id))
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&NfaState> {
        self.states.get(name)
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get the alphabet (all symbols except epsilon) in first-use order.
    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    /// Check if `symbol` is this automaton's epsilon marker.
    pub fn is_epsilon(&self, symbol: Symbol) -> bool {
        symbol == self.config.epsilon
    }

    /// Get the states reachable from `name` on `symbol`.
    ///
    /// On the epsilon marker only the directly registered destinations are
    /// returned. On any other symbol each destination is replaced by its
    /// epsilon closure. An unregistered pair yields an empty result.
    pub fn to_states(&self, name: &str, symbol: Symbol) -> Result<Vec<&NfaState>> {
        let id = self.id_of(name)?;
        let reached = if self.is_epsilon(symbol) {
            self.transitions
                .get(&(id, symbol))
                .cloned()
                .unwrap_or_else(|| StateSet::with_capacity(0))
        } else {
            self.move_on_symbol(&StateSet::singleton(id, self.states.len()), symbol)
        };
        Ok(self.resolve(&reached))
    }

    /// Get the epsilon closure of a single state, the state itself included.
    pub fn epsilon_closure(&self, name: &str) -> Result<Vec<&NfaState>> {
        let id = self.id_of(name)?;
        let closure = self.closure(&StateSet::singleton(id, self.states.len()));
        Ok(self.resolve(&closure))
    }

    /// Get the union of the epsilon closures of several states.
    pub fn epsilon_closure_of<'a, I>(&self, names: I) -> Result<Vec<&NfaState>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seeds = StateSet::with_capacity(self.states.len());
        for name in names {
            seeds.insert(self.id_of(name)?);
        }
        Ok(self.resolve(&self.closure(&seeds)))
    }

    /// Check whether the NFA accepts `input` by simulating it directly.
    ///
    /// A character outside the alphabet rejects the input.
    pub fn accepts(&self, input: &str) -> Result<bool> {
        let start = self.start_state.ok_or(AutomatonError::NoStartState)?;
        let mut current = self.closure(&StateSet::singleton(start, self.states.len()));

        for symbol in input.chars() {
            if !self.alphabet.contains(&symbol) {
                return Ok(false);
            }
            current = self.move_on_symbol(&current, symbol);
            if current.is_empty() {
                return Ok(false);
            }
        }

        Ok(self.contains_final(&current))
    }

    /// Convert to an equivalent, complete DFA by subset construction.
    pub fn to_dfa(&self) -> Result<DFA> {
        let mut dfa = DFA::new();
        subset_construction(self, &mut dfa)?;
        Ok(dfa)
    }

    pub(crate) fn start_id(&self) -> Option<StateId> {
        self.start_state
    }

    pub(crate) fn state_at(&self, id: StateId) -> &NfaState {
        &self.states[id as usize]
    }

    /// Check if any member of `states` is final.
    pub(crate) fn contains_final(&self, states: &StateSet) -> bool {
        states.iter().any(|id| self.state_at(id).is_final())
    }

    /// Compute the epsilon closure of a set of states using DFS.
    pub(crate) fn closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.states.len());
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            if let Some(destinations) = self.transitions.get(&(s, self.config.epsilon)) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// Compute the epsilon closure of every state, indexed by `StateId`.
    pub(crate) fn closures(&self) -> Vec<StateSet> {
        (0..self.states.len() as StateId)
            .map(|id| self.closure(&StateSet::singleton(id, self.states.len())))
            .collect()
    }

    /// Get the states reachable from a set of states on a non-epsilon symbol,
    /// closed under epsilon.
    pub(crate) fn move_on_symbol(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        let mut reached = StateSet::with_capacity(self.states.len());

        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }

        self.closure(&reached)
    }

    /// Like [`NFA::move_on_symbol`], but reusing precomputed closures.
    pub(crate) fn move_with_closures(
        &self,
        states: &StateSet,
        symbol: Symbol,
        closures: &[StateSet],
    ) -> StateSet {
        let mut reached = StateSet::with_capacity(self.states.len());

        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                for dest in destinations.iter() {
                    reached.union_with(&closures[dest as usize]);
                }
            }
        }

        reached
    }

    fn intern(&mut self, name: &str, is_final: bool) -> Result<StateId> {
        if name.is_empty() {
            return Err(AutomatonError::EmptyStateName);
        }

        let entry = self.states.entry(name.to_owned());
        let id = entry.index() as StateId;
        let state = entry.or_insert_with(|| NfaState::new(name, is_final));
        if is_final && !state.is_final() {
            *state = NfaState::new(name, true);
        }
        Ok(id)
    }

    fn id_of(&self, name: &str) -> Result<StateId> {
        self.states
            .get_index_of(name)
            .map(|idx| idx as StateId)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_owned()))
    }

    fn resolve(&self, states: &StateSet) -> Vec<&NfaState> {
        states.iter().map(|id| self.state_at(id)).collect()
    }
}

impl Default for NFA {
    fn default() -> Self {
        Self::new()
    }
}
