//! Per-automaton configuration.

use crate::automaton::symbol::{EPSILON, Symbol};

/// Configuration for an [`NFA`](crate::automaton::NFA) and its conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reserved symbol marking epsilon transitions.
    pub epsilon: Symbol,

    /// Maximum number of DFA states subset construction may discover
    /// (`None` = unlimited). The dead state is not counted.
    pub max_dfa_states: Option<usize>,
}

impl Config {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `symbol` as the epsilon marker.
    pub fn epsilon(mut self, symbol: Symbol) -> Self {
        self.epsilon = symbol;
        self
    }

    /// Cap the number of DFA states subset construction may discover.
    pub fn max_dfa_states(mut self, limit: Option<usize>) -> Self {
        self.max_dfa_states = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            max_dfa_states: None,
        }
    }
}
