//! Finite automata over named states.
//!
//! This module provides:
//! - An epsilon-NFA built incrementally from states and labeled transitions
//! - Epsilon closure computation
//! - Subset construction (NFA to complete DFA conversion)
//! - A DFA that subset construction can emit into

mod config;
mod dfa;
mod epsilon_nfa;
mod error;
mod state;
mod subset_construction;
mod symbol;

pub use config::Config;
pub use dfa::{DFA, DfaBuilder};
pub use epsilon_nfa::NFA;
pub use error::{AutomatonError, Result};
pub use state::{NfaState, StateId, StateSet};
pub use subset_construction::{DEAD_STATE, subset_construction};
pub use symbol::{EPSILON, Symbol};
