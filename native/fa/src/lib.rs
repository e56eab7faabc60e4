//! Epsilon-NFA construction and conversion to an equivalent complete DFA.
//!
//! ```
//! use fa::NFA;
//!
//! let mut nfa = NFA::new();
//! nfa.add_start_state("A")?;
//! nfa.add_final_state("B")?;
//! nfa.add_transition("A", '0', "B")?;
//! nfa.add_epsilon_transition("B", "A")?;
//!
//! let dfa = nfa.to_dfa()?;
//! assert_eq!(dfa.start_state(), Some("[A]"));
//! assert_eq!(dfa.transition("[A]", '0'), Some("[AB]"));
//! assert!(dfa.accepts("00"));
//! # Ok::<(), fa::AutomatonError>(())
//! ```

pub mod automaton;

pub use automaton::{
    AutomatonError, Config, DEAD_STATE, DFA, DfaBuilder, EPSILON, NFA, NfaState, Result, StateId,
    StateSet, Symbol, subset_construction,
};
