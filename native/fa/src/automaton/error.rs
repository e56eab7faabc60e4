//! Errors raised while building or converting automata.

use thiserror::Error;

/// Errors that can occur while building an NFA or converting it to a DFA.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("unknown state: {0:?}")]
    UnknownState(String),

    #[error("no start state has been designated")]
    NoStartState,

    #[error("state names must not be empty")]
    EmptyStateName,

    #[error("DFA state limit exceeded: {states} states (max: {max})")]
    StateLimitExceeded { states: usize, max: usize },
}

/// Result type for automaton operations.
pub type Result<T> = std::result::Result<T, AutomatonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AutomatonError::UnknownState("Q".to_string());
        assert_eq!(err.to_string(), "unknown state: \"Q\"");

        let err = AutomatonError::StateLimitExceeded { states: 9, max: 8 };
        assert_eq!(err.to_string(), "DFA state limit exceeded: 9 states (max: 8)");
    }
}
