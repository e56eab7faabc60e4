//! Symbol types for automata transitions.

/// An input symbol.
pub type Symbol = char;

/// Default marker for epsilon (empty) transitions.
///
/// A real input symbol equal to the marker is indistinguishable from epsilon.
/// Pick another marker through [`Config::epsilon`](crate::automaton::Config)
/// when `'e'` belongs to the alphabet.
pub const EPSILON: Symbol = 'e';
