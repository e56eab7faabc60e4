//! Subset construction algorithm for converting ε-NFA to DFA.
//!
//! Every reachable set of NFA states becomes one DFA state. Sets are
//! deduplicated by their member indices; the DFA state name is the bracketed,
//! sorted list of member names (`[AB]`). Missing transitions are routed to a
//! shared dead state `[]` that loops to itself on every symbol.

use crate::automaton::dfa::DfaBuilder;
use crate::automaton::epsilon_nfa::NFA;
use crate::automaton::error::{AutomatonError, Result};
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};

/// Name of the dead state.
pub const DEAD_STATE: &str = "[]";

/// The reachable subsets and the transitions between them.
///
/// Subsets are numbered in discovery order; subset 0 is the start.
struct Exploration {
    subsets: IndexMap<Vec<StateId>, StateSet>,
    transitions: HashMap<(usize, Symbol), usize>,
}

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm,
/// emitting the result into `builder`.
///
/// The builder is only touched once exploration has finished, so on error it
/// is left as it was.
pub fn subset_construction<B: DfaBuilder>(nfa: &NFA, builder: &mut B) -> Result<()> {
    let start = nfa.start_id().ok_or(AutomatonError::NoStartState)?;
    let exploration = explore(nfa, start)?;
    emit(nfa, &exploration, builder);
    Ok(())
}

/// Breadth-first search over the subsets reachable from the closure of the
/// start state.
fn explore(nfa: &NFA, start: StateId) -> Result<Exploration> {
    let closures = nfa.closures();
    let limit = nfa.config().max_dfa_states;

    let mut subsets: IndexMap<Vec<StateId>, StateSet> = IndexMap::new();
    let mut transitions = HashMap::new();
    let mut worklist = VecDeque::new();

    let initial_set = closures[start as usize].clone();
    subsets.insert(initial_set.to_vec(), initial_set);
    worklist.push_back(0);

    while let Some(current) = worklist.pop_front() {
        for &symbol in nfa.alphabet() {
            let next_set = nfa.move_with_closures(&subsets[current], symbol, &closures);

            if next_set.is_empty() {
                // Completed with the dead state on emission
                continue;
            }

            let next_vec = next_set.to_vec();
            let next = match subsets.get_index_of(&next_vec) {
                Some(existing) => existing,
                None => {
                    if let Some(max) = limit {
                        if subsets.len() >= max {
                            return Err(AutomatonError::StateLimitExceeded {
                                states: subsets.len() + 1,
                                max,
                            });
                        }
                    }
                    trace!("discovered subset {} = {:?}", subsets.len(), next_set);
                    let (idx, _) = subsets.insert_full(next_vec, next_set);
                    worklist.push_back(idx);
                    idx
                }
            };

            transitions.insert((current, symbol), next);
        }
    }

    Ok(Exploration {
        subsets,
        transitions,
    })
}

fn emit<B: DfaBuilder>(nfa: &NFA, exploration: &Exploration, builder: &mut B) {
    let single_chars = single_char_names(nfa);
    let labels: Vec<String> = exploration
        .subsets
        .values()
        .map(|set| label(nfa, set, single_chars))
        .collect();

    for (idx, set) in exploration.subsets.values().enumerate() {
        if nfa.contains_final(set) {
            builder.add_final_state(&labels[idx]);
        } else {
            builder.add_state(&labels[idx]);
        }
    }
    builder.add_start_state(&labels[0]);

    let mut needs_dead_state = false;
    for (idx, source) in labels.iter().enumerate() {
        for &symbol in nfa.alphabet() {
            match exploration.transitions.get(&(idx, symbol)) {
                Some(&dest) => builder.add_transition(source, symbol, &labels[dest]),
                None => {
                    if !needs_dead_state {
                        needs_dead_state = true;
                        builder.add_state(DEAD_STATE);
                        for &c in nfa.alphabet() {
                            builder.add_transition(DEAD_STATE, c, DEAD_STATE);
                        }
                    }
                    builder.add_transition(source, symbol, DEAD_STATE);
                }
            }
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states{}",
        nfa.num_states(),
        labels.len() + usize::from(needs_dead_state),
        if needs_dead_state { " (with dead state)" } else { "" }
    );
}

/// Separator between member names in a label.
const SEPARATOR: char = ',';
/// Escape character for separators and brackets inside member names.
const ESCAPE: char = '\\';

/// Labels are written without separator when every state name is a single
/// character; a sorted run of characters already identifies the set.
fn single_char_names(nfa: &NFA) -> bool {
    nfa.states().all(|state| state.name().chars().count() == 1)
}

/// Label of a subset: sorted member names in brackets.
///
/// In the multi-character form names are escaped and comma-separated, so the
/// label `[A,B]` of `{A, B}` never equals the label `[A\,B]` of a state
/// literally named `A,B`.
fn label(nfa: &NFA, set: &StateSet, single_chars: bool) -> String {
    let mut names: Vec<&str> = set.iter().map(|id| nfa.state_at(id).name()).collect();
    names.sort_unstable();

    let mut label = String::from("[");
    for (i, name) in names.into_iter().enumerate() {
        if single_chars {
            label.push_str(name);
            continue;
        }
        if i > 0 {
            label.push(SEPARATOR);
        }
        for c in name.chars() {
            if matches!(c, SEPARATOR | ESCAPE | '[' | ']') {
                label.push(ESCAPE);
            }
            label.push(c);
        }
    }
    label.push(']');
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::config::Config;

    /// Records every builder call in order.
    #[derive(Debug, Default, PartialEq)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DfaBuilder for Recorder {
        fn add_state(&mut self, name: &str) {
            self.calls.push(format!("state {name}"));
        }

        fn add_final_state(&mut self, name: &str) {
            self.calls.push(format!("final {name}"));
        }

        fn add_start_state(&mut self, name: &str) {
            self.calls.push(format!("start {name}"));
        }

        fn add_transition(&mut self, source: &str, symbol: Symbol, destination: &str) {
            self.calls.push(format!("{source} {symbol} {destination}"));
        }
    }

    #[test]
    fn test_subset_construction_basic() {
        // NFA: 0 -a-> 1, 0 -a-> 2, 1 -b-> 3(final), 2 -b-> 3(final)
        let mut nfa = NFA::new();
        nfa.add_start_state("0").unwrap();
        nfa.add_state("1").unwrap();
        nfa.add_state("2").unwrap();
        nfa.add_final_state("3").unwrap();
        nfa.add_transition("0", 'a', "1").unwrap();
        nfa.add_transition("0", 'a', "2").unwrap();
        nfa.add_transition("1", 'b', "3").unwrap();
        nfa.add_transition("2", 'b', "3").unwrap();

        let mut recorder = Recorder::default();
        subset_construction(&nfa, &mut recorder).unwrap();

        assert_eq!(
            recorder.calls,
            vec![
                "state [0]",
                "state [12]",
                "final [3]",
                "start [0]",
                "[0] a [12]",
                "state []",
                "[] a []",
                "[] b []",
                "[0] b []",
                "[12] a []",
                "[12] b [3]",
                "[3] a []",
                "[3] b []",
            ]
        );
    }

    #[test]
    fn test_subset_construction_with_epsilon() {
        // NFA: 0 -ε-> 1 -a-> 2(final)
        let mut nfa = NFA::new();
        nfa.add_start_state("0").unwrap();
        nfa.add_state("1").unwrap();
        nfa.add_final_state("2").unwrap();
        nfa.add_epsilon_transition("0", "1").unwrap();
        nfa.add_transition("1", 'a', "2").unwrap();

        let dfa = nfa.to_dfa().unwrap();

        assert_eq!(dfa.start_state(), Some("[01]"));
        assert_eq!(dfa.transition("[01]", 'a'), Some("[2]"));
        assert_eq!(dfa.transition("[2]", 'a'), Some(DEAD_STATE));
        assert!(dfa.is_final("[2]"));
        assert!(dfa.accepts("a"));
        assert!(!dfa.accepts("aa"));
    }

    #[test]
    fn test_final_start_subset() {
        let mut nfa = NFA::new();
        nfa.add_start_state("A").unwrap();
        nfa.add_final_state("B").unwrap();
        nfa.add_epsilon_transition("A", "B").unwrap();

        let mut recorder = Recorder::default();
        subset_construction(&nfa, &mut recorder).unwrap();

        // No symbols, so no dead state is needed either.
        assert_eq!(recorder.calls, vec!["final [AB]", "start [AB]"]);
    }

    #[test]
    fn test_multi_character_names() {
        let mut nfa = NFA::new();
        nfa.add_start_state("q0").unwrap();
        nfa.add_state("q1").unwrap();
        nfa.add_final_state("q10").unwrap();
        nfa.add_transition("q0", 'x', "q10").unwrap();
        nfa.add_transition("q0", 'x', "q1").unwrap();
        nfa.add_transition("q1", 'x', "q0").unwrap();

        let dfa = nfa.to_dfa().unwrap();

        assert_eq!(dfa.transition("[q0]", 'x'), Some("[q1,q10]"));
        assert_eq!(dfa.transition("[q1,q10]", 'x'), Some("[q0]"));
        assert!(dfa.is_final("[q1,q10]"));
        assert!(dfa.is_complete());
    }

    #[test]
    fn test_no_start_state() {
        let mut nfa = NFA::new();
        nfa.add_state("A").unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(
            subset_construction(&nfa, &mut recorder),
            Err(AutomatonError::NoStartState)
        );
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_state_limit() {
        // "Second-to-last symbol is 1" needs four DFA states.
        let mut nfa = NFA::with_config(Config::new().max_dfa_states(Some(2)));
        nfa.add_start_state("A").unwrap();
        nfa.add_state("B").unwrap();
        nfa.add_final_state("C").unwrap();
        nfa.add_transition("A", '0', "A").unwrap();
        nfa.add_transition("A", '1', "A").unwrap();
        nfa.add_transition("A", '1', "B").unwrap();
        nfa.add_transition("B", '0', "C").unwrap();
        nfa.add_transition("B", '1', "C").unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(
            subset_construction(&nfa, &mut recorder),
            Err(AutomatonError::StateLimitExceeded { states: 3, max: 2 })
        );
        assert!(recorder.calls.is_empty());

        let unlimited = NFA::with_config(Config::new());
        assert_eq!(unlimited.config().max_dfa_states, None);
    }

    #[test]
    fn test_labels_escape_separator() {
        // {A, B} and the single state "A,B" must stay distinct DFA states.
        let mut nfa = NFA::new();
        nfa.add_start_state("S").unwrap();
        nfa.add_final_state("A").unwrap();
        nfa.add_state("B").unwrap();
        nfa.add_state("A,B").unwrap();
        nfa.add_state("[x]\\").unwrap();
        nfa.add_transition("S", '0', "A").unwrap();
        nfa.add_transition("S", '0', "B").unwrap();
        nfa.add_transition("S", '1', "A,B").unwrap();
        nfa.add_transition("A,B", '1', "[x]\\").unwrap();

        let dfa = nfa.to_dfa().unwrap();

        assert_eq!(dfa.transition("[S]", '0'), Some("[A,B]"));
        assert_eq!(dfa.transition("[S]", '1'), Some("[A\\,B]"));
        assert_eq!(dfa.transition("[A\\,B]", '1'), Some("[\\[x\\]\\\\]"));
        assert!(dfa.is_final("[A,B]"));
        assert!(!dfa.is_final("[A\\,B]"));
        assert_eq!(dfa.num_states(), 5);

        for input in ["0", "1", "11", "01"] {
            assert_eq!(nfa.accepts(input).unwrap(), dfa.accepts(input), "{input:?}");
        }
        assert!(dfa.accepts("0"));
        assert!(!dfa.accepts("1"));
    }
}
