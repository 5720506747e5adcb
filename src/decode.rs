//! Reading automata out of satisfying assignments, and back.

use std::fmt;

use crate::cnf::Model;
use crate::dfa::Dfa;
use crate::reference::ReferenceAutomaton;
use crate::vars::Variables;

/// The assignment does not describe a total deterministic automaton.
///
/// On a model returned for the full encoding this indicates a defect in the encoder,
/// never an ordinary outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    ModelTooShort { expected: u32, actual: u32 },
    MissingTransition { state: usize, symbol: usize },
    AmbiguousTransition { state: usize, symbol: usize, targets: Vec<usize> },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ModelTooShort { expected, actual } => {
                write!(f, "model assigns {} variables, expected {}", actual, expected)
            }
            DecodeError::MissingTransition { state, symbol } => {
                write!(f, "no transition from state {} on symbol {}", state, symbol)
            }
            DecodeError::AmbiguousTransition { state, symbol, targets } => write!(
                f,
                "several transitions from state {} on symbol {}: {:?}",
                state, symbol, targets
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Builds the automaton described by the `edge` and `final` propositions of `model`.
pub fn decode(model: &Model, vars: &Variables) -> Result<Dfa, DecodeError> {
    if model.num_vars() < vars.num_vars() {
        return Err(DecodeError::ModelTooShort {
            expected: vars.num_vars(),
            actual: model.num_vars(),
        });
    }

    let n = vars.num_states();
    let k = vars.num_symbols();
    let mut delta = Vec::with_capacity(n);
    let mut finals = Vec::with_capacity(n);
    for p in 0..n {
        finals.push(model.value(vars.final_state(p)));
        let mut row = Vec::with_capacity(k);
        for a in 0..k {
            let targets: Vec<usize> = (0..n).filter(|&q| model.value(vars.edge(p, a, q))).collect();
            if targets.is_empty() {
                return Err(DecodeError::MissingTransition { state: p, symbol: a });
            }
            if targets.len() > 1 {
                return Err(DecodeError::AmbiguousTransition {
                    state: p,
                    symbol: a,
                    targets,
                });
            }
            row.push(targets[0]);
        }
        delta.push(row);
    }

    Ok(Dfa::new(delta, finals))
}

/// The assignment a DFA induces on all proposition families.
///
/// `node(r, q)` holds iff some path of the reference automaton from its initial state to `r`
/// leads the DFA from state 0 to `q`. The BFS propositions follow their definitions:
/// `parent(j, i)` is set for the smallest predecessor `i` of `j` when `i < j`, and
/// `min_letter(i, a, j)` for the smallest symbol `a` leading from `i` to `j`.
///
/// # Panics
///
/// Panics if the DFA, the variables and the reference automaton disagree on sizes.
pub fn induced_model(dfa: &Dfa, vars: &Variables, reference: &ReferenceAutomaton) -> Model {
    assert_eq!(dfa.num_states(), vars.num_states());
    assert_eq!(dfa.num_symbols(), vars.num_symbols());
    assert_eq!(reference.num_states(), vars.num_ref_states());

    let n = vars.num_states();
    let k = vars.num_symbols();
    let mut model = Model::new(vars.num_vars());

    for p in 0..n {
        model.set(vars.final_state(p), dfa.is_final(p));
        for a in 0..k {
            let q = dfa.successor(p, a);
            model.set(vars.edge(p, a, q), true);
            model.set(vars.tree_edge(p, q), true);
        }
    }

    for j in 0..n {
        for i in 0..n {
            if let Some(a) = (0..k).find(|&a| dfa.successor(i, a) == j) {
                model.set(vars.min_letter(i, a, j), true);
            }
        }
        if j > 0 {
            if let Some(i) = (0..j).find(|&i| (0..k).any(|a| dfa.successor(i, a) == j)) {
                model.set(vars.parent(j, i), true);
            }
        }
    }

    for (r, q) in dfa.product_pairs(reference) {
        model.set(vars.node(r, q), true);
    }

    model
}
