//! Determinism and sample-consistency clauses.

use log::{debug, trace};

use crate::cnf::Cnf;
use crate::reference::ReferenceAutomaton;
use crate::vars::Variables;

/// Encodes that the `edge`/`final` propositions describe a total deterministic automaton
/// which agrees with every sample path of the reference automaton.
///
/// # Panics
///
/// Panics if `vars` was allocated for a different alphabet or reference size.
pub fn encode_consistency(vars: &Variables, reference: &ReferenceAutomaton) -> Cnf {
    assert_eq!(vars.num_symbols(), reference.num_symbols());
    assert_eq!(vars.num_ref_states(), reference.num_states());

    let n = vars.num_states();
    let k = vars.num_symbols();
    let mut cnf = Cnf::new(vars.num_vars());

    // Totality: every (p, a) has a successor.
    for p in 0..n {
        for a in 0..k {
            cnf.add_clause((0..n).map(|q| vars.edge(p, a, q)));
        }
    }
    // Functionality: at most one successor.
    for p in 0..n {
        for a in 0..k {
            for q in 0..n {
                for q2 in (q + 1)..n {
                    cnf.add_clause([vars.edge(p, a, q).neg(), vars.edge(p, a, q2).neg()]);
                }
            }
        }
    }
    let num_determinism = cnf.len();

    // The empty word ends in state 0, and only there.
    let init = reference.init();
    cnf.add_clause([vars.node(init, 0)]);
    for q in 1..n {
        cnf.add_clause([vars.node(init, q).neg()]);
    }

    // Sample terminals fix the finality of every candidate state they may reach.
    for &r in reference.accepting() {
        for q in 0..n {
            cnf.add_clause([vars.node(r, q).neg(), vars.final_state(q).pos()]);
        }
    }
    for &r in reference.rejecting() {
        for q in 0..n {
            cnf.add_clause([vars.node(r, q).neg(), vars.final_state(q).neg()]);
        }
    }

    // node(r, p) & edge(p, a, q) => node(r', q) for every reference transition r --a--> r'.
    for (r, a, r2) in reference.transitions() {
        for p in 0..n {
            for q in 0..n {
                cnf.add_clause([vars.node(r, p).neg(), vars.edge(p, a, q).neg(), vars.node(r2, q).pos()]);
            }
        }
    }

    debug!(
        "consistency: {} determinism clauses, {} sample clauses",
        num_determinism,
        cnf.len() - num_determinism
    );
    for clause in cnf.clauses() {
        trace!("consistency clause: {:?}", clause);
    }
    cnf
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::cnf::Model;
    use crate::types::Lit;

    fn two_state() -> ReferenceAutomaton {
        ReferenceAutomaton::new(2, 2, 0, [(0, 0, 0), (0, 1, 1)], [1], [0]).unwrap()
    }

    #[test]
    fn test_clause_count() {
        let reference = two_state();
        let n = 3;
        let vars = Variables::new(n, 2, 2);
        let cnf = encode_consistency(&vars, &reference);

        let totality = n * 2;
        let functionality = n * 2 * n * (n - 1) / 2;
        let init = n;
        let samples = 2 * n;
        let simulation = 2 * n * n;
        assert_eq!(cnf.len(), totality + functionality + init + samples + simulation);
    }

    #[test]
    fn test_initial_placement() {
        let reference = two_state();
        let vars = Variables::new(2, 2, 2);
        let cnf = encode_consistency(&vars, &reference);
        assert!(cnf.clauses().contains(&vec![vars.node(0, 0).pos()]));
        assert!(cnf.clauses().contains(&vec![vars.node(0, 1).neg()]));
    }

    #[test]
    fn test_sample_clauses() {
        let reference = two_state();
        let vars = Variables::new(2, 2, 2);
        let cnf = encode_consistency(&vars, &reference);
        for q in 0..2 {
            let acc: Vec<Lit> = vec![vars.node(1, q).neg(), vars.final_state(q).pos()];
            let rej: Vec<Lit> = vec![vars.node(0, q).neg(), vars.final_state(q).neg()];
            assert!(cnf.clauses().contains(&acc));
            assert!(cnf.clauses().contains(&rej));
        }
    }

    #[test]
    fn test_consistent_assignment_satisfies() {
        // 0 --0--> 0, 0 --1--> 1, 1 --*--> 1; final = {1}.
        let reference = two_state();
        let vars = Variables::new(2, 2, 2);
        let cnf = encode_consistency(&vars, &reference);

        let mut model = Model::new(vars.num_vars());
        for var in [
            vars.edge(0, 0, 0),
            vars.edge(0, 1, 1),
            vars.edge(1, 0, 1),
            vars.edge(1, 1, 1),
            vars.final_state(1),
            vars.node(0, 0),
            vars.node(1, 1),
        ] {
            model.set(var, true);
        }
        assert!(cnf.is_satisfied_by(&model));

        // Making state 0 final breaks the rejecting sample.
        model.set(vars.final_state(0), true);
        assert!(!cnf.is_satisfied_by(&model));
    }

    #[test]
    fn test_nondeterminism_rejected() {
        let reference = two_state();
        let vars = Variables::new(2, 2, 2);
        let cnf = encode_consistency(&vars, &reference);

        let mut model = Model::new(vars.num_vars());
        for p in 0..2 {
            for a in 0..2 {
                model.set(vars.edge(p, a, 0), true);
                model.set(vars.edge(p, a, 1), true);
            }
        }
        let violated = cnf.first_violated(&model).unwrap();
        assert_eq!(violated.len(), 2);
    }
}
