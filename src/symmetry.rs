//! BFS-based symmetry breaking.
//!
//! Restricts solutions to automata whose state numbering is the breadth-first numbering
//! from state 0, where successors are visited in increasing symbol order. Each class of
//! isomorphic automata (with all states reachable) then has exactly one member left.
//!
//! Propositions used (see [`Variables`]):
//! - `tree_edge(i, j)`: some symbol leads from `i` to `j`;
//! - `parent(j, i)`: `i` is the smallest state with a transition into `j`;
//! - `min_letter(i, a, j)`: `a` is the smallest symbol leading from `i` to `j`.

use log::{debug, trace};

use crate::cnf::Cnf;
use crate::types::Lit;
use crate::vars::Variables;

/// Encodes the canonical BFS spanning tree constraints over the candidate states.
pub fn encode_bfs_tree(vars: &Variables) -> Cnf {
    let n = vars.num_states();
    let k = vars.num_symbols();
    let mut cnf = Cnf::new(vars.num_vars());

    // tree_edge(p, q) <=> OR_a edge(p, a, q)
    for p in 0..n {
        for q in 0..n {
            for a in 0..k {
                cnf.add_clause([vars.edge(p, a, q).neg(), vars.tree_edge(p, q).pos()]);
            }
            let mut clause = vec![vars.tree_edge(p, q).neg()];
            clause.extend((0..k).map(|a| vars.edge(p, a, q).pos()));
            cnf.add_clause(clause);
        }
    }
    let num_tree = cnf.len();

    // Every non-root state has a parent, which is its smallest predecessor.
    for j in 1..n {
        cnf.add_clause((0..j).map(|i| vars.parent(j, i)));
        for i in 0..j {
            // parent(j, i) => tree_edge(i, j)
            cnf.add_clause([vars.parent(j, i).neg(), vars.tree_edge(i, j).pos()]);
            // tree_edge(i, j) & !tree_edge(0..i, j) => parent(j, i)
            let mut clause = vec![vars.tree_edge(i, j).neg(), vars.parent(j, i).pos()];
            clause.extend((0..i).map(|h| vars.tree_edge(h, j).pos()));
            cnf.add_clause(clause);
            // parent(j, i) => !tree_edge(h, j) for h < i
            for h in 0..i {
                cnf.add_clause([vars.parent(j, i).neg(), vars.tree_edge(h, j).neg()]);
            }
        }
    }
    let num_parent = cnf.len() - num_tree;

    // min_letter(i, a, j) <=> edge(i, a, j) & !edge(i, 0..a, j)
    for j in 1..n {
        for i in 0..j {
            for a in 0..k {
                cnf.add_clause([vars.min_letter(i, a, j).neg(), vars.edge(i, a, j).pos()]);
                for b in 0..a {
                    cnf.add_clause([vars.min_letter(i, a, j).neg(), vars.edge(i, b, j).neg()]);
                }
                let mut clause = vec![vars.edge(i, a, j).neg(), vars.min_letter(i, a, j).pos()];
                clause.extend((0..a).map(|b| vars.edge(i, b, j).pos()));
                cnf.add_clause(clause);
            }
        }
    }
    let num_min_letter = cnf.len() - num_tree - num_parent;

    // Parents of consecutive states are non-decreasing:
    // parent(j, i) => !parent(j+1, h) for h < i.
    for j in 1..n.saturating_sub(1) {
        for i in 0..j {
            for h in 0..i {
                cnf.add_clause([vars.parent(j, i).neg(), vars.parent(j + 1, h).neg()]);
            }
        }
    }

    // Siblings are ordered by their tree symbol:
    // parent(j, i) & parent(j+1, i) & min_letter(i, a, j) => !min_letter(i, b, j+1) for b < a.
    for j in 1..n.saturating_sub(1) {
        for i in 0..j {
            for a in 0..k {
                for b in 0..a {
                    let clause: [Lit; 4] = [
                        vars.parent(j, i).neg(),
                        vars.parent(j + 1, i).neg(),
                        vars.min_letter(i, a, j).neg(),
                        vars.min_letter(i, b, j + 1).neg(),
                    ];
                    cnf.add_clause(clause);
                }
            }
        }
    }
    let num_order = cnf.len() - num_tree - num_parent - num_min_letter;

    debug!(
        "bfs tree: {} tree-edge, {} parent, {} min-letter, {} ordering clauses",
        num_tree, num_parent, num_min_letter, num_order
    );
    for clause in cnf.clauses() {
        trace!("bfs clause: {:?}", clause);
    }
    cnf
}
