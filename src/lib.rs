//! # dfa-sat: minimal DFA identification via SAT
//!
//! **`dfa-sat`** finds the smallest deterministic finite automaton that agrees with the
//! sample paths of a *reference automaton*. The reference automaton marks some of its states
//! as accepting or rejecting sample terminals; every word reaching an accepting state must be
//! accepted, every word reaching a rejecting state must be rejected, and everything else is
//! "don't care".
//!
//! ## How it works
//!
//! For each candidate size `n = lower, lower+1, ...` the problem "is there a DFA with `n`
//! states consistent with the samples?" is encoded into CNF and handed to a SAT solver:
//!
//! - **[`vars`]**: allocates the propositions (transitions, final states, sample placement,
//!   and the BFS-tree auxiliaries) into disjoint contiguous id ranges.
//! - **[`consistency`]**: determinism, totality and agreement with the samples.
//! - **[`symmetry`]**: BFS-tree symmetry breaking, so that only the canonically numbered
//!   member of each isomorphism class remains.
//! - **[`decode`]**: reads the automaton out of a satisfying assignment.
//! - **[`search`]**: drives the loop; the first satisfiable size is the minimum.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dfa_sat::reference::ReferenceAutomaton;
//! use dfa_sat::search::{minimise, SearchOptions};
//! use dfa_sat::solver::VarisatBackend;
//!
//! // Samples: the empty word is rejected, "1" is accepted.
//! let reference = ReferenceAutomaton::new(2, 2, 0, [(0, 0, 0), (0, 1, 1)], [1], [0]).unwrap();
//!
//! let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
//! let dfa = solution.dfa;
//! assert_eq!(dfa.num_states(), 2);
//! assert!(dfa.accepts(&[1]));
//! assert!(!dfa.accepts(&[]));
//! ```
//!
//! Reference automata can be read from the `.fa` text format (see [`io`]), and results
//! written as Graphviz DOT (see [`dot`]).

pub mod cnf;
pub mod consistency;
pub mod decode;
pub mod dfa;
pub mod dot;
pub mod encode;
pub mod io;
pub mod reference;
pub mod search;
pub mod solver;
pub mod symmetry;
pub mod types;
pub mod vars;
