//! Complete deterministic automata produced by the search.

use std::collections::VecDeque;
use std::fmt;

use crate::reference::ReferenceAutomaton;

/// A total DFA over states `0..num_states` and symbols `0..num_symbols`, with initial state 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    num_symbols: usize,
    delta: Vec<Vec<usize>>,
    finals: Vec<bool>,
}

impl Dfa {
    /// Creates a DFA from its transition table (`delta[state][symbol]`) and final-state flags.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty or ragged, if `finals` has the wrong length,
    /// or if some target is out of range.
    pub fn new(delta: Vec<Vec<usize>>, finals: Vec<bool>) -> Self {
        assert!(!delta.is_empty(), "DFA must have at least one state");
        assert_eq!(delta.len(), finals.len(), "One final flag per state required");
        let num_symbols = delta[0].len();
        assert!(num_symbols > 0, "Alphabet must be non-empty");
        for row in &delta {
            assert_eq!(row.len(), num_symbols, "Transition table must be rectangular");
            for &q in row {
                assert!(q < delta.len(), "Transition target {} is out of range", q);
            }
        }
        Self {
            num_symbols,
            delta,
            finals,
        }
    }

    pub fn num_states(&self) -> usize {
        self.delta.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn successor(&self, state: usize, symbol: usize) -> usize {
        self.delta[state][symbol]
    }

    pub fn is_final(&self, state: usize) -> bool {
        self.finals[state]
    }

    pub fn final_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.finals.iter().enumerate().filter(|(_, f)| **f).map(|(q, _)| q)
    }

    pub fn table(&self) -> &[Vec<usize>] {
        &self.delta
    }

    /// Runs `word` from the initial state. Returns `None` on a symbol outside the alphabet.
    pub fn run(&self, word: &[usize]) -> Option<usize> {
        word.iter().try_fold(0, |state, &symbol| {
            if symbol < self.num_symbols {
                Some(self.successor(state, symbol))
            } else {
                None
            }
        })
    }

    pub fn accepts(&self, word: &[usize]) -> bool {
        self.run(word).is_some_and(|q| self.is_final(q))
    }

    /// Pairs `(r, q)` such that some word leads the reference automaton to `r`
    /// and this DFA to `q`, in breadth-first order starting from `(init, 0)`.
    ///
    /// Symbols outside this DFA's alphabet are not followed.
    pub fn product_pairs(&self, reference: &ReferenceAutomaton) -> Vec<(usize, usize)> {
        let k = self.num_symbols.min(reference.num_symbols());
        let mut seen = vec![vec![false; self.num_states()]; reference.num_states()];
        seen[reference.init()][0] = true;
        let mut pairs = Vec::new();
        let mut queue = VecDeque::from([(reference.init(), 0)]);
        while let Some((r, q)) = queue.pop_front() {
            pairs.push((r, q));
            for a in 0..k {
                if let Some(r2) = reference.successor(r, a) {
                    let q2 = self.successor(q, a);
                    if !seen[r2][q2] {
                        seen[r2][q2] = true;
                        queue.push_back((r2, q2));
                    }
                }
            }
        }
        pairs
    }

    /// Checks that every word reaching an accepting (rejecting) reference state
    /// is accepted (rejected), over all paths of the reference automaton.
    pub fn is_consistent_with(&self, reference: &ReferenceAutomaton) -> bool {
        if self.num_symbols != reference.num_symbols() {
            return false;
        }
        self.product_pairs(reference).into_iter().all(|(r, q)| {
            if reference.accepting().contains(&r) {
                self.is_final(q)
            } else if reference.rejecting().contains(&r) {
                !self.is_final(q)
            } else {
                true
            }
        })
    }

    /// Breadth-first numbering from state 0, visiting symbols in increasing order.
    ///
    /// `order[k]` is the state that receives number `k`; unreachable states are absent.
    pub fn bfs_order(&self) -> Vec<usize> {
        let mut seen = vec![false; self.num_states()];
        let mut order = vec![0];
        seen[0] = true;
        let mut queue = VecDeque::from([0]);
        while let Some(p) = queue.pop_front() {
            for &q in &self.delta[p] {
                if !seen[q] {
                    seen[q] = true;
                    order.push(q);
                    queue.push_back(q);
                }
            }
        }
        order
    }

    /// Whether all states are reachable and already numbered breadth-first.
    pub fn is_bfs_canonical(&self) -> bool {
        let order = self.bfs_order();
        order.len() == self.num_states() && order.iter().enumerate().all(|(k, &q)| k == q)
    }

    /// Renumbers the reachable part of the automaton breadth-first.
    ///
    /// Two DFAs whose reachable parts are isomorphic have equal canonical forms.
    pub fn canonical(&self) -> Dfa {
        let order = self.bfs_order();
        let mut number = vec![usize::MAX; self.num_states()];
        for (k, &q) in order.iter().enumerate() {
            number[q] = k;
        }
        let delta = order
            .iter()
            .map(|&q| self.delta[q].iter().map(|&t| number[t]).collect())
            .collect();
        let finals = order.iter().map(|&q| self.finals[q]).collect();
        Dfa::new(delta, finals)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (p, row) in self.delta.iter().enumerate() {
            write!(f, "{}{}:", if self.finals[p] { "*" } else { " " }, p)?;
            for (a, q) in row.iter().enumerate() {
                write!(f, " {}->{}", a, q)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
