//! Variable allocation for the DFA identification encoding.
//!
//! For a candidate size `n`, an alphabet of `k` symbols and a reference automaton with `m`
//! states, the propositions are laid out in contiguous id ranges, in this order:
//!
//! | family       | key         | count          |
//! |--------------|-------------|----------------|
//! | `edge`       | `(p, a, q)` | `n * k * n`    |
//! | `final`      | `p`         | `n`            |
//! | `node`       | `(r, q)`    | `m * n`        |
//! | `parent`     | `(j, i)`    | `n * (n-1) / 2`|
//! | `tree_edge`  | `(i, j)`    | `n * n`        |
//! | `min_letter` | `(i, a, j)` | `n * k * n`    |
//!
//! The `final` markers follow the transition propositions directly, so together they form
//! the "edge" range `1..=n*k*n + n`.
//!
//! Ids are computed from keys by index arithmetic, so the same key always maps to the same
//! id for a given `(n, k, m)`.

use std::fmt;
use std::ops::RangeInclusive;

use log::debug;

use crate::types::Var;

/// The proposition families, in allocation order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Family {
    Edge,
    Final,
    Node,
    Parent,
    TreeEdge,
    MinLetter,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::Edge,
        Family::Final,
        Family::Node,
        Family::Parent,
        Family::TreeEdge,
        Family::MinLetter,
    ];
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Edge => "edge",
            Family::Final => "final",
            Family::Node => "node",
            Family::Parent => "parent",
            Family::TreeEdge => "tree_edge",
            Family::MinLetter => "min_letter",
        };
        write!(f, "{}", name)
    }
}

/// Variable tables for one candidate size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variables {
    num_states: usize,
    num_symbols: usize,
    num_ref_states: usize,
    // First id of each family, indexed like `Family::ALL`, plus one past the end.
    offsets: [u32; 7],
}

impl Variables {
    /// Allocates the variables for `num_states` candidate states over `num_symbols` symbols,
    /// given a reference automaton with `num_ref_states` states.
    ///
    /// # Panics
    ///
    /// Panics if `num_states` or `num_symbols` is zero, or if the total does not fit into `u32`.
    pub fn new(num_states: usize, num_symbols: usize, num_ref_states: usize) -> Self {
        assert!(num_states > 0, "Candidate automaton must have at least one state");
        assert!(num_symbols > 0, "Alphabet must be non-empty");

        let n = num_states;
        let k = num_symbols;
        let sizes = [n * k * n, n, num_ref_states * n, n * (n - 1) / 2, n * n, n * k * n];

        let mut offsets = [0u32; 7];
        let mut next: usize = 1;
        for (i, size) in sizes.into_iter().enumerate() {
            offsets[i] = u32::try_from(next).expect("Too many variables");
            next += size;
        }
        offsets[6] = u32::try_from(next).expect("Too many variables");

        let vars = Self {
            num_states,
            num_symbols,
            num_ref_states,
            offsets,
        };
        for family in Family::ALL {
            debug!("{} vars: {:?}", family, vars.range(family));
        }
        vars
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn num_ref_states(&self) -> usize {
        self.num_ref_states
    }

    /// Total number of allocated variables.
    pub fn num_vars(&self) -> u32 {
        self.offsets[6] - 1
    }

    fn slot(family: Family) -> usize {
        family as usize
    }

    /// Number of variables in the given family.
    pub fn len(&self, family: Family) -> u32 {
        let i = Self::slot(family);
        self.offsets[i + 1] - self.offsets[i]
    }

    /// The id range of the given family (empty when the family has no variables).
    pub fn range(&self, family: Family) -> RangeInclusive<u32> {
        let i = Self::slot(family);
        self.offsets[i]..=(self.offsets[i + 1] - 1)
    }

    fn var(&self, family: Family, index: usize) -> Var {
        debug_assert!((index as u32) < self.len(family));
        Var::new(self.offsets[Self::slot(family)] + index as u32)
    }

    /// `p --a--> q` in the candidate automaton.
    pub fn edge(&self, p: usize, a: usize, q: usize) -> Var {
        assert!(p < self.num_states && q < self.num_states && a < self.num_symbols);
        let (n, k) = (self.num_states, self.num_symbols);
        self.var(Family::Edge, (p * k + a) * n + q)
    }

    /// Candidate state `p` is final.
    pub fn final_state(&self, p: usize) -> Var {
        assert!(p < self.num_states);
        self.var(Family::Final, p)
    }

    /// The sample path reaching reference state `r` reaches candidate state `q`.
    pub fn node(&self, r: usize, q: usize) -> Var {
        assert!(r < self.num_ref_states && q < self.num_states);
        self.var(Family::Node, r * self.num_states + q)
    }

    /// `i` is the parent of `j` in the BFS tree (`i < j`).
    pub fn parent(&self, j: usize, i: usize) -> Var {
        assert!(i < j && j < self.num_states, "parent({}, {}) requires i < j < n", j, i);
        self.var(Family::Parent, j * (j - 1) / 2 + i)
    }

    /// Some symbol leads from `i` to `j`.
    pub fn tree_edge(&self, i: usize, j: usize) -> Var {
        assert!(i < self.num_states && j < self.num_states);
        self.var(Family::TreeEdge, i * self.num_states + j)
    }

    /// `a` is the smallest symbol leading from `i` to `j`.
    pub fn min_letter(&self, i: usize, a: usize, j: usize) -> Var {
        assert!(i < self.num_states && j < self.num_states && a < self.num_symbols);
        let (n, k) = (self.num_states, self.num_symbols);
        self.var(Family::MinLetter, (i * k + a) * n + j)
    }
}
