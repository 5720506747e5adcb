//! The complete encoding for one candidate size.

use log::debug;

use crate::cnf::Cnf;
use crate::consistency::encode_consistency;
use crate::reference::ReferenceAutomaton;
use crate::symmetry::encode_bfs_tree;
use crate::vars::Variables;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Add the BFS-tree symmetry breaking clauses (default: true).
    ///
    /// Without them every relabeling of a solution is a solution as well. The variable
    /// layout is the same either way.
    pub symmetry_breaking: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            symmetry_breaking: true,
        }
    }
}

/// Variables and clauses for a single candidate size.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub vars: Variables,
    pub cnf: Cnf,
}

/// Encodes "there is a DFA with `num_states` states consistent with `reference`".
///
/// This is a pure function of its arguments: nothing is shared between calls.
///
/// # Panics
///
/// Panics if `num_states == 0`.
pub fn encode(num_states: usize, reference: &ReferenceAutomaton, options: &EncodeOptions) -> Encoding {
    let vars = Variables::new(num_states, reference.num_symbols(), reference.num_states());
    let mut cnf = encode_consistency(&vars, reference);
    if options.symmetry_breaking {
        cnf.append(encode_bfs_tree(&vars));
    }
    debug!(
        "encoded n = {}: {} vars, {} clauses",
        num_states,
        cnf.num_vars(),
        cnf.len()
    );
    Encoding { vars, cnf }
}
