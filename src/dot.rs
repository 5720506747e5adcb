//! DFA to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **States** are circles labeled with their number, final states are double circles
//! - **Initial state** (always 0) is marked by an arrow from an invisible start node
//! - **Edges**: parallel transitions between the same pair of states are merged into one
//!   edge labeled with the comma-separated list of symbols
//!
//! # Examples
//!
//! ```
//! use dfa_sat::dfa::Dfa;
//!
//! let dfa = Dfa::new(vec![vec![0, 1], vec![1, 0]], vec![true, false]);
//! let dot = dfa.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::dfa::Dfa;

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use dfa_sat::dfa::Dfa;
/// use dfa_sat::dot::DotConfig;
///
/// let dfa = Dfa::new(vec![vec![0]], vec![true]);
/// let config = DotConfig {
///     rankdir: "TB",
///     ..DotConfig::default()
/// };
///
/// let dot = dfa.to_dot_with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for non-final states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for final states (default: "doublecircle")
    pub final_shape: &'static str,
    /// Layout direction (default: "LR")
    pub rankdir: &'static str,
    /// Merge parallel transitions into a single labeled edge (default: true)
    pub merge_parallel_edges: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            final_shape: "doublecircle",
            rankdir: "LR",
            merge_parallel_edges: true,
        }
    }
}

impl Dfa {
    /// Converts the DFA to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the DFA to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "init [shape=point, style=invis];")?;

        for p in 0..self.num_states() {
            let shape = if self.is_final(p) {
                config.final_shape
            } else {
                config.state_shape
            };
            writeln!(dot, "{} [shape={}, label=\"{}\"];", p, shape, p)?;
        }
        writeln!(dot, "init -> 0;")?;

        for p in 0..self.num_states() {
            if config.merge_parallel_edges {
                let mut labels = BTreeMap::<usize, Vec<String>>::new();
                for (a, &q) in self.table()[p].iter().enumerate() {
                    labels.entry(q).or_default().push(a.to_string());
                }
                for (q, symbols) in labels {
                    writeln!(dot, "{} -> {} [label=\"{}\"];", p, q, symbols.join(","))?;
                }
            } else {
                for (a, &q) in self.table()[p].iter().enumerate() {
                    writeln!(dot, "{} -> {} [label=\"{}\"];", p, q, a)?;
                }
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
