//! Iterative search for the smallest consistent DFA.
//!
//! Candidate sizes are tried in increasing order, starting from a lower bound, and each size
//! is encoded from scratch. The first satisfiable size is the minimum (among sizes not below
//! the lower bound). The reference automaton itself bounds the search from above.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::decode::{decode, DecodeError};
use crate::dfa::Dfa;
use crate::encode::{encode, EncodeOptions};
use crate::reference::ReferenceAutomaton;
use crate::solver::{BackendError, SatBackend, SatOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// First candidate size (default: 1).
    pub lower_bound: usize,
    /// Last candidate size (default and maximum: the number of reference states).
    pub upper_bound: Option<usize>,
    pub encode: EncodeOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            lower_bound: 1,
            upper_bound: None,
            encode: EncodeOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_lower_bound(mut self, lower_bound: usize) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn with_upper_bound(mut self, upper_bound: usize) -> Self {
        self.upper_bound = Some(upper_bound);
        self
    }

    pub fn with_symmetry_breaking(mut self, enabled: bool) -> Self {
        self.encode.symmetry_breaking = enabled;
        self
    }
}

/// Statistics of one candidate size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub num_states: usize,
    pub num_vars: u32,
    pub num_clauses: usize,
    pub satisfiable: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub dfa: Dfa,
    /// One entry per candidate size tried, the last one being satisfiable.
    pub attempts: Vec<Attempt>,
}

#[derive(Debug)]
pub enum SearchError {
    /// The lower bound is zero or exceeds the (clamped) upper bound.
    InvalidBounds { lower: usize, upper: usize },
    /// The SAT backend failed.
    Backend(BackendError),
    /// A model reported as satisfying does not decode to a DFA.
    Decode { num_states: usize, source: DecodeError },
    /// No size in `lower..=upper` admits a consistent DFA.
    Exhausted { lower: usize, upper: usize },
}

impl From<BackendError> for SearchError {
    fn from(e: BackendError) -> Self {
        SearchError::Backend(e)
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidBounds { lower, upper } => {
                write!(f, "invalid size bounds {}..={}", lower, upper)
            }
            SearchError::Backend(e) => write!(f, "SAT backend failed: {}", e),
            SearchError::Decode { num_states, source } => {
                write!(f, "encoding defect at n = {}: {}", num_states, source)
            }
            SearchError::Exhausted { lower, upper } => {
                write!(f, "no consistent DFA with {} to {} states", lower, upper)
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Backend(e) => Some(e),
            SearchError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Checks whether a DFA with exactly `num_states` states is consistent with `reference`.
///
/// Returns the decoded DFA (in BFS-canonical form when symmetry breaking is enabled)
/// together with the statistics of the check.
pub fn solve_size<B: SatBackend>(
    reference: &ReferenceAutomaton,
    num_states: usize,
    options: &EncodeOptions,
    backend: &mut B,
) -> Result<(Option<Dfa>, Attempt), SearchError> {
    let start = Instant::now();
    let encoding = encode(num_states, reference, options);
    let outcome = backend.solve(&encoding.cnf)?;

    let dfa = match outcome {
        SatOutcome::Sat(model) => {
            let dfa = decode(&model, &encoding.vars).map_err(|source| SearchError::Decode { num_states, source })?;
            debug_assert!(dfa.is_consistent_with(reference));
            Some(dfa)
        }
        SatOutcome::Unsat => None,
    };

    let attempt = Attempt {
        num_states,
        num_vars: encoding.cnf.num_vars(),
        num_clauses: encoding.cnf.len(),
        satisfiable: dfa.is_some(),
        elapsed: start.elapsed(),
    };
    info!(
        "n = {}: {} vars, {} clauses, {} accepting, {} rejecting -> {} in {:.3} s ({})",
        attempt.num_states,
        attempt.num_vars,
        attempt.num_clauses,
        reference.accepting().len(),
        reference.rejecting().len(),
        if attempt.satisfiable { "SAT" } else { "UNSAT" },
        attempt.elapsed.as_secs_f64(),
        backend.name(),
    );
    Ok((dfa, attempt))
}

/// Finds the smallest DFA consistent with the sample paths of `reference`.
pub fn minimise<B: SatBackend>(
    reference: &ReferenceAutomaton,
    options: &SearchOptions,
    backend: &mut B,
) -> Result<Solution, SearchError> {
    let lower = options.lower_bound;
    let max = reference.num_states();
    if lower == 0 {
        return Err(SearchError::InvalidBounds {
            lower,
            upper: options.upper_bound.unwrap_or(max),
        });
    }
    if let Some(upper) = options.upper_bound {
        if upper < lower {
            return Err(SearchError::InvalidBounds { lower, upper });
        }
    }
    let upper = options.upper_bound.map_or(max, |upper| upper.min(max));
    if lower > upper {
        return Err(SearchError::InvalidBounds { lower, upper });
    }

    let mut attempts = Vec::new();
    for num_states in lower..=upper {
        let (dfa, attempt) = solve_size(reference, num_states, &options.encode, backend)?;
        attempts.push(attempt);
        if let Some(dfa) = dfa {
            info!("found DFA with {} states after {} attempts", num_states, attempts.len());
            return Ok(Solution { dfa, attempts });
        }
    }

    Err(SearchError::Exhausted { lower, upper })
}
