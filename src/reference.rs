//! Reference automata: the source of sample behavior.
//!
//! A reference automaton is a (possibly partial) deterministic automaton whose
//! accepting and rejecting states mark the terminal nodes of sample paths.
//! Everything outside those paths is "don't care" for the identified DFA.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Error raised when a reference automaton is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The automaton has no states.
    NoStates,
    /// The alphabet is empty.
    EmptyAlphabet,
    /// A state index is outside `0..num_states`.
    StateOutOfRange { state: usize, num_states: usize },
    /// A symbol is outside `0..num_symbols`.
    SymbolOutOfRange { symbol: usize, num_symbols: usize },
    /// Two different targets for the same `(state, symbol)`.
    ConflictingTransition {
        state: usize,
        symbol: usize,
        first: usize,
        second: usize,
    },
    /// A state is marked both accepting and rejecting.
    AcceptingAndRejecting { state: usize },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NoStates => write!(f, "reference automaton has no states"),
            InputError::EmptyAlphabet => write!(f, "reference automaton has an empty alphabet"),
            InputError::StateOutOfRange { state, num_states } => {
                write!(f, "state {} is out of range 0..{}", state, num_states)
            }
            InputError::SymbolOutOfRange { symbol, num_symbols } => {
                write!(f, "symbol {} is out of range 0..{}", symbol, num_symbols)
            }
            InputError::ConflictingTransition {
                state,
                symbol,
                first,
                second,
            } => write!(
                f,
                "state {} has two transitions on symbol {}: to {} and to {}",
                state, symbol, first, second
            ),
            InputError::AcceptingAndRejecting { state } => {
                write!(f, "state {} is both accepting and rejecting", state)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// A validated reference automaton.
///
/// States are `0..num_states`, symbols are `0..num_symbols`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAutomaton {
    num_symbols: usize,
    init: usize,
    delta: Vec<Vec<Option<usize>>>,
    accepting: BTreeSet<usize>,
    rejecting: BTreeSet<usize>,
}

impl ReferenceAutomaton {
    /// Builds and validates a reference automaton.
    ///
    /// `transitions` are `(source, symbol, target)` triples. Repeating a triple is allowed,
    /// giving two targets for the same `(source, symbol)` is not.
    pub fn new<T, A, R>(
        num_states: usize,
        num_symbols: usize,
        init: usize,
        transitions: T,
        accepting: A,
        rejecting: R,
    ) -> Result<Self, InputError>
    where
        T: IntoIterator<Item = (usize, usize, usize)>,
        A: IntoIterator<Item = usize>,
        R: IntoIterator<Item = usize>,
    {
        if num_states == 0 {
            return Err(InputError::NoStates);
        }
        if num_symbols == 0 {
            return Err(InputError::EmptyAlphabet);
        }
        let check_state = |state: usize| {
            if state < num_states {
                Ok(state)
            } else {
                Err(InputError::StateOutOfRange { state, num_states })
            }
        };
        check_state(init)?;

        let mut delta = vec![vec![None; num_symbols]; num_states];
        for (src, symbol, dst) in transitions {
            check_state(src)?;
            check_state(dst)?;
            if symbol >= num_symbols {
                return Err(InputError::SymbolOutOfRange { symbol, num_symbols });
            }
            match delta[src][symbol] {
                Some(first) if first != dst => {
                    return Err(InputError::ConflictingTransition {
                        state: src,
                        symbol,
                        first,
                        second: dst,
                    });
                }
                _ => delta[src][symbol] = Some(dst),
            }
        }

        let accepting = accepting.into_iter().map(check_state).collect::<Result<BTreeSet<_>, _>>()?;
        let rejecting = rejecting.into_iter().map(check_state).collect::<Result<BTreeSet<_>, _>>()?;
        if let Some(&state) = accepting.intersection(&rejecting).next() {
            return Err(InputError::AcceptingAndRejecting { state });
        }

        Ok(Self {
            num_symbols,
            init,
            delta,
            accepting,
            rejecting,
        })
    }

    pub fn num_states(&self) -> usize {
        self.delta.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn init(&self) -> usize {
        self.init
    }

    pub fn accepting(&self) -> &BTreeSet<usize> {
        &self.accepting
    }

    pub fn rejecting(&self) -> &BTreeSet<usize> {
        &self.rejecting
    }

    pub fn successor(&self, state: usize, symbol: usize) -> Option<usize> {
        self.delta[state][symbol]
    }

    /// All defined transitions as `(source, symbol, target)`, ordered by source, then symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.delta.iter().enumerate().flat_map(|(src, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(symbol, dst)| dst.map(|dst| (src, symbol, dst)))
        })
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions().count()
    }

    /// Follows `word` from the initial state.
    ///
    /// Returns `None` if some symbol has no transition (or is outside the alphabet).
    pub fn walk(&self, word: &[usize]) -> Option<usize> {
        word.iter().try_fold(self.init, |state, &symbol| {
            if symbol < self.num_symbols {
                self.successor(state, symbol)
            } else {
                None
            }
        })
    }

    /// A shortest word reaching each state, or `None` for unreachable states.
    ///
    /// Among words of equal length, the one found by exploring smaller symbols first wins.
    pub fn access_words(&self) -> Vec<Option<Vec<usize>>> {
        let mut words: Vec<Option<Vec<usize>>> = vec![None; self.num_states()];
        words[self.init] = Some(Vec::new());

        let mut queue = VecDeque::from([self.init]);
        while let Some(state) = queue.pop_front() {
            for symbol in 0..self.num_symbols {
                if let Some(next) = self.successor(state, symbol) {
                    if words[next].is_none() {
                        let mut word = words[state].clone().unwrap_or_default();
                        word.push(symbol);
                        words[next] = Some(word);
                        queue.push_back(next);
                    }
                }
            }
        }

        words
    }

    /// One shortest sample word per labeled state: `true` for accepting, `false` for rejecting.
    ///
    /// Sample terminals unreachable from the initial state carry no word and are skipped.
    pub fn sample_words(&self) -> Vec<(Vec<usize>, bool)> {
        let words = self.access_words();
        let mut samples = Vec::new();
        for (state, word) in words.into_iter().enumerate() {
            let Some(word) = word else { continue };
            if self.accepting.contains(&state) {
                samples.push((word, true));
            } else if self.rejecting.contains(&state) {
                samples.push((word, false));
            }
        }
        samples
    }
}
