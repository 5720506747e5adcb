//! Reading and writing automata in the `.fa` text format.
//!
//! # Format
//!
//! ```text
//! <num_states> <num_symbols>
//! <init_state>
//! a <state>                 # accepting sample terminal
//! r <state>                 # rejecting sample terminal
//! t <src> <symbol> <dst>    # transition (any tag other than `a` and `r`)
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io;
use std::path::Path;

use crate::dfa::Dfa;
use crate::reference::{InputError, ReferenceAutomaton};

/// Error type for I/O operations.
#[derive(Debug)]
pub enum IoError {
    /// File I/O error.
    Io(io::Error),
    /// Parse error at the given (1-based) line.
    Parse { line: usize, message: String },
    /// The parsed automaton is malformed.
    Input(InputError),
}

impl From<io::Error> for IoError {
    fn from(e: io::Error) -> Self {
        IoError::Io(e)
    }
}

impl From<InputError> for IoError {
    fn from(e: InputError) -> Self {
        IoError::Input(e)
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Io(e) => write!(f, "I/O error: {}", e),
            IoError::Parse { line, message } => write!(f, "Parse error at line {}: {}", line, message),
            IoError::Input(e) => write!(f, "Invalid automaton: {}", e),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Io(e) => Some(e),
            IoError::Parse { .. } => None,
            IoError::Input(e) => Some(e),
        }
    }
}

fn parse_numbers<const N: usize>(line: usize, tokens: &[&str]) -> Result<[usize; N], IoError> {
    if tokens.len() != N {
        return Err(IoError::Parse {
            line,
            message: format!("expected {} numbers, found {} tokens", N, tokens.len()),
        });
    }
    let mut numbers = [0; N];
    for (number, token) in numbers.iter_mut().zip(tokens) {
        *number = token.parse().map_err(|_| IoError::Parse {
            line,
            message: format!("invalid number '{}'", token),
        })?;
    }
    Ok(numbers)
}

impl ReferenceAutomaton {
    /// Reads a reference automaton from a `.fa` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let content = fs::read_to_string(path)?;
        Self::from_fa_string(&content)
    }

    /// Parses a reference automaton in `.fa` format.
    pub fn from_fa_string(content: &str) -> Result<Self, IoError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (line, header) = lines.next().ok_or(IoError::Parse {
            line: 1,
            message: "missing header".into(),
        })?;
        let [num_states, num_symbols] = parse_numbers::<2>(line, &header.split_whitespace().collect::<Vec<_>>())?;

        let (line, init) = lines.next().ok_or(IoError::Parse {
            line: line + 1,
            message: "missing initial state".into(),
        })?;
        let [init] = parse_numbers::<1>(line, &init.split_whitespace().collect::<Vec<_>>())?;

        let mut transitions = Vec::new();
        let mut accepting = Vec::new();
        let mut rejecting = Vec::new();
        for (line, text) in lines {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            match tokens[0] {
                "a" => {
                    let [state] = parse_numbers::<1>(line, &tokens[1..])?;
                    accepting.push(state);
                }
                "r" => {
                    let [state] = parse_numbers::<1>(line, &tokens[1..])?;
                    rejecting.push(state);
                }
                _ => {
                    let [src, symbol, dst] = parse_numbers::<3>(line, &tokens[1..])?;
                    transitions.push((src, symbol, dst));
                }
            }
        }

        Ok(ReferenceAutomaton::new(
            num_states,
            num_symbols,
            init,
            transitions,
            accepting,
            rejecting,
        )?)
    }

    /// Converts the automaton to `.fa` format.
    pub fn to_fa_string(&self) -> String {
        let mut output = String::new();
        writeln!(output, "{} {}", self.num_states(), self.num_symbols()).unwrap();
        writeln!(output, "{}", self.init()).unwrap();
        for &state in self.accepting() {
            writeln!(output, "a {}", state).unwrap();
        }
        for &state in self.rejecting() {
            writeln!(output, "r {}", state).unwrap();
        }
        for (src, symbol, dst) in self.transitions() {
            writeln!(output, "t {} {} {}", src, symbol, dst).unwrap();
        }
        output
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        fs::write(path, self.to_fa_string())?;
        Ok(())
    }
}

impl Dfa {
    /// Converts the DFA to `.fa` format: final states are accepting, all others rejecting.
    pub fn to_fa_string(&self) -> String {
        let mut output = String::new();
        writeln!(output, "{} {}", self.num_states(), self.num_symbols()).unwrap();
        writeln!(output, "0").unwrap();
        for p in 0..self.num_states() {
            writeln!(output, "{} {}", if self.is_final(p) { "a" } else { "r" }, p).unwrap();
        }
        for p in 0..self.num_states() {
            for a in 0..self.num_symbols() {
                writeln!(output, "t {} {} {}", p, a, self.successor(p, a)).unwrap();
            }
        }
        output
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        fs::write(path, self.to_fa_string())?;
        Ok(())
    }
}
