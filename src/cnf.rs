//! Clause sets and truth assignments.

use std::fmt::Write as FmtWrite;
use std::io;

use crate::types::{Lit, Var};

pub type Clause = Vec<Lit>;

/// A formula in conjunctive normal form over variables `1..=num_vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Adds a clause.
    ///
    /// # Panics
    ///
    /// Panics if the clause mentions a variable outside `1..=num_vars`.
    pub fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
    {
        let clause: Clause = lits.into_iter().map(Into::into).collect();
        for lit in &clause {
            assert!(
                lit.var().id() <= self.num_vars,
                "Literal {} is out of range 1..={}",
                lit,
                self.num_vars
            );
        }
        self.clauses.push(clause);
    }

    /// Appends all clauses of `other`, growing the variable range if needed.
    pub fn append(&mut self, other: Cnf) {
        self.num_vars = self.num_vars.max(other.num_vars);
        self.clauses.extend(other.clauses);
    }

    /// Returns the first clause falsified by the model, if any.
    pub fn first_violated(&self, model: &Model) -> Option<&Clause> {
        self.clauses
            .iter()
            .find(|clause| !clause.iter().any(|&lit| model.lit(lit)))
    }

    /// Checks whether the model satisfies every clause.
    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.first_violated(model).is_none()
    }

    /// Converts the formula to DIMACS CNF format.
    pub fn to_dimacs(&self) -> String {
        let mut output = String::new();
        writeln!(output, "p cnf {} {}", self.num_vars, self.clauses.len()).unwrap();
        for clause in &self.clauses {
            for lit in clause {
                write!(output, "{} ", lit.to_dimacs()).unwrap();
            }
            writeln!(output, "0").unwrap();
        }
        output
    }

    /// Streams the formula in DIMACS CNF format and flushes the writer.
    pub fn write_dimacs<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(writer, "{} ", lit.to_dimacs())?;
            }
            writeln!(writer, "0")?;
        }
        writer.flush()
    }
}

/// A total truth assignment over variables `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// All-false assignment.
    pub fn new(num_vars: u32) -> Self {
        Self {
            values: vec![false; num_vars as usize],
        }
    }

    /// Builds an assignment from signed DIMACS literals.
    ///
    /// Variables not mentioned default to `false`; literals beyond `num_vars` are ignored.
    pub fn from_dimacs<I>(num_vars: u32, lits: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut model = Self::new(num_vars);
        for lit in lits {
            if lit == 0 {
                continue;
            }
            let lit = Lit::from_dimacs(lit);
            if lit.var().id() <= num_vars {
                model.set(lit.var(), lit.is_positive());
            }
        }
        model
    }

    pub fn num_vars(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn value(&self, var: Var) -> bool {
        self.values[var.index()]
    }

    pub fn lit(&self, lit: Lit) -> bool {
        lit.eval(self.value(lit.var()))
    }

    pub fn set(&mut self, var: Var, value: bool) {
        self.values[var.index()] = value;
    }

    /// The model as the list of true-or-false DIMACS literals, one per variable.
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| if v { i as i32 + 1 } else { -(i as i32 + 1) })
            .collect()
    }
}
