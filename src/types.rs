//! Type-safe wrappers for propositional variables and literals.
//!
//! Variables are 1-indexed (0 is reserved as the DIMACS clause terminator),
//! literals use the usual signed-integer convention: sign is polarity,
//! magnitude is the variable id.

use std::fmt;
use std::ops::Neg;

/// A propositional variable (1-indexed).
///
/// # Invariants
///
/// - Variable IDs must be >= 1
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based index of the variable (`id - 1`).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn pos(self) -> Lit {
        Lit(self.0 as i32)
    }

    pub fn neg(self) -> Lit {
        Lit(-(self.0 as i32))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// A literal: a variable or its negation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Creates a literal from a signed DIMACS integer.
    ///
    /// # Panics
    ///
    /// Panics if `lit == 0`.
    pub fn from_dimacs(lit: i32) -> Self {
        assert_ne!(lit, 0, "Literal cannot be zero");
        Lit(lit)
    }

    pub fn to_dimacs(self) -> i32 {
        self.0
    }

    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the value of the literal under the given value of its variable.
    pub fn eval(self, value: bool) -> bool {
        value == self.is_positive()
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<Var> for Lit {
    fn from(var: Var) -> Self {
        var.pos()
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "~")?;
        }
        write!(f, "{}", self.var())
    }
}
