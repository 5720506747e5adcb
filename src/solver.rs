//! SAT backends.
//!
//! A backend takes a [`Cnf`] and answers with a total model or a definite "unsatisfiable".
//! Every call is independent: backends keep no state between formulas.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::cnf::{Cnf, Model};

/// Outcome of a single satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    Sat(Model),
    Unsat,
}

impl SatOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatOutcome::Sat(_))
    }
}

/// Failure of the backend itself (as opposed to an UNSAT answer).
#[derive(Debug)]
pub enum BackendError {
    Io(io::Error),
    Solver(String),
}

impl From<io::Error> for BackendError {
    fn from(e: io::Error) -> Self {
        BackendError::Io(e)
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Io(e) => write!(f, "I/O error: {}", e),
            BackendError::Solver(msg) => write!(f, "solver error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Io(e) => Some(e),
            BackendError::Solver(_) => None,
        }
    }
}

pub trait SatBackend {
    fn name(&self) -> &str;

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError>;
}

impl<B: SatBackend + ?Sized> SatBackend for &mut B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError> {
        (**self).solve(cnf)
    }
}

impl<B: SatBackend + ?Sized> SatBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError> {
        (**self).solve(cnf)
    }
}

/// Backend on the `varisat` CDCL solver. A fresh solver is created for every formula.
#[derive(Debug, Default, Clone, Copy)]
pub struct VarisatBackend;

impl SatBackend for VarisatBackend {
    fn name(&self) -> &str {
        "varisat"
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError> {
        use varisat::ExtendFormula;

        let mut solver = varisat::Solver::new();
        let mut lits = Vec::new();
        for clause in cnf.clauses() {
            lits.clear();
            lits.extend(
                clause
                    .iter()
                    .map(|lit| varisat::Lit::from_dimacs(lit.to_dimacs() as isize)),
            );
            solver.add_clause(&lits);
        }

        match solver.solve() {
            Ok(true) => {
                let model = solver
                    .model()
                    .ok_or_else(|| BackendError::Solver("satisfiable, but no model available".into()))?;
                Ok(SatOutcome::Sat(Model::from_dimacs(
                    cnf.num_vars(),
                    model.iter().map(|lit| lit.to_dimacs() as i32),
                )))
            }
            Ok(false) => Ok(SatOutcome::Unsat),
            Err(e) => Err(BackendError::Solver(e.to_string())),
        }
    }
}

/// Writes every formula to `<dir>/<prefix><k>.cnf` in DIMACS format before passing it on.
#[derive(Debug)]
pub struct DimacsDump<B> {
    inner: B,
    dir: PathBuf,
    prefix: String,
    count: usize,
}

impl<B: SatBackend> DimacsDump<B> {
    pub fn new(inner: B, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            dir: dir.into(),
            prefix: prefix.into(),
            count: 0,
        }
    }
}

impl<B: SatBackend> SatBackend for DimacsDump<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError> {
        self.count += 1;
        let path = self.dir.join(format!("{}{}.cnf", self.prefix, self.count));
        debug!("writing {} clauses to {}", cnf.len(), path.display());
        cnf.write_dimacs(BufWriter::new(File::create(&path)?))?;
        self.inner.solve(cnf)
    }
}

/// Backend running an external solver executable in the SAT-competition convention.
///
/// The formula is piped to the process on stdin in DIMACS format. The answer is read from
/// stdout: an `s SATISFIABLE` / `s UNSATISFIABLE` status line and, when satisfiable, `v`
/// lines carrying the model. Exit codes are not interpreted, since solvers customarily exit
/// with 10 or 20.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl SatBackend for ExternalSolver {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("external")
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SatOutcome, BackendError> {
        debug!(
            "running {} {:?} on {} vars, {} clauses",
            self.program.display(),
            self.args,
            cnf.num_vars(),
            cnf.len()
        );
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Solver("solver stdin is not captured".into()))?;
        match cnf.write_dimacs(BufWriter::new(stdin)) {
            Ok(()) => {}
            // The solver may stop reading early; its output decides.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                warn!("{} closed its input early", self.program.display());
            }
            Err(e) => return Err(e.into()),
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_solver_output(cnf.num_vars(), &stdout).map_err(|e| match e {
            BackendError::Solver(msg) => BackendError::Solver(format!(
                "{} ({}): {}",
                msg,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            e => e,
        })
    }
}

/// Parses solver output in the SAT-competition convention.
///
/// Lines other than `s` and `v` lines are ignored. Variables missing from the `v` lines
/// default to `false`.
pub fn parse_solver_output(num_vars: u32, output: &str) -> Result<SatOutcome, BackendError> {
    let mut status = None;
    let mut lits = Vec::new();
    let mut has_model = false;

    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("s ") {
            status = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix('v').filter(|rest| rest.is_empty() || rest.starts_with(' ')) {
            has_model = true;
            for token in rest.split_whitespace() {
                let lit = token
                    .parse::<i32>()
                    .map_err(|_| BackendError::Solver(format!("bad literal '{}' in model line", token)))?;
                lits.push(lit);
            }
        }
    }

    match status {
        Some("SATISFIABLE") if has_model => Ok(SatOutcome::Sat(Model::from_dimacs(num_vars, lits))),
        Some("SATISFIABLE") => Err(BackendError::Solver("satisfiable, but no model printed".into())),
        Some("UNSATISFIABLE") => Ok(SatOutcome::Unsat),
        Some(other) => Err(BackendError::Solver(format!("solver answered '{}'", other))),
        None => Err(BackendError::Solver("no status line in solver output".into())),
    }
}
