use std::path::PathBuf;

use clap::Parser;

use dfa_sat::reference::ReferenceAutomaton;
use dfa_sat::search::{minimise, SearchOptions};
use dfa_sat::solver::{DimacsDump, ExternalSolver, SatBackend, VarisatBackend};

/// Minimise automata with don't-care words.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Path to the input automaton (`.fa` format).
    #[arg(long, value_name = "PATH")]
    infile: PathBuf,

    /// Path to write the resulting DFA in DOT format.
    #[arg(long, value_name = "PATH")]
    outfile: Option<PathBuf>,

    /// Path to write the resulting DFA in `.fa` format.
    #[arg(long, value_name = "PATH")]
    fa_out: Option<PathBuf>,

    /// Lower bound on the number of states.
    #[arg(long, value_name = "INT", default_value = "1")]
    lower: usize,

    /// Upper bound on the number of states (default: size of the input automaton).
    #[arg(long, value_name = "INT")]
    upper: Option<usize>,

    /// Directory to dump the CNF of every iteration into (DIMACS format).
    #[arg(long, value_name = "DIR")]
    dimacs: Option<PathBuf>,

    /// SAT solver: `varisat` (built in) or the path of a DIMACS solver executable.
    #[arg(long, value_name = "SOLVER", default_value = "varisat")]
    solver: String,

    /// Extra argument passed to the external solver (repeatable).
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    solver_args: Vec<String>,

    /// Disable BFS-based symmetry breaking.
    #[arg(long)]
    no_symmetry_breaking: bool,

    /// Log level.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let reference = ReferenceAutomaton::load(&args.infile)?;
    log::info!(
        "input: {} states, {} symbols, {} transitions, {} accepting, {} rejecting",
        reference.num_states(),
        reference.num_symbols(),
        reference.num_transitions(),
        reference.accepting().len(),
        reference.rejecting().len()
    );

    let mut options = SearchOptions::default()
        .with_lower_bound(args.lower)
        .with_symmetry_breaking(!args.no_symmetry_breaking);
    if let Some(upper) = args.upper {
        options = options.with_upper_bound(upper);
    }

    let solver: Box<dyn SatBackend> = if args.solver == "varisat" {
        Box::new(VarisatBackend)
    } else {
        Box::new(ExternalSolver::new(&args.solver).args(args.solver_args.iter().cloned()))
    };
    log::info!("solver: {}", solver.name());
    let mut backend: Box<dyn SatBackend> = match &args.dimacs {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Box::new(DimacsDump::new(solver, dir, "iteration_"))
        }
        None => solver,
    };

    let solution = minimise(&reference, &options, &mut backend)?;
    println!("Found DFA with {} states:", solution.dfa.num_states());
    print!("{}", solution.dfa);

    if let Some(path) = &args.outfile {
        std::fs::write(path, solution.dfa.to_dot()?)?;
        println!("Output to {}", path.display());
    }
    if let Some(path) = &args.fa_out {
        solution.dfa.save(path)?;
        println!("Output to {}", path.display());
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
