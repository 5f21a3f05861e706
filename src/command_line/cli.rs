#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use dpll_solver::sat::cnf::Cnf;
use dpll_solver::sat::dimacs::{ClauseReader, parse_file};
use dpll_solver::sat::dpll::Dpll;
use dpll_solver::sat::error::{ErrorKind, ParseError};
use dpll_solver::sat::recursive::Recursive;
use dpll_solver::sat::solver::{DynamicConfig, SolutionStats, Solutions, Solver, SolverType};
use dpll_solver::sat::variable_selection::VariableSelectionType;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver.
#[derive(Parser, Debug)]
#[command(
    name = "dpll_solver",
    version,
    about = "A chronological DPLL SAT solver with watched-literal propagation"
)]
pub(crate) struct Cli {
    /// A DIMACS .cnf file to solve when no subcommand is given.
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula given as plain text.
    Text {
        /// Clauses as whitespace-separated literals, each ended by 0
        /// (e.g. "1 -2 0 2 3 0"). A `p cnf` line is optional.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every .cnf file under a directory, one after another.
    Dir {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a found model against the formula.
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics.
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the model if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    #[arg(long, default_value_t = SolverType::Dpll)]
    pub(crate) solver: SolverType,

    #[arg(long, default_value_t = VariableSelectionType::Fixed)]
    pub(crate) variable_selection: VariableSelectionType,

    /// Seed for `--variable-selection random`.
    #[arg(long, default_value_t = 0x5EED)]
    pub(crate) seed: u64,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verify: true,
            stats: true,
            print_solution: false,
            solver: SolverType::Dpll,
            variable_selection: VariableSelectionType::Fixed,
            seed: 0x5EED,
        }
    }
}

/// How a solve ended, as far as the process exit code is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// A verdict was reached (and verified, if asked).
    Solved,
    /// The solver returned a model that does not satisfy the formula.
    VerificationFailed,
}

/// Parses a DIMACS file, timing the parse.
pub(crate) fn parse_timed(path: &Path) -> Result<(Cnf, Duration), ErrorKind> {
    let time = Instant::now();
    let cnf = parse_file(path)?;
    Ok((cnf, time.elapsed()))
}

/// Parses clauses written as plain text: comment and problem lines are
/// skipped, literals are read until each `0`, and anything left without a
/// closing `0` becomes the final clause.
pub(crate) fn parse_textual_cnf(input: &str) -> Result<Cnf, ErrorKind> {
    let mut reader = ClauseReader::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        reader.read_tokens(line.split_whitespace(), idx + 1)?;
    }

    Ok(Cnf::try_from(reader.finish())?)
}

/// Solves every `.cnf` file under `path`. A file that fails to parse, or
/// that the chosen solver refuses, is reported and skipped; the first failed verification is returned.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<Outcome, ErrorKind> {
    if !path.is_dir() {
        return Err(ParseError::Io(std::io::ErrorKind::NotADirectory).into());
    }

    let mut outcome = Outcome::Solved;
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() || file_path.extension().is_none_or(|ext| ext != "cnf") {
            continue;
        }

        let solved = parse_timed(file_path).and_then(|(cnf, parse_time)| {
            solve_and_report(&cnf, common, Some(file_path), parse_time)
        });
        match solved {
            Ok(Outcome::VerificationFailed) => outcome = Outcome::VerificationFailed,
            Ok(Outcome::Solved) => {}
            Err(e) => eprintln!("Skipping {}: {e}", file_path.display()),
        }
    }

    Ok(outcome)
}

/// Checks a model against the formula. Unsatisfiable results are not
/// checked.
pub(crate) fn verify_solution(cnf: &Cnf, sol: Option<&Solutions>) -> bool {
    sol.is_none_or(|model| {
        let ok = cnf.verify(model);
        println!("Verified: {ok}");
        ok
    })
}

fn run<S: Solver<DynamicConfig>>(mut solver: S) -> (Option<Solutions>, SolutionStats) {
    let sol = solver.solve();
    (sol, solver.stats())
}

/// Runs the selected strategy on a copy of `cnf`.
///
/// # Errors
///
/// The recursive strategy refuses formulas over
/// [`MAX_VARIABLES`](dpll_solver::sat::recursive::MAX_VARIABLES) variables.
pub(crate) fn solve(
    cnf: &Cnf,
    common: &CommonOptions,
) -> Result<(Option<Solutions>, Duration, SolutionStats), ErrorKind> {
    let time = Instant::now();

    let (sol, stats) = match common.solver {
        SolverType::Dpll => {
            let selector = common.variable_selection.to_impl(common.seed);
            run(Dpll::<DynamicConfig>::with_selector(cnf.clone(), selector))
        }
        SolverType::Recursive => run(Recursive::<DynamicConfig>::try_new(cnf.clone())?),
    };

    let elapsed = time.elapsed();
    log::debug!("Solved with {} in {elapsed:?}: {stats:?}", common.solver);

    Ok((sol, elapsed, stats))
}

/// Allocated and resident memory in MiB, if jemalloc statistics are
/// available.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Solves `cnf` and prints the verdict, plus statistics and the model when
/// asked to.
///
/// # Errors
///
/// See [`solve`].
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<Outcome, ErrorKind> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    log::debug!(
        "{} variables, {} clauses, {} literals",
        cnf.num_vars,
        cnf.clause_count(),
        cnf.literal_count()
    );

    let (sol, elapsed, solver_stats) = solve(cnf, common)?;

    let outcome = if common.verify && !verify_solution(cnf, sol.as_ref()) {
        Outcome::VerificationFailed
    } else {
        Outcome::Solved
    };

    if common.stats {
        print_stats(parse_time, elapsed, cnf, &solver_stats, memory_usage());
    }

    if let Some(model) = &sol {
        if common.print_solution {
            println!("v {model} 0");
        }
    }

    println!("{}", verdict(sol.as_ref()));
    Ok(outcome)
}

pub(crate) const fn verdict(sol: Option<&Solutions>) -> &'static str {
    if sol.is_some() {
        "SATISFIABLE"
    } else {
        "UNSATISFIABLE"
    }
}

pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    s: &SolutionStats,
    memory: Option<(f64, f64)>,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars);
    stat_line("Clauses", cnf.clause_count());
    stat_line("Literals", cnf.literal_count());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Flips", s.flips, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
