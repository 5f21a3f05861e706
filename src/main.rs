//! # dpll_solver
//!
//! Command-line front end for the DPLL solver. Formulas come from a DIMACS
//! file, a directory of `.cnf` files, or text given on the command line.
//!
//! ```sh
//! # Solve a DIMACS file with the default strategy (iterative DPLL)
//! dpll_solver problem.cnf
//!
//! # Same, explicitly, printing the model
//! dpll_solver file --path problem.cnf --print-solution
//!
//! # Random variable order with a fixed seed
//! dpll_solver file --path problem.cnf --variable-selection random --seed 7
//!
//! # The recursive baseline on an inline formula
//! dpll_solver text --input "1 2 0 -1 0" --solver recursive
//!
//! # Every .cnf file under a directory
//! dpll_solver dir --path benchmarks/
//! ```
//!
//! Exit status is 0 once a verdict is printed (either one), 1 if the input
//! could not be read or parsed or the chosen solver refused it, and 2 if a
//! model failed verification. The recursive solver refuses formulas over
//! 10000 variables, since it recurses once per variable.
//! Logging goes through `env_logger`; `--debug` raises the default level and
//! `RUST_LOG` overrides it, e.g. `RUST_LOG=decision=trace`.

use crate::command_line::cli::{
    Cli, Commands, CommonOptions, Outcome, parse_textual_cnf, parse_timed, solve_and_report,
    solve_dir,
};
use clap::{CommandFactory, Parser};
use dpll_solver::sat::error::ErrorKind;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logging(common: &CommonOptions) {
    let default = if common.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn solve_path(path: &Path, common: &CommonOptions) -> Result<Outcome, ErrorKind> {
    let (cnf, parse_time) = parse_timed(path)?;
    solve_and_report(&cnf, common, Some(path), parse_time)
}

fn solve_text(input: &str, common: &CommonOptions) -> Result<Outcome, ErrorKind> {
    let time = Instant::now();
    let cnf = parse_textual_cnf(input)?;
    let parse_time = time.elapsed();
    solve_and_report(&cnf, common, None, parse_time)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        None => {
            init_logging(&cli.common);
            match &cli.path {
                Some(path) => solve_path(path, &cli.common),
                None => {
                    eprintln!("No input given. Pass a .cnf path or a subcommand (see --help).");
                    return ExitCode::FAILURE;
                }
            }
        }
        Some(Commands::File { path, common }) => {
            init_logging(common);
            solve_path(path, common)
        }
        Some(Commands::Text { input, common }) => {
            init_logging(common);
            solve_text(input, common)
        }
        Some(Commands::Dir { path, common }) => {
            init_logging(common);
            solve_dir(path, common)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(Outcome::Solved) => ExitCode::SUCCESS,
        Ok(Outcome::VerificationFailed) => {
            eprintln!("Model failed verification");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
