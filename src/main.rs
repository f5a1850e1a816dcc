//! rasolve - simulation optimization solvers on the integer lattice
//!
//! Solves noisy single- and bi-objective problems with retrospective
//! approximation and benchmarks solvers against testers with known
//! expected values.

use anyhow::Result;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use rasolve::commands;
use rasolve::config::{CliArgs, Command};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    match &args.command {
        Command::Listitems => commands::run_listitems(),
        Command::Solve(solve) => commands::run_solve(solve),
        Command::Testsolve(test) => commands::run_testsolve(test, args.quiet),
    }
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
