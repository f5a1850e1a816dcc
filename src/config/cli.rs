//! Command-line argument parsing
//!
//! Three subcommands: `listitems`, `solve` and `testsolve`. Options shared by
//! both solve commands live in `CommonArgs`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Retrospective-approximation solvers for integer-ordered simulation optimization
#[derive(Parser, Debug, Clone)]
#[command(name = "rasolve")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List available solvers, problems and testers
    Listitems,

    /// Solve a problem from a starting point
    #[command(allow_negative_numbers = true)]
    Solve(SolveArgs),

    /// Run independent solver instances on a test problem
    #[command(allow_negative_numbers = true)]
    Testsolve(TestSolveArgs),
}

/// Options shared by `solve` and `testsolve`
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Simulation budget (total oracle replications)
    #[arg(long = "budget", default_value_t = 200)]
    pub budget: u64,

    /// Output directory
    #[arg(long = "odir", default_value = "testrun")]
    pub odir: PathBuf,

    /// Use common random numbers across points
    #[arg(long = "crn")]
    pub crn: bool,

    /// Number of parallel threads for simulation replications
    #[arg(long = "simpar", default_value_t = 1)]
    pub simpar: usize,

    /// Random number seed as 6 integers
    #[arg(long = "seed", num_args = 6, value_names = ["S1", "S2", "S3", "S4", "S5", "S6"])]
    pub seed: Option<Vec<u32>>,

    /// Solver-specific parameter (repeatable), e.g. --param betaeps 0.4
    #[arg(
        long = "param",
        num_args = 2,
        value_names = ["NAME", "VALUE"],
        action = clap::ArgAction::Append
    )]
    pub params: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Problem name (see listitems)
    pub problem: String,

    /// Solver name (see listitems)
    pub solver: String,

    /// Starting point coordinates
    #[arg(required = true)]
    pub x: Vec<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct TestSolveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of independent algorithm instances
    #[arg(long = "isp", default_value_t = 1)]
    pub isp: usize,

    /// Number of instances run in parallel
    #[arg(long = "proc", default_value_t = 1)]
    pub proc: usize,

    /// Compute the tester metric for every iteration
    #[arg(long = "metric")]
    pub metric: bool,

    /// Tester name (see listitems)
    pub tester: String,

    /// Solver name (see listitems)
    pub solver: String,

    /// Starting point; drawn at random per instance when omitted
    pub x: Vec<i64>,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
