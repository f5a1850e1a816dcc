//! Subcommand handlers
//!
//! Each handler resolves names through the registries, runs the solver or
//! experiment and writes results into the output directory.

use tracing::info;

use crate::config::{ExperimentConfig, SolveArgs, SolverConfig, TestSolveArgs};
use crate::experiment::ExperimentRunner;
use crate::output::ResultReporter;
use crate::problems::ProblemKind;
use crate::solver::{Point, RaSolver, SolverKind};
use crate::testers::TesterKind;

fn parse_solver(name: &str) -> anyhow::Result<SolverKind> {
    SolverKind::parse(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown solver '{}'. Run `listitems` to see the choices.", name))
}

/// Text printed by `listitems`
pub fn listitems_text() -> String {
    let mut s = String::new();
    s.push_str("Solvers:\n");
    for kind in SolverKind::ALL {
        s.push_str(&format!("  {:<16} {}\n", kind.as_str(), kind.description()));
    }
    s.push_str("\nProblems:\n");
    for kind in ProblemKind::ALL {
        s.push_str(&format!("  {:<16} {}\n", kind.as_str(), kind.description()));
    }
    s.push_str("\nTesters:\n");
    for kind in TesterKind::ALL {
        s.push_str(&format!("  {:<16} {}\n", kind.as_str(), kind.description()));
    }
    s
}

/// List solvers, problems and testers
pub fn run_listitems() -> anyhow::Result<()> {
    print!("{}", listitems_text());
    Ok(())
}

/// Solve a problem from the given start point
pub fn run_solve(args: &SolveArgs) -> anyhow::Result<()> {
    let config = SolverConfig::from_solve(args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let problem = ProblemKind::parse(&args.problem).ok_or_else(|| {
        anyhow::anyhow!("Unknown problem '{}'. Run `listitems` to see the choices.", args.problem)
    })?;
    let solver = parse_solver(&args.solver)?;
    let x0 = Point::new(args.x.clone());

    let result = RaSolver::new(problem.build(), solver, x0, &config)?.solve()?;

    let name = format!("{}_{}", problem.as_str(), solver.as_str());
    ResultReporter::new(&config.odir).write_solve(&name, &result)?;
    ResultReporter::print_summary(&result);
    Ok(())
}

/// Run independent instances on a tester
pub fn run_testsolve(args: &TestSolveArgs, quiet: bool) -> anyhow::Result<()> {
    let config = ExperimentConfig::from_cli(args, quiet)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let tester = TesterKind::parse(&args.tester).ok_or_else(|| {
        anyhow::anyhow!("Unknown tester '{}'. Run `listitems` to see the choices.", args.tester)
    })?;
    let solver = parse_solver(&args.solver)?;
    let x0 = if args.x.is_empty() {
        None
    } else {
        Some(Point::new(args.x.clone()))
    };

    let odir = config.solver.odir.clone();
    let results = ExperimentRunner::new(config, tester, solver, x0).run()?;

    let name = format!("{}_{}", tester.as_str(), solver.as_str());
    let files = ResultReporter::new(&odir).write_experiment(&name, &results)?;
    info!("Wrote {} files", files.len());
    if !quiet {
        ResultReporter::print_experiment_summary(&results);
    }
    Ok(())
}
