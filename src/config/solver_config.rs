//! Solver and experiment configuration derived from CLI arguments

use std::path::PathBuf;

use serde::Serialize;

use super::cli::{CommonArgs, SolveArgs, TestSolveArgs};
use super::solver_params::SolverParams;
use crate::stream::{StreamSeed, DEFAULT_SEED};

/// Configuration of one solver run
#[derive(Debug, Clone, Serialize)]
pub struct SolverConfig {
    /// Total oracle replications allowed
    pub budget: u64,
    /// Common random numbers across points
    pub crn: bool,
    /// Replication worker threads
    pub simpar: usize,
    pub seed: [u32; 6],
    pub params: SolverParams,
    pub odir: PathBuf,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            budget: 200,
            crn: false,
            simpar: 1,
            seed: DEFAULT_SEED,
            params: SolverParams::default(),
            odir: PathBuf::from("testrun"),
        }
    }
}

impl SolverConfig {
    /// Create configuration from the shared CLI options
    pub fn from_common(args: &CommonArgs) -> Result<Self, String> {
        if args.budget == 0 {
            return Err("--budget must be at least 1".to_string());
        }
        if args.simpar == 0 {
            return Err("--simpar must be at least 1".to_string());
        }

        let seed = match &args.seed {
            None => DEFAULT_SEED,
            Some(v) => <[u32; 6]>::try_from(v.as_slice())
                .map_err(|_| format!("--seed expects 6 integers, got {}", v.len()))?,
        };

        let params = SolverParams::from_pairs(&args.params).map_err(|e| e.to_string())?;

        Ok(Self {
            budget: args.budget,
            crn: args.crn,
            simpar: args.simpar,
            seed,
            params,
            odir: args.odir.clone(),
        })
    }

    pub fn from_solve(args: &SolveArgs) -> Result<Self, String> {
        Self::from_common(&args.common)
    }

    pub fn stream_seed(&self) -> StreamSeed {
        StreamSeed::from_ints(self.seed)
    }
}

/// Configuration of a multi-instance test run
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentConfig {
    pub solver: SolverConfig,
    /// Independent instances
    pub isp: usize,
    /// Instances run in parallel
    pub proc: usize,
    /// Compute tester metrics per iteration
    pub metric: bool,
    /// Hide the progress bar
    pub quiet: bool,
}

impl ExperimentConfig {
    pub fn from_cli(args: &TestSolveArgs, quiet: bool) -> Result<Self, String> {
        if args.isp == 0 {
            return Err("--isp must be at least 1".to_string());
        }
        if args.proc == 0 {
            return Err("--proc must be at least 1".to_string());
        }
        Ok(Self {
            solver: SolverConfig::from_common(&args.common)?,
            isp: args.isp,
            proc: args.proc.min(args.isp),
            metric: args.metric,
            quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::{CliArgs, Command};
    use clap::Parser;

    fn solve_config(argv: &[&str]) -> Result<SolverConfig, String> {
        match CliArgs::parse_from(argv).command {
            Command::Solve(s) => SolverConfig::from_solve(&s),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_from_cli_defaults() {
        let cfg = solve_config(&["rasolve", "solve", "SimpleSO", "RSPLINE", "5"]).unwrap();
        assert_eq!(cfg.budget, 200);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.params, SolverParams::default());
    }

    #[test]
    fn test_from_cli_rejects_bad_values() {
        assert!(solve_config(&["rasolve", "solve", "--budget=0", "SimpleSO", "RSPLINE", "5"]).is_err());
        assert!(solve_config(&["rasolve", "solve", "--simpar=0", "SimpleSO", "RSPLINE", "5"]).is_err());
        assert!(solve_config(&[
            "rasolve", "solve", "--param", "nope", "1", "SimpleSO", "RSPLINE", "5"
        ])
        .is_err());
    }

    #[test]
    fn test_experiment_config() {
        let args = CliArgs::parse_from([
            "rasolve", "testsolve", "--isp=4", "--proc=8", "--metric", "TPATester", "RPERLE",
        ]);
        match args.command {
            Command::Testsolve(t) => {
                let cfg = ExperimentConfig::from_cli(&t, true).unwrap();
                assert_eq!(cfg.isp, 4);
                assert_eq!(cfg.proc, 4);
                assert!(cfg.metric);
                assert!(cfg.quiet);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
