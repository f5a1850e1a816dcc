//! Configuration module

pub mod cli;
pub mod solver_config;
pub mod solver_params;

pub use cli::{CliArgs, Command, CommonArgs, SolveArgs, TestSolveArgs};
pub use solver_config::{ExperimentConfig, SolverConfig};
pub use solver_params::SolverParams;
