//! Error types for rasolve

use std::io;
use thiserror::Error;

use crate::solver::Point;

/// Top-level solver error
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Infeasible start: {0}")]
    InfeasibleStart(String),

    #[error("Oracle reported {0} as infeasible")]
    InfeasiblePoint(Point),

    #[error("Cannot take a minimum over an empty point set")]
    EmptySet,

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
