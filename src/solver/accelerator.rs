//! Accelerator strategy and solver registry

use tracing::warn;

use super::context::SearchContext;
use super::rminrle::RMinRle;
use super::rperle::RPerle;
use super::rspline::RSpline;
use crate::solver::PointSet;
use crate::utils::{Result, SolverError};

/// Which driver loop a solver runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFamily {
    /// Single point per iteration, no local enhancement
    Ra,
    /// Candidate set per iteration followed by local efficiency enhancement
    Rle,
}

/// The pluggable step of the retrospective approximation loop
pub trait Accelerator: Send {
    fn name(&self) -> &'static str;

    fn family(&self) -> SolverFamily;

    /// Turn the warm start into the next candidate set
    fn enhance(&self, ctx: &mut SearchContext, warm_start: PointSet) -> Result<PointSet>;
}

/// Registered solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    RSpline,
    RMinRle,
    RPerle,
}

impl SolverKind {
    pub const ALL: [SolverKind; 3] = [Self::RMinRle, Self::RPerle, Self::RSpline];

    /// Parse solver name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rspline" | "r-spline" => Some(Self::RSpline),
            "rminrle" | "r-minrle" => Some(Self::RMinRle),
            "rperle" | "r-perle" => Some(Self::RPerle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RSpline => "RSPLINE",
            Self::RMinRle => "RMINRLE",
            Self::RPerle => "RPERLE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::RSpline => "R-SPLINE: sample-path local search for single-objective problems",
            Self::RMinRle => "R-MinRLE: per-objective minimizers with local efficiency enhancement",
            Self::RPerle => "R-PERLE: epsilon-constraint search for bi-objective problems",
        }
    }

    /// Build the accelerator for an oracle with `num_obj` objectives
    pub fn build(&self, num_obj: usize) -> Result<Box<dyn Accelerator>> {
        match self {
            Self::RSpline => {
                if num_obj > 1 {
                    warn!("R-SPLINE operates on single objective problems; only the first objective is optimized");
                }
                Ok(Box::new(RSpline))
            }
            Self::RMinRle => Ok(Box::new(RMinRle)),
            Self::RPerle => {
                if num_obj != 2 {
                    return Err(SolverError::Config(format!(
                        "RPERLE operates only on bi-objective problems, oracle has {} objectives",
                        num_obj
                    )));
                }
                Ok(Box::new(RPerle))
            }
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
