//! Result artifact of a solver run

use serde::{Deserialize, Serialize};

use crate::solver::Point;

/// One point of the final candidate set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub point: Point,
    pub mean: Vec<f64>,
    /// Standard errors; zero below two replications
    pub se: Vec<f64>,
    pub replications: u64,
}

/// State at the end of one RA iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub nu: u32,
    /// Target sample size of the iteration
    pub m: u64,
    /// Cumulative oracle calls at the end of the iteration
    pub calls: u64,
    pub ales: Vec<Point>,
}

/// Final answer of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    pub solver: String,
    pub problem: String,
    pub x0: Point,
    pub budget: u64,
    pub calls: u64,
    pub iterations: u32,
    pub candidates: Vec<CandidateReport>,
    pub history: Vec<IterationRecord>,
}

impl SolveResult {
    /// Candidate points in set order
    pub fn points(&self) -> Vec<Point> {
        self.candidates.iter().map(|c| c.point.clone()).collect()
    }
}
