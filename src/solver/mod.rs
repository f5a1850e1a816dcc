//! Retrospective approximation solvers
//!
//! The driver (`RaSolver`) owns the search context; accelerators plug into
//! its ACCELERATE phase and reach the estimate table through the
//! accumulator.

pub mod accelerator;
pub mod accumulator;
pub mod context;
pub mod driver;
pub mod estimates;
pub mod oracle;
pub mod pareto;
pub mod point;
pub mod replicate;
pub mod result;
pub mod rle;
pub mod rminrle;
pub mod rperle;
pub mod rspline;
pub mod spline;

#[cfg(test)]
pub(crate) mod testkit;

pub use accelerator::{Accelerator, SolverFamily, SolverKind};
pub use context::SearchContext;
pub use driver::{RaSolver, SolverPhase};
pub use oracle::Oracle;
pub use point::{Point, PointSet};
pub use result::{CandidateReport, IterationRecord, SolveResult};
