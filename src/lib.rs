//! rasolve library
//!
//! Retrospective-approximation solvers for integer-ordered simulation
//! optimization: R-SPLINE, R-MinRLE and the bi-objective R-PERLE.

pub mod commands;
pub mod config;
pub mod experiment;
pub mod output;
pub mod problems;
pub mod solver;
pub mod stream;
pub mod testers;
pub mod utils;
