//! Per-run search state shared by the driver and the accelerators

use std::collections::BTreeMap;

use super::accumulator::Accumulator;
use super::pareto::{confidence_margin, ConfidenceBox, ObjectiveMap};
use crate::config::SolverParams;
use crate::solver::{Point, PointSet};
use crate::utils::Result;

/// Search state for one solver run
///
/// Owns the accumulator (and through it the estimate table). Accelerators
/// read estimates here and request new replications through `acc_mut`.
pub struct SearchContext {
    acc: Accumulator,
    params: SolverParams,
    x0: Point,
    nu: u32,
}

impl SearchContext {
    pub fn new(acc: Accumulator, params: SolverParams, x0: Point) -> Self {
        Self {
            acc,
            params,
            x0,
            nu: 0,
        }
    }

    pub fn acc(&self) -> &Accumulator {
        &self.acc
    }

    pub fn acc_mut(&mut self) -> &mut Accumulator {
        &mut self.acc
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn x0(&self) -> &Point {
        &self.x0
    }

    pub fn num_obj(&self) -> usize {
        self.acc.num_obj()
    }

    /// Current iteration
    pub fn nu(&self) -> u32 {
        self.nu
    }

    /// Current target sample size
    pub fn m(&self) -> u64 {
        self.acc.target()
    }

    /// Enhancement round limit for the current iteration
    pub fn search_limit(&self) -> u64 {
        self.params.search_limit(self.nu)
    }

    /// Advance to iteration `nu` and raise the sample size target
    pub fn begin_iteration(&mut self, nu: u32) {
        self.nu = nu;
        let m = self.params.sample_size(nu).max(self.acc.target());
        self.acc.set_target(m);
    }

    /// Confidence margin of objective `k` at `x`; zero when `x` has no estimate
    pub fn margin(&self, x: &Point, k: usize) -> f64 {
        self.acc
            .get(x)
            .map(|e| confidence_margin(e.se_of(k), e.count(), self.params.betaeps))
            .unwrap_or(0.0)
    }

    /// Mean of objective `k` at `x`
    pub fn mean_of(&self, x: &Point, k: usize) -> Option<f64> {
        self.acc.get(x).map(|e| e.mean_of(k))
    }

    /// Confidence box of `x`, if it has an estimate
    pub fn confidence(&self, x: &Point) -> Option<ConfidenceBox> {
        let e = self.acc.get(x)?;
        let margin = (0..self.num_obj())
            .map(|k| confidence_margin(e.se_of(k), e.count(), self.params.betaeps))
            .collect();
        Some(ConfidenceBox {
            mean: e.mean(),
            margin,
        })
    }

    /// Mean objective vectors of the estimated members of `set`
    pub fn objective_map(&self, set: &PointSet) -> ObjectiveMap {
        set.iter()
            .filter_map(|x| self.acc.get(x).map(|e| (x.clone(), e.mean())))
            .collect()
    }

    /// Confidence boxes of the estimated members of `set`
    pub fn confidence_map(&self, set: &PointSet) -> BTreeMap<Point, ConfidenceBox> {
        set.iter()
            .filter_map(|x| self.confidence(x).map(|b| (x.clone(), b)))
            .collect()
    }

    /// Neighbors of `x` inside the oracle's domain and not known to be infeasible
    pub fn candidate_neighbors(&self, x: &Point) -> PointSet {
        let oracle = self.acc.oracle();
        x.neighbors(self.params.radius)
            .into_iter()
            .filter(|y| oracle.in_domain(y) && !self.acc.is_infeasible(y))
            .collect()
    }

    /// Upsample the candidate neighbors of `x`, returning the feasible ones
    pub fn sampled_neighbors(&mut self, x: &Point) -> Result<PointSet> {
        let nbrs = self.candidate_neighbors(x);
        self.acc.upsample(&nbrs)
    }
}
