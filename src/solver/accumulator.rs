//! Statistics accumulator
//!
//! Owns the estimate table and is the only writer to it. Sampling requests
//! are turned into replication jobs, run on the worker pool, then folded
//! into the table in job/replication order.

use std::sync::Arc;

use tracing::debug;

use super::estimates::{Estimate, EstimateTable};
use super::oracle::Oracle;
use super::replicate::{ReplicationJob, Replicator};
use crate::solver::{Point, PointSet};
use crate::utils::{Result, SolverError};

pub struct Accumulator {
    table: EstimateTable,
    replicator: Replicator,
    /// Replications every compared point must reach this iteration
    target: u64,
    /// Oracle calls consumed so far
    calls: u64,
}

impl Accumulator {
    pub fn new(replicator: Replicator) -> Self {
        let num_obj = replicator.oracle().num_obj();
        Self {
            table: EstimateTable::new(num_obj),
            replicator,
            target: 1,
            calls: 0,
        }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        self.replicator.oracle()
    }

    pub fn num_obj(&self) -> usize {
        self.replicator.oracle().num_obj()
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn set_target(&mut self, m: u64) {
        self.target = m.max(1);
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn table(&self) -> &EstimateTable {
        &self.table
    }

    /// Estimate of `x`, if it has been sampled and is feasible
    pub fn get(&self, x: &Point) -> Option<&Estimate> {
        self.table.get(x).filter(|e| e.count() > 0)
    }

    pub fn is_infeasible(&self, x: &Point) -> bool {
        self.table.is_infeasible(x)
    }

    /// Draw `n` more replications at `x`
    pub fn sample(&mut self, x: &Point, n: u64) -> Result<()> {
        let infeasible = self.sample_batch(&[(x.clone(), n)])?;
        if infeasible.contains(x) {
            return Err(SolverError::InfeasiblePoint(x.clone()));
        }
        Ok(())
    }

    /// Draw the requested number of new replications for each point
    ///
    /// Returns the points the oracle reported as infeasible (including
    /// points already known to be infeasible, which are not re-simulated).
    pub fn sample_batch(&mut self, requests: &[(Point, u64)]) -> Result<PointSet> {
        let mut infeasible = PointSet::new();
        let mut jobs = Vec::with_capacity(requests.len());
        for (x, n) in requests {
            if self.table.is_infeasible(x) {
                infeasible.insert(x.clone());
                continue;
            }
            if *n == 0 {
                continue;
            }
            jobs.push(ReplicationJob {
                point: x.clone(),
                point_index: self.table.index_of(x),
                first: self.table.count(x),
                count: *n,
            });
        }

        if jobs.is_empty() {
            return Ok(infeasible);
        }

        let outcomes = self.replicator.run(&jobs)?;
        self.calls += outcomes.len() as u64;

        let mut start = 0;
        while start < outcomes.len() {
            let job = outcomes[start].job;
            let end = outcomes[start..]
                .iter()
                .position(|o| o.job != job)
                .map(|p| start + p)
                .unwrap_or(outcomes.len());
            let point = &jobs[job].point;
            if outcomes[start..end].iter().any(|o| o.objectives.is_none()) {
                debug!("Point {} is infeasible", point);
                self.table.mark_infeasible(point);
                infeasible.insert(point.clone());
            } else {
                for objectives in outcomes[start..end].iter().filter_map(|o| o.objectives.as_ref()) {
                    self.table.record(point, objectives);
                }
            }
            start = end;
        }

        Ok(infeasible)
    }

    /// Bring every point of `set` up to the target replication count
    ///
    /// Returns the feasible subset; infeasible points are left out rather
    /// than reported as errors.
    pub fn upsample(&mut self, set: &PointSet) -> Result<PointSet> {
        let requests: Vec<(Point, u64)> = set
            .iter()
            .map(|x| (x.clone(), self.target.saturating_sub(self.table.count(x))))
            .collect();
        let infeasible = self.sample_batch(&requests)?;
        Ok(set.difference(&infeasible).cloned().collect())
    }

    /// Estimate of `x` at the target replication count
    pub fn estimate(&mut self, x: &Point) -> Result<&Estimate> {
        if self.table.is_infeasible(x) {
            return Err(SolverError::InfeasiblePoint(x.clone()));
        }
        let shortfall = self.target.saturating_sub(self.table.count(x));
        if shortfall > 0 {
            self.sample(x, shortfall)?;
        }
        self.get(x)
            .ok_or_else(|| SolverError::InfeasiblePoint(x.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::testkit::Quadratic;
    use crate::stream::StreamSeed;

    fn accumulator(workers: usize) -> Accumulator {
        let oracle = Arc::new(Quadratic::new(3.0));
        Accumulator::new(Replicator::new(oracle, StreamSeed::default(), workers, false))
    }

    #[test]
    fn test_sample_counts_calls() {
        let mut acc = accumulator(1);
        let x = Point::from([4]);
        acc.sample(&x, 5).unwrap();
        acc.sample(&x, 3).unwrap();
        assert_eq!(acc.get(&x).unwrap().count(), 8);
        assert_eq!(acc.calls(), 8);
    }

    #[test]
    fn test_incremental_equals_single_batch() {
        let x = Point::from([7]);
        let mut a = accumulator(1);
        a.sample(&x, 4).unwrap();
        a.sample(&x, 6).unwrap();
        let mut b = accumulator(3);
        b.sample(&x, 10).unwrap();
        let ea = a.get(&x).unwrap();
        let eb = b.get(&x).unwrap();
        assert!((ea.mean_of(0) - eb.mean_of(0)).abs() < 1e-9);
        assert!((ea.se_of(0) - eb.se_of(0)).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible_point_error() {
        let mut acc = accumulator(1);
        let x = Point::from([500]);
        match acc.sample(&x, 2) {
            Err(SolverError::InfeasiblePoint(p)) => assert_eq!(p, x),
            other => panic!("expected infeasible point, got {:?}", other.map(|_| ())),
        }
        assert!(acc.is_infeasible(&x));
        // known infeasible points are not simulated again
        let calls = acc.calls();
        assert!(acc.estimate(&x).is_err());
        assert_eq!(acc.calls(), calls);
    }

    #[test]
    fn test_upsample_tops_up_and_filters() {
        let mut acc = accumulator(2);
        acc.set_target(4);
        let a = Point::from([1]);
        let b = Point::from([2]);
        let bad = Point::from([-101]);
        acc.sample(&a, 1).unwrap();
        let set: PointSet = [a.clone(), b.clone(), bad.clone()].into_iter().collect();
        let feasible = acc.upsample(&set).unwrap();
        assert_eq!(feasible, [a.clone(), b.clone()].into_iter().collect());
        assert_eq!(acc.get(&a).unwrap().count(), 4);
        assert_eq!(acc.get(&b).unwrap().count(), 4);

        // already at target: no new calls
        let calls = acc.calls();
        acc.upsample(&set).unwrap();
        assert_eq!(acc.calls(), calls);
    }

    #[test]
    fn test_estimate_never_shrinks() {
        let mut acc = accumulator(1);
        let x = Point::from([3]);
        acc.set_target(6);
        acc.estimate(&x).unwrap();
        acc.set_target(2);
        assert_eq!(acc.estimate(&x).unwrap().count(), 6);
    }
}
