//! Sample-path local search
//!
//! Neighborhood descent on the current sample-path estimates. Every point
//! compared is first brought up to the iteration's target sample size, so a
//! move is never decided on a stale estimate.

use tracing::debug;

use super::context::SearchContext;
use crate::solver::{Point, PointSet};
use crate::utils::Result;

/// Upper bound on one objective's estimated mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonConstraint {
    pub objective: usize,
    pub bound: f64,
}

impl EpsilonConstraint {
    fn allows(&self, mean: &[f64]) -> bool {
        mean[self.objective] <= self.bound
    }
}

/// Result of one local search
#[derive(Debug, Clone)]
pub struct SplineOutcome {
    /// Every feasible point estimated during the search
    pub trace: PointSet,
    /// Local minimizer
    pub best: Point,
    pub mean: Vec<f64>,
    pub se: Vec<f64>,
}

/// Scalarized value of `mean`: the chosen objective, or +inf when the
/// constraint is violated
fn scalarize(mean: &[f64], objective: usize, constraint: Option<&EpsilonConstraint>) -> f64 {
    match constraint {
        Some(c) if !c.allows(mean) => f64::INFINITY,
        _ => mean[objective],
    }
}

/// Descend from `start` on `objective`, optionally subject to `constraint`
///
/// Moves to the best strictly improving feasible neighbor until none
/// exists or `maxsteps` moves have been made. Neighbors the oracle reports
/// infeasible are skipped for the rest of the run.
pub fn spline(
    ctx: &mut SearchContext,
    start: &Point,
    objective: usize,
    constraint: Option<EpsilonConstraint>,
) -> Result<SplineOutcome> {
    let mut current = start.clone();
    let mut current_value = scalarize(
        &ctx.acc_mut().estimate(&current)?.mean(),
        objective,
        constraint.as_ref(),
    );
    let mut trace = PointSet::new();
    trace.insert(current.clone());

    let max_steps = ctx.params().max_steps;
    let mut steps = 0;
    while steps < max_steps {
        let nbrs = ctx.sampled_neighbors(&current)?;
        let mut best: Option<(Point, f64)> = None;
        for y in &nbrs {
            let Some(mean) = ctx.acc().get(y).map(|e| e.mean()) else {
                continue;
            };
            let value = scalarize(&mean, objective, constraint.as_ref());
            let improves = match &best {
                Some((_, b)) => value < *b,
                None => value < current_value,
            };
            if improves {
                best = Some((y.clone(), value));
            }
        }
        trace.extend(nbrs);

        match best {
            Some((y, value)) => {
                current = y;
                current_value = value;
                steps += 1;
            }
            None => break,
        }
    }
    if steps >= max_steps {
        debug!("Local search from {} hit the step cap at {}", start, current);
    }

    let est = ctx.acc_mut().estimate(&current)?;
    let mean = est.mean();
    let se = (0..mean.len()).map(|k| est.se_of(k)).collect();
    debug!(
        "Local search {} -> {} in {} moves ({} points)",
        start,
        current,
        steps,
        trace.len()
    );
    Ok(SplineOutcome {
        trace,
        best: current,
        mean,
        se,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverParams;
    use crate::solver::accumulator::Accumulator;
    use crate::solver::replicate::Replicator;
    use crate::solver::testkit::{BiQuad, Quadratic};
    use crate::solver::Oracle;
    use crate::stream::{SimStream, StreamSeed};
    use std::sync::Arc;

    /// `x²` on the half-line `x >= 0`, reported by the oracle alone
    struct HalfLine;

    impl Oracle for HalfLine {
        fn name(&self) -> &str {
            "HalfLine"
        }

        fn num_obj(&self) -> usize {
            1
        }

        fn dim(&self) -> usize {
            1
        }

        fn g(&self, x: &Point, _stream: &mut SimStream) -> Option<Vec<f64>> {
            (x[0] >= 0).then(|| vec![(x[0] * x[0]) as f64])
        }
    }

    fn context(oracle: Arc<dyn Oracle>, x0: Point) -> SearchContext {
        let acc = Accumulator::new(Replicator::new(oracle, StreamSeed::default(), 2, false));
        let mut ctx = SearchContext::new(acc, SolverParams::default(), x0);
        ctx.begin_iteration(3);
        ctx
    }

    #[test]
    fn test_descends_to_local_minimum() {
        let start = Point::from([50]);
        let mut ctx = context(Arc::new(Quadratic::new(1.0)), start.clone());
        let out = spline(&mut ctx, &start, 0, None).unwrap();

        assert!(out.best[0].abs() <= 2, "stopped at {}", out.best);
        assert!(out.trace.contains(&start));
        let best_mean = ctx.acc().get(&out.best).unwrap().mean_of(0);
        for y in out.best.neighbors(1) {
            if let Some(e) = ctx.acc().get(&y) {
                assert!(e.mean_of(0) >= best_mean);
            }
        }
        assert_eq!(out.mean.len(), 1);
        assert_eq!(out.se.len(), 1);
    }

    #[test]
    fn test_respects_step_cap() {
        let start = Point::from([50]);
        let params = SolverParams {
            max_steps: 3,
            ..SolverParams::default()
        };
        let oracle = Arc::new(Quadratic::new(0.0));
        let acc = Accumulator::new(Replicator::new(oracle, StreamSeed::default(), 1, false));
        let mut ctx = SearchContext::new(acc, params, start.clone());
        ctx.begin_iteration(0);
        let out = spline(&mut ctx, &start, 0, None).unwrap();
        assert_eq!(out.best, Point::from([47]));
    }

    #[test]
    fn test_boundary_start() {
        let start = Point::from([-100]);
        let mut ctx = context(Arc::new(Quadratic::new(0.0)), start.clone());
        let out = spline(&mut ctx, &start, 0, None).unwrap();
        assert_eq!(out.best, Point::from([0]));
        assert!(!ctx.acc().is_infeasible(&Point::from([-101])));
    }

    #[test]
    fn test_oracle_infeasible_neighbor() {
        let start = Point::from([10]);
        let mut ctx = context(Arc::new(HalfLine), start.clone());
        let out = spline(&mut ctx, &start, 0, None).unwrap();
        assert_eq!(out.best, Point::from([0]));
        assert!(ctx.acc().is_infeasible(&Point::from([-1])));
        assert!(ctx.acc().get(&Point::from([-1])).is_none());
    }

    #[test]
    fn test_epsilon_constraint_holds() {
        let start = Point::from([0, 10]);
        let mut ctx = context(Arc::new(BiQuad::new(0.0)), start.clone());
        let bound = 50.0;
        let constraint = EpsilonConstraint { objective: 1, bound };
        let out = spline(&mut ctx, &start, 0, Some(constraint)).unwrap();
        assert!(out.mean[1] <= bound);
        // unconstrained descent on f1 would reach (10, 0) where f2 = 200
        assert!(out.mean[0] < BiQuad::mean(&start)[0]);
        assert_ne!(out.best, Point::from([10, 0]));
    }
}
