//! R-PERLE: epsilon-constraint search between known efficient points
//!
//! For each objective the candidates are sorted on the complementary
//! objective and every candidate's confidence interval on it is formed.
//! A lower interval bound that no other interval covers marks a gap in the
//! frontier. The objective needing fewer gap sweeps is chosen; each gap is
//! then swept by constrained local searches with a shrinking epsilon
//! target until the target falls to the sweep's lower stop.

use tracing::debug;

use super::accelerator::{Accelerator, SolverFamily};
use super::context::SearchContext;
use super::pareto::{confidence_margin, get_biparetos, get_min, remove_nlwep};
use super::spline::{spline, EpsilonConstraint};
use crate::solver::{Point, PointSet};
use crate::utils::{Result, SolverError};

/// Minimum step below a found point's constrained value
const MIN_BACKOFF: f64 = 1e-6;

/// Largest representable value strictly below `v`
fn step_below(v: f64) -> f64 {
    if v.is_nan() || v == f64::NEG_INFINITY {
        return v;
    }
    if v == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = v.to_bits();
    if v > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Next epsilon target, strictly below the constrained mean
fn next_target(mean: f64, backoff: f64) -> f64 {
    (mean - backoff).min(step_below(mean))
}

/// Confidence interval on one objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    /// Open-low, closed-high membership
    fn covers(&self, v: f64) -> bool {
        v > self.lo && v <= self.hi
    }
}

/// Epsilon values for the gap sweeps, ascending
///
/// A lower bound is a gap when it lies above `lower` and inside no
/// interval's `(lo, hi]`.
pub fn find_gaps(intervals: &[Interval], lower: f64) -> Vec<f64> {
    let mut gaps: Vec<f64> = intervals
        .iter()
        .map(|i| i.lo)
        .filter(|&eps| eps > lower && !intervals.iter().any(|j| j.covers(eps)))
        .collect();
    gaps.sort_by(|a, b| a.total_cmp(b));
    gaps
}

/// Gap analysis for one objective
#[derive(Debug, Clone)]
struct Sweep {
    /// Objective minimized during the sweep
    objective: usize,
    /// Upper confidence bound of the best point on the constrained objective
    lower: f64,
    intervals: Vec<Interval>,
    gaps: Vec<f64>,
}

impl Sweep {
    fn analyze(ctx: &SearchContext, candidates: &PointSet, objective: usize) -> Self {
        let constrained = 1 - objective;
        let mut sorted: Vec<(&Point, f64, f64)> = candidates
            .iter()
            .filter_map(|x| {
                ctx.mean_of(x, constrained)
                    .map(|mean| (x, mean, ctx.margin(x, constrained)))
            })
            .collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        let lower = sorted
            .first()
            .map(|(_, mean, margin)| mean + margin)
            .unwrap_or(f64::NEG_INFINITY);
        let intervals: Vec<Interval> = sorted
            .iter()
            .skip(1)
            .map(|(_, mean, margin)| Interval {
                lo: mean - margin,
                hi: mean + margin,
            })
            .collect();
        let gaps = find_gaps(&intervals, lower);
        Self {
            objective,
            lower,
            intervals,
            gaps,
        }
    }

    /// Lower stop for the sweep of `gap`
    fn stop_below(&self, gap: f64) -> f64 {
        self.intervals
            .iter()
            .map(|i| i.hi)
            .filter(|&hi| hi < gap)
            .fold(self.lower, f64::max)
    }
}

pub struct RPerle;

impl RPerle {
    /// Sweep one gap, returning the constrained minimizers found
    fn sweep_gap(
        ctx: &mut SearchContext,
        sweep: &Sweep,
        candidates: &PointSet,
        gap: f64,
    ) -> Result<PointSet> {
        let k_opt = sweep.objective;
        let k_con = 1 - k_opt;
        let stop = sweep.stop_below(gap);
        let betaeps = ctx.params().betaeps;

        let mut target = gap;
        let mut found = PointSet::new();
        let mut visited = PointSet::new();
        while stop < target {
            let start = candidates
                .iter()
                .chain(visited.iter())
                .filter_map(|x| ctx.acc().get(x).map(|e| (x, e.mean_of(k_con), e.mean_of(k_opt))))
                .filter(|(_, con, _)| *con <= target)
                .min_by(|a, b| a.2.total_cmp(&b.2).then_with(|| a.0.cmp(b.0)))
                .map(|(x, _, _)| x.clone());
            let Some(start) = start else {
                debug!("No start point satisfies epsilon {:.6}", target);
                break;
            };

            let constraint = EpsilonConstraint {
                objective: k_con,
                bound: target,
            };
            let outcome = spline(ctx, &start, k_opt, Some(constraint))?;
            let count = ctx.acc().table().count(&outcome.best);
            let mut backoff = confidence_margin(outcome.se[k_con], count, betaeps);
            if backoff == 0.0 {
                backoff = MIN_BACKOFF;
            }
            target = next_target(outcome.mean[k_con], backoff);
            found.insert(outcome.best);
            visited.extend(outcome.trace);
        }
        Ok(found)
    }
}

impl Accelerator for RPerle {
    fn name(&self) -> &'static str {
        "RPERLE"
    }

    fn family(&self) -> SolverFamily {
        SolverFamily::Rle
    }

    fn enhance(&self, ctx: &mut SearchContext, aold: PointSet) -> Result<PointSet> {
        if ctx.num_obj() != 2 {
            return Err(SolverError::Config(
                "RPERLE operates only on bi-objective problems".to_string(),
            ));
        }

        let mut aold = aold;
        aold.insert(ctx.x0().clone());
        let aold = ctx.acc_mut().upsample(&aold)?;
        let mnumin = get_min(&ctx.objective_map(&aold), 2).map_err(|_| {
            SolverError::InfeasibleStart("RPERLE has no feasible warm start. Is x0 feasible?".to_string())
        })?;

        let (filtered, dominated) = remove_nlwep(&ctx.confidence_map(&aold));
        let a0new: PointSet = mnumin.union(&filtered).cloned().collect();
        let mut a1new = get_biparetos(&ctx.objective_map(&a0new));
        a1new.extend(mnumin.iter().cloned());

        let sweeps = [Sweep::analyze(ctx, &a1new, 0), Sweep::analyze(ctx, &a1new, 1)];
        let k_opt = if sweeps[1].gaps.len() < sweeps[0].gaps.len() {
            1
        } else {
            0
        };
        let sweep = &sweeps[k_opt];
        debug!(
            "RPERLE: {} candidates, {} dropped, gaps {}/{}, sweeping objective {}",
            a1new.len(),
            dominated.len(),
            sweeps[0].gaps.len(),
            sweeps[1].gaps.len(),
            k_opt
        );

        let mut found = a1new.clone();
        for &gap in &sweep.gaps {
            found.extend(Self::sweep_gap(ctx, sweep, &a1new, gap)?);
        }

        Ok(get_biparetos(&ctx.objective_map(&found)))
    }
}
