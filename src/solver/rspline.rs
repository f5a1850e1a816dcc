//! R-SPLINE: sample-path local search from a single warm start

use super::accelerator::{Accelerator, SolverFamily};
use super::context::SearchContext;
use super::spline::spline;
use crate::solver::PointSet;
use crate::utils::{Result, SolverError};

pub struct RSpline;

impl Accelerator for RSpline {
    fn name(&self) -> &'static str {
        "RSPLINE"
    }

    fn family(&self) -> SolverFamily {
        SolverFamily::Ra
    }

    fn enhance(&self, ctx: &mut SearchContext, warm_start: PointSet) -> Result<PointSet> {
        let mut feasible = ctx.acc_mut().upsample(&warm_start)?;
        let start = feasible.pop_first().ok_or_else(|| {
            SolverError::InfeasibleStart("R-SPLINE has an empty warm start. Is x0 feasible?".to_string())
        })?;
        let outcome = spline(ctx, &start, 0, None)?;
        Ok([outcome.best].into_iter().collect())
    }
}
