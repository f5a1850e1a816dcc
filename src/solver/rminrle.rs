//! R-MinRLE: per-objective minimizers as the candidate set

use super::accelerator::{Accelerator, SolverFamily};
use super::context::SearchContext;
use super::pareto::get_min;
use crate::solver::PointSet;
use crate::utils::{Result, SolverError};

pub struct RMinRle;

impl Accelerator for RMinRle {
    fn name(&self) -> &'static str {
        "RMINRLE"
    }

    fn family(&self) -> SolverFamily {
        SolverFamily::Rle
    }

    fn enhance(&self, ctx: &mut SearchContext, warm_start: PointSet) -> Result<PointSet> {
        let feasible = ctx.acc_mut().upsample(&warm_start)?;
        get_min(&ctx.objective_map(&feasible), ctx.num_obj()).map_err(|_| {
            SolverError::InfeasibleStart("R-MinRLE has no feasible warm start. Is x0 feasible?".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverParams;
    use crate::solver::accumulator::Accumulator;
    use crate::solver::replicate::Replicator;
    use crate::solver::testkit::BiQuad;
    use crate::solver::Point;
    use crate::stream::StreamSeed;
    use std::sync::Arc;

    fn context() -> SearchContext {
        let acc = Accumulator::new(Replicator::new(
            Arc::new(BiQuad::new(0.0)),
            StreamSeed::default(),
            1,
            false,
        ));
        let mut ctx = SearchContext::new(acc, SolverParams::default(), Point::from([5, 5]));
        ctx.begin_iteration(0);
        ctx
    }

    #[test]
    fn test_empty_warm_start() {
        let mut ctx = context();
        let err = RMinRle.enhance(&mut ctx, PointSet::new()).unwrap_err();
        assert!(matches!(err, SolverError::InfeasibleStart(_)));
    }

    #[test]
    fn test_returns_minimizers() {
        let mut ctx = context();
        let ws: PointSet = [Point::from([8, 1]), Point::from([5, 5]), Point::from([1, 8])]
            .into_iter()
            .collect();
        let out = RMinRle.enhance(&mut ctx, ws).unwrap();
        assert_eq!(out, [Point::from([1, 8]), Point::from([8, 1])].into_iter().collect());
    }
}
