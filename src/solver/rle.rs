//! Relaxed local efficiency enhancement
//!
//! Run after the accelerator by the RLE family of solvers. A candidate that
//! some feasible neighbor dominates beyond the confidence margins cannot be
//! locally efficient, so it is swapped for the non-dominated subset of the
//! neighbors that beat it.

use std::collections::BTreeMap;

use tracing::debug;

use super::context::SearchContext;
use super::pareto::{get_nondom, ConfidenceBox};
use crate::solver::{Point, PointSet};
use crate::utils::Result;

/// Enhance `ales` for at most `ctx.search_limit()` rounds
///
/// The returned set is non-dominated under the current estimates.
pub fn enhance_local_efficiency(ctx: &mut SearchContext, ales: PointSet) -> Result<PointSet> {
    let mut current = ctx.acc_mut().upsample(&ales)?;
    let limit = ctx.search_limit();

    for round in 0..limit {
        let mut next = PointSet::new();
        let mut replaced = 0usize;

        for x in &current {
            let nbrs = ctx.sampled_neighbors(x)?;
            let Some(bx) = ctx.confidence(x) else {
                continue;
            };
            let boxes: BTreeMap<Point, ConfidenceBox> = ctx.confidence_map(&nbrs);
            let dominators: PointSet = boxes
                .iter()
                .filter(|(_, by)| by.dominates_beyond_margin(&bx))
                .map(|(y, _)| y.clone())
                .collect();

            if dominators.is_empty() {
                next.insert(x.clone());
            } else {
                replaced += 1;
                next.extend(get_nondom(&ctx.objective_map(&dominators)));
            }
        }

        if replaced == 0 {
            debug!("RLE settled after {} rounds", round);
            break;
        }
        debug!("RLE round {}: replaced {} candidates", round, replaced);
        current = next;
    }

    Ok(get_nondom(&ctx.objective_map(&current)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverParams;
    use crate::solver::accumulator::Accumulator;
    use crate::solver::replicate::Replicator;
    use crate::solver::testkit::{BiQuad, Quadratic};
    use crate::stream::StreamSeed;
    use std::sync::Arc;

    fn quadratic_context() -> SearchContext {
        let acc = Accumulator::new(Replicator::new(
            Arc::new(Quadratic::new(0.0)),
            StreamSeed::default(),
            1,
            false,
        ));
        let mut ctx = SearchContext::new(acc, SolverParams::default(), Point::from([5]));
        ctx.begin_iteration(0);
        ctx
    }

    #[test]
    fn test_moves_dominated_candidate_downhill() {
        let mut ctx = quadratic_context();
        let ales: PointSet = [Point::from([5])].into_iter().collect();
        let out = enhance_local_efficiency(&mut ctx, ales).unwrap();
        // eight rounds of single steps toward the minimum, stopping at zero
        assert_eq!(out, [Point::from([0])].into_iter().collect());
    }

    #[test]
    fn test_round_limit() {
        let mut ctx = quadratic_context();
        let ales: PointSet = [Point::from([40])].into_iter().collect();
        let out = enhance_local_efficiency(&mut ctx, ales).unwrap();
        assert_eq!(out, [Point::from([32])].into_iter().collect());
    }

    #[test]
    fn test_efficient_points_are_kept() {
        let acc = Accumulator::new(Replicator::new(
            Arc::new(BiQuad::new(0.0)),
            StreamSeed::default(),
            1,
            false,
        ));
        let mut ctx = SearchContext::new(acc, SolverParams::default(), Point::from([5, 5]));
        ctx.begin_iteration(0);
        let ales: PointSet = [Point::from([5, 5]), Point::from([0, 10])].into_iter().collect();
        let out = enhance_local_efficiency(&mut ctx, ales.clone()).unwrap();
        assert_eq!(out, ales);
    }
}
