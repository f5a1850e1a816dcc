//! Dominance filters over estimated objective vectors
//!
//! All functions here are pure: they read estimates that have already been
//! drawn and never request new replications.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::solver::{Point, PointSet};
use crate::utils::{Result, SolverError};

/// Mean objective vector per point
pub type ObjectiveMap = BTreeMap<Point, Vec<f64>>;

/// True when `a` is no worse than `b` everywhere and strictly better somewhere
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strict = false;
    for (x, y) in a.iter().zip(b) {
        if x > y {
            return false;
        }
        if x < y {
            strict = true;
        }
    }
    strict
}

/// Non-dominated members of `map` for any number of objectives
pub fn get_nondom(map: &ObjectiveMap) -> PointSet {
    map.iter()
        .filter(|(x, fx)| !map.iter().any(|(y, fy)| y != *x && dominates(fy, fx)))
        .map(|(x, _)| x.clone())
        .collect()
}

/// Non-dominated members of `map` for exactly two objectives
///
/// Sorts by (first, second) objective and sweeps once, keeping a point when
/// its second objective beats everything before it. Identical vectors do
/// not dominate each other and are all kept.
pub fn get_biparetos(map: &ObjectiveMap) -> PointSet {
    let mut sorted: Vec<(&Point, &Vec<f64>)> = map.iter().collect();
    sorted.sort_by(|(xa, a), (xb, b)| {
        a[0].total_cmp(&b[0])
            .then(a[1].total_cmp(&b[1]))
            .then_with(|| xa.cmp(xb))
    });

    let mut front = PointSet::new();
    // (first objective, second objective) of the first point reaching the best second objective
    let mut best: Option<(f64, f64)> = None;
    for (x, f) in sorted {
        let keep = match best {
            None => true,
            Some((f0, f1)) => f[1] < f1 || (f[1] == f1 && f[0] == f0),
        };
        if keep {
            if best.map_or(true, |(_, f1)| f[1] < f1) {
                best = Some((f[0], f[1]));
            }
            front.insert(x.clone());
        }
    }
    front
}

/// Confidence margin `se / count^betaeps`
pub fn confidence_margin(se: f64, count: u64, betaeps: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    se / (count as f64).powf(betaeps)
}

/// Mean objective vector with a per-objective margin
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBox {
    pub mean: Vec<f64>,
    pub margin: Vec<f64>,
}

impl ConfidenceBox {
    pub fn lower(&self, k: usize) -> f64 {
        self.mean[k] - self.margin[k]
    }

    pub fn upper(&self, k: usize) -> f64 {
        self.mean[k] + self.margin[k]
    }

    /// Dominance that survives both margins: this box's upper corner
    /// dominates the other box's lower corner
    pub fn dominates_beyond_margin(&self, other: &ConfidenceBox) -> bool {
        let mut strict = false;
        for k in 0..self.mean.len() {
            let (a, b) = (self.upper(k), other.lower(k));
            if a > b {
                return false;
            }
            if a < b {
                strict = true;
            }
        }
        strict
    }
}

/// Split `boxes` into locally weakly efficient points and the points some
/// other member dominates beyond the confidence margins
pub fn remove_nlwep(boxes: &BTreeMap<Point, ConfidenceBox>) -> (PointSet, PointSet) {
    let mut kept = PointSet::new();
    let mut removed = PointSet::new();
    for (x, bx) in boxes {
        let dominated = boxes
            .iter()
            .any(|(y, by)| y != x && by.dominates_beyond_margin(bx));
        if dominated {
            removed.insert(x.clone());
        } else {
            kept.insert(x.clone());
        }
    }
    (kept, removed)
}

/// One minimizer per objective, ties going to the lexicographically first point
pub fn get_min(map: &ObjectiveMap, num_obj: usize) -> Result<PointSet> {
    if map.is_empty() {
        return Err(SolverError::EmptySet);
    }
    let mut mins = PointSet::new();
    for k in 0..num_obj {
        let best = map
            .iter()
            .min_by(|(_, a), (_, b)| a[k].partial_cmp(&b[k]).unwrap_or(Ordering::Equal));
        if let Some((x, _)) = best {
            mins.insert(x.clone());
        }
    }
    Ok(mins)
}
