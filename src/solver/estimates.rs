//! Running estimates per lattice point
//!
//! - OnlineStats: Welford running mean/variance for one objective
//! - Estimate: all objectives of one point, sharing a replication count
//! - EstimateTable: memoized estimates keyed by point, never invalidated

use std::collections::{HashMap, HashSet};

use crate::solver::Point;

/// Welford online mean and variance
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineStats {
    n: u64,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    pub fn add(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / (self.n as f64);
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (divide by n-1); zero below two samples
    pub fn variance_sample(&self) -> f64 {
        if self.n <= 1 {
            0.0
        } else {
            (self.m2 / ((self.n as f64) - 1.0)).max(0.0)
        }
    }

    /// Standard error of the mean, defined from two samples on
    pub fn standard_error(&self) -> Option<f64> {
        if self.n < 2 {
            None
        } else {
            Some((self.variance_sample() / self.n as f64).sqrt())
        }
    }
}

/// Estimate of every objective at one point
#[derive(Debug, Clone)]
pub struct Estimate {
    /// Stable index assigned on first sight; selects the point's substream
    index: u64,
    count: u64,
    stats: Vec<OnlineStats>,
}

impl Estimate {
    fn new(index: u64, num_obj: usize) -> Self {
        Self {
            index,
            count: 0,
            stats: vec![OnlineStats::default(); num_obj],
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Replications drawn so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running sample mean of each objective
    pub fn mean(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.mean()).collect()
    }

    pub fn mean_of(&self, k: usize) -> f64 {
        self.stats[k].mean()
    }

    /// Standard error of each objective, `None` below two replications
    pub fn se(&self) -> Option<Vec<f64>> {
        self.stats.iter().map(|s| s.standard_error()).collect()
    }

    /// Standard error of objective `k`, zero below two replications
    pub fn se_of(&self, k: usize) -> f64 {
        self.stats[k].standard_error().unwrap_or(0.0)
    }

    fn record(&mut self, objectives: &[f64]) {
        for (s, &v) in self.stats.iter_mut().zip(objectives) {
            s.add(v);
        }
        self.count += 1;
    }
}

/// Memoized estimates for every point seen during a run
#[derive(Debug, Default)]
pub struct EstimateTable {
    num_obj: usize,
    entries: HashMap<Point, Estimate>,
    infeasible: HashSet<Point>,
    next_index: u64,
}

impl EstimateTable {
    pub fn new(num_obj: usize) -> Self {
        Self {
            num_obj,
            ..Self::default()
        }
    }

    pub fn get(&self, x: &Point) -> Option<&Estimate> {
        self.entries.get(x)
    }

    /// Replications recorded for `x` (zero if never sampled)
    pub fn count(&self, x: &Point) -> u64 {
        self.entries.get(x).map(|e| e.count).unwrap_or(0)
    }

    pub fn is_infeasible(&self, x: &Point) -> bool {
        self.infeasible.contains(x)
    }

    /// Stable substream index of `x`, assigned on first request
    pub fn index_of(&mut self, x: &Point) -> u64 {
        if let Some(e) = self.entries.get(x) {
            return e.index;
        }
        let index = self.next_index;
        self.next_index += 1;
        self.entries
            .insert(x.clone(), Estimate::new(index, self.num_obj));
        index
    }

    /// Fold one replication into the estimate of `x`
    pub fn record(&mut self, x: &Point, objectives: &[f64]) {
        let index = self.index_of(x);
        if let Some(e) = self.entries.get_mut(x) {
            debug_assert_eq!(e.index, index);
            e.record(objectives);
        }
    }

    pub fn mark_infeasible(&mut self, x: &Point) {
        self.infeasible.insert(x.clone());
    }
}
