//! Bus scheduling
//!
//! Nine buses depart at integer times in `[0, τ]`; one more always leaves
//! at `τ`. Passengers arrive as a Poisson process of rate `λ` and board the
//! next departure. With `d_i` the gaps between consecutive departures
//! (starting from time 0):
//!
//! - `f1 = Σ_{d_i > 0} (c0 + sqrt(λ d_i))`, the operating cost of the buses
//!   that carry passengers
//! - `f2` = total passenger waiting time, with `E f2 = (λ / 2) Σ d_i²`

use rand_distr::{Distribution, Poisson};

use super::in_box;
use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

pub struct BusScheduling {
    /// Passenger arrival rate
    lambda: f64,
    /// Fixed cost per dispatched bus
    c0: f64,
    /// End of the service horizon
    tau: i64,
}

impl Default for BusScheduling {
    fn default() -> Self {
        Self {
            lambda: 10.0,
            c0: 100.0,
            tau: 100,
        }
    }
}

impl BusScheduling {
    const BUSES: usize = 9;

    pub fn horizon(&self) -> i64 {
        self.tau
    }

    /// Gaps between consecutive departures over the whole horizon
    fn gaps(&self, x: &Point) -> Vec<f64> {
        let mut times: Vec<i64> = x.to_vec();
        times.push(0);
        times.push(self.tau);
        times.sort_unstable();
        times.windows(2).map(|w| (w[1] - w[0]) as f64).collect()
    }

    fn operating_cost(&self, gaps: &[f64]) -> f64 {
        gaps.iter()
            .filter(|&&d| d > 0.0)
            .map(|&d| self.c0 + (self.lambda * d).sqrt())
            .sum()
    }

    /// Expected objectives
    pub fn true_g(&self, x: &Point) -> Vec<f64> {
        let gaps = self.gaps(x);
        let wait = gaps.iter().map(|d| d * d).sum::<f64>() * self.lambda / 2.0;
        vec![self.operating_cost(&gaps), wait]
    }
}

impl Oracle for BusScheduling {
    fn name(&self) -> &str {
        "BusScheduling"
    }

    fn num_obj(&self) -> usize {
        2
    }

    fn dim(&self) -> usize {
        Self::BUSES
    }

    fn in_domain(&self, x: &Point) -> bool {
        in_box(x, Self::BUSES, 0, self.tau)
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let gaps = self.gaps(x);
        let mut wait = 0.0;
        for &d in gaps.iter().filter(|&&d| d > 0.0) {
            let arrivals = Poisson::new(self.lambda * d).ok()?.sample(stream) as u64;
            for _ in 0..arrivals {
                wait += d * (1.0 - stream.uniform());
            }
        }
        Some(vec![self.operating_cost(&gaps), wait])
    }
}
