//! Test Problem B
//!
//! Bi-objective problem whose local efficient sets are disconnected: the
//! second coordinate selects between a narrow basin around 20 and a wide
//! one around 70.

use super::in_box;
use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

const UPPER: i64 = 100;

pub struct Tpb;

impl Tpb {
    /// Deterministic factors `(f2, g1, h)` at `x`
    fn factors(x: &Point) -> (f64, f64, f64) {
        let g1 = 4.0 * x[0] as f64 / 100.0;
        let y = x[1] as f64;
        let f2 = if (0..=40).contains(&x[1]) {
            4.0 - 3.0 * (-((y - 20.0) / 2.0).powi(2)).exp()
        } else {
            4.0 - 2.0 * (-((y - 70.0) / 20.0).powi(2)).exp()
        };
        let alpha = 0.25 + 3.75 * (f2 - 1.0);
        let h = if g1 <= f2 { 1.0 - (g1 / f2).powf(alpha) } else { 0.0 };
        (f2, g1, h)
    }

    /// Expected objectives (E ξ = 1)
    pub fn true_g(x: &Point) -> Vec<f64> {
        let (f2, g1, h) = Self::factors(x);
        vec![f2 * h, g1]
    }

    pub fn bounds() -> (i64, i64) {
        (0, UPPER)
    }
}

impl Oracle for Tpb {
    fn name(&self) -> &str {
        "TPB"
    }

    fn num_obj(&self) -> usize {
        2
    }

    fn dim(&self) -> usize {
        2
    }

    fn in_domain(&self, x: &Point) -> bool {
        in_box(x, 2, 0, UPPER)
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let xi1 = stream.normalvariate(0.0, 1.0).powi(2);
        let xi2 = stream.normalvariate(0.0, 1.0).powi(2);
        let (f2, g1, h) = Self::factors(x);
        Some(vec![xi1 * xi2 * f2 * h, xi1 * g1])
    }
}
