//! One-dimensional noisy quadratic

use super::in_box;
use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

const LOWER: i64 = -100;
const UPPER: i64 = 100;
const NOISE_SD: f64 = 3.0;

/// `x² + N(0, 3²)` on [-100, 100]
pub struct SimpleSo;

impl SimpleSo {
    pub fn true_g(x: &Point) -> Vec<f64> {
        vec![(x[0] * x[0]) as f64]
    }

    pub fn bounds() -> (i64, i64) {
        (LOWER, UPPER)
    }
}

impl Oracle for SimpleSo {
    fn name(&self) -> &str {
        "SimpleSO"
    }

    fn num_obj(&self) -> usize {
        1
    }

    fn dim(&self) -> usize {
        1
    }

    fn in_domain(&self, x: &Point) -> bool {
        in_box(x, 1, LOWER, UPPER)
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let z = stream.normalvariate(0.0, NOISE_SD);
        Some(vec![Self::true_g(x)[0] + z])
    }
}
