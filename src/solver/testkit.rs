//! Small deterministic oracles for unit tests

use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

/// `x² + N(0, sd²)` on [-100, 100]
pub struct Quadratic {
    sd: f64,
}

impl Quadratic {
    pub fn new(sd: f64) -> Self {
        Self { sd }
    }
}

impl Oracle for Quadratic {
    fn name(&self) -> &str {
        "Quadratic"
    }

    fn num_obj(&self) -> usize {
        1
    }

    fn dim(&self) -> usize {
        1
    }

    fn in_domain(&self, x: &Point) -> bool {
        x.dim() == 1 && (-100..=100).contains(&x[0])
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let v = (x[0] * x[0]) as f64;
        Some(vec![v + stream.normalvariate(0.0, self.sd)])
    }
}

/// Two conflicting quadratics on [0, 50]²
///
/// `f1 = (a - 10)² + b²`, `f2 = a² + (b - 10)²` plus `N(0, sd²)` noise on
/// each; the efficient set is the segment between (10, 0) and (0, 10).
/// `offset` shifts both objectives.
pub struct BiQuad {
    sd: f64,
    offset: f64,
}

impl BiQuad {
    pub fn new(sd: f64) -> Self {
        Self::with_offset(sd, 0.0)
    }

    pub fn with_offset(sd: f64, offset: f64) -> Self {
        Self { sd, offset }
    }

    pub fn mean(x: &Point) -> [f64; 2] {
        let (a, b) = (x[0] as f64, x[1] as f64);
        [(a - 10.0).powi(2) + b * b, a * a + (b - 10.0).powi(2)]
    }
}

impl Oracle for BiQuad {
    fn name(&self) -> &str {
        "BiQuad"
    }

    fn num_obj(&self) -> usize {
        2
    }

    fn dim(&self) -> usize {
        2
    }

    fn in_domain(&self, x: &Point) -> bool {
        x.dim() == 2 && x.iter().all(|c| (0..=50).contains(c))
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let [f1, f2] = Self::mean(x);
        Some(vec![
            self.offset + f1 + stream.normalvariate(0.0, self.sd),
            self.offset + f2 + stream.normalvariate(0.0, self.sd),
        ])
    }
}
