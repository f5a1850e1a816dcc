//! Test Problem A
//!
//! With `a = x1/10`, `b = x2/10` and chi-square noise `ξi = zi²`:
//! `f1 = (a - 2ξ1)² + (b - ξ2)²`, `f2 = x1²/100 + (b - 2ξ3)²`.

use super::in_box;
use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

const UPPER: i64 = 50;

pub struct Tpa;

impl Tpa {
    /// Expected objectives (E ξ = 1, E ξ² = 3)
    pub fn true_g(x: &Point) -> Vec<f64> {
        let a = x[0] as f64 / 10.0;
        let b = x[1] as f64 / 10.0;
        vec![
            a * a - 4.0 * a + 12.0 + b * b - 2.0 * b + 3.0,
            (x[0] * x[0]) as f64 / 100.0 + b * b - 4.0 * b + 12.0,
        ]
    }

    pub fn bounds() -> (i64, i64) {
        (0, UPPER)
    }
}

impl Oracle for Tpa {
    fn name(&self) -> &str {
        "TPA"
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
        let xi: [f64; 3] = std::array::from_fn(|_| stream.normalvariate(0.0, 1.0).powi(2));
        let a = x[0] as f64 / 10.0;
        let b = x[1] as f64 / 10.0;
        let obj1 = (a - 2.0 * xi[0]).powi(2) + (b - xi[1]).powi(2);
        let obj2 = (x[0] * x[0]) as f64 / 100.0 + (b - 2.0 * xi[2]).powi(2);
        Some(vec![obj1, obj2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamSeed;

    #[test]
    fn test_sample_mean_matches_true_g() {
        let seed = StreamSeed::default();
        let x = Point::from([20, 30]);
        let n = 20_000;
        let mut sums = [0.0; 2];
        for r in 0..n {
            let obs = Tpa.g(&x, &mut seed.substream(5, r)).unwrap();
            sums[0] += obs[0];
            sums[1] += obs[1];
        }
        let truth = Tpa::true_g(&x);
        for k in 0..2 {
            let mean = sums[k] / n as f64;
            assert!((mean - truth[k]).abs() < 0.08 * truth[k], "obj {}: {} vs {}", k, mean, truth[k]);
        }
    }

    #[test]
    fn test_bounds() {
        let mut s = StreamSeed::default().substream(0, 0);
        assert!(Tpa.g(&Point::from([0, 50]), &mut s).is_some());
        assert!(Tpa.g(&Point::from([51, 0]), &mut s).is_none());
        assert!(Tpa.g(&Point::from([3, -1]), &mut s).is_none());
    }
}
