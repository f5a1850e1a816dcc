//! Test Problem C
//!
//! Kursawe-style bi-objective problem on a scaled lattice: coordinates are
//! divided by the density factor before evaluation, and each term carries
//! chi-square noise.

use super::in_box;
use crate::solver::{Oracle, Point};
use crate::stream::SimStream;

pub struct Tpc {
    density_factor: i64,
}

impl Default for Tpc {
    fn default() -> Self {
        Self { density_factor: 2 }
    }
}

impl Tpc {
    pub fn bound(&self) -> i64 {
        5 * self.density_factor
    }

    fn evaluate(&self, x: &Point, xi: &[f64; 3]) -> Vec<f64> {
        let df = self.density_factor as f64;
        let u: Vec<f64> = x.iter().map(|&c| c as f64 / df).collect();
        let obj1: f64 = (0..2)
            .map(|i| -10.0 * xi[i] * (-0.2 * (u[i] * u[i] + u[i + 1] * u[i + 1]).sqrt()).exp())
            .sum();
        let obj2: f64 = (0..3)
            .map(|i| xi[i] * (u[i].abs().powf(0.8) + 5.0 * u[i].sin().powi(3)))
            .sum();
        vec![obj1, obj2]
    }

    /// Expected objectives (every ξ replaced by its mean 1)
    pub fn true_g(&self, x: &Point) -> Vec<f64> {
        self.evaluate(x, &[1.0; 3])
    }
}

impl Oracle for Tpc {
    fn name(&self) -> &str {
        "TPC"
    }

    fn num_obj(&self) -> usize {
        2
    }

    fn dim(&self) -> usize {
        3
    }

    fn in_domain(&self, x: &Point) -> bool {
        let b = self.bound();
        in_box(x, 3, -b, b)
    }

    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
        if !self.in_domain(x) {
            return None;
        }
        let xi: [f64; 3] = std::array::from_fn(|_| stream.normalvariate(0.0, 1.0).powi(2));
        Some(self.evaluate(x, &xi))
    }
}
