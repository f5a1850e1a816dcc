//! Lattice points and neighborhoods

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A point of the integer lattice
///
/// Immutable once built; ordering is lexicographic, which makes every
/// `PointSet` iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(Vec<i64>);

impl Point {
    pub fn new(coords: Vec<i64>) -> Self {
        Self(coords)
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Copy of this point with coordinate `i` shifted by `step`
    pub fn shifted(&self, i: usize, step: i64) -> Point {
        let mut coords = self.0.clone();
        coords[i] += step;
        Point(coords)
    }

    /// Points differing from this one in exactly one coordinate by at most
    /// `radius`, in lexicographic order
    pub fn neighbors(&self, radius: u32) -> PointSet {
        let r = radius as i64;
        let mut out = PointSet::new();
        for i in 0..self.dim() {
            for step in 1..=r {
                out.insert(self.shifted(i, -step));
                out.insert(self.shifted(i, step));
            }
        }
        out
    }

    /// Euclidean distance to another point of the same dimension
    pub fn distance(&self, other: &Point) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| ((a - b) as f64).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl Deref for Point {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for Point {
    fn from(coords: Vec<i64>) -> Self {
        Self(coords)
    }
}

impl<const N: usize> From<[i64; N]> for Point {
    fn from(coords: [i64; N]) -> Self {
        Self(coords.to_vec())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Deduplicated, ordered set of points
pub type PointSet = BTreeSet<Point>;
