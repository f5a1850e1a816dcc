//! Testers: problems with known expected values for benchmarking solvers

use std::sync::Arc;

use crate::problems::{BusScheduling, SimpleSo, Tpa, Tpb, Tpc};
use crate::solver::{Oracle, Point, PointSet};
use crate::stream::SimStream;

/// A problem paired with ground truth for scoring solver output
pub trait Tester: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fresh oracle for one solver instance
    fn oracle(&self) -> Arc<dyn Oracle>;

    /// Expected objective values at a feasible point
    fn true_g(&self, x: &Point) -> Vec<f64>;

    /// Known local efficient sets, when available
    fn solution(&self) -> Option<Vec<PointSet>> {
        None
    }

    /// Uniformly random feasible starting point
    fn random_x0(&self, stream: &mut SimStream) -> Point;

    /// Score a candidate set; 0 when there is no ground truth
    fn metric(&self, _candidates: &PointSet) -> f64 {
        0.0
    }
}

/// Registered testers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TesterKind {
    SimpleSo,
    Tpa,
    Tpb,
    Tpc,
    BusScheduling,
}

impl TesterKind {
    pub const ALL: [TesterKind; 5] = [
        Self::BusScheduling,
        Self::SimpleSo,
        Self::Tpa,
        Self::Tpb,
        Self::Tpc,
    ];

    /// Parse tester name (case-insensitive, `Tester` suffix optional)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.strip_suffix("tester").unwrap_or(&lower) {
            "simpleso" => Some(Self::SimpleSo),
            "tpa" => Some(Self::Tpa),
            "tpb" => Some(Self::Tpb),
            "tpc" => Some(Self::Tpc),
            "bs" | "busscheduling" => Some(Self::BusScheduling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleSo => "SimpleSOTester",
            Self::Tpa => "TPATester",
            Self::Tpb => "TPBTester",
            Self::Tpc => "TPCTester",
            Self::BusScheduling => "BSTester",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SimpleSo => "SimpleSO with distance-to-optimum metric",
            Self::Tpa => "Test Problem A with closed-form expected values",
            Self::Tpb => "Test Problem B with closed-form expected values",
            Self::Tpc => "Test Problem C with closed-form expected values",
            Self::BusScheduling => "Bus scheduling with closed-form expected values",
        }
    }

    pub fn build(&self) -> Box<dyn Tester> {
        match self {
            Self::SimpleSo => Box::new(SimpleSoTester),
            Self::Tpa => Box::new(TpaTester),
            Self::Tpb => Box::new(TpbTester),
            Self::Tpc => Box::new(TpcTester(Tpc::default())),
            Self::BusScheduling => Box::new(BsTester(BusScheduling::default())),
        }
    }
}

impl std::fmt::Display for TesterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn random_in_box(stream: &mut SimStream, dim: usize, lo: i64, hi: i64) -> Point {
    Point::new((0..dim).map(|_| stream.choice(lo..=hi)).collect())
}

pub struct SimpleSoTester;

impl Tester for SimpleSoTester {
    fn name(&self) -> &'static str {
        "SimpleSOTester"
    }

    fn oracle(&self) -> Arc<dyn Oracle> {
        Arc::new(SimpleSo)
    }

    fn true_g(&self, x: &Point) -> Vec<f64> {
        SimpleSo::true_g(x)
    }

    fn solution(&self) -> Option<Vec<PointSet>> {
        Some(vec![[Point::from([0])].into_iter().collect()])
    }

    fn random_x0(&self, stream: &mut SimStream) -> Point {
        let (lo, hi) = SimpleSo::bounds();
        random_in_box(stream, 1, lo, hi)
    }

    /// Distance from the first candidate to the optimum at 0
    fn metric(&self, candidates: &PointSet) -> f64 {
        candidates
            .first()
            .map(|x| x.distance(&Point::from([0])))
            .unwrap_or(f64::INFINITY)
    }
}

pub struct TpaTester;

impl Tester for TpaTester {
    fn name(&self) -> &'static str {
        "TPATester"
    }

    fn oracle(&self) -> Arc<dyn Oracle> {
        Arc::new(Tpa)
    }

    fn true_g(&self, x: &Point) -> Vec<f64> {
        Tpa::true_g(x)
    }

    fn random_x0(&self, stream: &mut SimStream) -> Point {
        let (lo, hi) = Tpa::bounds();
        random_in_box(stream, 2, lo, hi)
    }
}

pub struct TpbTester;

impl Tester for TpbTester {
    fn name(&self) -> &'static str {
        "TPBTester"
    }

    fn oracle(&self) -> Arc<dyn Oracle> {
        Arc::new(Tpb)
    }

    fn true_g(&self, x: &Point) -> Vec<f64> {
        Tpb::true_g(x)
    }

    fn random_x0(&self, stream: &mut SimStream) -> Point {
        let (lo, hi) = Tpb::bounds();
        random_in_box(stream, 2, lo, hi)
    }
}

pub struct TpcTester(Tpc);

impl Tester for TpcTester {
    fn name(&self) -> &'static str {
        "TPCTester"
    }

    fn oracle(&self) -> Arc<dyn Oracle> {
        Arc::new(Tpc::default())
    }

    fn true_g(&self, x: &Point) -> Vec<f64> {
        self.0.true_g(x)
    }

    fn random_x0(&self, stream: &mut SimStream) -> Point {
        let b = self.0.bound();
        random_in_box(stream, 3, -b, b)
    }
}

pub struct BsTester(BusScheduling);

impl Tester for BsTester {
    fn name(&self) -> &'static str {
        "BSTester"
    }

    fn oracle(&self) -> Arc<dyn Oracle> {
        Arc::new(BusScheduling::default())
    }

    fn true_g(&self, x: &Point) -> Vec<f64> {
        self.0.true_g(x)
    }

    fn random_x0(&self, stream: &mut SimStream) -> Point {
        random_in_box(stream, 9, 0, self.0.horizon() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamSeed;

    #[test]
    fn test_parse_tester_kinds() {
        assert_eq!(TesterKind::parse("TPATester"), Some(TesterKind::Tpa));
        assert_eq!(TesterKind::parse("simplesotester"), Some(TesterKind::SimpleSo));
        assert_eq!(TesterKind::parse("BSTester"), Some(TesterKind::BusScheduling));
        assert_eq!(TesterKind::parse("nope"), None);
        for kind in TesterKind::ALL {
            assert_eq!(TesterKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_random_x0_is_feasible() {
        let mut stream = StreamSeed::default().auxiliary();
        for kind in TesterKind::ALL {
            let tester = kind.build();
            let oracle = tester.oracle();
            for _ in 0..50 {
                let x0 = tester.random_x0(&mut stream);
                assert!(oracle.in_domain(&x0), "{} gave {}", tester.name(), x0);
            }
        }
    }

    #[test]
    fn test_simple_so_metric() {
        let t = SimpleSoTester;
        let set: PointSet = [Point::from([-3])].into_iter().collect();
        assert_eq!(t.metric(&set), 3.0);
        assert_eq!(t.metric(&PointSet::new()), f64::INFINITY);
        assert_eq!(t.true_g(&Point::from([4])), vec![16.0]);
        assert!(t.solution().is_some());
    }

    #[test]
    fn test_metric_without_ground_truth() {
        let set: PointSet = [Point::from([1, 1])].into_iter().collect();
        assert_eq!(TpaTester.metric(&set), 0.0);
        assert!(TpaTester.solution().is_none());
    }
}
