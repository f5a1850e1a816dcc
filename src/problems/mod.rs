//! Simulation oracles and their registry

pub mod bus_scheduling;
pub mod simple_so;
pub mod tpa;
pub mod tpb;
pub mod tpc;

use std::sync::Arc;

pub use bus_scheduling::BusScheduling;
pub use simple_so::SimpleSo;
pub use tpa::Tpa;
pub use tpb::Tpb;
pub use tpc::Tpc;

use crate::solver::{Oracle, Point};

/// Registered problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    SimpleSo,
    Tpa,
    Tpb,
    Tpc,
    BusScheduling,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 5] = [
        Self::BusScheduling,
        Self::SimpleSo,
        Self::Tpa,
        Self::Tpb,
        Self::Tpc,
    ];

    /// Parse problem name (case-insensitive, with or without the `Prob` prefix)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.strip_prefix("prob").unwrap_or(&lower) {
            "simpleso" | "simple-so" | "simple_so" => Some(Self::SimpleSo),
            "tpa" => Some(Self::Tpa),
            "tpb" => Some(Self::Tpb),
            "tpc" => Some(Self::Tpc),
            "busscheduling" | "bus-scheduling" | "bus_scheduling" | "bs" | "bsprob" => {
                Some(Self::BusScheduling)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleSo => "SimpleSO",
            Self::Tpa => "TPA",
            Self::Tpb => "TPB",
            Self::Tpc => "TPC",
            Self::BusScheduling => "BusScheduling",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SimpleSo => "x^2 with normal noise on [-100, 100] (1 objective, dim 1)",
            Self::Tpa => "Test Problem A: convex chi-square perturbed quadratics (2 objectives, dim 2)",
            Self::Tpb => "Test Problem B: disconnected local efficient sets (2 objectives, dim 2)",
            Self::Tpc => "Test Problem C: Kursawe-style sums (2 objectives, dim 3)",
            Self::BusScheduling => "Bus scheduling: operating cost vs passenger wait (2 objectives, dim 9)",
        }
    }

    pub fn build(&self) -> Arc<dyn Oracle> {
        match self {
            Self::SimpleSo => Arc::new(SimpleSo),
            Self::Tpa => Arc::new(Tpa),
            Self::Tpb => Arc::new(Tpb),
            Self::Tpc => Arc::new(Tpc::default()),
            Self::BusScheduling => Arc::new(BusScheduling::default()),
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether every coordinate of `x` lies in `lo..=hi`
pub(crate) fn in_box(x: &Point, dim: usize, lo: i64, hi: i64) -> bool {
    x.dim() == dim && x.iter().all(|c| (lo..=hi).contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_problem_kinds() {
        assert_eq!(ProblemKind::parse("TPA"), Some(ProblemKind::Tpa));
        assert_eq!(ProblemKind::parse("ProbTPB"), Some(ProblemKind::Tpb));
        assert_eq!(ProblemKind::parse("probsimpleso"), Some(ProblemKind::SimpleSo));
        assert_eq!(ProblemKind::parse("BSProb"), Some(ProblemKind::BusScheduling));
        assert_eq!(ProblemKind::parse("tpz"), None);
        for kind in ProblemKind::ALL {
            assert_eq!(ProblemKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_registry_dimensions() {
        let dims: Vec<(usize, usize)> = ProblemKind::ALL
            .iter()
            .map(|k| {
                let o = k.build();
                (o.dim(), o.num_obj())
            })
            .collect();
        assert_eq!(dims, vec![(9, 2), (1, 1), (2, 2), (2, 2), (3, 2)]);
    }
}
