//! Simulation oracle capability

use crate::solver::Point;
use crate::stream::SimStream;

/// A noisy simulation of one or more objectives over the integer lattice
///
/// `g` runs one replication at `x` with the supplied stream and returns
/// `None` when `x` is infeasible, otherwise a vector of `num_obj`
/// objective observations. Implementations must be deterministic given
/// the stream so that replications can run on any worker thread.
pub trait Oracle: Send + Sync {
    /// Short display name
    fn name(&self) -> &str;

    /// Number of objectives (at least 1)
    fn num_obj(&self) -> usize;

    /// Lattice dimension
    fn dim(&self) -> usize;

    /// Whether `x` lies inside the feasible bounds, without simulating
    fn in_domain(&self, x: &Point) -> bool {
        x.dim() == self.dim()
    }

    /// Simulate one replication at `x`
    fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>>;
}
