//! Replication worker pool
//!
//! Replications are independent: each one gets its own substream derived
//! from `(stream id, replication index)`, so a batch can be split across any
//! number of worker threads and still produce identical outcomes. Workers
//! only return observations; the caller folds them into the estimate table.

use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::solver::{Oracle, Point};
use crate::stream::StreamSeed;
use crate::utils::{Result, SolverError};

/// Replications `first..first + count` of one point
#[derive(Debug, Clone)]
pub struct ReplicationJob {
    pub point: Point,
    /// Stable index of the point in the estimate table
    pub point_index: u64,
    pub first: u64,
    pub count: u64,
}

/// Observation of one replication (`None` when infeasible)
#[derive(Debug, Clone)]
pub struct ReplicationOutcome {
    /// Position of the job in the submitted batch
    pub job: usize,
    pub replication: u64,
    pub objectives: Option<Vec<f64>>,
}

/// Dispatches replications to the oracle on a pool of scoped threads
pub struct Replicator {
    oracle: Arc<dyn Oracle>,
    seed: StreamSeed,
    workers: usize,
    crn: bool,
}

impl Replicator {
    pub fn new(oracle: Arc<dyn Oracle>, seed: StreamSeed, workers: usize, crn: bool) -> Self {
        Self {
            oracle,
            seed,
            workers: workers.max(1),
            crn,
        }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    /// Substream id for a point: shared by every point under CRN
    fn stream_id(&self, point_index: u64) -> u64 {
        if self.crn {
            0
        } else {
            point_index
        }
    }

    /// Run every replication of every job
    ///
    /// Outcomes are ordered by job, then by replication index.
    pub fn run(&self, jobs: &[ReplicationJob]) -> Result<Vec<ReplicationOutcome>> {
        let tasks: Vec<(usize, u64)> = jobs
            .iter()
            .enumerate()
            .flat_map(|(j, job)| (job.first..job.first + job.count).map(move |r| (j, r)))
            .collect();

        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        if self.workers == 1 || tasks.len() == 1 {
            return Ok(self.evaluate(jobs, &tasks));
        }

        let chunk_size = tasks.len().div_ceil(self.workers);
        debug!(
            "Dispatching {} replications to {} workers",
            tasks.len(),
            tasks.len().div_ceil(chunk_size)
        );

        thread::scope(|s| -> Result<Vec<ReplicationOutcome>> {
            let mut handles = Vec::with_capacity(self.workers);
            for (worker_id, chunk) in tasks.chunks(chunk_size).enumerate() {
                let handle = thread::Builder::new()
                    .name(format!("sim-worker-{}", worker_id))
                    .spawn_scoped(s, move || self.evaluate(jobs, chunk))
                    .map_err(|e| {
                        SolverError::Worker(format!("failed to spawn worker {}: {}", worker_id, e))
                    })?;
                handles.push(handle);
            }

            let mut outcomes = Vec::with_capacity(tasks.len());
            for handle in handles {
                let chunk = handle
                    .join()
                    .map_err(|_| SolverError::Worker("replication worker panicked".to_string()))?;
                outcomes.extend(chunk);
            }
            Ok(outcomes)
        })
    }

    fn evaluate(&self, jobs: &[ReplicationJob], tasks: &[(usize, u64)]) -> Vec<ReplicationOutcome> {
        tasks
            .iter()
            .map(|&(j, replication)| {
                let job = &jobs[j];
                let mut stream = self
                    .seed
                    .substream(self.stream_id(job.point_index), replication);
                ReplicationOutcome {
                    job: j,
                    replication,
                    objectives: self.oracle.g(&job.point, &mut stream),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SimStream;

    struct Noisy;

    impl Oracle for Noisy {
        fn name(&self) -> &str {
            "noisy"
        }
        fn num_obj(&self) -> usize {
            1
        }
        fn dim(&self) -> usize {
            1
        }
        fn g(&self, x: &Point, stream: &mut SimStream) -> Option<Vec<f64>> {
            if x[0] < 0 {
                return None;
            }
            Some(vec![x[0] as f64 + stream.normalvariate(0.0, 1.0)])
        }
    }

    fn jobs() -> Vec<ReplicationJob> {
        vec![
            ReplicationJob { point: Point::from([1]), point_index: 0, first: 0, count: 5 },
            ReplicationJob { point: Point::from([-1]), point_index: 1, first: 0, count: 2 },
            ReplicationJob { point: Point::from([2]), point_index: 2, first: 3, count: 4 },
        ]
    }

    fn values(outcomes: &[ReplicationOutcome]) -> Vec<Option<Vec<f64>>> {
        outcomes.iter().map(|o| o.objectives.clone()).collect()
    }

    #[test]
    fn test_parallel_matches_serial() {
        let seed = StreamSeed::default();
        let serial = Replicator::new(Arc::new(Noisy), seed, 1, false).run(&jobs()).unwrap();
        let parallel = Replicator::new(Arc::new(Noisy), seed, 4, false).run(&jobs()).unwrap();
        assert_eq!(serial.len(), 11);
        assert_eq!(values(&serial), values(&parallel));
        let order: Vec<(usize, u64)> = parallel.iter().map(|o| (o.job, o.replication)).collect();
        assert_eq!(order[0], (0, 0));
        assert_eq!(order[7], (2, 3));
        assert_eq!(order[10], (2, 6));
    }

    #[test]
    fn test_infeasible_outcomes() {
        let out = Replicator::new(Arc::new(Noisy), StreamSeed::default(), 2, false)
            .run(&jobs())
            .unwrap();
        assert!(out.iter().filter(|o| o.job == 1).all(|o| o.objectives.is_none()));
        assert!(out.iter().filter(|o| o.job != 1).all(|o| o.objectives.is_some()));
    }

    #[test]
    fn test_crn_shares_noise_across_points() {
        let seed = StreamSeed::default();
        let jobs = vec![
            ReplicationJob { point: Point::from([1]), point_index: 0, first: 0, count: 3 },
            ReplicationJob { point: Point::from([4]), point_index: 1, first: 0, count: 3 },
        ];
        let out = Replicator::new(Arc::new(Noisy), seed, 1, true).run(&jobs).unwrap();
        for r in 0..3 {
            let a = out[r].objectives.as_ref().unwrap()[0];
            let b = out[3 + r].objectives.as_ref().unwrap()[0];
            assert!((b - a - 3.0).abs() < 1e-12);
        }

        let indep = Replicator::new(Arc::new(Noisy), seed, 1, false).run(&jobs).unwrap();
        let a = indep[0].objectives.as_ref().unwrap()[0];
        let b = indep[3].objectives.as_ref().unwrap()[0];
        assert!((b - a - 3.0).abs() > 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let out = Replicator::new(Arc::new(Noisy), StreamSeed::default(), 3, false)
            .run(&[])
            .unwrap();
        assert!(out.is_empty());
    }
}
