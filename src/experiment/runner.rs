//! Experiment runner
//!
//! Runs `isp` independent solver instances on `proc` worker threads. Each
//! instance has its own oracle and a stream seed derived from the master
//! seed, so the results do not depend on which thread ran which instance.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::solver::{Point, PointSet, RaSolver, SolveResult, SolverKind};
use crate::testers::{Tester, TesterKind};
use crate::utils::{Result, SolverError};

/// Tester metric after one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub calls: u64,
    pub metric: f64,
}

/// Outcome of one solver instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    pub instance: usize,
    pub result: SolveResult,
    /// Metric curve; empty unless metrics were requested
    pub metrics: Vec<MetricPoint>,
}

pub struct ExperimentRunner {
    config: ExperimentConfig,
    tester: TesterKind,
    solver: SolverKind,
    /// Shared start point; drawn per instance when absent
    x0: Option<Point>,
}

impl ExperimentRunner {
    pub fn new(
        config: ExperimentConfig,
        tester: TesterKind,
        solver: SolverKind,
        x0: Option<Point>,
    ) -> Self {
        Self {
            config,
            tester,
            solver,
            x0,
        }
    }

    /// Run every instance, returning results ordered by instance index
    pub fn run(&self) -> Result<Vec<InstanceResult>> {
        let tester = self.tester.build();
        let total = self.config.isp;
        let workers = self.config.proc.clamp(1, total.max(1));
        info!(
            "Running {} instances of {} on {} with {} workers",
            total, self.solver, self.tester, workers
        );

        let pb = self.progress_bar(total as u64);
        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let results: Mutex<Vec<InstanceResult>> = Mutex::new(Vec::with_capacity(total));
        let first_error: Mutex<Option<SolverError>> = Mutex::new(None);

        thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::with_capacity(workers);
            for worker_id in 0..workers {
                let tester = tester.as_ref();
                let (next, failed, results, first_error, pb) =
                    (&next, &failed, &results, &first_error, &pb);
                let handle = thread::Builder::new()
                    .name(format!("instance-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        while !failed.load(Ordering::Relaxed) {
                            let instance = next.fetch_add(1, Ordering::Relaxed);
                            if instance >= total {
                                break;
                            }
                            match self.run_instance(tester, instance) {
                                Ok(r) => {
                                    results.lock().push(r);
                                    pb.inc(1);
                                }
                                Err(e) => {
                                    failed.store(true, Ordering::Relaxed);
                                    first_error.lock().get_or_insert(e);
                                }
                            }
                        }
                    })
                    .map_err(|e| SolverError::Worker(format!("Failed to spawn instance worker: {}", e)))?;
                handles.push(handle);
            }
            for handle in handles {
                handle
                    .join()
                    .map_err(|_| SolverError::Worker("Instance worker panicked".to_string()))?;
            }
            Ok(())
        })?;

        if let Some(e) = first_error.into_inner() {
            pb.abandon_with_message("failed");
            return Err(e);
        }
        pb.finish_with_message("done");

        let mut results = results.into_inner();
        results.sort_by_key(|r| r.instance);
        Ok(results)
    }

    /// Run instance `instance` to completion
    fn run_instance(&self, tester: &dyn Tester, instance: usize) -> Result<InstanceResult> {
        let seed = self.config.solver.stream_seed().instance(instance as u64);
        let x0 = match &self.x0 {
            Some(x) => x.clone(),
            None => tester.random_x0(&mut seed.auxiliary()),
        };
        debug!("Instance {} starts at {}", instance, x0);

        let result = RaSolver::with_seed(tester.oracle(), self.solver, x0, &self.config.solver, seed)?
            .solve()?;

        let metrics = if self.config.metric {
            result
                .history
                .iter()
                .map(|r| {
                    let ales: PointSet = r.ales.iter().cloned().collect();
                    MetricPoint {
                        calls: r.calls,
                        metric: tester.metric(&ales),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(InstanceResult {
            instance,
            result,
            metrics,
        })
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if self.config.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("{} on {}", self.solver, self.tester));
        pb
    }
}
