//! Retrospective approximation driver
//!
//! INIT -> SAMPLE -> ACCELERATE -> CHECK_BUDGET -> {SAMPLE | TERMINATED}
//!
//! Each iteration raises the sample size, re-estimates the candidate set,
//! hands it to the accelerator and checks the budget. The driver is the
//! same for every solver; only the accelerator differs.

use std::sync::Arc;

use tracing::{debug, info};

use super::accelerator::{Accelerator, SolverFamily, SolverKind};
use super::accumulator::Accumulator;
use super::context::SearchContext;
use super::replicate::Replicator;
use super::result::{CandidateReport, IterationRecord, SolveResult};
use super::rle::enhance_local_efficiency;
use crate::config::SolverConfig;
use crate::solver::{Oracle, Point, PointSet};
use crate::stream::StreamSeed;
use crate::utils::{Result, SolverError};

/// Driver phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    /// Validate the starting point
    Init,
    /// Raise the sample size and re-estimate
    Sample,
    /// Run the accelerator on the warm start
    Accelerate,
    /// Stop once the budget is spent
    CheckBudget,
    Terminated,
}

/// Driver state machine for one solver run
pub struct RaSolver {
    phase: SolverPhase,
    ctx: SearchContext,
    accel: Box<dyn Accelerator>,
    budget: u64,
    nu: u32,
    /// Current approximate local efficient set
    ales: PointSet,
    warm_start: PointSet,
    history: Vec<IterationRecord>,
}

impl RaSolver {
    /// Create a solver seeded from the configuration
    pub fn new(
        oracle: Arc<dyn Oracle>,
        kind: SolverKind,
        x0: Point,
        config: &SolverConfig,
    ) -> Result<Self> {
        Self::with_seed(oracle, kind, x0, config, config.stream_seed())
    }

    /// Create a solver with an explicit stream seed
    pub fn with_seed(
        oracle: Arc<dyn Oracle>,
        kind: SolverKind,
        x0: Point,
        config: &SolverConfig,
        seed: StreamSeed,
    ) -> Result<Self> {
        config.params.validate()?;
        let accel = kind.build(oracle.num_obj())?;
        let replicator = Replicator::new(oracle, seed, config.simpar, config.crn);
        let ctx = SearchContext::new(Accumulator::new(replicator), config.params.clone(), x0);
        Ok(Self {
            phase: SolverPhase::Init,
            ctx,
            accel,
            budget: config.budget,
            nu: 0,
            ales: PointSet::new(),
            warm_start: PointSet::new(),
            history: Vec::new(),
        })
    }

    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SolverPhase::Terminated
    }

    pub fn ales(&self) -> &PointSet {
        &self.ales
    }

    pub fn calls(&self) -> u64 {
        self.ctx.acc().calls()
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn context(&self) -> &SearchContext {
        &self.ctx
    }

    /// Advance one phase
    ///
    /// Any error terminates the run and is returned to the caller.
    pub fn step(&mut self) -> Result<SolverPhase> {
        match self.advance() {
            Ok(phase) => {
                self.phase = phase;
                Ok(phase)
            }
            Err(e) => {
                self.phase = SolverPhase::Terminated;
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<SolverPhase> {
        match self.phase {
            SolverPhase::Init => {
                let oracle = self.ctx.acc().oracle();
                let x0 = self.ctx.x0();
                if x0.dim() != oracle.dim() {
                    return Err(SolverError::Config(format!(
                        "x0 {} has dimension {}, {} expects {}",
                        x0,
                        x0.dim(),
                        oracle.name(),
                        oracle.dim()
                    )));
                }
                if !oracle.in_domain(x0) {
                    return Err(SolverError::InfeasibleStart(format!(
                        "x0 {} is outside the feasible region of {}",
                        x0,
                        oracle.name()
                    )));
                }
                info!(
                    "{} on {} from {} with budget {}",
                    self.accel.name(),
                    oracle.name(),
                    x0,
                    self.budget
                );
                Ok(SolverPhase::Sample)
            }
            SolverPhase::Sample => {
                self.ctx.begin_iteration(self.nu);
                let mut set = self.ales.clone();
                set.insert(self.ctx.x0().clone());
                let feasible = self.ctx.acc_mut().upsample(&set)?;
                self.warm_start = if self.ales.is_empty() {
                    feasible
                } else {
                    feasible.intersection(&self.ales).cloned().collect()
                };
                debug!(
                    "Iteration {}: m = {}, warm start of {} points",
                    self.nu,
                    self.ctx.m(),
                    self.warm_start.len()
                );
                Ok(SolverPhase::Accelerate)
            }
            SolverPhase::Accelerate => {
                let warm_start = std::mem::take(&mut self.warm_start);
                let mut ales = self.accel.enhance(&mut self.ctx, warm_start)?;
                if self.accel.family() == SolverFamily::Rle {
                    ales = enhance_local_efficiency(&mut self.ctx, ales)?;
                }
                self.ales = ales;
                self.history.push(IterationRecord {
                    nu: self.nu,
                    m: self.ctx.m(),
                    calls: self.calls(),
                    ales: self.ales.iter().cloned().collect(),
                });
                info!(
                    "Iteration {} done: m = {}, calls = {}, |ALES| = {}",
                    self.nu,
                    self.ctx.m(),
                    self.calls(),
                    self.ales.len()
                );
                Ok(SolverPhase::CheckBudget)
            }
            SolverPhase::CheckBudget => {
                if self.calls() >= self.budget {
                    Ok(SolverPhase::Terminated)
                } else {
                    self.nu += 1;
                    Ok(SolverPhase::Sample)
                }
            }
            SolverPhase::Terminated => Ok(SolverPhase::Terminated),
        }
    }

    /// Run until the budget is spent
    pub fn solve(mut self) -> Result<SolveResult> {
        while !self.is_terminated() {
            self.step()?;
        }
        Ok(self.result())
    }

    /// Result artifact for the current candidate set
    pub fn result(&self) -> SolveResult {
        let candidates = self
            .ales
            .iter()
            .filter_map(|x| {
                self.ctx.acc().get(x).map(|e| CandidateReport {
                    point: x.clone(),
                    mean: e.mean(),
                    se: (0..self.ctx.num_obj()).map(|k| e.se_of(k)).collect(),
                    replications: e.count(),
                })
            })
            .collect();
        SolveResult {
            solver: self.accel.name().to_string(),
            problem: self.ctx.acc().oracle().name().to_string(),
            x0: self.ctx.x0().clone(),
            budget: self.budget,
            calls: self.calls(),
            iterations: self.history.len() as u32,
            candidates,
            history: self.history.clone(),
        }
    }

    /// Format run summary
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!("Solver Status: {:?}\n", self.phase));
        s.push_str(&format!("Solver: {}\n", self.accel.name()));
        s.push_str(&format!(
            "Iterations: {}\n",
            self.history.len()
        ));
        s.push_str(&format!(
            "Simulation calls: {} (budget {})\n",
            self.calls(),
            self.budget
        ));

        if self.ales.is_empty() {
            s.push_str("\nNo candidate points.\n");
        } else {
            s.push_str("\nCandidate Set:\n");
            for x in &self.ales {
                if let Some(e) = self.ctx.acc().get(x) {
                    let mean: Vec<String> = e.mean().iter().map(|v| format!("{:.4}", v)).collect();
                    s.push_str(&format!("  {} -> [{}] n={}\n", x, mean.join(", "), e.count()));
                }
            }
        }

        s.push_str("\nIteration History:\n");
        for r in &self.history {
            s.push_str(&format!(
                "  nu={:3} m={:5} calls={:8} |ALES|={}\n",
                r.nu,
                r.m,
                r.calls,
                r.ales.len()
            ));
        }

        s
    }
}
