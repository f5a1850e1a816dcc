//! Named solver parameters (`--param NAME VALUE`)

use serde::Serialize;

use crate::utils::{Result, SolverError};

/// Growth factor of the sample size schedule
const SAMPLE_GROWTH: f64 = 1.1;
/// Growth factor of the enhancement round limit
const LIMIT_GROWTH: f64 = 1.2;

/// Tunable solver parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverParams {
    /// Shrink rate of the confidence margin, in (0, 1)
    pub betaeps: f64,
    /// Initial sample size
    pub mconst: u64,
    /// Initial enhancement round limit
    pub bconst: u64,
    /// Neighborhood radius
    pub radius: u32,
    /// Hard cap on local search moves
    pub max_steps: u64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            betaeps: 0.5,
            mconst: 2,
            bconst: 8,
            radius: 1,
            max_steps: 100_000,
        }
    }
}

impl SolverParams {
    /// Parse flattened `NAME VALUE` pairs on top of the defaults
    pub fn from_pairs(pairs: &[String]) -> Result<Self> {
        if pairs.len() % 2 != 0 {
            return Err(SolverError::Config(
                "--param expects NAME VALUE pairs".to_string(),
            ));
        }
        let mut params = Self::default();
        for pair in pairs.chunks(2) {
            params.set(&pair[0], &pair[1])?;
        }
        params.validate()?;
        Ok(params)
    }

    /// Set one parameter by name
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let bad = |what: &str| {
            SolverError::Config(format!("Invalid value '{}' for {}: expected {}", value, name, what))
        };
        match name.to_lowercase().as_str() {
            "betaeps" => self.betaeps = value.parse().map_err(|_| bad("a number"))?,
            "mconst" => self.mconst = value.parse().map_err(|_| bad("an integer"))?,
            "bconst" => self.bconst = value.parse().map_err(|_| bad("an integer"))?,
            "radius" => self.radius = value.parse().map_err(|_| bad("an integer"))?,
            "maxsteps" | "max_steps" => {
                self.max_steps = value.parse().map_err(|_| bad("an integer"))?
            }
            _ => {
                return Err(SolverError::Config(format!(
                    "Unknown solver parameter '{}' (known: betaeps, mconst, bconst, radius, maxsteps)",
                    name
                )))
            }
        }
        Ok(())
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.betaeps > 0.0 && self.betaeps < 1.0) {
            return Err(SolverError::Config("betaeps must be in (0, 1)".to_string()));
        }
        if self.mconst < 2 {
            return Err(SolverError::Config(
                "mconst must be at least 2 so standard errors are defined".to_string(),
            ));
        }
        if self.bconst == 0 {
            return Err(SolverError::Config("bconst must be at least 1".to_string()));
        }
        if self.radius == 0 {
            return Err(SolverError::Config("radius must be at least 1".to_string()));
        }
        if self.max_steps == 0 {
            return Err(SolverError::Config("maxsteps must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Target replications per point at iteration `nu`
    pub fn sample_size(&self, nu: u32) -> u64 {
        (self.mconst as f64 * SAMPLE_GROWTH.powi(nu as i32)).ceil() as u64
    }

    /// Enhancement round limit at iteration `nu`
    pub fn search_limit(&self, nu: u32) -> u64 {
        (self.bconst as f64 * LIMIT_GROWTH.powi(nu as i32)).ceil() as u64
    }
}
