//! Multi-instance experiments against testers

pub mod runner;

pub use runner::{ExperimentRunner, InstanceResult, MetricPoint};
