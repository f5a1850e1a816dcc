//! Result reporter - output files and console summaries
//!
//! Files written into the output directory:
//! - `<name>_result.json`: the solve result
//! - `<name>_iterations.csv`: one row per RA iteration
//! - `<name>_instance_<i>.json`: one per experiment instance
//! - `<name>_metrics.csv`: experiment metric curves, when computed

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::experiment::InstanceResult;
use crate::solver::SolveResult;
use crate::utils::Result;

pub struct ResultReporter {
    odir: PathBuf,
}

impl ResultReporter {
    pub fn new(odir: impl Into<PathBuf>) -> Self {
        Self { odir: odir.into() }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.odir)?;
        Ok(())
    }

    fn write_json<T: serde::Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.odir.join(file_name);
        let mut file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut file, value)?;
        writeln!(file)?;
        file.flush()?;
        Ok(path)
    }

    /// Write the result and iteration files of a single run
    pub fn write_solve(&self, name: &str, result: &SolveResult) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let json = self.write_json(&format!("{}_result.json", name), result)?;

        let csv = self.odir.join(format!("{}_iterations.csv", name));
        let mut file = BufWriter::new(File::create(&csv)?);
        writeln!(file, "nu,m,calls,ales_size")?;
        for r in &result.history {
            writeln!(file, "{},{},{},{}", r.nu, r.m, r.calls, r.ales.len())?;
        }
        file.flush()?;

        info!("Results written to {}", self.odir.display());
        Ok(vec![json, csv])
    }

    /// Write one file per instance, plus the metric curves when present
    pub fn write_experiment(&self, name: &str, results: &[InstanceResult]) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let mut written = Vec::with_capacity(results.len() + 1);
        for r in results {
            written.push(self.write_json(&format!("{}_instance_{}.json", name, r.instance), r)?);
        }

        if results.iter().any(|r| !r.metrics.is_empty()) {
            let csv = self.odir.join(format!("{}_metrics.csv", name));
            let mut file = BufWriter::new(File::create(&csv)?);
            writeln!(file, "instance,calls,metric")?;
            for r in results {
                for m in &r.metrics {
                    writeln!(file, "{},{},{}", r.instance, m.calls, m.metric)?;
                }
            }
            file.flush()?;
            written.push(csv);
        }

        info!("{} instance results written to {}", results.len(), self.odir.display());
        Ok(written)
    }

    /// Human-readable summary of a run
    pub fn format_summary(result: &SolveResult) -> String {
        let mut s = String::new();
        s.push_str(&format!("\n=== {} on {} ===\n", result.solver, result.problem));
        s.push_str(&format!("Start: {}\n", result.x0));
        s.push_str(&format!(
            "Simulation calls: {} (budget {})\n",
            result.calls, result.budget
        ));
        s.push_str(&format!("Iterations: {}\n", result.iterations));
        s.push_str(&format!("Candidate set ({} points):\n", result.candidates.len()));
        for c in &result.candidates {
            let mean: Vec<String> = c.mean.iter().map(|v| format!("{:.4}", v)).collect();
            let se: Vec<String> = c.se.iter().map(|v| format!("{:.4}", v)).collect();
            s.push_str(&format!(
                "  {}  mean=[{}]  se=[{}]  n={}\n",
                c.point,
                mean.join(", "),
                se.join(", "),
                c.replications
            ));
        }
        s
    }

    pub fn print_summary(result: &SolveResult) {
        print!("{}", Self::format_summary(result));
    }

    /// One line per instance
    pub fn print_experiment_summary(results: &[InstanceResult]) {
        println!("\n=== {} instances ===", results.len());
        for r in results {
            let last_metric = r
                .metrics
                .last()
                .map(|m| format!("  metric={:.4}", m.metric))
                .unwrap_or_default();
            println!(
                "  #{:<3} x0={}  calls={}  |ALES|={}{}",
                r.instance,
                r.result.x0,
                r.result.calls,
                r.result.candidates.len(),
                last_metric
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::MetricPoint;
    use crate::solver::{CandidateReport, IterationRecord, Point};

    fn sample_result() -> SolveResult {
        SolveResult {
            solver: "RPERLE".to_string(),
            problem: "TPA".to_string(),
            x0: Point::from([4, 14]),
            budget: 50,
            calls: 64,
            iterations: 2,
            candidates: vec![CandidateReport {
                point: Point::from([5, 13]),
                mean: vec![9.5, 14.25],
                se: vec![0.5, 0.25],
                replications: 3,
            }],
            history: vec![
                IterationRecord {
                    nu: 0,
                    m: 2,
                    calls: 30,
                    ales: vec![Point::from([4, 14]), Point::from([5, 13])],
                },
                IterationRecord {
                    nu: 1,
                    m: 3,
                    calls: 64,
                    ales: vec![Point::from([5, 13])],
                },
            ],
        }
    }

    #[test]
    fn test_write_solve() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = ResultReporter::new(dir.path().join("run1"));
        let result = sample_result();
        let files = reporter.write_solve("TPA_RPERLE", &result).unwrap();
        assert_eq!(files.len(), 2);

        let json = fs::read_to_string(&files[0]).unwrap();
        let parsed: SolveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidates, result.candidates);
        assert_eq!(parsed.history, result.history);

        let csv = fs::read_to_string(&files[1]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["nu,m,calls,ales_size", "0,2,30,2", "1,3,64,1"]);
    }

    #[test]
    fn test_write_experiment() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = ResultReporter::new(dir.path());
        let results = vec![
            InstanceResult {
                instance: 0,
                result: sample_result(),
                metrics: vec![MetricPoint { calls: 30, metric: 2.0 }],
            },
            InstanceResult {
                instance: 1,
                result: sample_result(),
                metrics: vec![MetricPoint { calls: 64, metric: 0.5 }],
            },
        ];
        let files = reporter.write_experiment("exp", &results).unwrap();
        assert_eq!(files.len(), 3);
        assert!(dir.path().join("exp_instance_1.json").exists());
        let csv = fs::read_to_string(dir.path().join("exp_metrics.csv")).unwrap();
        assert_eq!(csv, "instance,calls,metric\n0,30,2\n1,64,0.5\n");
    }

    #[test]
    fn test_format_summary() {
        let s = ResultReporter::format_summary(&sample_result());
        assert!(s.contains("RPERLE on TPA"));
        assert!(s.contains("(5, 13)"));
        assert!(s.contains("mean=[9.5000, 14.2500]"));
    }
}
