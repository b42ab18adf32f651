//! Runs policies over the loaded workload and writes their reports.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use processor::{format_logs, Processor, Report, Stepping};
use scheduler::{PolicyKind, RunParams, Time, Workload};

use crate::error::CliError;

/// Every policy and flavour of a batch run.
pub fn batch_runs(quantum: Time) -> Vec<(PolicyKind, RunParams)> {
    vec![
        (PolicyKind::Fcfs, RunParams::non_preemptive()),
        (PolicyKind::ShortestJobFirst, RunParams::non_preemptive()),
        (PolicyKind::ShortestJobFirst, RunParams::preemptive()),
        (PolicyKind::Priority, RunParams::non_preemptive()),
        (PolicyKind::Priority, RunParams::preemptive()),
        (PolicyKind::RoundRobin, RunParams::with_quantum(quantum)),
    ]
}

pub struct Session<W: Write> {
    workload: Workload,
    stepping: Stepping,
    trace: bool,
    console: W,
    output_path: PathBuf,
    output: File,
    reports: Vec<Report>,
}

impl<W: Write> Session<W> {
    /// Truncates (or creates) the output file.
    pub fn new(
        workload: Workload,
        output_path: &Path,
        console: W,
        stepping: Stepping,
        trace: bool,
    ) -> Result<Self, CliError> {
        let output = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(output_path)
            .map_err(|source| CliError::Output {
                path: output_path.to_path_buf(),
                source,
            })?;

        Ok(Session {
            workload,
            stepping,
            trace,
            console,
            output_path: output_path.to_path_buf(),
            output,
            reports: Vec::new(),
        })
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Runs one policy and writes its report to the console and the output file.
    pub fn run(&mut self, policy: PolicyKind, params: RunParams) -> Result<&Report, CliError> {
        let scheduler = policy.scheduler(params)?;
        let mut processor = Processor::new(scheduler).stepping(self.stepping);
        if self.trace {
            processor = processor.with_logs();
        }
        let run = processor.run(&self.workload)?;
        info!("{} finished", run.report.policy);

        if self.trace {
            let logs = format_logs(&run.logs);
            self.console.write_all(logs.as_bytes())?;
        }
        let text = format!("{}\n", run.report);
        self.emit(&text)?;

        self.reports.push(run.report);
        Ok(&self.reports[self.reports.len() - 1])
    }

    /// Runs every policy, one after the other, on the same workload.
    pub fn batch(&mut self, quantum: Time) -> Result<(), CliError> {
        for (policy, params) in batch_runs(quantum) {
            self.run(policy, params)?;
        }
        Ok(())
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn console(&mut self) -> &mut W {
        &mut self.console
    }

    /// Writes all the reports of the session as a JSON array.
    pub fn write_json(&self, path: &Path) -> Result<(), CliError> {
        let file = File::create(path).map_err(|source| CliError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(file, &self.reports)?;
        Ok(())
    }

    fn emit(&mut self, text: &str) -> Result<(), CliError> {
        self.console.write_all(text.as_bytes())?;
        self.output
            .write_all(text.as_bytes())
            .map_err(|source| CliError::Output {
                path: self.output_path.clone(),
                source,
            })
    }
}
