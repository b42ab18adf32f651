//! The process data model.

use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{Pid, SchedulerError, Time};

/// One simulated job, as loaded from the workload.
///
/// Records are never modified by a run; every scheduler keeps its own
/// control block with the remaining time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub arrival_time: Time,
    pub burst_time: Time,
    /// Higher value means higher priority.
    pub priority: i32,
}

impl ProcessRecord {
    pub fn new(pid: Pid, burst_time: Time, arrival_time: Time, priority: i32) -> Self {
        ProcessRecord {
            pid,
            arrival_time,
            burst_time,
            priority,
        }
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        let invalid = |reason: &str| SchedulerError::InvalidProcess {
            pid: self.pid,
            reason: reason.to_string(),
        };

        if !self.burst_time.is_finite() || self.burst_time <= 0.0 {
            return Err(invalid("burst time must be a positive number"));
        }
        if !self.arrival_time.is_finite() || self.arrival_time < 0.0 {
            return Err(invalid("arrival time must be a non-negative number"));
        }
        Ok(())
    }
}

/// Checks every record and the uniqueness of the PIDs.
pub fn validate(processes: &[ProcessRecord]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::with_capacity(processes.len());
    for process in processes {
        process.validate()?;
        if !seen.insert(process.pid) {
            return Err(SchedulerError::DuplicatePid(process.pid));
        }
    }
    Ok(())
}

/// An immutable, validated sequence of processes in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workload {
    processes: Vec<ProcessRecord>,
}

impl Workload {
    pub fn new(processes: Vec<ProcessRecord>) -> Result<Self, SchedulerError> {
        validate(&processes)?;
        Ok(Workload { processes })
    }

    /// Builds a workload from `(burst_time, arrival_time, priority)` triples,
    /// assigning PIDs from 1 in the given order.
    pub fn from_triples<I>(triples: I) -> Result<Self, SchedulerError>
    where
        I: IntoIterator<Item = (Time, Time, i32)>,
    {
        let processes = triples
            .into_iter()
            .enumerate()
            .map(|(index, (burst, arrival, priority))| {
                ProcessRecord::new(Pid::from_index(index), burst, arrival, priority)
            })
            .collect();
        Workload::new(processes)
    }

    /// Fails with [`SchedulerError::EmptyWorkload`] for callers that need
    /// at least one process.
    pub fn ensure_non_empty(&self) -> Result<&Self, SchedulerError> {
        if self.processes.is_empty() {
            Err(SchedulerError::EmptyWorkload)
        } else {
            Ok(self)
        }
    }

    pub fn total_burst(&self) -> Time {
        self.processes.iter().map(|process| process.burst_time).sum()
    }
}

impl Deref for Workload {
    type Target = [ProcessRecord];

    fn deref(&self) -> &Self::Target {
        &self.processes
    }
}
