//! Picking a scheduler from a policy identifier and its parameters.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schedulers::{Fcfs, RoundRobin, Selection};
use crate::{Scheduler, SchedulerError, Time};

/// The scheduling algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    Fcfs,
    ShortestJobFirst,
    Priority,
    RoundRobin,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fcfs,
        PolicyKind::ShortestJobFirst,
        PolicyKind::Priority,
        PolicyKind::RoundRobin,
    ];

    /// Whether the policy has a preemptive flavour.
    pub fn supports_preemption(&self) -> bool {
        matches!(self, PolicyKind::ShortestJobFirst | PolicyKind::Priority)
    }

    /// Returns a fresh scheduler for one run.
    ///
    /// The preemption flag is ignored by FCFS and Round-Robin. Round-Robin
    /// fails with [`SchedulerError::InvalidParameter`] without a positive
    /// quantum.
    pub fn scheduler(&self, params: RunParams) -> Result<Box<dyn Scheduler>, SchedulerError> {
        Ok(match self {
            PolicyKind::Fcfs => Box::new(Fcfs::new()),
            PolicyKind::ShortestJobFirst => {
                Box::new(Selection::shortest_job_first(params.preemptive))
            }
            PolicyKind::Priority => Box::new(Selection::priority(params.preemptive)),
            PolicyKind::RoundRobin => {
                let quantum = params.quantum.ok_or_else(|| {
                    SchedulerError::InvalidParameter(String::from(
                        "round robin needs a time quantum",
                    ))
                })?;
                Box::new(RoundRobin::new(quantum)?)
            }
        })
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Fcfs => write!(f, "FCFS"),
            PolicyKind::ShortestJobFirst => write!(f, "SJF"),
            PolicyKind::Priority => write!(f, "PRIORITY"),
            PolicyKind::RoundRobin => write!(f, "RR"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(PolicyKind::Fcfs),
            "sjf" => Ok(PolicyKind::ShortestJobFirst),
            "priority" => Ok(PolicyKind::Priority),
            "rr" | "round-robin" => Ok(PolicyKind::RoundRobin),
            other => Err(SchedulerError::InvalidParameter(format!(
                "unknown scheduling method {other:?}"
            ))),
        }
    }
}

/// Parameters of one run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub preemptive: bool,
    pub quantum: Option<Time>,
}

impl RunParams {
    pub fn non_preemptive() -> Self {
        RunParams::default()
    }

    pub fn preemptive() -> Self {
        RunParams {
            preemptive: true,
            quantum: None,
        }
    }

    pub fn with_quantum(quantum: Time) -> Self {
        RunParams {
            preemptive: false,
            quantum: Some(quantum),
        }
    }
}
