use thiserror::Error;

use crate::{Pid, Time};

/// Errors reported by the schedulers and the processor driving them.
///
/// A run either succeeds with a complete report or fails with one of these;
/// nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("process {pid} is invalid: {reason}")]
    InvalidProcess { pid: Pid, reason: String },

    #[error("process {0} appears more than once in the workload")]
    DuplicatePid(Pid),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("the workload has no processes")]
    EmptyWorkload,

    #[error("the scheduler dispatched process {0}, which is not ready")]
    UnknownProcess(Pid),

    #[error("the scheduler is idle at {time} ms with {remaining} unfinished processes and no arrivals left")]
    Stalled { time: Time, remaining: usize },
}
