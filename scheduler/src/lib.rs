//! A CPU scheduling library.
//!
//! This library provides the process data model, the [`Scheduler`] trait
//! and one scheduler per classical policy: First-Come-First-Served,
//! Shortest-Job-First, Priority (both with a preemptive flavour) and
//! Round-Robin. The `processor` crate drives them over a workload.
//!
//! Priorities follow the convention that a higher value is a higher priority.

mod error;
mod policy;
mod scheduler;
mod workload;

pub mod schedulers;

use schedulers::{Fcfs, RoundRobin, Selection};

pub use crate::error::SchedulerError;
pub use crate::policy::{PolicyKind, RunParams};
pub use crate::scheduler::{
    Pid, Process, ProcessState, Scheduler, SchedulingDecision, StopReason, Time, EPSILON,
};
pub use crate::workload::{validate, ProcessRecord, Workload};

/// Returns a structure that implements the `Scheduler` trait with a first come, first served policy
pub fn fcfs() -> impl Scheduler {
    Fcfs::new()
}

/// Returns a structure that implements the `Scheduler` trait with a shortest job first policy
///
/// * `preemptive` - when set, the process with the shortest remaining time is
///                  reconsidered at every arrival (shortest remaining time first).
pub fn shortest_job_first(preemptive: bool) -> impl Scheduler {
    Selection::shortest_job_first(preemptive)
}

/// Returns a structure that implements the `Scheduler` trait with a priority policy
///
/// * `preemptive` - when set, an arriving process with a higher priority takes
///                  the CPU from the running one.
pub fn priority(preemptive: bool) -> impl Scheduler {
    Selection::priority(preemptive)
}

/// Returns a structure that implements the `Scheduler` trait with a round robin policy
///
/// * `quantum` - the time a process can run before it is sent to the back of
///               the ready queue. Must be positive.
pub fn round_robin(quantum: Time) -> Result<impl Scheduler, SchedulerError> {
    RoundRobin::new(quantum)
}
