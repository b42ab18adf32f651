use std::fmt::{self, Display};
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::ProcessRecord;

/// Simulated time, in abstract milliseconds.
pub type Time = f64;

/// Amounts of remaining work below this value count as zero.
pub const EPSILON: Time = 1e-9;

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1 and follow the order
/// in which the workload was loaded.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    /// Returns `None` for 0.
    pub fn new(pid: usize) -> Option<Pid> {
        NonZeroUsize::new(pid).map(Pid)
    }

    /// The PID of the record found at `index` (0-based) in a workload.
    pub fn from_index(index: usize) -> Pid {
        Pid(NonZeroUsize::MIN.saturating_add(index))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0.get() == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The action that the scheduler asks the processor to take.
///
/// This is returned by the [`Scheduler::next`] function.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SchedulingDecision {
    /// Run the process with PID `pid`.
    ///
    /// With a `timeslice` the process runs for at most that many time units,
    /// otherwise until it completes or, for preemptive schedulers, until the
    /// processor interrupts it.
    Run { pid: Pid, timeslice: Option<Time> },

    /// No process is ready. The processor jumps to the next arrival.
    Idle,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingDecision::Run {
                pid,
                timeslice: Some(timeslice),
            } => {
                write!(f, "Run {} for {:.2} ms", pid, timeslice)
            }
            SchedulingDecision::Run {
                pid,
                timeslice: None,
            } => {
                write!(f, "Run {}", pid)
            }
            SchedulingDecision::Idle => {
                write!(f, "Idle, no process is ready")
            }
        }
    }
}

/// The reason that a process has left the CPU and the processor
/// has called the scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The process has no remaining work.
    Completed,

    /// The timeslice allocated for the process has expired.
    Expired,

    /// The processor interrupted the process so that the scheduler
    /// can reconsider its choice (new arrival or end of a tick).
    Preempted,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Completed => write!(f, "Completed"),
            StopReason::Expired => write!(f, "Expired"),
            StopReason::Preempted => write!(f, "Preempted"),
        }
    }
}

/// The trait that any scheduler has to implement.
pub trait Scheduler: Send {
    /// A human readable name of the policy, used in reports.
    fn name(&self) -> String;

    /// Whether the processor may interrupt a running process before
    /// it completes or its timeslice expires.
    fn preemptive(&self) -> bool;

    /// The scheduler is informed that a process has arrived.
    ///
    /// The processor admits processes in `(arrival_time, pid)` order and
    /// always admits new arrivals before reporting the stop of the process
    /// that was running while they arrived.
    fn admit(&mut self, process: &ProcessRecord);

    /// Returns the action that the processor has to perform next.
    fn next(&mut self) -> SchedulingDecision;

    /// The scheduler is informed that the process `pid` ran for `ran`
    /// time units and the reason it stopped.
    fn stop(&mut self, pid: Pid, ran: Time, reason: StopReason);

    /// Returns the list of processes the scheduler keeps track of.
    fn list(&self) -> Vec<&dyn Process>;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn preemptive(&self) -> bool {
        (**self).preemptive()
    }

    fn admit(&mut self, process: &ProcessRecord) {
        (**self).admit(process)
    }

    fn next(&mut self) -> SchedulingDecision {
        (**self).next()
    }

    fn stop(&mut self, pid: Pid, ran: Time, reason: StopReason) {
        (**self).stop(pid, ran, reason)
    }

    fn list(&self) -> Vec<&dyn Process> {
        (**self).list()
    }
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// The process has not arrived yet.
    Unarrived,

    /// The process is ready to be scheduled.
    Ready,

    /// The process is currently scheduled.
    Running,

    /// The process has no remaining work.
    Completed,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Unarrived => write!(f, "UNARRIVED"),
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// The trait that the Process Control Block (PCB) has to implement.
///
/// The PCB can be implemented with any data structure as long as
/// it implements this trait.
pub trait Process {
    /// Return the PID of the process.
    fn pid(&self) -> Pid;

    /// Return the state of the process.
    fn state(&self) -> ProcessState;

    /// Returns the CPU time the process still needs.
    fn remaining(&self) -> Time;

    /// Returns the process priority
    fn priority(&self) -> i32;

    /// Returns details information
    fn extra(&self) -> String;
}
