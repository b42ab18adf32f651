//! A processor simulation library
//!
//! This is used for running the schedulers from the [`scheduler`] crate over
//! a workload. The [`Processor`] owns the clock and a private copy of every
//! process: it admits arrivals, dispatches what the scheduler decides,
//! accounts CPU time and derives the metrics of the [`Report`].

use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Display};
use std::str::FromStr;

use log::{debug, info, trace};

use scheduler::{
    Pid, PolicyKind, ProcessRecord, ProcessState, RunParams, Scheduler, SchedulerError,
    SchedulingDecision, StopReason, Time, EPSILON,
};

mod report;

pub use report::{format_timeline, Entry, Report, Slice};

/// How far a preemptive scheduler's process may run in one dispatch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Stepping {
    /// One time unit per dispatch, arrivals are looked at after every tick.
    #[default]
    Unit,

    /// Until the first tick at or after the next arrival, or the completion
    /// of the process.
    Event,
}

impl FromStr for Stepping {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" => Ok(Stepping::Unit),
            "event" => Ok(Stepping::Event),
            other => Err(SchedulerError::InvalidParameter(format!(
                "unknown stepping {other:?}, expected unit or event"
            ))),
        }
    }
}

/// Running iteration log
#[derive(Debug)]
pub struct Log {
    /// The clock when the decision was taken.
    pub time: Time,

    /// The action requested by the scheduler.
    pub decision: SchedulingDecision,

    /// The time the process ran and the reason it stopped.
    pub stop_reason: Option<(Time, StopReason)>,

    /// The list of processes and their corresponding states.
    pub processes: HashMap<Pid, ProcessInfo>,
}

impl Log {
    fn new(time: Time, decision: SchedulingDecision, processes: HashMap<Pid, ProcessInfo>) -> Log {
        Log {
            time,
            decision,
            stop_reason: None,
            processes,
        }
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{:.2}] {}", self.time, self.decision)?;
        writeln!(f, "PID\tSTATE\t\tPRI\tREMAIN\tEXTRA")?;
        let mut pids = self.processes.keys().collect::<Vec<&Pid>>();
        pids.sort();
        for pid in pids.into_iter() {
            if let Some(process) = self.processes.get(pid) {
                writeln!(f, "{}", process)?;
            }
        }
        if let Some((ran, reason)) = self.stop_reason {
            writeln!(f, "{} after {:.2}", reason, ran)?;
        }
        writeln!(f)
    }
}

/// Information about a process state.
#[derive(Debug, PartialEq)]
pub struct ProcessInfo {
    /// The PID of the process.
    pub pid: Pid,

    /// The process state.
    pub state: ProcessState,

    /// The CPU time the process still needs.
    pub remaining: Time,

    /// The process priority
    pub priority: i32,

    /// Extra details about the process
    pub extra: String,
}

impl Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad to keep the columns of the longer state names aligned
        write!(
            f,
            "{}\t{:<10}\t{}\t{:.2}\t{}",
            self.pid, self.state, self.priority, self.remaining, self.extra
        )
    }
}

/// The result of [`Processor::run`].
#[derive(Debug)]
pub struct Run {
    pub report: Report,

    /// Empty unless the processor was built with [`Processor::with_logs`].
    pub logs: Vec<Log>,
}

/// What the processor knows about one process during a run.
struct Track {
    process: ProcessRecord,
    remaining: Time,
    admitted: bool,
    first_run: Option<Time>,
    completion: Option<Time>,
}

/// The processor simulator.
pub struct Processor<S: Scheduler> {
    scheduler: S,
    stepping: Stepping,
    record_logs: bool,
}

impl<S: Scheduler> Processor<S> {
    /// A processor with unit stepping and without logs.
    pub fn new(scheduler: S) -> Self {
        Processor {
            scheduler,
            stepping: Stepping::Unit,
            record_logs: false,
        }
    }

    pub fn stepping(mut self, stepping: Stepping) -> Self {
        self.stepping = stepping;
        self
    }

    /// Record a [`Log`] for every scheduling decision.
    pub fn with_logs(mut self) -> Self {
        self.record_logs = true;
        self
    }

    /// Runs the scheduler over a copy of `workload`.
    ///
    /// An empty workload yields an empty report with zero averages.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::Processor;
    /// use scheduler::Workload;
    ///
    /// let workload = Workload::from_triples([(5.0, 0.0, 1), (3.0, 1.0, 2), (8.0, 2.0, 1)]).unwrap();
    /// let run = Processor::new(scheduler::fcfs()).run(&workload).unwrap();
    ///
    /// assert_eq!(run.report.total_waiting_time(), 10.0);
    /// ```
    pub fn run(self, workload: &[ProcessRecord]) -> Result<Run, SchedulerError> {
        scheduler::validate(workload)?;

        let mut pending: Vec<ProcessRecord> = workload.to_vec();
        pending.sort_by(|a, b| {
            a.arrival_time
                .total_cmp(&b.arrival_time)
                .then_with(|| a.pid.cmp(&b.pid))
        });

        let tracks = pending
            .iter()
            .map(|process| {
                (
                    process.pid,
                    Track {
                        process: process.clone(),
                        remaining: process.burst_time,
                        admitted: false,
                        first_run: None,
                        completion: None,
                    },
                )
            })
            .collect();

        let mut simulation = Simulation {
            scheduler: self.scheduler,
            stepping: self.stepping,
            record_logs: self.record_logs,
            clock: 0.0,
            pending: pending.into(),
            tracks,
            completed: Vec::with_capacity(workload.len()),
            timeline: Vec::new(),
            logs: Vec::new(),
        };
        simulation.run()?;
        Ok(simulation.finish())
    }
}

struct Simulation<S: Scheduler> {
    scheduler: S,
    stepping: Stepping,
    record_logs: bool,
    clock: Time,
    pending: VecDeque<ProcessRecord>,
    tracks: HashMap<Pid, Track>,
    completed: Vec<Pid>,
    timeline: Vec<Slice>,
    logs: Vec<Log>,
}

impl<S: Scheduler> Simulation<S> {
    fn run(&mut self) -> Result<(), SchedulerError> {
        let total = self.tracks.len();
        self.admit_arrivals();

        while self.completed.len() < total {
            let decision = self.scheduler.next();
            if self.record_logs {
                let processes = self.snapshot();
                self.logs.push(Log::new(self.clock, decision, processes));
            }

            match decision {
                SchedulingDecision::Idle => {
                    let Some(next) = self.pending.front() else {
                        return Err(SchedulerError::Stalled {
                            time: self.clock,
                            remaining: total - self.completed.len(),
                        });
                    };
                    let resume = if self.scheduler.preemptive() {
                        self.clock + ticks_until(self.clock, next.arrival_time)
                    } else {
                        self.clock.max(next.arrival_time)
                    };
                    debug!("idle from {:.2} to {:.2}", self.clock, resume);
                    self.clock = resume;
                    self.admit_arrivals();
                }
                SchedulingDecision::Run { pid, timeslice } => {
                    self.dispatch(pid, timeslice)?;
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, pid: Pid, timeslice: Option<Time>) -> Result<(), SchedulerError> {
        let preemptive = self.scheduler.preemptive();
        let next_arrival = self.pending.front().map(|process| process.arrival_time);
        let start = self.clock;

        let track = self
            .tracks
            .get_mut(&pid)
            .filter(|track| track.admitted && track.completion.is_none())
            .ok_or(SchedulerError::UnknownProcess(pid))?;

        let mut slice = track.remaining;
        if let Some(timeslice) = timeslice {
            slice = slice.min(timeslice);
        }
        if preemptive {
            slice = match (self.stepping, next_arrival) {
                (Stepping::Unit, _) => slice.min(1.0),
                (Stepping::Event, Some(arrival)) => slice.min(ticks_until(start, arrival)),
                (Stepping::Event, None) => slice,
            };
        }
        if slice <= 0.0 {
            return Err(SchedulerError::InvalidParameter(format!(
                "process {pid} was dispatched for {slice} ms"
            )));
        }

        track.first_run.get_or_insert(start);
        track.remaining -= slice;
        let end = start + slice;

        let reason = if track.remaining < EPSILON {
            track.remaining = 0.0;
            track.completion = Some(end);
            StopReason::Completed
        } else if timeslice.is_some_and(|timeslice| slice >= timeslice - EPSILON) {
            StopReason::Expired
        } else {
            StopReason::Preempted
        };

        self.clock = end;
        report::push_slice(&mut self.timeline, pid, start, end);
        if reason == StopReason::Completed {
            debug!("{} completed at {:.2}", pid, end);
            self.completed.push(pid);
        } else {
            trace!("{} stopped at {:.2}: {}", pid, end, reason);
        }

        // arrivals during the slice queue up before the stopped process
        self.admit_arrivals();
        self.scheduler.stop(pid, slice, reason);

        if let Some(log) = self.logs.last_mut() {
            log.stop_reason = Some((slice, reason));
        }
        Ok(())
    }

    fn admit_arrivals(&mut self) {
        while let Some(process) = self.pending.front() {
            if process.arrival_time > self.clock + EPSILON {
                break;
            }
            let Some(process) = self.pending.pop_front() else {
                break;
            };
            trace!("{} arrives at {:.2}", process.pid, process.arrival_time);
            if let Some(track) = self.tracks.get_mut(&process.pid) {
                track.admitted = true;
            }
            self.scheduler.admit(&process);
        }
    }

    fn snapshot(&self) -> HashMap<Pid, ProcessInfo> {
        let mut processes = HashMap::new();
        for process in self.scheduler.list() {
            processes.insert(
                process.pid(),
                ProcessInfo {
                    pid: process.pid(),
                    state: process.state(),
                    remaining: process.remaining(),
                    priority: process.priority(),
                    extra: process.extra(),
                },
            );
        }
        for process in &self.pending {
            processes.insert(
                process.pid,
                ProcessInfo {
                    pid: process.pid,
                    state: ProcessState::Unarrived,
                    remaining: process.burst_time,
                    priority: process.priority,
                    extra: format!("arrival={:.2}", process.arrival_time),
                },
            );
        }
        processes
    }

    fn finish(self) -> Run {
        let mut entries = Vec::with_capacity(self.completed.len());
        for pid in &self.completed {
            if let Some(Track {
                process,
                first_run: Some(first_run),
                completion: Some(completion),
                ..
            }) = self.tracks.get(pid)
            {
                entries.push(Entry::new(process, *first_run, *completion));
            }
        }

        let report = Report::new(self.scheduler.name(), entries, self.timeline);
        info!(
            "{}: {} processes, average waiting time {:.2}",
            report.policy,
            report.entries.len(),
            report.average_waiting_time
        );
        Run {
            report,
            logs: self.logs,
        }
    }
}

/// Runs one policy over a copy of `workload`, with unit stepping.
///
/// ```rust
/// use scheduler::{PolicyKind, RunParams, Workload};
///
/// let workload = Workload::from_triples([(5.0, 0.0, 1), (3.0, 1.0, 2)]).unwrap();
/// let report = processor::simulate(&workload, PolicyKind::RoundRobin, RunParams::with_quantum(2.0)).unwrap();
///
/// assert_eq!(report.entries.len(), 2);
/// ```
pub fn simulate(
    workload: &[ProcessRecord],
    policy: PolicyKind,
    params: RunParams,
) -> Result<Report, SchedulerError> {
    simulate_with(workload, policy, params, Stepping::default())
}

/// Same as [`simulate`] with an explicit [`Stepping`].
pub fn simulate_with(
    workload: &[ProcessRecord],
    policy: PolicyKind,
    params: RunParams,
    stepping: Stepping,
) -> Result<Report, SchedulerError> {
    let scheduler = policy.scheduler(params)?;
    Processor::new(scheduler)
        .stepping(stepping)
        .run(workload)
        .map(|run| run.report)
}

/// Whole time units from `from` to the first tick at or after `arrival`.
///
/// Preemptive schedulers only look at arrivals on tick boundaries, so a
/// process arriving between two ticks waits for the next one.
fn ticks_until(from: Time, arrival: Time) -> Time {
    (arrival - from - EPSILON).ceil().max(1.0)
}

/// Format the [`Processor`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by the [`Processor`].
pub fn format_logs(logs: &[Log]) -> String {
    let mut s = String::new();
    for (iteration, log) in logs.iter().enumerate() {
        // writing into a String cannot fail
        let _ = fmt::write(
            &mut s,
            format_args!("===== Iteration: {} =====\n{}\n", iteration + 1, log),
        );
    }
    s
}

#[cfg(test)]
mod tests;
