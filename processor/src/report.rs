//! Per-process metrics and their aggregation.

use std::fmt::{self, Display};

use serde::Serialize;

use scheduler::{Pid, ProcessRecord, Time, EPSILON};

/// The metrics of one process after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub pid: Pid,
    pub arrival_time: Time,
    pub burst_time: Time,
    pub priority: i32,
    pub waiting_time: Time,
    pub turnaround_time: Time,
    pub response_time: Time,
    pub completion_time: Time,
}

impl Entry {
    pub(crate) fn new(process: &ProcessRecord, first_run: Time, completion_time: Time) -> Self {
        let turnaround_time = completion_time - process.arrival_time;
        Entry {
            pid: process.pid,
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            priority: process.priority,
            waiting_time: (turnaround_time - process.burst_time).max(0.0),
            turnaround_time,
            response_time: (first_run - process.arrival_time).max(0.0),
            completion_time,
        }
    }
}

/// A contiguous stretch of CPU time given to one process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub start: Time,
    pub end: Time,
}

impl Slice {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

/// Appends a slice to a timeline, merging it with the last one when the
/// same process simply kept the CPU.
pub(crate) fn push_slice(timeline: &mut Vec<Slice>, pid: Pid, start: Time, end: Time) {
    if let Some(last) = timeline.last_mut() {
        if last.pid == pid && (start - last.end).abs() < EPSILON {
            last.end = end;
            return;
        }
    }
    timeline.push(Slice { pid, start, end });
}

/// The outcome of one run of one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The name of the scheduling policy.
    pub policy: String,

    /// One entry per process, in completion order.
    pub entries: Vec<Entry>,

    /// The Gantt chart of the run.
    pub timeline: Vec<Slice>,

    pub average_waiting_time: Time,
    pub average_turnaround_time: Time,
    pub average_response_time: Time,
}

impl Report {
    pub(crate) fn new(policy: String, entries: Vec<Entry>, timeline: Vec<Slice>) -> Self {
        let average = |metric: fn(&Entry) -> Time| {
            if entries.is_empty() {
                0.0
            } else {
                entries.iter().map(metric).sum::<Time>() / entries.len() as Time
            }
        };

        Report {
            average_waiting_time: average(|entry| entry.waiting_time),
            average_turnaround_time: average(|entry| entry.turnaround_time),
            average_response_time: average(|entry| entry.response_time),
            policy,
            entries,
            timeline,
        }
    }

    /// A report with no entries is the result of an empty workload.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, pid: Pid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.pid == pid)
    }

    pub fn total_waiting_time(&self) -> Time {
        self.entries.iter().map(|entry| entry.waiting_time).sum()
    }

    /// Waiting times ordered by PID.
    pub fn waiting_times(&self) -> Vec<(Pid, Time)> {
        let mut waiting: Vec<(Pid, Time)> = self
            .entries
            .iter()
            .map(|entry| (entry.pid, entry.waiting_time))
            .collect();
        waiting.sort_by_key(|(pid, _)| *pid);
        waiting
    }

    /// The PIDs in the order they completed.
    pub fn completion_order(&self) -> Vec<Pid> {
        self.entries.iter().map(|entry| entry.pid).collect()
    }

    /// Time the CPU spent idle between the first and the last slice.
    pub fn idle_time(&self) -> Time {
        self.timeline
            .windows(2)
            .map(|pair| (pair[1].start - pair[0].end).max(0.0))
            .sum()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Scheduling Method: {} =====", self.policy)?;
        writeln!(f, " Process waiting times [ms]:")?;
        for entry in &self.entries {
            writeln!(
                f,
                " P{}: {:.2} | turnaround {:.2} | response {:.2} | completion {:.2}",
                entry.pid,
                entry.waiting_time,
                entry.turnaround_time,
                entry.response_time,
                entry.completion_time
            )?;
        }
        if !self.timeline.is_empty() {
            writeln!(f, " Timeline: {}", format_timeline(&self.timeline))?;
        }
        writeln!(f, " > Average waiting time: {:.2}ms", self.average_waiting_time)?;
        writeln!(
            f,
            " > Average turnaround time: {:.2}ms",
            self.average_turnaround_time
        )?;
        writeln!(
            f,
            " > Average response time: {:.2}ms",
            self.average_response_time
        )
    }
}

/// Renders a timeline as `[0.00] P1 [5.00] idle [7.00] P2 [9.00]`.
pub fn format_timeline(timeline: &[Slice]) -> String {
    let mut s = String::new();
    let mut end: Option<Time> = None;
    for slice in timeline {
        match end {
            Some(end) if slice.start - end > EPSILON => {
                s.push_str(&format!("[{:.2}] idle ", end));
            }
            _ => {}
        }
        s.push_str(&format!("[{:.2}] P{} ", slice.start, slice.pid));
        end = Some(slice.end);
    }
    if let Some(end) = end {
        s.push_str(&format!("[{:.2}]", end));
    }
    s
}
