use log::trace;

use super::ordering::{self, Order};
use super::pcb::PCB;
use crate::ProcessState::{Completed, Ready, Running};
use crate::SchedulingDecision::{Idle, Run};
use crate::{Pid, Process, ProcessRecord, Scheduler, SchedulingDecision, StopReason, Time};

/// A scheduler that picks the best ready process under a fixed order.
///
/// Shortest-Job-First and Priority scheduling are both instances, each in
/// a non-preemptive and a preemptive flavour. A preemptive instance puts the
/// interrupted process back in the ready set, so the order is evaluated
/// again at every dispatch.
pub struct Selection {
    title: &'static str,
    order: Order,
    preemptive: bool,
    ready: Vec<PCB>,
    current_process: Option<PCB>,
    finished: Vec<PCB>,
}

impl Selection {
    fn new(title: &'static str, order: Order, preemptive: bool) -> Self {
        Selection {
            title,
            order,
            preemptive,
            ready: Vec::new(),
            current_process: None,
            finished: Vec::new(),
        }
    }

    /// Shortest-Job-First, or Shortest-Remaining-Time-First when `preemptive`.
    pub fn shortest_job_first(preemptive: bool) -> Self {
        Selection::new("Shortest Job First", ordering::shortest_remaining, preemptive)
    }

    /// Highest priority value first.
    pub fn priority(preemptive: bool) -> Self {
        Selection::new("Priority", ordering::highest_priority, preemptive)
    }
}

impl Scheduler for Selection {
    fn name(&self) -> String {
        if self.preemptive {
            format!("{} (Preemptive)", self.title)
        } else {
            format!("{} (Non-Preemptive)", self.title)
        }
    }

    fn preemptive(&self) -> bool {
        self.preemptive
    }

    fn admit(&mut self, process: &ProcessRecord) {
        trace!("{}: admit {}", self.title, process.pid);
        self.ready.push(PCB::new(process));
    }

    fn next(&mut self) -> SchedulingDecision {
        if let Some(ref process) = self.current_process {
            return Run {
                pid: process.pid,
                timeslice: None,
            };
        }

        let Some(index) = ordering::select(&self.ready, self.order) else {
            return Idle;
        };
        let mut process = self.ready.swap_remove(index);
        process.state = Running;
        let pid = process.pid;
        self.current_process = Some(process);
        Run {
            pid,
            timeslice: None,
        }
    }

    fn stop(&mut self, pid: Pid, ran: Time, reason: StopReason) {
        let Some(mut process) = self.current_process.take() else {
            return;
        };
        if process.pid != pid {
            self.current_process = Some(process);
            return;
        }

        process.charge(ran);
        if reason == StopReason::Completed {
            process.state = Completed;
            self.finished.push(process);
        } else {
            // preempted, no timeslice is ever handed out
            process.state = Ready;
            self.ready.push(process);
        }
    }

    fn list(&self) -> Vec<&dyn Process> {
        let mut vec: Vec<&dyn Process> = Vec::new();
        if let Some(ref process) = self.current_process {
            vec.push(process);
        }
        for process in &self.ready {
            vec.push(process)
        }
        for process in &self.finished {
            vec.push(process);
        }
        vec
    }
}
