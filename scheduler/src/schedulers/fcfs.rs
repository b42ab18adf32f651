use std::collections::VecDeque;

use log::trace;

use super::pcb::PCB;
use crate::ProcessState::{Completed, Ready, Running};
use crate::SchedulingDecision::{Idle, Run};
use crate::{Pid, Process, ProcessRecord, Scheduler, SchedulingDecision, StopReason, Time};

/// First-Come-First-Served.
///
/// Processes run to completion in the order they were admitted, which the
/// processor guarantees to be `(arrival_time, pid)` order.
pub struct Fcfs {
    ready_queue: VecDeque<PCB>,
    current_process: Option<PCB>,
    finished: Vec<PCB>,
}

impl Fcfs {
    pub fn new() -> Self {
        Fcfs {
            ready_queue: VecDeque::new(),
            current_process: None,
            finished: Vec::new(),
        }
    }
}

impl Default for Fcfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for Fcfs {
    fn name(&self) -> String {
        String::from("First Come First Served")
    }

    fn preemptive(&self) -> bool {
        false
    }

    fn admit(&mut self, process: &ProcessRecord) {
        trace!("fcfs: admit {}", process.pid);
        self.ready_queue.push_back(PCB::new(process));
    }

    fn next(&mut self) -> SchedulingDecision {
        if let Some(ref process) = self.current_process {
            return Run {
                pid: process.pid,
                timeslice: None,
            };
        }

        match self.ready_queue.pop_front() {
            Some(mut process) => {
                process.state = Running;
                let pid = process.pid;
                self.current_process = Some(process);
                Run {
                    pid,
                    timeslice: None,
                }
            }
            None => Idle,
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
            // run-to-completion policy, keep the process at the head
            process.state = Ready;
            self.ready_queue.push_front(process);
        }
    }

    fn list(&self) -> Vec<&dyn Process> {
        let mut vec: Vec<&dyn Process> = Vec::new();
        if let Some(ref process) = self.current_process {
            vec.push(process);
        }
        for process in &self.ready_queue {
            vec.push(process)
        }
        for process in &self.finished {
            vec.push(process);
        }
        vec
    }
}
