use std::collections::VecDeque;

use log::trace;

use super::pcb::PCB;
use crate::ProcessState::{Completed, Ready, Running};
use crate::SchedulingDecision::{Idle, Run};
use crate::{
    Pid, Process, ProcessRecord, Scheduler, SchedulerError, SchedulingDecision, StopReason, Time,
};

/// Round-Robin over a FIFO ready queue.
///
/// Every dispatch is bounded by the quantum. An expired process goes to the
/// back of the queue, behind any process admitted while it was running.
pub struct RoundRobin {
    ready_queue: VecDeque<PCB>,
    current_process: Option<PCB>,
    finished: Vec<PCB>,
    quantum: Time,
}

impl RoundRobin {
    pub fn new(quantum: Time) -> Result<Self, SchedulerError> {
        if !quantum.is_finite() || quantum <= 0.0 {
            return Err(SchedulerError::InvalidParameter(format!(
                "round robin needs a positive time quantum, got {quantum}"
            )));
        }
        Ok(RoundRobin {
            ready_queue: VecDeque::new(),
            current_process: None,
            finished: Vec::new(),
            quantum,
        })
    }
}

impl Scheduler for RoundRobin {
    fn name(&self) -> String {
        format!("Round Robin (TQ = {:.2})", self.quantum)
    }

    fn preemptive(&self) -> bool {
        false
    }

    fn admit(&mut self, process: &ProcessRecord) {
        trace!("round robin: admit {}", process.pid);
        self.ready_queue.push_back(PCB::new(process));
    }

    fn next(&mut self) -> SchedulingDecision {
        if let Some(ref process) = self.current_process {
            return Run {
                pid: process.pid,
                timeslice: Some(self.quantum.min(process.remaining)),
            };
        }

        match self.ready_queue.pop_front() {
            Some(mut process) => {
                process.state = Running;
                let pid = process.pid;
                let timeslice = Some(self.quantum.min(process.remaining));
                self.current_process = Some(process);
                Run { pid, timeslice }
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
            process.state = Ready;
            self.ready_queue.push_back(process);
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
