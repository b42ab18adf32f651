use crate::{Pid, Process, ProcessRecord, ProcessState, Time, EPSILON};

/// The control block a scheduler keeps for every admitted process.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PCB {
    pub(crate) pid: Pid,
    pub(crate) arrival_time: Time,
    pub(crate) burst_time: Time,
    pub(crate) remaining: Time,
    pub(crate) priority: i32,
    pub(crate) state: ProcessState,
}

impl PCB {
    pub(crate) fn new(process: &ProcessRecord) -> Self {
        PCB {
            pid: process.pid,
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            remaining: process.burst_time,
            priority: process.priority,
            state: ProcessState::Ready,
        }
    }

    /// Accounts `ran` time units of CPU.
    pub(crate) fn charge(&mut self, ran: Time) {
        self.remaining -= ran;
        if self.remaining < EPSILON {
            self.remaining = 0.0;
        }
    }
}

impl Process for PCB {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn state(&self) -> ProcessState {
        self.state
    }

    fn remaining(&self) -> Time {
        self.remaining
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn extra(&self) -> String {
        format!("arrival={:.2} burst={:.2}", self.arrival_time, self.burst_time)
    }
}
