//! Selection orders used by the schedulers.
//!
//! Every order is total: the last key is always the PID, so the
//! selection never depends on the position of a process in the ready set.

use std::cmp::Ordering;

use super::pcb::PCB;

/// Compares two control blocks, [`Ordering::Less`] wins the CPU.
pub(crate) type Order = fn(&PCB, &PCB) -> Ordering;

/// Earliest arrival, then lowest PID.
pub(crate) fn arrival(a: &PCB, b: &PCB) -> Ordering {
    a.arrival_time
        .total_cmp(&b.arrival_time)
        .then_with(|| a.pid.cmp(&b.pid))
}

/// Shortest remaining time, then earliest arrival, then lowest PID.
///
/// For a process that has not run yet the remaining time is its burst time.
pub(crate) fn shortest_remaining(a: &PCB, b: &PCB) -> Ordering {
    a.remaining
        .total_cmp(&b.remaining)
        .then_with(|| arrival(a, b))
}

/// Highest priority value, then earliest arrival, then shortest burst,
/// then lowest PID.
pub(crate) fn highest_priority(a: &PCB, b: &PCB) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.arrival_time.total_cmp(&b.arrival_time))
        .then_with(|| a.burst_time.total_cmp(&b.burst_time))
        .then_with(|| a.pid.cmp(&b.pid))
}

/// Position of the process that wins the CPU under `order`.
pub(crate) fn select(ready: &[PCB], order: Order) -> Option<usize> {
    ready
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| order(a, b))
        .map(|(index, _)| index)
}
