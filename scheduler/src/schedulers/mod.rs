//! The scheduling policies.
//!
//! Each policy keeps its own control blocks, so a scheduler instance
//! belongs to exactly one run.

mod ordering;
mod pcb;

mod fcfs;
pub use fcfs::Fcfs;

mod selection;
pub use selection::Selection;

mod round_robin;
pub use round_robin::RoundRobin;
