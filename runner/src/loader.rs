//! Reads workloads in the `burst_time:arrival_time:priority` format.

use std::fs;
use std::path::Path;

use scheduler::{Pid, ProcessRecord, Time, Workload};

use crate::error::LoadError;

const DELIMITER: char = ':';

/// Loads and validates the workload stored at `path`.
pub fn load(path: &Path) -> Result<Workload, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let workload = parse(&content)?;
    workload.ensure_non_empty().map_err(|_| LoadError::Empty)?;
    Ok(workload)
}

/// Parses one process per line. Blank lines are skipped, the PID of a
/// process is its 1-based line number.
pub fn parse(content: &str) -> Result<Workload, LoadError> {
    let mut processes = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let pid = Pid::from_index(index);
        processes.push(parse_line(pid, line, index + 1)?);
    }
    Ok(Workload::new(processes)?)
}

fn parse_line(pid: Pid, line: &str, number: usize) -> Result<ProcessRecord, LoadError> {
    let parse_error = |reason: String| LoadError::Parse {
        line: number,
        reason,
    };

    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    let [burst, arrival, priority] = fields[..] else {
        return Err(parse_error(format!(
            "expected burst_time:arrival_time:priority, found {} fields",
            fields.len()
        )));
    };

    let time = |name: &str, value: &str| {
        value
            .parse::<Time>()
            .map_err(|_| parse_error(format!("{name} {value:?} is not a number")))
    };
    let burst_time = time("burst time", burst)?;
    let arrival_time = time("arrival time", arrival)?;
    let priority = priority
        .parse::<i32>()
        .map_err(|_| parse_error(format!("priority {priority:?} is not an integer")))?;

    Ok(ProcessRecord::new(pid, burst_time, arrival_time, priority))
}
