use std::io;
use std::path::PathBuf;

use scheduler::SchedulerError;
use thiserror::Error;

/// Errors raised while reading a workload file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("\"{}\" doesn't exist or is unreachable: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("the input file has no processes")]
    Empty,

    #[error(transparent)]
    Invalid(#[from] SchedulerError),
}

/// Errors that end the program with a non-zero status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot load workload: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("cannot write \"{}\": {source}", path.display())]
    Output { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
